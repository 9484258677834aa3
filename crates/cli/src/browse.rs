//! `photofeed browse`: walk the feed and load images through slots.
//!
//! Pages are followed through their `load_more` continuations. Each page's
//! photos are shown in windows of `slots` positions; every position owns an
//! [`ImageSlot`] that is pointed at a photo, and the window is finished when
//! each assigned slot has accepted one delivery. Slots are then scrolled out
//! of view before the next window reuses them.

use std::sync::Arc;

use anyhow::{Context, Result};
use photofeed_client::{HttpConfig, Photo, ReqwestClient, RemoteImageLoader, RemotePhotoLoader, sized_image_url};
use photofeed_core::cache::ContentStore;
use photofeed_core::slot::{self, Delivery};
use photofeed_core::{AppConfig, ImageLoader, ImageSlot, LocalImageCache, PaginatedFetcher, cache_then_remote};
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

/// Options of the browse command.
#[derive(Debug, Clone)]
pub struct BrowseOptions {
    pub pages: u32,
    pub slots: usize,
    pub thumb_size: u32,
}

/// Image outcomes for a set of slots.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WindowSummary {
    pub loaded: usize,
    pub failed: usize,
    pub bytes: usize,
}

impl WindowSummary {
    fn merge(&mut self, other: &WindowSummary) {
        self.loaded += other.loaded;
        self.failed += other.failed;
        self.bytes += other.bytes;
    }
}

/// Outcome of one browsed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub page: u32,
    pub photos: usize,
    pub images: WindowSummary,
}

/// Point the first `keys.len()` slots at `keys` and wait until each has accepted a delivery.
///
/// Deliveries from superseded fetches are dropped by the slots themselves.
pub async fn load_window<L: ImageLoader + 'static>(
    slots: &mut [ImageSlot<L>], keys: &[String], deliveries: &mut UnboundedReceiver<Delivery>,
) -> Result<WindowSummary> {
    let mut pending = 0;
    for (slot, key) in slots.iter_mut().zip(keys) {
        slot.on_identity_changed(key.as_str());
        slot.on_visible();
        pending += 1;
    }

    let mut summary = WindowSummary::default();
    while pending > 0 {
        let delivery = deliveries.recv().await.context("delivery channel closed")?;
        let Some(slot) = slots.get_mut(delivery.slot()) else {
            continue;
        };
        if let Some(loaded) = slot.apply(delivery) {
            pending -= 1;
            match loaded.image {
                Some(image) => {
                    summary.loaded += 1;
                    summary.bytes += image.len();
                }
                None => summary.failed += 1,
            }
        }
    }

    for slot in slots.iter_mut() {
        slot.on_invisible();
    }

    Ok(summary)
}

/// Walk up to `options.pages` pages and load every photo's thumbnail.
///
/// A failed page ends the walk with an error; pages already reported stay reported.
pub async fn run<S>(config: &AppConfig, cache: Arc<LocalImageCache<S>>, options: &BrowseOptions) -> Result<()>
where
    S: ContentStore + 'static,
{
    let base_url = Url::parse(&config.api_base_url).context("invalid api_base_url")?;
    let http = ReqwestClient::new(HttpConfig::from(config))?;

    let fetcher = PaginatedFetcher::new(Arc::new(RemotePhotoLoader::new(http.clone(), base_url.clone())), config.page_size);
    let images = Arc::new(cache_then_remote(Arc::clone(&cache), RemoteImageLoader::new(http)));

    let (tx, mut rx) = slot::channel();
    let mut slots: Vec<_> =
        (0..options.slots.max(1)).map(|id| ImageSlot::new(id, Arc::clone(&images), tx.clone())).collect();

    let mut total = WindowSummary::default();
    let mut page = fetcher.fetch_first().await?;
    let mut page_number = 1;

    loop {
        let summary = browse_page(&mut slots, &mut rx, &base_url, &page.items, page_number, options).await?;
        println!(
            "page {}: {} photos, {} images ({} bytes), {} failed",
            summary.page, summary.photos, summary.images.loaded, summary.images.bytes, summary.images.failed
        );
        total.merge(&summary.images);

        if page_number >= options.pages {
            break;
        }
        let Some(load_more) = page.load_more else {
            tracing::info!(page = page_number, "reached end of feed");
            break;
        };
        page = load_more.load().await?;
        page_number += 1;
    }

    println!("total: {} images ({} bytes), {} failed", total.loaded, total.bytes, total.failed);

    // sweep expired entries on the way out
    cache.spawn_invalidate().await?;

    Ok(())
}

async fn browse_page<L: ImageLoader + 'static>(
    slots: &mut [ImageSlot<L>], deliveries: &mut UnboundedReceiver<Delivery>, base_url: &Url, photos: &[Photo],
    page: u32, options: &BrowseOptions,
) -> Result<PageSummary> {
    let keys: Vec<String> = photos
        .iter()
        .map(|photo| sized_image_url(base_url, &photo.id, options.thumb_size, options.thumb_size).to_string())
        .collect();

    let mut images = WindowSummary::default();
    for window in keys.chunks(slots.len()) {
        images.merge(&load_window(slots, window, deliveries).await?);
    }

    Ok(PageSummary { page, photos: photos.len(), images })
}

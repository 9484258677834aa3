//! Forward-only pagination over a page-indexed remote loader.
//!
//! [`PaginatedFetcher::fetch_page`] returns a [`Paginated`] snapshot holding
//! the page's items and, when the page was non-empty, a [`LoadMore`]
//! continuation for the next page. An empty page ends the chain, as does
//! reaching the largest representable page number.
//!
//! A non-empty last page still produces a continuation; only fetching it
//! reveals that nothing follows. Continuations capture their page number, so
//! calling one twice fetches the same page twice and moves no shared cursor.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::Error;

/// Parameters of a single page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// The same request for the following page, or `None` past the last page number.
    pub fn next(&self) -> Option<Self> {
        let page = self.page.checked_add(1)?;
        Some(Self { page, ..*self })
    }
}

/// Remote source of pages.
#[async_trait]
pub trait PageLoader: Send + Sync {
    type Item: Send;

    /// Fetch one page. Malformed or unsuccessful responses are errors.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Self::Item>, Error>;
}

#[async_trait]
impl<T: PageLoader + ?Sized> PageLoader for Arc<T> {
    type Item = T::Item;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Self::Item>, Error> {
        (**self).fetch_page(request).await
    }
}

type FetchFn<T> = Arc<dyn Fn(PageRequest) -> BoxFuture<'static, Result<Paginated<T>, Error>> + Send + Sync>;

/// One fetched page plus the way to the next one.
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// `None` once a page comes back empty.
    pub load_more: Option<LoadMore<T>>,
}

impl<T> Paginated<T> {
    pub fn has_more(&self) -> bool {
        self.load_more.is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for Paginated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginated")
            .field("items", &self.items)
            .field("load_more", &self.load_more)
            .finish()
    }
}

/// Deferred fetch of the next page.
pub struct LoadMore<T> {
    request: PageRequest,
    fetch: FetchFn<T>,
}

impl<T> LoadMore<T> {
    /// The request this continuation will issue.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Fetch the page this continuation points at.
    pub async fn load(&self) -> Result<Paginated<T>, Error> {
        (self.fetch)(self.request).await
    }
}

impl<T> Clone for LoadMore<T> {
    fn clone(&self) -> Self {
        Self { request: self.request, fetch: Arc::clone(&self.fetch) }
    }
}

impl<T> fmt::Debug for LoadMore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadMore").field("request", &self.request).finish_non_exhaustive()
    }
}

/// Turns a [`PageLoader`] into a chain of [`Paginated`] results.
pub struct PaginatedFetcher<T> {
    fetch: FetchFn<T>,
    per_page: u32,
}

impl<T: Send + 'static> PaginatedFetcher<T> {
    pub fn new<L>(loader: Arc<L>, per_page: u32) -> Self
    where
        L: PageLoader<Item = T> + 'static,
    {
        let fetch: FetchFn<T> = Arc::new(move |request| fetch_with(Arc::clone(&loader), request));
        Self { fetch, per_page }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Fetch `page` and wrap it with a continuation for `page + 1` when there is one.
    pub async fn fetch_page(&self, page: u32) -> Result<Paginated<T>, Error> {
        (self.fetch)(PageRequest::new(page, self.per_page)).await
    }

    /// Fetch the first page.
    pub async fn fetch_first(&self) -> Result<Paginated<T>, Error> {
        self.fetch_page(1).await
    }
}

fn fetch_with<L>(loader: Arc<L>, request: PageRequest) -> BoxFuture<'static, Result<Paginated<L::Item>, Error>>
where
    L: PageLoader + 'static,
    L::Item: 'static,
{
    async move {
        let items = loader.fetch_page(&request).await?;
        tracing::debug!(page = request.page, items = items.len(), "fetched page");

        let load_more = match request.next() {
            Some(next) if !items.is_empty() => {
                let fetch: FetchFn<L::Item> = Arc::new(move |request| fetch_with(Arc::clone(&loader), request));
                Some(LoadMore { request: next, fetch })
            }
            _ => None,
        };

        Ok(Paginated { items, load_more })
    }
    .boxed()
}

//! Client code for photofeed.
//!
//! This crate provides the HTTP transport and the remote loaders the core
//! pipeline is composed from: the paged photo listing and image downloads.

pub mod endpoint;
pub mod http;
pub mod images;
pub mod photos;

pub use endpoint::{UrlError, parse_image_url, photo_list_url, sized_image_url};
pub use http::{HttpClient, HttpConfig, HttpResponse, ReqwestClient};
pub use images::RemoteImageLoader;
pub use photos::{Photo, RemotePhotoLoader, decode_photos};

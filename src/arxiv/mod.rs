//! arXiv search: API client, Atom parsing and the article record

mod client;
mod feed;
mod models;

pub use client::ArxivClient;
pub use feed::{parse_feed, ApiError};
pub use models::{id_from_link, pdf_link_from_abs, Article};

#[cfg(test)]
pub(crate) use feed::tests::{ERROR_FEED, SAMPLE_FEED};

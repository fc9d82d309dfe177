//! Search orchestration module
//!
//! Runs the arXiv query and screens the hits by the length of their leading
//! pages, extracting several PDFs at once.

mod screener;

pub use screener::{ScreenedArticle, Screener};

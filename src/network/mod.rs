//! HTTP networking module
//!
//! Provides the HTTP client shared by the arXiv, PDF, summarizer and
//! Wikipedia collaborators.

mod client;
mod request;
mod user_agent;

pub use client::HttpClient;
pub use request::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use user_agent::{accept_atom, accept_json, accept_pdf, user_agent};

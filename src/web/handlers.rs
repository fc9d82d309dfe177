//! HTTP request handlers

use super::state::AppState;
use crate::arxiv::Article;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;
use tracing::{error, warn};

/// Largest page size a request may ask for
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search query
    pub query: Option<String>,
    /// Offset into the arXiv result list
    pub start: Option<u32>,
    /// Page size
    pub max_results: Option<u32>,
    /// Word-count screening: on/off
    pub filter: Option<String>,
    /// Output format
    pub format: Option<String>,
}

/// Query parameters for the detail page
#[derive(Debug, Deserialize)]
pub struct PaperParams {
    /// Summarize the leading pages: on/off
    pub summarize: Option<String>,
    /// Output format
    pub format: Option<String>,
}

/// Search results response, also the HTML template context
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub start: u32,
    pub max_results: u32,
    pub filtered: bool,
    pub max_word_count: usize,
    pub number_of_results: usize,
    pub results: Vec<ResultEntry>,
}

#[derive(Debug, Serialize)]
pub struct ResultEntry {
    #[serde(flatten)]
    pub article: Article,
    /// Present when the result was screened
    pub word_count: Option<usize>,
}

/// Parse an on/off style flag, falling back to `default` for anything else
fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "on" | "yes") => true,
        Some("0" | "false" | "off" | "no") => false,
        _ => default,
    }
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn error_page(state: &AppState, status: StatusCode, message: &str) -> Response {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("status", &status.as_u16());
    ctx.insert("message", message);

    let mut response = render(state, "error.html", &ctx);
    if response.status().is_success() {
        *response.status_mut() = status;
    }
    response
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> Response {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("max_results", &state.settings.arxiv.max_results);
    ctx.insert("max_results_limit", &MAX_RESULTS_LIMIT);
    ctx.insert("filter", &state.settings.pdf.filter_by_default);
    ctx.insert("max_word_count", &state.screener.max_word_count());

    render(&state, "index.html", &ctx)
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = match params.query {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => return Redirect::to("/").into_response(),
    };

    let start = params.start.unwrap_or(0);
    let max_results = params
        .max_results
        .unwrap_or(state.settings.arxiv.max_results)
        .clamp(1, MAX_RESULTS_LIMIT);
    let filtered = parse_flag(params.filter.as_deref(), state.settings.pdf.filter_by_default);
    let max_word_count = state.screener.max_word_count();

    let results: Vec<ResultEntry> = if filtered {
        state
            .screener
            .fetch_and_filter(&query, start, max_results, max_word_count)
            .await
            .into_iter()
            .map(|s| ResultEntry {
                article: s.article,
                word_count: Some(s.word_count),
            })
            .collect()
    } else {
        state
            .screener
            .search(&query, start, max_results)
            .await
            .into_iter()
            .map(|article| ResultEntry {
                article,
                word_count: None,
            })
            .collect()
    };

    let response = SearchResponse {
        query,
        start,
        max_results,
        filtered,
        max_word_count,
        number_of_results: results.len(),
        results,
    };

    match params.format.as_deref() {
        Some("json") => Json(response).into_response(),
        _ => {
            let mut ctx = match Context::from_serialize(&response) {
                Ok(ctx) => ctx,
                Err(e) => {
                    error!("Template context error: {}", e);
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response();
                }
            };
            ctx.insert("instance_name", state.instance_name());
            ctx.insert("prev_start", &start.saturating_sub(max_results));
            ctx.insert("next_start", &start.saturating_add(max_results));

            render(&state, "results.html", &ctx)
        }
    }
}

/// Article detail handler
pub async fn paper(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PaperParams>,
) -> Response {
    let id = id.trim_matches('/');
    if id.is_empty() {
        return error_page(&state, StatusCode::NOT_FOUND, "No article given.");
    }

    let article = match state.screener.lookup(id).await {
        Ok(Some(article)) => article,
        Ok(None) => {
            return error_page(
                &state,
                StatusCode::NOT_FOUND,
                &format!("No arXiv article with id {}.", id),
            )
        }
        Err(e) => {
            warn!("arXiv lookup for {} failed: {}", id, e);
            return error_page(&state, StatusCode::BAD_GATEWAY, "arXiv could not be reached.");
        }
    };

    let summarize = parse_flag(params.summarize.as_deref(), true);
    let digest = state.digester.digest(article, summarize).await;

    match params.format.as_deref() {
        Some("json") => Json(&*digest).into_response(),
        _ => {
            let mut ctx = match Context::from_serialize(&*digest) {
                Ok(ctx) => ctx,
                Err(e) => {
                    error!("Template context error: {}", e);
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response();
                }
            };
            ctx.insert("instance_name", state.instance_name());
            ctx.insert("can_summarize", &state.digester.can_summarize());

            render(&state, "paper.html", &ctx)
        }
    }
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

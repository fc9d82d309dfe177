//! arxiv-digest: web front end and command line for arXiv paper digests
//!
//! This is the main entry point for the application.

use anyhow::{bail, Result};
use arxiv_digest::{
    config::{self, Settings},
    network::HttpClient,
    web::{create_router, AppState},
    Article,
};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arxiv-digest")]
#[command(author, version, about = "Search arXiv and digest the first pages of papers", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default)
    Serve,
    /// Search arXiv from the terminal
    Search {
        /// Search query
        query: String,
        /// Number of results to request
        #[arg(long)]
        max_results: Option<u32>,
        /// Keep only papers whose first pages are short enough
        #[arg(long)]
        filter: bool,
    },
    /// Extract and summarize one paper
    Digest {
        /// arXiv identifier, e.g. 2101.00001v1
        id: String,
        /// Print the extracted text only
        #[arg(long)]
        no_summary: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = config::load(cli.config.as_deref())?;
    init_logging(&settings);

    info!("arxiv-digest v{}", arxiv_digest::VERSION);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(settings, client).await,
        Commands::Search {
            query,
            max_results,
            filter,
        } => search(settings, client, &query, max_results, filter).await,
        Commands::Digest { id, no_summary } => digest(settings, client, &id, !no_summary).await,
    }
}

/// `RUST_LOG` wins; otherwise info, or debug when enabled in settings
fn init_logging(settings: &Settings) {
    let default = if settings.general.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn serve(settings: Settings, client: HttpClient) -> Result<()> {
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let public_url = settings.server.base_url.clone();

    // Create application state
    let state = AppState::new(settings, client)?;
    info!("Application state initialized");

    let app = create_router(state);

    info!("Starting server on http://{}", addr);
    if let Some(base_url) = &public_url {
        info!("Public URL: {}", base_url);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn search(
    settings: Settings,
    client: HttpClient,
    query: &str,
    max_results: Option<u32>,
    filter: bool,
) -> Result<()> {
    let max_results = max_results.unwrap_or(settings.arxiv.max_results);
    let state = AppState::new(settings, client)?;
    let screener = &state.screener;

    if filter {
        let max_word_count = screener.max_word_count();
        let kept = screener
            .fetch_and_filter(query, 0, max_results, max_word_count)
            .await;
        println!("{} articles with at most {} words:\n", kept.len(), max_word_count);
        for screened in kept {
            let a = &screened.article;
            println!("{}  {}", a.id, a.title);
            println!("    {} | {} | {} words", a.author_line(), published(a), screened.word_count);
        }
    } else {
        let articles = screener.search(query, 0, max_results).await;
        println!("{} articles:\n", articles.len());
        for a in articles {
            println!("{}  {}", a.id, a.title);
            println!("    {} | {}", a.author_line(), published(&a));
        }
    }

    Ok(())
}

fn published(article: &Article) -> String {
    article
        .published_date()
        .map(|d| d.to_string())
        .unwrap_or_else(|| article.published.clone())
}

async fn digest(settings: Settings, client: HttpClient, id: &str, summarize: bool) -> Result<()> {
    let state = AppState::new(settings, client)?;

    let Some(article) = state.screener.lookup(id).await? else {
        bail!("No arXiv article with id {}", id);
    };

    let digest = state.digester.digest(article, summarize).await;
    let article = &digest.article;

    println!("=== {} ===", article.title);
    println!("{}", article.author_line());
    println!("{}\n", article.pdf_link);

    match (&digest.text, &digest.summary_html) {
        (None, _) => println!("The PDF text could not be extracted."),
        (Some(_), Some(summary)) => {
            println!("Summary ({} chunks):\n", digest.chunks);
            println!("{}", summary);
        }
        (Some(text), None) => {
            if digest.summary_requested {
                println!("Summary unavailable; extracted text follows.\n");
            }
            println!("{}", text);
            println!("\n--- {} words ---", digest.word_count);
        }
    }

    Ok(())
}

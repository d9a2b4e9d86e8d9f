//! # braillescore server
//!
//! Serves the ABC-to-braille conversion API:
//! - `GET /` — landing page with a conversion form
//! - `POST /data` — convert an ABC tune to braille, Braille ASCII and MusicXML
//!
//! # CLI Usage
//!
//! ```bash
//! # Start with defaults (127.0.0.1:8080)
//! braillescore
//!
//! # Bind elsewhere
//! braillescore --host 0.0.0.0 --port 9000
//! BRAILLESCORE_PORT=9000 braillescore
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use braillescore::web::{self, pages, AppState};

/// ABC notation to braille music conversion service.
#[derive(Parser, Debug)]
#[command(name = "braillescore")]
#[command(about = "ABC notation to braille music conversion service")]
#[command(version)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1", env = "BRAILLESCORE_HOST")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080, env = "BRAILLESCORE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let landing_page = pages::render_index()
        .map_err(anyhow::Error::msg)
        .context("failed to render landing page")?;
    let state = Arc::new(AppState { landing_page });
    let app = web::router(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use ghcard::card::CardService;
use ghcard::rendering::raster::SvgRasterizer;
use ghcard::CardConfig;

/// Serve social preview cards for GitHub profiles.
#[derive(Debug, Parser)]
#[command(name = "ghcard", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "GHCARD_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Bearer token for the GitHub REST API
    #[arg(long, env = "GITHUB_PERSONAL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Base URL of the REST API
    #[arg(long, default_value = "https://api.github.com")]
    api_base: String,

    /// Base URL of the public site (profile pages)
    #[arg(long, default_value = "https://github.com")]
    web_base: String,

    /// QR code image service
    #[arg(long, default_value = "https://api.qrserver.com/v1/create-qr-code/")]
    qr_base: String,

    /// Extra font directory for the rasterizer
    #[arg(long, env = "GHCARD_FONT_DIR")]
    font_dir: Option<PathBuf>,
}

impl Args {
    fn card_config(&self) -> CardConfig {
        CardConfig {
            api_base: self.api_base.clone(),
            web_base: self.web_base.clone(),
            qr_base: self.qr_base.clone(),
            token: self.token.clone().filter(|t| !t.is_empty()),
            font_dir: self.font_dir.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.card_config();
    if config.token.is_none() {
        log::warn!("no GitHub token configured; profile lookups will be unauthenticated");
    }

    let rasterizer = Arc::new(SvgRasterizer::from_config(&config));
    let service = CardService::new(config, rasterizer).context("failed to build card service")?;
    let app = ghcard::server::router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

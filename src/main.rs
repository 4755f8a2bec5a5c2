//! gitrends dashboard binary
//!
//! Usage:
//!   gitrends --base-url http://127.0.0.1:9000
//!
//! Every flag can also be set through a `GITRENDS_*` environment variable or
//! a `.env` file.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use gitrends::{AppConfig, GitrendsApp};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitrends=info,gitrends_graph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::parse();
    info!(base_url = %config.base_url, "starting gitrends dashboard");

    let runtime = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("gitrends")
            .with_inner_size([1600.0, 1000.0]),
        ..Default::default()
    };

    eframe::run_native(
        "gitrends",
        options,
        Box::new(move |cc| Ok(Box::new(GitrendsApp::new(cc, config, runtime)))),
    )
    .map_err(|e| anyhow!("eframe failed: {}", e))
}

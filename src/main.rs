#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod chart;
mod config;
mod constants;
mod data;
mod error;
mod perf;
mod request;
mod state;
mod ui;
mod widgets;

use app::PowerStats;
use config::AppConfig;
use constants::config::CONFIG_FILE;

/// `RUST_LOG` wins over the configured directive
fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> eframe::Result {
    let config_path = PathBuf::from(CONFIG_FILE);
    let config = AppConfig::load_or_default(&config_path);
    init_logging(&config.log_filter);

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = {
        puffin::set_scopes_on(true);
        let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        match puffin_http::Server::new(&addr) {
            Ok(server) => {
                tracing::info!("Puffin server listening on {}", addr);
                Some(server)
            }
            Err(e) => {
                tracing::warn!("Puffin server failed to start: {}", e);
                None
            }
        }
    };

    tracing::info!("Starting power-stats with {:?} backend", config.backend);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 820.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Power Stats",
        options,
        Box::new(move |_| Ok(Box::new(PowerStats::new(config, config_path)))),
    )
}

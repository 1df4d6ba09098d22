//! CRUD Sync Frontend Entry Point

mod app;
mod components;
mod config;
mod pages;
mod session;
mod store;

use app::{App, ConfigError};
use config::AppConfig;
use console_logger::{init_logger, LevelFilter};
use leptos::prelude::*;

const APP_NAME: &str = "crud-sync";

fn main() {
    console_error_panic_hook::set_once();

    match AppConfig::load() {
        Ok(config) => {
            if let Err(e) = init_logger(APP_NAME, config.log_level()) {
                leptos::logging::warn!("logger unavailable: {}", e);
            }
            tracing::info!(
                rest = %config.rest_base_url,
                graphql = %config.graphql.endpoint,
                "starting"
            );
            mount_to_body(move || view! { <App config=config /> });
        }
        Err(e) => {
            if let Err(e) = init_logger(APP_NAME, LevelFilter::INFO) {
                leptos::logging::warn!("logger unavailable: {}", e);
            }
            tracing::error!(error = %e, "invalid configuration");
            let message = e.to_string();
            mount_to_body(move || view! { <ConfigError message=message /> });
        }
    }
}

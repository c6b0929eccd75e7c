#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;
mod ui;

use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_desktop::{tao::window::WindowBuilder, Config as DesktopConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shipping_calculator::{
    config::{ClientConfig, ConfigError},
    infra::{ApiClient, ApiError, StoredSession},
    util::version::{version_label, APP_NAME},
    workflow::ZoneResolver,
};

use crate::app::Services;

fn main() {
    init_tracing();

    // Wayland explicit-sync crashes on some drivers; fall back to GL unless the caller opts in.
    if std::env::var("WAYLAND_DISPLAY").is_ok() && std::env::var("WGPU_BACKEND").is_err() {
        std::env::set_var("WGPU_BACKEND", "gl");
    }
    if std::env::var("WAYLAND_DISPLAY").is_ok()
        && std::env::var("WEBKIT_DISABLE_DMABUF_RENDERER").is_err()
    {
        std::env::set_var("WEBKIT_DISABLE_DMABUF_RENDERER", "1");
    }

    let services = match build_services() {
        Ok(services) => services,
        Err(err) => {
            error!(error = %err, "failed to initialise services");
            std::process::exit(1);
        }
    };
    info!(
        version = %version_label(),
        api = %services.config.api_base_url,
        origin = %services.config.origin_zip,
        "starting"
    );

    let config = desktop! {
        DesktopConfig::new().with_window(
            WindowBuilder::new()
                .with_title(APP_NAME)
        )
    };

    LaunchBuilder::new()
        .with_cfg(config)
        .with_context(services)
        .launch(app::App);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn build_services() -> Result<Services, StartupError> {
    let loaded = ClientConfig::load()?;
    for rejected in &loaded.rejected {
        warn!(source = %rejected.source_kind, error = %rejected.error, "ignoring configuration value");
    }
    let config = loaded.config;
    let session = Arc::new(StoredSession::from_environment());
    let client = ApiClient::new(&config, session.clone())?;
    let resolver = ZoneResolver::new(Arc::new(client.clone()));

    Ok(Services {
        config,
        session,
        client,
        resolver,
    })
}

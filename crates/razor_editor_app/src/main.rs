// SPDX-License-Identifier: MIT OR Apache-2.0
//! Razor material editor.
//!
//! A standalone window hosting the material node graph: create nodes from
//! the right-click menu, drag them around, and wire connectors together by
//! dragging from one connector to another.
//!
//! Usage: `razor_editor [SETTINGS_FILE]` (defaults to `razor_editor.ron`).

mod app;

use app::EditorApp;
use razor_editor_graph::settings::SETTINGS_FILE_NAME;
use razor_editor_graph::EditorSettings;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVES: &str = "razor_editor_app=debug,razor_editor_graph=debug,wgpu=warn,naga=warn";

fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Razor material editor v{}", env!("CARGO_PKG_VERSION"));

    let settings_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(SETTINGS_FILE_NAME), PathBuf::from);
    let settings = EditorSettings::load_or_default(&settings_path);

    if let Err(e) = EditorApp::run(settings, settings_path) {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}

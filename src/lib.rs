use leptos::{mount_to_body, view};
use wasm_bindgen::prelude::*;

use crate::app::{App, AppServices};
use crate::domain::logging::{LogComponent, get_logger, get_time_provider};

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

/// Installs the browser logger and clock, then mounts the dashboard
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));

    let services = AppServices::new(
        config::AppConfig::default(),
        get_time_provider().current_timestamp(),
    );
    mount_to_body(move || view! { <App services=services.clone() /> });

    get_logger().info(LogComponent::Presentation("Initialize"), "Dashboard mounted");
}

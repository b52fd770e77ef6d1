//! Configuration domain module

mod app_config;

pub use app_config::{is_valid_server_url, AppConfig, DeviceConfig, DEFAULT_SERVER_URL};

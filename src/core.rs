pub mod api;
pub mod caching;
pub mod fetch_state;
pub mod locale;
pub mod paths;
pub mod settings_config;

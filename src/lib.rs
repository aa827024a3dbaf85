//! Wi-Fi and MQTT credentials for the sensor station firmware.
//!
//! The operator copies `secrets.example.toml` (or `secrets.example.h`) to
//! `secrets.toml` / `secrets.h` and edits it; `build.rs` bakes the values
//! into the image. Individual values can be overridden with `STATION_*`
//! environment variables at build time. At startup the firmware calls
//! [`load`] once and halts with the returned error if the values were never
//! customized or are unusable:
//!
//! ```no_run
//! let config = match station_config::load() {
//!     Ok(config) => config,
//!     Err(e) => panic!("Invalid station configuration: {}", e),
//! };
//! let _ = (config.wifi_ssid(), config.mqtt_host(), config.mqtt_port());
//! ```
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod constants;
pub mod defines;
pub mod error;
pub mod field;
pub mod header;
pub mod provider;
pub mod template;

pub use config::{Config, ConfigBuilder};
pub use error::Error;
pub use field::Field;
pub use provider::{validate, ConfigProvider, Entries, Origin};

/// Loads the configuration baked in by the build script.
pub fn load() -> Result<Config, Error> {
    ConfigProvider::builtin().load()
}

/// Sentinel left in the example template for values the operator must replace
pub const PLACEHOLDER: &str = "change-me";

/// Default MQTT port (plain TCP)
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Maximum SSID length defined by 802.11
pub const WIFI_SSID_MAX_LEN: usize = 32;
/// Maximum WPA2 pre-shared key length (64 hex digits)
pub const WIFI_PASSWORD_MAX_LEN: usize = 64;
/// Maximum DNS name length
pub const MQTT_HOST_MAX_LEN: usize = 253;
/// Maximum MQTT username length kept in the record
pub const MQTT_USER_MAX_LEN: usize = 64;
/// Maximum MQTT password length kept in the record
pub const MQTT_PASSWORD_MAX_LEN: usize = 128;

/// Name of the header the operator copies the example to
pub const SECRETS_HEADER: &str = "secrets.h";
/// Name of the TOML file the operator copies the example to
pub const SECRETS_TOML: &str = "secrets.toml";

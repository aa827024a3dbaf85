use core::fmt;

/// One key of the station configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    WifiSsid,
    WifiPassword,
    MqttHost,
    MqttPort,
    MqttUser,
    MqttPassword,
}

impl Field {
    /// Every field, in record order.
    pub const ALL: [Field; 6] = [
        Field::WifiSsid,
        Field::WifiPassword,
        Field::MqttHost,
        Field::MqttPort,
        Field::MqttUser,
        Field::MqttPassword,
    ];

    /// Macro name used in the C header template.
    pub const fn define_name(self) -> &'static str {
        match self {
            Field::WifiSsid => "WIFI_SSID",
            Field::WifiPassword => "WIFI_PASS",
            Field::MqttHost => "MQTT_HOST",
            Field::MqttPort => "MQTT_PORT",
            Field::MqttUser => "MQTT_USER",
            Field::MqttPassword => "MQTT_PASS",
        }
    }

    /// Key used in `secrets.toml`.
    pub const fn toml_key(self) -> &'static str {
        match self {
            Field::WifiSsid => "wifi_ssid",
            Field::WifiPassword => "wifi_password",
            Field::MqttHost => "mqtt_host",
            Field::MqttPort => "mqtt_port",
            Field::MqttUser => "mqtt_user",
            Field::MqttPassword => "mqtt_password",
        }
    }

    /// Environment variable that overrides this field at build time.
    pub const fn env_var(self) -> &'static str {
        match self {
            Field::WifiSsid => "STATION_WIFI_SSID",
            Field::WifiPassword => "STATION_WIFI_PASSWORD",
            Field::MqttHost => "STATION_MQTT_HOST",
            Field::MqttPort => "STATION_MQTT_PORT",
            Field::MqttUser => "STATION_MQTT_USER",
            Field::MqttPassword => "STATION_MQTT_PASSWORD",
        }
    }

    /// Looks a field up by its header macro name.
    pub fn from_define_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.define_name() == name)
    }

    /// True for fields holding text rather than a number.
    pub const fn is_text(self) -> bool {
        !matches!(self, Field::MqttPort)
    }

    /// True for fields that must never be printed.
    pub const fn is_secret(self) -> bool {
        matches!(self, Field::WifiPassword | Field::MqttPassword)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.define_name())
    }
}

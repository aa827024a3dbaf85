use core::fmt::{self, Write};

use heapless::String;

use crate::constants::*;
use crate::error::Error;
use crate::field::Field;

/// Network and broker settings needed before network bring-up.
///
/// Built once and never mutated; fields are read through accessors.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    // Wi-Fi SSID to connect to
    wifi_ssid: String<WIFI_SSID_MAX_LEN>,

    // Wi-Fi pre-shared key (password)
    wifi_password: String<WIFI_PASSWORD_MAX_LEN>,

    // MQTT broker hostname or IP address
    mqtt_host: String<MQTT_HOST_MAX_LEN>,

    // MQTT port (usually 1883 or 8883 for TLS)
    mqtt_port: u16,

    // MQTT username for authentication
    mqtt_user: String<MQTT_USER_MAX_LEN>,

    // MQTT password for authentication
    mqtt_password: String<MQTT_PASSWORD_MAX_LEN>,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn wifi_ssid(&self) -> &str {
        &self.wifi_ssid
    }

    pub fn wifi_password(&self) -> &str {
        &self.wifi_password
    }

    pub fn mqtt_host(&self) -> &str {
        &self.mqtt_host
    }

    pub fn mqtt_port(&self) -> u16 {
        self.mqtt_port
    }

    pub fn mqtt_user(&self) -> &str {
        &self.mqtt_user
    }

    pub fn mqtt_password(&self) -> &str {
        &self.mqtt_password
    }

    /// Value of a text field, `None` for the port.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::WifiSsid => Some(self.wifi_ssid()),
            Field::WifiPassword => Some(self.wifi_password()),
            Field::MqttHost => Some(self.mqtt_host()),
            Field::MqttPort => None,
            Field::MqttUser => Some(self.mqtt_user()),
            Field::MqttPassword => Some(self.mqtt_password()),
        }
    }

    /// Text fields paired with their values, in record order.
    pub fn credentials(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(move |field| Some((field, self.text(field)?)))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Config");
        for field in Field::ALL {
            match self.text(field) {
                Some(_) if field.is_secret() => s.field(field.toml_key(), &"<redacted>"),
                Some(value) => s.field(field.toml_key(), &value),
                None => s.field(field.toml_key(), &self.mqtt_port),
            };
        }
        s.finish()
    }
}

/// True when `value` is empty, blank, or the template sentinel.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(PLACEHOLDER)
}

/// Collects field values one at a time and checks that they fit a `Config`.
///
/// Only structural checks happen here (presence, capacity, port range);
/// placeholders are left for [`crate::validate`].
#[derive(Default, Clone)]
pub struct ConfigBuilder {
    wifi_ssid: Option<String<WIFI_SSID_MAX_LEN>>,
    wifi_password: Option<String<WIFI_PASSWORD_MAX_LEN>>,
    mqtt_host: Option<String<MQTT_HOST_MAX_LEN>>,
    mqtt_port: Option<u16>,
    mqtt_user: Option<String<MQTT_USER_MAX_LEN>>,
    mqtt_password: Option<String<MQTT_PASSWORD_MAX_LEN>>,
}

impl ConfigBuilder {
    /// Sets a text field from anything printable, e.g. `&str` or an escaped
    /// header literal.
    pub fn text(&mut self, field: Field, value: impl fmt::Display) -> Result<&mut Self, Error> {
        match field {
            Field::WifiSsid => self.wifi_ssid = Some(fill(field, value)?),
            Field::WifiPassword => self.wifi_password = Some(fill(field, value)?),
            Field::MqttHost => self.mqtt_host = Some(fill(field, value)?),
            Field::MqttPort => return Err(Error::TypeMismatch(field)),
            Field::MqttUser => self.mqtt_user = Some(fill(field, value)?),
            Field::MqttPassword => self.mqtt_password = Some(fill(field, value)?),
        }
        Ok(self)
    }

    /// Sets the broker port; anything outside `u16` is rejected here, zero is
    /// left for validation.
    pub fn port(&mut self, value: i64) -> Result<&mut Self, Error> {
        let port = u16::try_from(value).map_err(|_| Error::InvalidPort(value))?;
        self.mqtt_port = Some(port);
        Ok(self)
    }

    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::WifiSsid => self.wifi_ssid.is_some(),
            Field::WifiPassword => self.wifi_password.is_some(),
            Field::MqttHost => self.mqtt_host.is_some(),
            Field::MqttPort => self.mqtt_port.is_some(),
            Field::MqttUser => self.mqtt_user.is_some(),
            Field::MqttPassword => self.mqtt_password.is_some(),
        }
    }

    pub fn build(&self) -> Result<Config, Error> {
        let missing = Error::MissingKey;
        Ok(Config {
            wifi_ssid: self.wifi_ssid.clone().ok_or(missing(Field::WifiSsid))?,
            wifi_password: self
                .wifi_password
                .clone()
                .ok_or(missing(Field::WifiPassword))?,
            mqtt_host: self.mqtt_host.clone().ok_or(missing(Field::MqttHost))?,
            mqtt_port: self.mqtt_port.ok_or(missing(Field::MqttPort))?,
            mqtt_user: self.mqtt_user.clone().ok_or(missing(Field::MqttUser))?,
            mqtt_password: self
                .mqtt_password
                .clone()
                .ok_or(missing(Field::MqttPassword))?,
        })
    }
}

fn fill<const N: usize>(field: Field, value: impl fmt::Display) -> Result<String<N>, Error> {
    let mut s = String::new();
    write!(s, "{}", value).map_err(|_| Error::TooLong { field, max: N })?;
    Ok(s)
}

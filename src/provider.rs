use core::fmt;

use crate::config::{is_placeholder, Config};
use crate::error::Error;
use crate::field::Field;
use crate::template;

// values baked in at compile time by build.rs
mod built {
    use super::{Entries, Origin};

    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Where the baked-in values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Only the shipped example file was found
    Example,
    /// An operator-edited secrets file
    File,
    /// At least one value came from a `STATION_*` environment variable
    Environment,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Example => f.write_str("example template"),
            Origin::File => f.write_str("secrets file"),
            Origin::Environment => f.write_str("environment"),
        }
    }
}

/// Raw key set before any checks; the port stays wide so out-of-range
/// values reach validation instead of failing the build.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Entries<'a> {
    pub wifi_ssid: Option<&'a str>,
    pub wifi_password: Option<&'a str>,
    pub mqtt_host: Option<&'a str>,
    pub mqtt_port: Option<i64>,
    pub mqtt_user: Option<&'a str>,
    pub mqtt_password: Option<&'a str>,
}

impl<'a> Entries<'a> {
    /// Value of a text field, `None` for the port or when unset.
    pub fn text(&self, field: Field) -> Option<&'a str> {
        match field {
            Field::WifiSsid => self.wifi_ssid,
            Field::WifiPassword => self.wifi_password,
            Field::MqttHost => self.mqtt_host,
            Field::MqttPort => None,
            Field::MqttUser => self.mqtt_user,
            Field::MqttPassword => self.mqtt_password,
        }
    }

    pub fn to_config(&self) -> Result<Config, Error> {
        let mut builder = Config::builder();

        for field in Field::ALL {
            if let Some(value) = self.text(field) {
                builder.text(field, value)?;
            }
        }
        if let Some(port) = self.mqtt_port {
            builder.port(port)?;
        }

        builder.build()
    }
}

#[derive(Clone, Copy)]
enum Source<'a> {
    Entries(Entries<'a>),
    Defines(&'a str),
}

/// Produces the validated station configuration.
///
/// Stateless: every [`load`](ConfigProvider::load) rebuilds the record from
/// the same source, so repeated calls return equal records.
#[derive(Clone, Copy)]
pub struct ConfigProvider<'a> {
    source: Source<'a>,
    origin: Origin,
}

impl ConfigProvider<'static> {
    /// Values selected by the build script.
    pub const fn builtin() -> Self {
        Self::from_entries(built::ENTRIES, built::ORIGIN)
    }
}

impl<'a> ConfigProvider<'a> {
    pub const fn from_entries(entries: Entries<'a>, origin: Origin) -> Self {
        Self {
            source: Source::Entries(entries),
            origin,
        }
    }

    /// Header text in the `secrets.h` format.
    pub const fn from_defines(text: &'a str, origin: Origin) -> Self {
        Self {
            source: Source::Defines(text),
            origin,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Builds and validates the record. Fails with
    /// [`Error::MissingConfiguration`] when the example template was never
    /// customized.
    pub fn load(&self) -> Result<Config, Error> {
        let result = self.build().and_then(|config| {
            if is_untouched(&config) {
                return Err(Error::MissingConfiguration);
            }
            validate(&config)?;
            Ok(config)
        });

        match &result {
            Ok(config) => log::info!(
                "Configuration loaded from {} (broker {}:{})",
                self.origin,
                config.mqtt_host(),
                config.mqtt_port()
            ),
            Err(e) => log::error!("Configuration from {} rejected: {}", self.origin, e),
        }

        result
    }

    fn build(&self) -> Result<Config, Error> {
        if self.origin == Origin::Example {
            return Err(Error::MissingConfiguration);
        }

        match self.source {
            Source::Entries(entries) => entries.to_config(),
            Source::Defines(text) => template::parse(text),
        }
    }
}

/// Nothing edited: every credential is a placeholder, or the record is the
/// shipped example as-is.
fn is_untouched(config: &Config) -> bool {
    config.credentials().all(|(_, value)| is_placeholder(value))
        || matches!(template::example(), Ok(example) if example == *config)
}

/// Checks fields in record order and reports the first offender.
pub fn validate(config: &Config) -> Result<(), Error> {
    for field in Field::ALL {
        match config.text(field) {
            Some(value) if is_placeholder(value) => return Err(Error::EmptyCredential(field)),
            Some(_) => {}
            None if config.mqtt_port() == 0 => return Err(Error::InvalidPort(0)),
            None => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATION: Entries<'static> = Entries {
        wifi_ssid: Some("barkasse-hub"),
        wifi_password: Some("barkasse1234"),
        mqtt_host: Some("192.168.50.1"),
        mqtt_port: Some(1883),
        mqtt_user: Some("barkasse"),
        mqtt_password: Some("k33p-0ut"),
    };

    fn record(entries: Entries<'_>) -> Config {
        entries.to_config().unwrap()
    }

    #[test]
    fn edited_record_loads_unchanged() {
        let provider = ConfigProvider::from_entries(STATION, Origin::File);
        let config = provider.load().unwrap();

        assert_eq!(validate(&config), Ok(()));
        assert_eq!(config, record(STATION));
    }

    #[test]
    fn load_is_idempotent() {
        let provider = ConfigProvider::from_entries(STATION, Origin::Environment);

        assert_eq!(provider.load(), provider.load());
        assert_eq!(
            ConfigProvider::builtin().load(),
            ConfigProvider::builtin().load()
        );
    }

    #[test]
    fn placeholder_password_is_an_empty_credential() {
        let entries = Entries {
            mqtt_password: Some("change-me"),
            ..STATION
        };

        assert_eq!(
            validate(&record(entries)),
            Err(Error::EmptyCredential(Field::MqttPassword))
        );
        assert_eq!(
            ConfigProvider::from_entries(entries, Origin::File).load(),
            Err(Error::EmptyCredential(Field::MqttPassword))
        );
    }

    #[test]
    fn every_text_field_is_checked() {
        for placeholder in [" ", "change-me", "Change-Me"] {
            for field in Field::ALL.into_iter().filter(|f| f.is_text()) {
                let mut builder = Config::builder();
                for other in Field::ALL.into_iter().filter(|f| f.is_text()) {
                    let value = if other == field { placeholder } else { "set" };
                    builder.text(other, value).unwrap();
                }
                builder.port(1883).unwrap();

                assert_eq!(
                    validate(&builder.build().unwrap()),
                    Err(Error::EmptyCredential(field)),
                    "{:?} in {}",
                    placeholder,
                    field
                );
            }
        }
    }

    #[test]
    fn port_zero_is_invalid() {
        let entries = Entries {
            mqtt_port: Some(0),
            ..STATION
        };

        assert_eq!(validate(&record(entries)), Err(Error::InvalidPort(0)));
    }

    #[test]
    fn port_above_range_is_invalid() {
        let entries = Entries {
            mqtt_port: Some(65536),
            ..STATION
        };

        assert_eq!(
            ConfigProvider::from_entries(entries, Origin::File).load(),
            Err(Error::InvalidPort(65536))
        );
    }

    #[test]
    fn untouched_templates_are_missing_configuration() {
        let example_origin = ConfigProvider::from_entries(STATION, Origin::Example);
        assert_eq!(example_origin.load(), Err(Error::MissingConfiguration));

        let copied_verbatim = ConfigProvider::from_entries(template::EXAMPLE, Origin::File);
        assert_eq!(copied_verbatim.load(), Err(Error::MissingConfiguration));

        let all_placeholders = Entries {
            wifi_ssid: Some("change-me"),
            wifi_password: Some("change-me"),
            mqtt_host: Some(""),
            mqtt_port: Some(1883),
            mqtt_user: Some("change-me"),
            mqtt_password: Some("CHANGE-ME"),
        };
        assert_eq!(
            ConfigProvider::from_entries(all_placeholders, Origin::File).load(),
            Err(Error::MissingConfiguration)
        );
    }

    #[test]
    fn repeated_header_credential_is_refused() {
        let text = "#define WIFI_SSID \"hub\"\n#define WIFI_PASS \"pass1234\"\n#define MQTT_HOST \"mqtt.local\"\n#define MQTT_PORT 1883\n#define MQTT_USER \"station\"\n#define MQTT_PASS \"first\"\n#define MQTT_PASS \"second\"\n";

        assert_eq!(
            ConfigProvider::from_defines(text, Origin::File).load(),
            Err(Error::Duplicate(Field::MqttPassword))
        );
    }

    #[test]
    fn header_source_goes_through_the_same_checks() {
        let text = "#define WIFI_SSID \"hub\"\n#define WIFI_PASS \"pass1234\"\n#define MQTT_HOST \"mqtt.local\"\n#define MQTT_PORT 0\n#define MQTT_USER \"station\"\n#define MQTT_PASS \"secret\"\n";
        let provider = ConfigProvider::from_defines(text, Origin::File);

        assert_eq!(provider.origin(), Origin::File);
        assert_eq!(provider.load(), Err(Error::InvalidPort(0)));
    }
}

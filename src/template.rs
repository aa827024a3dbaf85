//! Header templates: reading `#define` credentials at runtime and generating
//! example files for operators to copy.

use core::fmt::{self, Write};

use crate::config::Config;
use crate::constants::{DEFAULT_MQTT_PORT, PLACEHOLDER, SECRETS_HEADER, SECRETS_TOML};
use crate::defines::Value;
use crate::error::Error;
use crate::field::Field;
use crate::header;
use crate::provider::Entries;

/// Values shipped in `secrets.example.h` / `secrets.example.toml`.
pub const EXAMPLE: Entries<'static> = Entries {
    wifi_ssid: Some("barkasse-hub"),
    wifi_password: Some("barkasse1234"),
    mqtt_host: Some("192.168.50.1"),
    mqtt_port: Some(DEFAULT_MQTT_PORT as i64),
    mqtt_user: Some("barkasse"),
    mqtt_password: Some(PLACEHOLDER),
};

/// The shipped example as a record.
pub fn example() -> Result<Config, Error> {
    EXAMPLE.to_config()
}

/// Builds a record from header text. Unknown macros are ignored; every known
/// one must appear exactly once with the right kind of value.
pub fn parse(text: &str) -> Result<Config, Error> {
    let found = header::scan(text)?;
    if found.ignored > 0 {
        log::debug!("Ignored {} unrelated macros", found.ignored);
    }

    let mut builder = Config::builder();
    for field in Field::ALL {
        match (field.is_text(), found.get(field)) {
            (_, None) => {}
            (true, Some(Value::Str(literal))) => {
                builder.text(field, literal)?;
            }
            (false, Some(Value::Int(port))) => {
                builder.port(port)?;
            }
            _ => return Err(Error::TypeMismatch(field)),
        }
    }

    builder.build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// C header with `#define` lines
    Defines,
    Toml,
}

/// Writes `config` as a template the build script accepts.
pub fn write_config<W: Write>(out: &mut W, config: &Config, format: Format) -> fmt::Result {
    write_fields(out, format, |field| match config.text(field) {
        Some(text) => Rendered::Text(text),
        None => Rendered::Port(config.mqtt_port().into()),
    })
}

/// Writes the example template with its placeholders.
pub fn write_example<W: Write>(out: &mut W, format: Format) -> fmt::Result {
    write_fields(out, format, |field| match field {
        Field::MqttPort => Rendered::Port(EXAMPLE.mqtt_port.unwrap_or(DEFAULT_MQTT_PORT.into())),
        _ => Rendered::Text(EXAMPLE.text(field).unwrap_or(PLACEHOLDER)),
    })
}

enum Rendered<'a> {
    Text(&'a str),
    Port(i64),
}

fn write_fields<'a, W: Write>(
    out: &mut W,
    format: Format,
    value: impl Fn(Field) -> Rendered<'a>,
) -> fmt::Result {
    let (comment, target) = match format {
        Format::Defines => ("//", SECRETS_HEADER),
        Format::Toml => ("#", SECRETS_TOML),
    };

    if format == Format::Defines {
        writeln!(out, "#pragma once")?;
    }
    writeln!(out, "{comment} Copy to {target} and fill in your WiFi and MQTT credentials.")?;

    for field in Field::ALL {
        match field {
            Field::WifiSsid => writeln!(out, "\n{comment} --- WiFi ---")?,
            Field::MqttHost => writeln!(out, "\n{comment} --- MQTT broker ---")?,
            _ => {}
        }

        match (format, value(field)) {
            (Format::Defines, Rendered::Text(text)) => {
                writeln!(out, "#define {} \"{}\"", field.define_name(), Escaped(text, format))?
            }
            (Format::Defines, Rendered::Port(port)) => {
                writeln!(out, "#define {} {}", field.define_name(), port)?
            }
            (Format::Toml, Rendered::Text(text)) => {
                writeln!(out, "{} = \"{}\"", field.toml_key(), Escaped(text, format))?
            }
            (Format::Toml, Rendered::Port(port)) => writeln!(out, "{} = {}", field.toml_key(), port)?,
        }
    }

    Ok(())
}

/// Escapes text for a C or TOML basic string literal. TOML forbids raw
/// control characters other than tab, so those become `\uXXXX` there.
struct Escaped<'a>(&'a str, Format);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if c.is_control() && self.1 == Format::Toml => {
                    write!(f, "\\u{:04X}", u32::from(c))?
                }
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

use std::{
    env,
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

#[path = "src/defines.rs"]
#[allow(dead_code)]
mod defines;

#[path = "src/field.rs"]
#[allow(dead_code)]
mod field;

#[path = "src/header.rs"]
#[allow(dead_code)]
mod header;

use field::Field;

/// Overrides the secrets file location.
const SECRETS_ENV: &str = "STATION_SECRETS";

/// Searched in order when `STATION_SECRETS` is unset.
const CANDIDATES: [&str; 3] = ["secrets.toml", "secrets.h", "secrets.example.toml"];

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    wifi_ssid: Option<String>,
    wifi_password: Option<String>,
    mqtt_host: Option<String>,
    mqtt_port: Option<i64>,
    mqtt_user: Option<String>,
    mqtt_password: Option<String>,
}

impl RawConfig {
    fn text_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        match field {
            Field::WifiSsid => Some(&mut self.wifi_ssid),
            Field::WifiPassword => Some(&mut self.wifi_password),
            Field::MqttHost => Some(&mut self.mqtt_host),
            Field::MqttPort => None,
            Field::MqttUser => Some(&mut self.mqtt_user),
            Field::MqttPassword => Some(&mut self.mqtt_password),
        }
    }

    fn from_header(text: &str) -> Result<Self, Box<dyn Error>> {
        let found = header::scan(text).map_err(|e| e.to_string())?;
        let mut raw = RawConfig::default();

        for field in Field::ALL {
            match (found.get(field), raw.text_mut(field)) {
                (None, _) => {}
                (Some(defines::Value::Int(port)), None) => raw.mqtt_port = Some(port),
                (Some(defines::Value::Str(literal)), Some(slot)) => {
                    *slot = Some(literal.chars().collect())
                }
                _ => return Err(format!("{} has the wrong value type", field).into()),
            }
        }

        Ok(raw)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if any source of values changes
    println!("cargo:rerun-if-env-changed={}", SECRETS_ENV);
    for candidate in CANDIDATES {
        println!("cargo:rerun-if-changed={}", candidate);
    }
    for field in Field::ALL {
        println!("cargo:rerun-if-env-changed={}", field.env_var());
    }

    // Locate, read and parse
    let path = locate()?;
    println!("cargo:rerun-if-changed={}", path.display());
    let text = fs::read_to_string(&path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let mut raw = if path.extension().is_some_and(|ext| ext == "h") {
        RawConfig::from_header(&text)
    } else {
        toml::from_str::<RawConfig>(&text).map_err(Box::<dyn Error>::from)
    }
    .map_err(|e| format!("{}: {}", path.display(), e))?;

    let is_example = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("secrets.example"));
    let mut origin = if is_example { "Example" } else { "File" };

    // Per-field overrides
    for field in Field::ALL {
        let var = field.env_var();
        let Ok(value) = env::var(var) else {
            continue;
        };
        match raw.text_mut(field) {
            Some(slot) => *slot = Some(value),
            None => {
                let port = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("{} is not an integer: {:?}", var, value))?;
                raw.mqtt_port = Some(port);
            }
        }
        origin = "Environment";
    }

    if origin == "Example" {
        println!(
            "cargo:warning=no secrets.toml or secrets.h found, using {}; the firmware will refuse to start",
            path.display()
        );
    }

    // Generate Rust code
    let code = format!(
        r#"
        pub(crate) const ORIGIN: Origin = Origin::{origin};

        pub(crate) const ENTRIES: Entries<'static> = Entries {{
            wifi_ssid: {ssid:?},
            wifi_password: {psk:?},
            mqtt_host: {mh:?},
            mqtt_port: {mp:?},
            mqtt_user: {mu:?},
            mqtt_password: {mpw:?},
        }};
    "#,
        origin = origin,
        ssid = raw.wifi_ssid,
        psk = raw.wifi_password,
        mh = raw.mqtt_host,
        mp = raw.mqtt_port,
        mu = raw.mqtt_user,
        mpw = raw.mqtt_password,
    );

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("built.rs");
    fs::write(dest_path, code)?;
    Ok(())
}

fn locate() -> Result<PathBuf, Box<dyn Error>> {
    if let Ok(path) = env::var(SECRETS_ENV) {
        return Ok(PathBuf::from(path));
    }

    CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
        .ok_or_else(|| {
            format!(
                "none of {:?} found; copy secrets.example.toml to secrets.toml",
                CANDIDATES
            )
            .into()
        })
}

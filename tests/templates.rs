use station_config::{
    template::{self, Format},
    ConfigProvider, Error, Field, Origin,
};

const EXAMPLE_HEADER: &str = include_str!("../secrets.example.h");
const EXAMPLE_TOML: &str = include_str!("../secrets.example.toml");

#[test]
fn shipped_header_is_refused_until_edited() {
    let untouched = ConfigProvider::from_defines(EXAMPLE_HEADER, Origin::Example);
    assert_eq!(untouched.load(), Err(Error::MissingConfiguration));

    let config = template::parse(EXAMPLE_HEADER).unwrap();
    assert_eq!(config.mqtt_port(), 1883);
    assert_eq!(
        station_config::validate(&config),
        Err(Error::EmptyCredential(Field::MqttPassword))
    );

    let edited = EXAMPLE_HEADER.replace("\"change-me\"", "\"rotated-2026\"");
    let config = ConfigProvider::from_defines(&edited, Origin::File)
        .load()
        .unwrap();
    assert_eq!(config.mqtt_password(), "rotated-2026");
    assert_eq!(config.wifi_ssid(), "barkasse-hub");
}

#[test]
fn shipped_files_match_the_generator() {
    let mut header = String::new();
    template::write_example(&mut header, Format::Defines).unwrap();
    assert_eq!(template::parse(&header), template::parse(EXAMPLE_HEADER));

    let mut generated = String::new();
    template::write_example(&mut generated, Format::Toml).unwrap();
    let generated: toml::Table = toml::from_str(&generated).unwrap();
    let shipped: toml::Table = toml::from_str(EXAMPLE_TOML).unwrap();
    assert_eq!(generated, shipped);

    for field in Field::ALL {
        assert!(shipped.contains_key(field.toml_key()), "{}", field);
    }
}

#[test]
fn builtin_load_is_stable() {
    let provider = ConfigProvider::builtin();
    let first = provider.load();

    assert_eq!(first, provider.load());
    assert_eq!(first, station_config::load());
    if provider.origin() == Origin::Example {
        assert_eq!(first, Err(Error::MissingConfiguration));
    }
}

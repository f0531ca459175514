//! Integration tests for source ordering, conversion and filtering
//!
//! Note: Tests that modify environment variables serialize on ENV_MUTEX
//! to avoid interference between tests.

use proptest::prelude::*;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use strata::config::ConfigBuilder;
use strata::converter::{Converter, ConverterRegistry, Prioritized};
use strata::domain::StrataError;
use strata::filter::{Base64Filter, ConfigFilter, FilterChain, SharedFilter};
use strata::source::{MapSource, PropertySource, SharedSource, SourceRegistry, TomlSource};
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn source(name: &str, ordinal: i32, properties: &[(&str, &str)]) -> SharedSource {
    let source = properties
        .iter()
        .fold(MapSource::new(name).with_ordinal(ordinal), |s, (k, v)| {
            s.with_property(*k, *v)
        });
    Arc::new(source)
}

proptest! {
    #[test]
    fn prop_sources_sorted_descending(ordinals in proptest::collection::vec(-1000i32..1000, 0..24)) {
        let registry = SourceRegistry::new();
        // two batches exercise re-sorting on merge
        let (first, second) = ordinals.split_at(ordinals.len() / 2);
        registry.add_sources(first.iter().enumerate().map(|(i, o)| source(&format!("a{i}"), *o, &[])));
        registry.add_sources(second.iter().enumerate().map(|(i, o)| source(&format!("b{i}"), *o, &[])));

        let sorted: Vec<i32> = registry.sources().iter().map(|s| s.ordinal()).collect();
        prop_assert_eq!(sorted.len(), ordinals.len());
        prop_assert!(sorted.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prop_higher_ordinal_wins(low in -500i32..500, delta in 1i32..500) {
        let high = low + delta;
        let config = ConfigBuilder::new()
            .ignore_default_sources()
            .with_sources(vec![
                source("low", low, &[("k", "low")]),
                source("high", high, &[("k", "high")]),
            ])
            .build()
            .unwrap();

        prop_assert_eq!(config.get_value("k"), Some("high".to_string()));
    }

    #[test]
    fn prop_higher_priority_converter_retained(p1 in -100i32..300, delta in 1i32..100) {
        let p2 = p1 + delta;
        let registry = ConverterRegistry::without_builtins();
        let first = |_: &str| -> anyhow::Result<String> { Ok("first".to_string()) };
        let second = |_: &str| -> anyhow::Result<String> { Ok("second".to_string()) };

        // registration order must not matter
        registry.add_converter::<String, _>(Prioritized::new(second, p2));
        registry.add_converter::<String, _>(Prioritized::new(first, p1));

        prop_assert_eq!(registry.convert::<String>("k", Some("x")).unwrap(), Some("second".to_string()));
        prop_assert_eq!(registry.priority_of::<String>(), Some(p2));
    }
}

#[test]
fn test_equal_ordinals_keep_registration_order() {
    let config = ConfigBuilder::new()
        .ignore_default_sources()
        .with_sources(vec![
            source("first", 100, &[("k", "first")]),
            source("second", 100, &[("k", "second")]),
        ])
        .build()
        .unwrap();

    let names: Vec<String> = config
        .get_sources()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(config.get_value("k"), Some("first".to_string()));
}

#[test]
fn test_builtin_converter_shadowing() {
    struct Strict;

    impl Converter<bool> for Strict {
        fn convert(&self, value: &str) -> anyhow::Result<bool> {
            match value {
                "true" => Ok(true),
                "false" => Ok(false),
                other => anyhow::bail!("not a strict boolean: {other}"),
            }
        }
    }

    let config = ConfigBuilder::new()
        .ignore_default_sources()
        .with_source(MapSource::new("s").with_property("flag", "yes"))
        .build()
        .unwrap();

    // same priority as the built-in: ignored
    assert!(!config.add_converter::<bool, _>(Strict));
    assert_eq!(config.get_value_as::<bool>("flag").unwrap(), Some(true));

    // strictly higher: replaces it
    assert!(config.add_converter::<bool, _>(Prioritized::new(Strict, 101)));
    let result = config.get_value_as::<bool>("flag");
    assert!(matches!(result, Err(StrataError::Conversion { .. })));
}

#[test]
fn test_missing_converter_every_call() {
    #[derive(Debug)]
    struct Unregistered;

    let config = ConfigBuilder::new().ignore_default_sources().build().unwrap();
    for _ in 0..3 {
        let result = config.get_value_as::<Unregistered>("anything");
        assert!(matches!(result, Err(StrataError::MissingConverter { .. })));
    }
}

struct Wrap(&'static str);

impl ConfigFilter for Wrap {
    fn filter_value(&self, _key: &str, value: &str) -> String {
        format!("{}({value})", self.0)
    }
}

#[test]
fn test_filter_chain_order() {
    let empty = FilterChain::new();
    assert_eq!(empty.filter_value("k", "x"), "x");

    let config = ConfigBuilder::new()
        .ignore_default_sources()
        .with_source(MapSource::new("s").with_property("k", "x"))
        .with_filters(vec![
            Arc::new(Wrap("A")) as SharedFilter,
            Arc::new(Wrap("B")) as SharedFilter,
        ])
        .build()
        .unwrap();

    assert_eq!(config.get_value("k"), Some("B(A(x))".to_string()));
    assert_eq!(
        config.get_all_properties().get("k"),
        Some(&"B(A(x))".to_string())
    );
}

#[test]
fn test_base64_values_stay_encoded_in_logs() {
    let encoded = "base64:aHVudGVyMg==";
    let config = ConfigBuilder::new()
        .ignore_default_sources()
        .with_source(
            MapSource::new("s")
                .with_property("api.key", encoded)
                .with_property("api.user", "svc"),
        )
        .with_filter(Base64Filter::new())
        .build()
        .unwrap();

    let value = config.get_value("api.key").unwrap();
    assert_eq!(value, "hunter2");
    assert_eq!(config.filter_value_for_log("api.key", &value), encoded);

    let all = config.get_all_properties();
    assert_eq!(config.filter_value_for_log("api.key", &all["api.key"]), encoded);
    assert_eq!(config.filter_value_for_log("api.user", &all["api.user"]), "svc");
}

struct Unscannable;

impl PropertySource for Unscannable {
    fn name(&self) -> &str {
        "vault"
    }

    fn ordinal(&self) -> i32 {
        900
    }

    fn get_value(&self, key: &str) -> Option<String> {
        (key == "vault.token").then(|| "t0k3n".to_string())
    }

    fn get_properties(&self) -> HashMap<String, String> {
        HashMap::from([("vault.token".to_string(), "t0k3n".to_string())])
    }

    fn is_scannable(&self) -> bool {
        false
    }
}

#[test]
fn test_unscannable_source_excluded_from_aggregate() {
    let config = ConfigBuilder::new()
        .ignore_default_sources()
        .with_source(Unscannable)
        .with_source(MapSource::new("s").with_property("db.url", "postgres://db"))
        .build()
        .unwrap();

    assert_eq!(config.get_value("vault.token"), Some("t0k3n".to_string()));

    let all = config.get_all_properties();
    assert!(!all.contains_key("vault.token"));
    assert_eq!(all.get("db.url"), Some(&"postgres://db".to_string()));
}

#[test]
fn test_toml_files_layered() {
    let mut base = NamedTempFile::new().unwrap();
    writeln!(
        base,
        r#"
[server]
host = "0.0.0.0"
port = 8080
tags = ["a", "b"]
"#
    )
    .unwrap();

    let mut site = NamedTempFile::new().unwrap();
    writeln!(
        site,
        r#"
config_ordinal = 200

[server]
port = 9090
"#
    )
    .unwrap();

    let config = ConfigBuilder::new()
        .ignore_default_sources()
        .with_source(TomlSource::from_file(base.path()).unwrap())
        .with_source(TomlSource::from_file(site.path()).unwrap())
        .build()
        .unwrap();

    assert_eq!(config.get_value_as::<i32>("server.port").unwrap(), Some(9090));
    assert_eq!(config.get_value("server.host"), Some("0.0.0.0".to_string()));
    assert_eq!(config.get_value("server.tags"), Some("a,b".to_string()));
    assert_eq!(config.get_sources()[0].ordinal(), 200);
}

#[test]
fn test_environment_overrides_files() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("STRATA_IT_SERVER_PORT", "7070");

    let file = TomlSource::from_str("inline", "[strata_it.server]\nport = 8080").unwrap();
    let config = ConfigBuilder::new().with_source(file).build().unwrap();

    assert_eq!(
        config.get_value_as::<i32>("strata_it.server.port").unwrap(),
        Some(7070)
    );

    std::env::remove_var("STRATA_IT_SERVER_PORT");
    assert_eq!(
        config.get_value_as::<i32>("strata_it.server.port").unwrap(),
        Some(8080)
    );
}

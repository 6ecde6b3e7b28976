use std::collections::HashMap;
use std::time::Duration;

use psicotest_server::config::ServerConfig;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_only_the_secret_is_set() {
    let config = ServerConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();

    assert_eq!(config.bind.to_string(), "0.0.0.0:8080");
    assert_eq!(config.token_ttl, Duration::from_secs(168 * 3600));
    assert_eq!(config.database.probe_interval, Duration::from_secs(30));
    assert_eq!(config.database.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.database.max_connections, 10);
    assert!(config.bedrock_model_id.is_none());
}

#[test]
fn every_setting_can_be_overridden() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("JWT_SECRET", SECRET),
        ("PSICOTEST_BIND", "127.0.0.1:3000"),
        ("DATABASE_URL", "mysql://app:pw@db:3306/psicotest"),
        ("TOKEN_TTL_HOURS", "24"),
        ("DB_PROBE_INTERVAL_SECS", "10"),
        ("DB_CONNECT_TIMEOUT_SECS", "2"),
        ("DB_MAX_CONNECTIONS", "4"),
        ("BEDROCK_MODEL_ID", "anthropic.claude-3-haiku-20240307-v1:0"),
    ]))
    .unwrap();

    assert_eq!(config.bind.port(), 3000);
    assert_eq!(config.database.url, "mysql://app:pw@db:3306/psicotest");
    assert_eq!(config.token_ttl, Duration::from_secs(24 * 3600));
    assert_eq!(config.database.probe_interval, Duration::from_secs(10));
    assert_eq!(config.database.connect_timeout, Duration::from_secs(2));
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(
        config.bedrock_model_id.as_deref(),
        Some("anthropic.claude-3-haiku-20240307-v1:0")
    );
}

#[test]
fn missing_secret_is_an_error() {
    assert!(ServerConfig::from_lookup(lookup(&[])).is_err());
}

#[test]
fn short_secret_is_an_error() {
    assert!(ServerConfig::from_lookup(lookup(&[("JWT_SECRET", "short")])).is_err());
}

#[test]
fn blank_model_id_disables_the_language_model() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("JWT_SECRET", SECRET),
        ("BEDROCK_MODEL_ID", "  "),
    ]))
    .unwrap();
    assert!(config.bedrock_model_id.is_none());
}

#[test]
fn malformed_numbers_are_rejected() {
    for key in ["TOKEN_TTL_HOURS", "DB_PROBE_INTERVAL_SECS", "DB_MAX_CONNECTIONS"] {
        let result = ServerConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET), (key, "soon")]));
        assert!(result.is_err(), "{key} accepted a non-number");

        let result = ServerConfig::from_lookup(lookup(&[("JWT_SECRET", SECRET), (key, "0")]));
        assert!(result.is_err(), "{key} accepted zero");
    }
}

#[test]
fn malformed_bind_address_is_rejected() {
    let result = ServerConfig::from_lookup(lookup(&[
        ("JWT_SECRET", SECRET),
        ("PSICOTEST_BIND", "localhost"),
    ]));
    assert!(result.is_err());
}

use std::collections::HashMap;

use super::*;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

const REQUIRED: [(&str, &str); 2] = [("TRELLO_API_KEY", "key"), ("TRELLO_TOKEN", "token")];

#[test]
fn test_defaults() {
    let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

    assert_eq!(config.trello.api_key, "key");
    assert_eq!(config.trello.token, "token");
    assert_eq!(config.trello_api_url, "https://api.trello.com");
    assert_eq!(config.bind, "0.0.0.0:8080".parse().unwrap());
    assert_eq!(config.log_format, LogFormat::Json);
    assert!(config.github_secret.is_none());
    assert!(config.otlp_endpoint.is_none());
}

#[test]
fn test_missing_trello_variables_are_all_named() {
    let err = Config::from_lookup(lookup(&[])).unwrap_err().to_string();

    assert!(err.contains("TRELLO_API_KEY"), "{err}");
    assert!(err.contains("TRELLO_TOKEN"), "{err}");
}

#[test]
fn test_empty_value_counts_as_missing() {
    let err = Config::from_lookup(lookup(&[("TRELLO_API_KEY", "key"), ("TRELLO_TOKEN", " ")]))
        .unwrap_err()
        .to_string();

    assert!(err.contains("TRELLO_TOKEN"), "{err}");
    assert!(!err.contains("TRELLO_API_KEY"), "{err}");
}

#[test]
fn test_port_overrides_bind_port() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("CARDHOOK_BIND", "127.0.0.1:3000"));
    vars.push(("PORT", "9000"));

    let config = Config::from_lookup(lookup(&vars)).unwrap();

    assert_eq!(config.bind, "127.0.0.1:9000".parse().unwrap());
}

#[test]
fn test_invalid_values_are_rejected() {
    for (name, value) in [
        ("CARDHOOK_BIND", "localhost"),
        ("PORT", "eighty"),
        ("CARDHOOK_LOG_FORMAT", "xml"),
    ] {
        let mut vars = REQUIRED.to_vec();
        vars.push((name, value));
        assert!(
            Config::from_lookup(lookup(&vars)).is_err(),
            "{name}={value} should be rejected"
        );
    }
}

#[test]
fn test_optional_values_are_read() {
    let mut vars = REQUIRED.to_vec();
    vars.extend([
        ("GITHUB_SECRET", "s3cret"),
        ("TRELLO_API_URL", "http://localhost:9999"),
        ("CARDHOOK_LOG_FORMAT", "Pretty"),
        ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
    ]);

    let config = Config::from_lookup(lookup(&vars)).unwrap();

    assert_eq!(config.github_secret.as_deref(), Some("s3cret"));
    assert_eq!(config.trello_api_url, "http://localhost:9999");
    assert_eq!(config.log_format, LogFormat::Pretty);
    assert_eq!(
        config.otlp_endpoint.as_deref(),
        Some("http://collector:4317")
    );
}

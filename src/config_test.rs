use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |var| map.get(var).cloned()
}

#[test]
fn api_key_is_required() {
    assert_eq!(
        ClientConfig::from_lookup(lookup(&[])),
        Err(ConfigError::Missing { var: API_KEY_VAR })
    );
    assert_eq!(
        ClientConfig::from_lookup(lookup(&[(API_KEY_VAR, "  ")])),
        Err(ConfigError::Missing { var: API_KEY_VAR })
    );
}

#[test]
fn defaults_apply() {
    let cfg = ClientConfig::from_lookup(lookup(&[(API_KEY_VAR, "k")])).unwrap();
    assert_eq!(cfg, ClientConfig::with_defaults("k"));
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.request_timeout, Duration::from_secs(10));
    assert_eq!(cfg.expired_redirect_delay, Duration::from_millis(2000));
}

#[test]
fn overrides_parse_and_trim() {
    let cfg = ClientConfig::from_lookup(lookup(&[
        (API_KEY_VAR, "k"),
        (API_BASE_URL_VAR, "https://blog.test/"),
        (IDENTITY_BASE_URL_VAR, "http://localhost:9099/identitytoolkit.googleapis.com/v1/"),
        (TOKEN_BASE_URL_VAR, "http://localhost:9099/securetoken.googleapis.com/v1"),
        (REQUEST_TIMEOUT_VAR, "3"),
        (EXPIRED_REDIRECT_VAR, "0"),
    ]))
    .unwrap();

    assert_eq!(cfg.api_base_url, "https://blog.test");
    assert_eq!(cfg.request_timeout, Duration::from_secs(3));
    assert_eq!(cfg.expired_redirect_delay, Duration::ZERO);
    let endpoints = cfg.endpoints();
    assert_eq!(
        endpoints.sign_in_url(),
        "http://localhost:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=k"
    );
    assert_eq!(endpoints.refresh_url(), "http://localhost:9099/securetoken.googleapis.com/v1/token?key=k");
}

#[test]
fn malformed_numbers_are_rejected() {
    let err = ClientConfig::from_lookup(lookup(&[(API_KEY_VAR, "k"), (REQUEST_TIMEOUT_VAR, "soon")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidNumber { var: REQUEST_TIMEOUT_VAR, value: "soon".to_owned() });
}

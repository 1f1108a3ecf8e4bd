//! Tests for field resolution methods (`resolve_token`, `api_base`,
//! `broker_settings`, `require_installation_id`, `require_repo`,
//! `app_credentials`).

use std::time::Duration;

use rstest::rstest;

use crate::BrokerConfig;
use crate::config::AppCredentials;
use crate::github::error::BrokerError;
use crate::github::locator::InstallationId;

#[rstest]
fn resolve_token_returns_value_when_present() {
    let config = BrokerConfig {
        token: Some("my-token".to_owned()),
        ..Default::default()
    };

    let token = config.resolve_token().expect("token should resolve");
    assert_eq!(token.value(), "my-token", "should return the token");
}

#[rstest]
fn resolve_token_falls_back_to_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);
    let config = BrokerConfig::default();

    let token = config.resolve_token().expect("token should resolve");
    assert_eq!(token.value(), "env-token", "should read GITHUB_TOKEN");
}

#[rstest]
fn resolve_token_returns_error_when_none() {
    // Lock and clear GITHUB_TOKEN to ensure test isolation
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = BrokerConfig::default();

    let result = config.resolve_token();
    assert!(
        matches!(result, Err(BrokerError::Configuration { .. })),
        "should return Configuration error when token is None, got {result:?}"
    );
}

#[rstest]
fn resolve_token_rejects_blank_value() {
    let config = BrokerConfig {
        token: Some("   ".to_owned()),
        ..Default::default()
    };

    assert!(config.resolve_token().is_err(), "blank token should be rejected");
}

#[rstest]
fn api_base_defaults_to_public_github() {
    let config = BrokerConfig::default();

    let api_base = config.api_base().expect("default API base should be valid");
    assert_eq!(api_base.as_str(), "https://api.github.com");
}

#[rstest]
fn api_base_accepts_enterprise_url() {
    let config = BrokerConfig {
        api_base: Some("https://ghe.example.com/api/v3/".to_owned()),
        ..Default::default()
    };

    let api_base = config.api_base().expect("enterprise URL should parse");
    assert_eq!(api_base.as_str(), "https://ghe.example.com/api/v3");
}

#[rstest]
fn api_base_rejects_invalid_url() {
    let config = BrokerConfig {
        api_base: Some("not a url".to_owned()),
        ..Default::default()
    };

    assert!(
        matches!(config.api_base(), Err(BrokerError::Configuration { .. })),
        "invalid URL should be a configuration error"
    );
}

#[rstest]
fn broker_settings_use_configured_values() {
    let config = BrokerConfig {
        per_page: 30,
        request_timeout_seconds: 4,
        ..Default::default()
    };

    let settings = config.broker_settings().expect("settings should be valid");
    assert_eq!(settings.first_page().per_page(), 30);
    assert_eq!(settings.request_timeout(), Duration::from_secs(4));
}

#[rstest]
#[case::zero_page_size(0, 10)]
#[case::oversized_page(200, 10)]
#[case::zero_timeout(100, 0)]
fn broker_settings_reject_out_of_range_values(#[case] per_page: u8, #[case] timeout: u64) {
    let config = BrokerConfig {
        per_page,
        request_timeout_seconds: timeout,
        ..Default::default()
    };

    let result = config.broker_settings();
    assert!(
        matches!(result, Err(BrokerError::Configuration { .. })),
        "expected Configuration error, got {result:?}"
    );
}

#[rstest]
fn require_installation_id_returns_value_when_present() {
    let config = BrokerConfig {
        installation_id: Some(42),
        ..Default::default()
    };

    assert_eq!(
        config.require_installation_id().ok(),
        Some(InstallationId::new(42))
    );
}

#[rstest]
fn require_installation_id_returns_error_when_none() {
    let config = BrokerConfig::default();

    assert!(
        config.require_installation_id().is_err(),
        "should return error when installation_id is None"
    );
}

#[rstest]
fn require_repo_returns_value_when_present() {
    let config = BrokerConfig {
        repo: Some("org/a".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.require_repo().ok(), Some("org/a"));
}

#[rstest]
fn app_credentials_are_paired() {
    let config = BrokerConfig {
        app_id: Some("123".to_owned()),
        app_private_key_path: Some("app.pem".to_owned()),
        ..Default::default()
    };

    assert_eq!(
        config.app_credentials().ok(),
        Some(Some(AppCredentials {
            app_id: "123",
            private_key_path: "app.pem",
        }))
    );
}

#[rstest]
#[case::id_only(Some("123"), None)]
#[case::key_only(None, Some("app.pem"))]
fn app_credentials_reject_half_configuration(
    #[case] app_id: Option<&str>,
    #[case] key_path: Option<&str>,
) {
    let config = BrokerConfig {
        app_id: app_id.map(ToOwned::to_owned),
        app_private_key_path: key_path.map(ToOwned::to_owned),
        ..Default::default()
    };

    assert!(
        matches!(config.app_credentials(), Err(BrokerError::Configuration { .. })),
        "half-configured App credentials should be rejected"
    );
}

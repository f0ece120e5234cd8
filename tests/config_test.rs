use std::io::Write;
use std::time::Duration;
use tokio_test::assert_err;

use interview_coach::error::ConfigError;
use interview_coach::models::Language;
use interview_coach::{Config, ResponseOrdering};

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api_base_url, "http://localhost:8000");
    assert_eq!(config.time_budget(), Duration::from_secs(45 * 60));
    assert_eq!(config.default_language, Language::Python);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.response_ordering, ResponseOrdering::LatestDispatch);
    assert!(config.auth_token.is_none());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = Config::from_toml_str(
        r#"
        api_base_url = "https://coach.example.com"
        time_budget_secs = 1800
        default_language = "go"
        response_ordering = "last_settled"
        "#,
    )
    .unwrap();

    assert_eq!(config.api_base_url, "https://coach.example.com");
    assert_eq!(config.time_budget_secs, 1800);
    assert_eq!(config.default_language, Language::Go);
    assert_eq!(config.response_ordering, ResponseOrdering::LastSettled);
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.log_filter, "info");
}

#[test]
fn test_invalid_toml_values_are_rejected() {
    assert_err!(Config::from_toml_str(r#"default_language = "cobol""#));
    assert_err!(Config::from_toml_str(r#"response_ordering = "random""#));
    assert_err!(Config::from_toml_str(r#"time_budget_secs = "soon""#));
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("interview_coach_{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "auth_token = \"abc\"\nverbose_logging = true").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.auth_token.as_deref(), Some("abc"));
    assert!(config.verbose_logging);
    std::fs::remove_file(&path).unwrap();

    let err = assert_err!(Config::from_file(&path));
    assert!(matches!(err, ConfigError::ReadFailed { .. }));
}

#[test]
fn test_env_overrides() {
    std::env::set_var("INTERVIEW_TIME_BUDGET_SECS", "600");
    std::env::set_var("INTERVIEW_LANGUAGE", "cpp");
    std::env::set_var("INTERVIEW_RESPONSE_ORDERING", "not-a-strategy");

    let config = Config::default().with_env_overrides();

    std::env::remove_var("INTERVIEW_TIME_BUDGET_SECS");
    std::env::remove_var("INTERVIEW_LANGUAGE");
    std::env::remove_var("INTERVIEW_RESPONSE_ORDERING");

    assert_eq!(config.time_budget_secs, 600);
    assert_eq!(config.default_language, Language::Cpp);
    // 无法解析时回退到原值
    assert_eq!(config.response_ordering, ResponseOrdering::LatestDispatch);
}

#[test]
fn test_response_ordering_from_str() {
    assert_eq!(
        "Latest_Dispatch".parse::<ResponseOrdering>(),
        Ok(ResponseOrdering::LatestDispatch)
    );
    assert!("".parse::<ResponseOrdering>().is_err());
}

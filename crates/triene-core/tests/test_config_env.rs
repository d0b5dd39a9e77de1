//! Environment overrides live in their own test binary so the variables
//! never leak into other config tests.

use triene_core::config::TrieneConfig;
use triene_types::IntegrationProvider;

#[test]
fn test_environment_overrides_file_values() {
    std::env::set_var("TRIENE__INTEGRATION__PROVIDER", "native");
    std::env::set_var("TRIENE__AUTOMATION__MAX_RETRIES", "5");

    let json = r#"{
        "integration": {
            "provider": "digisac",
            "api_url": "https://api.digisac.io/v1",
            "token": "sk_test"
        }
    }"#;

    let config = TrieneConfig::from_json_str(json).expect("Failed to parse config");

    std::env::remove_var("TRIENE__INTEGRATION__PROVIDER");
    std::env::remove_var("TRIENE__AUTOMATION__MAX_RETRIES");

    assert_eq!(config.integration.provider, IntegrationProvider::Native);
    assert_eq!(config.automation.max_retries, 5);
    assert_eq!(config.integration.token, "sk_test");
}

use std::time::Duration;
use triene_core::config::TrieneConfig;
use triene_types::IntegrationProvider;

#[test]
fn test_parse_full_settings_json() {
    let json = r#"{
        "integration": {
            "provider": "z-api",
            "url": "https://api.z-api.io/instances/abc",
            "api_key": "zapi_token",
            "is_connected": false
        },
        "automation": {
            "simulated_delay_ms": 0,
            "dispatch_timeout_secs": 5,
            "max_retries": 3,
            "retry_backoff_ms": 100
        },
        "content": {
            "instagram_handle": "@agencia.triene",
            "style_guide": {
                "colors": "Preto e dourado",
                "fonts": "Serifada",
                "elements": "Texturas de papel",
                "aesthetics": "Minimalista",
                "persona": "Arquitetos",
                "niche": "Design de interiores",
                "cta": "Agende uma visita"
            }
        },
        "export": {
            "output_dir": "/tmp/triene"
        }
    }"#;

    let config = TrieneConfig::from_json_str(json).expect("Failed to parse config");

    assert_eq!(config.integration.provider, IntegrationProvider::ZApi);
    assert_eq!(config.integration.api_url, "https://api.z-api.io/instances/abc", "url should map to api_url");
    assert_eq!(config.integration.token, "zapi_token", "api_key should map to token");
    assert!(!config.integration.is_connected);

    assert_eq!(config.automation.simulated_delay(), Duration::ZERO);
    assert_eq!(config.automation.dispatch_timeout(), Duration::from_secs(5));
    assert_eq!(config.automation.max_retries, 3);

    assert_eq!(config.content.instagram_handle, "@agencia.triene");
    assert_eq!(config.content.style_guide.cta, "Agende uma visita");
    assert_eq!(
        config.export.calendar_path(),
        std::path::PathBuf::from("/tmp/triene/cronograma_conteudo.json")
    );
}

#[test]
fn test_minimal_settings_use_defaults() {
    let json = r#"{
        "integration": {
            "api_url": "https://api.digisac.io/v1",
            "token": "sk_live"
        }
    }"#;

    let config = TrieneConfig::from_json_str(json).expect("Failed to parse config");

    assert_eq!(config.integration.provider, IntegrationProvider::Digisac, "provider should default to digisac");
    assert!(config.integration.is_connected, "connectivity should default to true");
    assert_eq!(config.automation.simulated_delay_ms, 1500);
    assert_eq!(config.automation.dispatch_timeout_secs, 10);
    assert!(config.content.instagram_handle.is_empty());
    assert_eq!(config.content.style_guide.cta, "Fale com nosso time via WhatsApp");
}

#[test]
fn test_missing_token_is_rejected() {
    let json = r#"{
        "integration": {
            "api_url": "https://api.digisac.io/v1",
            "token": "   "
        }
    }"#;

    let err = TrieneConfig::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("required"), "unexpected error: {}", err);
}

#[test]
fn test_non_http_url_is_rejected() {
    let json = r#"{
        "integration": {
            "api_url": "ftp://files.example.com",
            "token": "abc"
        }
    }"#;

    assert!(TrieneConfig::from_json_str(json).is_err());
}

#[test]
fn test_unknown_provider_fails_to_parse() {
    let json = r#"{
        "integration": {
            "provider": "telegram",
            "api_url": "https://api.example.com",
            "token": "abc"
        }
    }"#;

    assert!(TrieneConfig::from_json_str(json).is_err());
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("triene.json");
    std::fs::write(
        &path,
        r#"{ "integration": { "provider": "evolution", "api_url": "http://localhost:8080", "token": "t" } }"#,
    )
    .unwrap();

    let config = TrieneConfig::from_file(&path).unwrap();
    assert_eq!(config.integration.provider, IntegrationProvider::Evolution);

    assert!(TrieneConfig::from_file(dir.path().join("missing.json")).is_err());
}

//! Loading CsrfConfig from files

use rampart_core::{HttpRequest, HttpResponse, SameSite};
use rampart_csrf::{CsrfConfig, CsrfEngine, KeyedHash, TokenTransport};
use std::io::Write;

fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("rampart-csrf-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_from_toml_file() {
    let path = write_temp(
        "csrf.toml",
        r#"
        secret_byte_length = 32
        salt_byte_length = 16
        algorithm = "hmac-sha512"
        ignore_methods = ["GET", "HEAD"]
        rotate_secret_on_failure = true

        [cookie]
        name = "__Host-csrf"
        same_site = "lax"
        max_age = 86400
        "#,
    );

    let config = CsrfConfig::from_file(&path).unwrap();
    assert_eq!(config.secret_byte_length, 32);
    assert_eq!(config.salt_byte_length, 16);
    assert_eq!(config.algorithm, KeyedHash::HmacSha512);
    assert_eq!(config.ignore_methods, vec!["GET", "HEAD"]);
    assert!(config.rotate_secret_on_failure);
    assert_eq!(config.cookie.name, "__Host-csrf");
    assert_eq!(config.cookie.same_site, SameSite::Lax);
    assert_eq!(config.cookie.max_age, Some(86400));
    // Untouched attributes keep their defaults
    assert!(config.cookie.secure);
    assert_eq!(config.cookie.path, "/");
    assert_eq!(config.token_transport, TokenTransport::header("X-CSRF-Token"));
}

#[test]
fn test_from_json_file() {
    let path = write_temp(
        "csrf.json",
        r#"{
            "token_transport": {"mode": "cookie", "name": "XSRF-TOKEN"},
            "exclude_path_prefixes": ["/static/"]
        }"#,
    );

    let config = CsrfConfig::from_file(&path).unwrap();
    assert!(config.token_transport.is_cookie());
    assert_eq!(config.token_transport.name(), "XSRF-TOKEN");
    assert!(config.policy().is_excluded("/static/app.js"));
}

#[test]
fn test_invalid_file_is_rejected() {
    let path = write_temp("bad.toml", "salt_byte_length = 0\n");
    assert!(CsrfConfig::from_file(&path).is_err());
}

#[test]
fn test_token_cookie_from_file_is_not_http_only() {
    let path = write_temp(
        "cookie-transport.toml",
        r#"
        [token_transport]
        mode = "cookie"
        name = "XSRF-TOKEN"
        "#,
    );

    let engine = CsrfEngine::new(CsrfConfig::from_file(&path).unwrap()).unwrap();
    let protection = engine.protect(&HttpRequest::new("GET", "/")).unwrap();
    let response = engine.apply(HttpResponse::ok(), &protection);

    let token_cookie = response.cookie("XSRF-TOKEN").unwrap();
    assert!(!token_cookie.http_only);
    assert_eq!(token_cookie.value, protection.token());
}

#[test]
fn test_single_entry_lists_from_env_file() {
    let path = write_temp(
        "single.env",
        "IGNORE_METHODS=GET\nEXCLUDE_PATH_PREFIXES=/_next/\n",
    );

    let config = CsrfConfig::from_file(&path).unwrap();
    assert_eq!(config.ignore_methods, vec!["GET"]);
    assert_eq!(config.exclude_path_prefixes, vec!["/_next/"]);
}

#[test]
fn test_single_entry_lists_from_env() {
    // SAFETY: the prefix is unique to this test and nothing else reads it
    unsafe {
        std::env::set_var("RAMPART_ONE_ENTRY_IGNORE_METHODS", "GET");
        std::env::set_var("RAMPART_ONE_ENTRY_EXCLUDE_PATH_PREFIXES", "/_next/");
    }

    let config = CsrfConfig::from_env("RAMPART_ONE_ENTRY").unwrap();
    assert_eq!(config.ignore_methods, vec!["GET"]);
    assert_eq!(config.exclude_path_prefixes, vec!["/_next/"]);
    assert!(config.policy().is_excluded("/_next/static/app.js"));
    assert!(!config.policy().is_ignored_method("HEAD"));
}

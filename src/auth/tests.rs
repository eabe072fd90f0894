//! Tests for the auth module

use super::*;
use crate::error::Error;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Request, Url};

fn request() -> Request {
    Request::new(
        Method::GET,
        Url::parse("http://manager.scielo.org/api/v1/journals/").unwrap(),
    )
}

fn authorization(request: &Request) -> &str {
    request
        .headers()
        .get(AUTHORIZATION)
        .unwrap()
        .to_str()
        .unwrap()
}

// ============================================================================
// API Key Tests
// ============================================================================

#[test]
fn test_api_key_header_format() {
    let auth = ApiKeyAuth::new("alice", "s3cr3t");
    assert_eq!(auth.header_value(), " ApiKey alice:s3cr3t");

    let req = auth.authenticate(request()).unwrap();
    assert_eq!(authorization(&req), " ApiKey alice:s3cr3t");
}

#[test]
fn test_api_key_replaces_existing_authorization() {
    let mut req = request();
    req.headers_mut()
        .insert(AUTHORIZATION, "Basic Zm9vOmJhcg==".parse().unwrap());

    let req = ApiKeyAuth::new("bob", "key").authenticate(req).unwrap();
    assert_eq!(req.headers().get_all(AUTHORIZATION).iter().count(), 1);
    assert_eq!(authorization(&req), " ApiKey bob:key");
}

#[test]
fn test_api_key_value_is_sensitive() {
    let req = ApiKeyAuth::new("alice", "s3cr3t")
        .authenticate(request())
        .unwrap();
    assert!(req.headers().get(AUTHORIZATION).unwrap().is_sensitive());
}

#[test]
fn test_api_key_debug_hides_key() {
    let debug = format!("{:?}", ApiKeyAuth::new("alice", "s3cr3t"));
    assert!(debug.contains("alice"));
    assert!(!debug.contains("s3cr3t"));
}

#[test]
fn test_api_key_rejects_invalid_header_value() {
    let err = ApiKeyAuth::new("alice", "line\nbreak")
        .authenticate(request())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

// ============================================================================
// Bearer / Header Tests
// ============================================================================

#[test]
fn test_bearer_auth() {
    let req = BearerAuth::new("tok-123").authenticate(request()).unwrap();
    assert_eq!(authorization(&req), "Bearer tok-123");
}

#[test]
fn test_header_auth() {
    let auth = HeaderAuth::new()
        .header("X-Api-Key", "abc")
        .header("X-Tenant", "scielo");

    let req = auth.authenticate(request()).unwrap();
    assert_eq!(req.headers().get("x-api-key").unwrap(), "abc");
    assert_eq!(req.headers().get("x-tenant").unwrap(), "scielo");
}

#[test]
fn test_header_auth_rejects_invalid_name() {
    let auth = HeaderAuth::new().header("bad header", "x");
    assert!(auth.authenticate(request()).is_err());
}

#[test]
fn test_closure_is_an_auth_hook() {
    let hook = |mut req: Request| {
        req.headers_mut()
            .insert("x-signed", "yes".parse().unwrap());
        Ok::<_, Error>(req)
    };

    let req = hook.authenticate(request()).unwrap();
    assert_eq!(req.headers().get("x-signed").unwrap(), "yes");
}

// ============================================================================
// AuthConfig Tests
// ============================================================================

#[test]
fn test_auth_config_from_yaml() {
    let yaml = r"
type: api_key
username: alice
api_key: s3cr3t
";
    let config: AuthConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        config,
        AuthConfig::ApiKey {
            username: "alice".into(),
            api_key: "s3cr3t".into()
        }
    );

    let req = config.into_hook().authenticate(request()).unwrap();
    assert_eq!(authorization(&req), " ApiKey alice:s3cr3t");
}

#[test]
fn test_auth_config_headers_from_json() {
    let config: AuthConfig = serde_json::from_value(serde_json::json!({
        "type": "headers",
        "headers": {"X-Api-Key": "abc"}
    }))
    .unwrap();

    let req = config.into_hook().authenticate(request()).unwrap();
    assert_eq!(req.headers().get("x-api-key").unwrap(), "abc");
}

#[test]
fn test_auth_config_bearer_into_hook() {
    let config = AuthConfig::Bearer {
        token: "tok".into(),
    };
    let req = config.into_hook().authenticate(request()).unwrap();
    assert_eq!(authorization(&req), "Bearer tok");
}

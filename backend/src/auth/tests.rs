use super::*;
use axum::http::Request;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";
const USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn token(role: &str, exp: usize) -> String {
    let claims = Claims {
        sub: USER_ID.to_string(),
        role: role.to_string(),
        email: Some("owner@example.com".to_string()),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn parts_with(authorization: Option<String>) -> Parts {
    let mut builder = Request::builder().uri("/api/v1/entitlements");
    if let Some(value) = authorization {
        builder = builder.header(axum::http::header::AUTHORIZATION, value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    parts.extensions.insert(JwtSecret(Arc::from(SECRET)));
    parts
}

#[test]
fn test_validate_jwt_success() {
    let claims = validate_jwt(&token("authenticated", 9999999999), SECRET)
        .expect("Valid token should pass");
    assert_eq!(claims.sub, USER_ID);
    assert_eq!(claims.email.as_deref(), Some("owner@example.com"));
}

#[test]
fn test_validate_jwt_expired() {
    assert!(validate_jwt(&token("authenticated", 1), SECRET).is_err());
}

#[test]
fn test_validate_jwt_wrong_secret() {
    let result = validate_jwt(&token("authenticated", 9999999999), "another-secret-entirely");
    assert!(result.is_err());
}

#[test]
fn test_admin_role_is_case_insensitive() {
    let user = AuthUser {
        user_id: Uuid::nil(),
        email: None,
        role: "Admin".to_string(),
    };
    assert!(user.is_admin());

    let user = AuthUser {
        role: "authenticated".to_string(),
        ..user
    };
    assert!(!user.is_admin());
}

#[tokio::test]
async fn test_extractor_reads_bearer_token() {
    let mut parts = parts_with(Some(format!("Bearer {}", token("admin", 9999999999))));
    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();

    assert_eq!(user.user_id, Uuid::parse_str(USER_ID).unwrap());
    assert!(user.is_admin());
}

#[tokio::test]
async fn test_extractor_rejects_missing_or_malformed_header() {
    let mut missing = parts_with(None);
    let (status, _) = AuthUser::from_request_parts(&mut missing, &())
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut basic = parts_with(Some("Basic abc".to_string()));
    let (status, message) = AuthUser::from_request_parts(&mut basic, &())
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(message, "Invalid Authorization header format");
}

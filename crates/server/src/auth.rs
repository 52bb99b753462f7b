use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Cookie carrying the session token when no Authorization header is sent.
pub const AUTH_COOKIE: &str = "auth_token";

/// The nine query-parameter endpoints, addressable by name in `[auth] protected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AddQuestion,
    GetQuestion,
    GetFaqs,
    UpdateQuestion,
    DeleteQuestion,
    AddComment,
    GetComments,
    UpdateComment,
    DeleteComment,
}

impl Endpoint {
    pub const ALL: [Endpoint; 9] = [
        Endpoint::AddQuestion,
        Endpoint::GetQuestion,
        Endpoint::GetFaqs,
        Endpoint::UpdateQuestion,
        Endpoint::DeleteQuestion,
        Endpoint::AddComment,
        Endpoint::GetComments,
        Endpoint::UpdateComment,
        Endpoint::DeleteComment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::AddQuestion => "add_question",
            Endpoint::GetQuestion => "get_question",
            Endpoint::GetFaqs => "get_faqs",
            Endpoint::UpdateQuestion => "update_question",
            Endpoint::DeleteQuestion => "delete_question",
            Endpoint::AddComment => "add_comment",
            Endpoint::GetComments => "get_comments",
            Endpoint::UpdateComment => "update_comment",
            Endpoint::DeleteComment => "delete_comment",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::AddQuestion => "/add_question",
            Endpoint::GetQuestion => "/get_question",
            Endpoint::GetFaqs => "/get_faqs",
            Endpoint::UpdateQuestion => "/update_question",
            Endpoint::DeleteQuestion => "/delete_question",
            Endpoint::AddComment => "/add_comment",
            Endpoint::GetComments => "/get_comments",
            Endpoint::UpdateComment => "/update_comment",
            Endpoint::DeleteComment => "/delete_comment",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

/// A verified caller, placed in request extensions by `require_session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header and auth_token cookie")]
    Missing,
    #[error("invalid Authorization format (expect Bearer)")]
    Malformed,
    #[error("token validation failed: {0}")]
    Invalid(String),
}

/// Decides whether a request carries a valid session.
#[async_trait]
pub trait AuthGuard: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Session, AuthError>;
}

/// Verifies HS256 tokens issued by the external identity provider.
pub struct JwtAuthGuard {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthGuard {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }
}

/// Authorization 头优先；缺失时回退到 auth_token Cookie
fn extract_token(headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let raw = value.to_str().map_err(|_| AuthError::Malformed)?;
        let token = raw.strip_prefix("Bearer ").ok_or(AuthError::Malformed)?.trim();
        if token.is_empty() {
            return Err(AuthError::Missing);
        }
        return Ok(token.to_string());
    }
    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::Missing)
}

#[async_trait]
impl AuthGuard for JwtAuthGuard {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Session, AuthError> {
        let token = extract_token(headers)?;
        let data = decode::<Claims>(&token, &self.key, &self.validation)
            .map_err(|e| AuthError::Invalid(e.to_string()))?;
        Ok(Session { user_id: data.claims.sub })
    }
}

/// Which endpoints need a session. Empty when enforcement is disabled.
#[derive(Debug, Clone, Default)]
pub struct AuthPolicy {
    protected: HashSet<Endpoint>,
}

impl AuthPolicy {
    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        if !cfg.enabled {
            return Self::default();
        }
        let protected = cfg
            .protected
            .iter()
            .filter_map(|name| {
                let found = Endpoint::from_name(name);
                if found.is_none() {
                    warn!(endpoint = %name, "unknown endpoint in auth.protected; ignored");
                }
                found
            })
            .collect();
        Self { protected }
    }

    pub fn protecting(endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        Self { protected: endpoints.into_iter().collect() }
    }

    pub fn requires(&self, endpoint: Endpoint) -> bool {
        self.protected.contains(&endpoint)
    }
}

/// Route middleware: 401 unless the guard accepts the request.
pub async fn require_session(
    State(guard): State<Arc<dyn AuthGuard>>,
    mut req: Request,
    next: Next,
) -> Response {
    match guard.authenticate(req.headers()).await {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(e) => {
            warn!(path = %req.uri().path(), err = %e, "session rejected");
            (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, exp_offset: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as usize;
        let claims = Claims { sub: "user-7".into(), exp, iat: None };
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn bearer(tok: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", tok)).unwrap());
        h
    }

    #[tokio::test]
    async fn accepts_valid_bearer_token() {
        let guard = JwtAuthGuard::new("secret");
        let session = guard.authenticate(&bearer(&token("secret", 600))).await.unwrap();
        assert_eq!(session.user_id, "user-7");
    }

    #[tokio::test]
    async fn accepts_cookie_token() {
        let guard = JwtAuthGuard::new("secret");
        let mut h = HeaderMap::new();
        h.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", AUTH_COOKIE, token("secret", 600))).unwrap(),
        );
        assert!(guard.authenticate(&h).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_wrong_secret_expired_and_missing() {
        let guard = JwtAuthGuard::new("secret");
        assert!(matches!(
            guard.authenticate(&bearer(&token("other", 600))).await,
            Err(AuthError::Invalid(_))
        ));
        assert!(matches!(
            guard.authenticate(&bearer(&token("secret", -3600))).await,
            Err(AuthError::Invalid(_))
        ));
        assert!(matches!(guard.authenticate(&HeaderMap::new()).await, Err(AuthError::Missing)));

        let mut basic = HeaderMap::new();
        basic.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(guard.authenticate(&basic).await, Err(AuthError::Malformed)));
    }

    #[test]
    fn policy_follows_config() {
        let cfg = configs::AuthConfig {
            enabled: true,
            jwt_secret: "s".into(),
            protected: vec!["add_comment".into(), "nope".into()],
        };
        let policy = AuthPolicy::from_config(&cfg);
        assert!(policy.requires(Endpoint::AddComment));
        assert!(!policy.requires(Endpoint::GetFaqs));

        let off = AuthPolicy::from_config(&configs::AuthConfig { enabled: false, ..cfg });
        assert!(Endpoint::ALL.iter().all(|e| !off.requires(*e)));
    }

    #[test]
    fn endpoint_names_round_trip() {
        for e in Endpoint::ALL {
            assert_eq!(Endpoint::from_name(e.name()), Some(e));
            assert_eq!(e.path(), format!("/{}", e.name()));
        }
    }
}

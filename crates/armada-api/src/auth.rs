//! HTTP basic authentication middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::warn;

use crate::error::error_body;

/// Realm advertised in the `WWW-Authenticate` challenge.
pub const REALM: &str = "armada";

/// The single user name / password pair the server accepts.
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check an `Authorization` header value of the form `Basic <b64>`.
    pub fn verify(&self, authorization: &str) -> bool {
        let Some(encoded) = authorization.strip_prefix("Basic ") else {
            return false;
        };
        let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
            return false;
        };
        let Ok(pair) = String::from_utf8(decoded) else {
            return false;
        };
        let Some((user, pass)) = pair.split_once(':') else {
            return false;
        };
        // Both halves are always compared.
        let user_ok = constant_time_eq(user.as_bytes(), self.username.as_bytes());
        let pass_ok = constant_time_eq(pass.as_bytes(), self.password.as_bytes());
        user_ok & pass_ok
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Reject requests that do not carry valid credentials.
pub async fn require_basic_auth(
    State(credentials): State<Arc<Credentials>>,
    req: Request,
    next: Next,
) -> Response {
    if authorized(&credentials, req.headers()) {
        return next.run(req).await;
    }
    warn!(method = %req.method(), path = %req.uri().path(), "unauthorized request");
    let mut res = error_body(StatusCode::UNAUTHORIZED, "unauthorized");
    if let Ok(challenge) = HeaderValue::from_str(&format!("Basic realm=\"{REALM}\"")) {
        res.headers_mut().insert(header::WWW_AUTHENTICATE, challenge);
    }
    res
}

fn authorized(credentials: &Credentials, headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| credentials.verify(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    #[test]
    fn accepts_matching_pair() {
        let creds = Credentials::new("admin", "secret");
        assert!(creds.verify(&basic("admin", "secret")));
    }

    #[test]
    fn rejects_wrong_user_or_password() {
        let creds = Credentials::new("admin", "secret");
        assert!(!creds.verify(&basic("admin", "secreT")));
        assert!(!creds.verify(&basic("root", "secret")));
        assert!(!creds.verify(&basic("admin", "")));
    }

    #[test]
    fn password_may_contain_colons() {
        let creds = Credentials::new("admin", "a:b:c");
        assert!(creds.verify(&basic("admin", "a:b:c")));
    }

    #[test]
    fn rejects_malformed_headers() {
        let creds = Credentials::new("admin", "secret");
        assert!(!creds.verify("Bearer abc"));
        assert!(!creds.verify("Basic !!!not-base64"));
        assert!(!creds.verify(&format!("Basic {}", STANDARD.encode("no-colon"))));
    }

    fn guarded(username: &str, password: &str) -> axum::Router {
        let credentials = Arc::new(Credentials::new(username, password));
        axum::Router::new()
            .route("/", axum::routing::get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(credentials, require_basic_auth))
    }

    async fn call(app: axum::Router, authorization: Option<&str>) -> Response {
        use tower::ServiceExt;
        let mut req = axum::http::Request::builder().uri("/");
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        app.oneshot(req.body(axum::body::Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn rejection_carries_realm_challenge() {
        let res = call(guarded("admin", "secret"), None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers()[header::WWW_AUTHENTICATE],
            format!("Basic realm=\"{REALM}\"").as_str()
        );
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_by_middleware() {
        let res = call(guarded("admin", "secret"), Some(&basic("admin", "nope"))).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn valid_credentials_reach_the_handler() {
        let res = call(guarded("admin", "secret"), Some(&basic("admin", "secret"))).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(!res.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}

//! Authenticated user extracted from the identity cookie.
//!
//! Sign-in happens on the institution's central auth service, which sets a
//! JWT identity for this console's domain; handlers only ever see the
//! decoded claims.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

/// Returns true when `roles` grants `role`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

impl AuthenticatedUser {
    fn from_token(token: &str, secret: &str) -> Option<Self> {
        decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .ok()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            return ready(Err(ErrorUnauthorized("server configuration missing")));
        };

        let user = Identity::from_request(req, payload)
            .into_inner()
            .ok()
            .and_then(|identity| identity.id().ok())
            .and_then(|token| Self::from_token(&token, &config.secret));

        match user {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized("authentication required"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "ops@example.com".to_string(),
            name: "Ops".to_string(),
            roles: vec!["console".to_string()],
            exp: (Utc::now().timestamp() + 3600) as usize,
        }
    }

    #[test]
    fn check_role_matches_exactly() {
        let roles = vec!["console".to_string(), "console_admin".to_string()];
        assert!(check_role("console", &roles));
        assert!(check_role("console_admin", &roles));
        assert!(!check_role("console_auditor", &roles));
    }

    #[test]
    fn token_round_trip() {
        let user = sample_user();
        let token = encode(
            &Header::default(),
            &user,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let decoded = AuthenticatedUser::from_token(&token, "secret").unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = encode(
            &Header::default(),
            &sample_user(),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(AuthenticatedUser::from_token(&token, "other").is_none());
    }
}

use crate::auth::models::{AuthContext, JwtClaims};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tubely_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl AuthState {
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: Arc::new(DecodingKey::from_secret(jwt_secret.as_bytes())),
            validation,
        }
    }

    fn verify(&self, token: &str) -> Result<JwtClaims, AppError> {
        jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!(error = %e, "JWT validation failed");
                AppError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t.trim(),
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
            .into_response();
        }
    };

    let claims = match auth_state.verify(token) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    request
        .extensions_mut()
        .insert(AuthContext { user_id: claims.sub });

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::issue_token;
    use chrono::Duration;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-with-at-least-32-bytes!!";

    #[test]
    fn verify_accepts_fresh_token() {
        let state = AuthState::new(SECRET);
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, Duration::hours(1)).unwrap();
        let claims = state.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let state = AuthState::new(SECRET);
        let token = issue_token(SECRET, Uuid::new_v4(), Duration::hours(-2)).unwrap();
        assert!(state.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let state = AuthState::new(SECRET);
        let token = issue_token(
            "a-completely-different-signing-secret!!",
            Uuid::new_v4(),
            Duration::hours(1),
        )
        .unwrap();
        assert!(state.verify(&token).is_err());
    }
}

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::app::AppState;
use crate::authz::Principal;
use crate::errors::AppError;
use crate::models::user::SessionUser;

/// Token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Any live session, including one that still has to change its password.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: SessionUser,
}

/// A live session that is cleared for normal use.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub token: String,
    pub user: SessionUser,
}

impl AuthSession {
    pub fn principal(&self) -> Principal {
        Principal::from(&self.user)
    }
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal::from(&self.user)
    }

    pub fn id(&self) -> u64 {
        self.user.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| AppError::unauthorized("Access token required"))?;

        let user = state
            .sessions
            .resolve(token)
            .await
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;

        Ok(AuthSession {
            token: token.to_string(),
            user,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state).await?;

        if session.user.needs_password_reset {
            return Err(AppError::forbidden(
                "Password change required before using the dashboard",
            ));
        }

        Ok(AuthUser {
            token: session.token,
            user: session.user,
        })
    }
}

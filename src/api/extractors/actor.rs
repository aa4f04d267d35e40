use axum::{extract::FromRequestParts, http::request::Parts};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

pub const ROLE_HEADER: &str = "X-Actor-Role";
pub const ID_HEADER: &str = "X-Actor-Id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Learner,
    Coach,
}

/// Caller identity resolved from request headers. The referenced learner or
/// coach must exist.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub role: ActorRole,
    pub id: i64,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Learner => "learner",
            ActorRole::Coach => "coach",
        }
    }
}

impl Actor {
    pub fn learner_id(&self) -> Result<i64, AppError> {
        match self.role {
            ActorRole::Learner => Ok(self.id),
            ActorRole::Coach => Err(AppError::Authorization("Only learners can do this".into())),
        }
    }

    pub fn coach_id(&self) -> Result<i64, AppError> {
        match self.role {
            ActorRole::Coach => Ok(self.id),
            ActorRole::Learner => Err(AppError::Authorization("Only coaches can do this".into())),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts.headers.get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .ok_or(AppError::Unauthorized)
        };

        let role = match header(ROLE_HEADER)?.to_ascii_lowercase().as_str() {
            "learner" => ActorRole::Learner,
            "coach" => ActorRole::Coach,
            _ => return Err(AppError::Unauthorized),
        };
        let id: i64 = header(ID_HEADER)?.parse().map_err(|_| AppError::Unauthorized)?;

        let known = match role {
            ActorRole::Learner => state.learner_repo.find_by_id(id).await?.is_some(),
            ActorRole::Coach => state.coach_repo.find_by_id(id).await?.is_some(),
        };
        if !known {
            return Err(AppError::Unauthorized);
        }

        Span::current().record("actor_role", role.as_str());
        Span::current().record("actor_id", id);

        Ok(Actor { role, id })
    }
}

//! Acting-user extractor.
//!
//! Identity is asserted upstream by the gateway, which forwards the
//! authenticated user in `X-Actor-Id` and `X-Actor-Role` headers. Every
//! workflow route names its actor explicitly through this extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{Actor, ActorRole};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

const ACTOR_ID_HEADER: &str = "X-Actor-Id";
const ACTOR_ROLE_HEADER: &str = "X-Actor-Role";

/// The authenticated caller of a workflow request.
#[derive(Debug, Clone, Copy)]
pub struct RequestActor(pub Actor);

impl RequestActor {
    /// Builds an actor from forwarded header values.
    ///
    /// This is the core parsing logic, extracted for testability. The
    /// system role is reserved for background jobs and never accepted
    /// from a request.
    pub fn parse(id: Option<&str>, role: Option<&str>) -> Result<Actor, ApiError> {
        let id = id.ok_or_else(|| {
            ApiError::Unauthorized(format!("Missing {} header", ACTOR_ID_HEADER))
        })?;
        let role = role.ok_or_else(|| {
            ApiError::Unauthorized(format!("Missing {} header", ACTOR_ROLE_HEADER))
        })?;

        let id = Uuid::parse_str(id)
            .map_err(|_| ApiError::Unauthorized("Malformed actor id".to_string()))?;
        let role: ActorRole = role
            .parse()
            .map_err(|_| ApiError::Unauthorized("Unknown actor role".to_string()))?;

        if role == ActorRole::System {
            return Err(ApiError::Unauthorized(
                "The system role cannot be asserted by a request".to_string(),
            ));
        }

        Ok(Actor::new(id, role))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok());
        let role = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|v| v.to_str().ok());

        Self::parse(id, role).map(RequestActor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_customer() {
        let id = Uuid::new_v4();
        let actor = RequestActor::parse(Some(&id.to_string()), Some("customer")).unwrap();
        assert_eq!(actor.id, id);
        assert_eq!(actor.role, ActorRole::Customer);
    }

    #[test]
    fn test_parse_staff_and_admin() {
        let id = Uuid::new_v4().to_string();
        let staff = RequestActor::parse(Some(&id), Some("staff")).unwrap();
        assert_eq!(staff.role, ActorRole::Staff);

        let admin = RequestActor::parse(Some(&id), Some("admin")).unwrap();
        assert_eq!(admin.role, ActorRole::Admin);
    }

    #[test]
    fn test_parse_missing_id_header() {
        let err = RequestActor::parse(None, Some("customer")).unwrap_err();
        match err {
            ApiError::Unauthorized(msg) => assert!(msg.contains("X-Actor-Id")),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_role_header() {
        let id = Uuid::new_v4().to_string();
        let err = RequestActor::parse(Some(&id), None).unwrap_err();
        match err {
            ApiError::Unauthorized(msg) => assert!(msg.contains("X-Actor-Role")),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_id() {
        let err = RequestActor::parse(Some("not-a-uuid"), Some("customer")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_parse_unknown_role() {
        let id = Uuid::new_v4().to_string();
        let err = RequestActor::parse(Some(&id), Some("superuser")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_parse_rejects_system_role() {
        let id = Uuid::new_v4().to_string();
        let err = RequestActor::parse(Some(&id), Some("system")).unwrap_err();
        match err {
            ApiError::Unauthorized(msg) => assert!(msg.contains("system")),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }
}

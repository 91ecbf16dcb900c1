//! Custom Axum extractors.
//!
//! - [`CorrelationId`]: the request's correlation id (set by the middleware or header)
//! - [`BearerToken`]: the `Authorization: Bearer <token>` credential
//! - [`AdminPrincipal`]: a caller resolved to an administrative [`Role`]
//! - [`ValidatedJson`]: a JSON body checked with `validator`
//!
//! # Examples
//!
//! ```ignore
//! async fn publish(
//!     admin: AdminPrincipal,
//!     State(service): State<BookingService>,
//!     Path(id): Path<WorkshopId>,
//! ) -> Result<Json<Workshop>, AppError> {
//!     tracing::info!(admin = %admin.subject, "Publishing workshop");
//!     Ok(Json(service.publish_workshop(id).await?))
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    Json, async_trait,
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Correlation ID for request tracing.
///
/// Taken from the request extensions when the correlation middleware is installed,
/// otherwise from the `X-Correlation-ID` header, otherwise freshly generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

impl CorrelationId {
    pub(crate) fn from_parts(parts: &Parts) -> Self {
        parts.extensions.get::<Self>().copied().unwrap_or_else(|| {
            Self(
                parts
                    .headers
                    .get(CORRELATION_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .unwrap_or_else(Uuid::new_v4),
            )
        })
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// Bearer token extracted from `Authorization: Bearer <token>` header.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .trim();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Roles known to the booking API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Signed-in customer without administrative rights
    User,
    /// Manages workshops and their registrations
    WorkshopAdmin,
    /// Full access
    SuperAdmin,
}

impl Role {
    /// Whether the role may use the administrative endpoints
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::WorkshopAdmin | Self::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "user" => Ok(Self::User),
            "workshopadmin" => Ok(Self::WorkshopAdmin),
            "superadmin" => Ok(Self::SuperAdmin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Who the token belongs to
    pub subject: String,
    /// What they may do
    pub role: Role,
}

/// Resolves bearer tokens to principals.
///
/// Authentication lives outside this service; implementations adapt whatever
/// issues the tokens. The router state exposes one through `FromRef`.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// The principal for `token`, or `None` if the token is unknown or expired
    async fn resolve(&self, token: &str) -> Option<Principal>;
}

/// Require an administrative role.
///
/// Missing or unknown tokens are rejected with 401, non-admin roles with 403.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

impl std::ops::Deref for AdminPrincipal {
    type Target = Principal;

    fn deref(&self) -> &Principal {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminPrincipal
where
    Arc<dyn PrincipalResolver>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let resolver = Arc::<dyn PrincipalResolver>::from_ref(state);

        let principal = resolver
            .resolve(&token)
            .await
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;

        if !principal.role.is_admin() {
            tracing::warn!(subject = %principal.subject, role = ?principal.role, "Admin access denied");
            return Err(AppError::forbidden("Administrator role required"));
        }

        Ok(Self(principal))
    }
}

/// JSON body validated with [`validator::Validate`] before the handler runs.
///
/// Malformed JSON is a 400 `BAD_REQUEST`; failed checks are a 400
/// `VALIDATION_ERROR` with one entry per field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

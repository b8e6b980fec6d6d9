use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::error::AppError;
use crate::models::{Role, User};
use crate::state::AppState;

/// Access-control gate applied per route group.
///
/// Verifies the bearer token and resolves the acting user before the
/// inner handler runs, rejecting anyone below the required role. On
/// success the resolved `User` is placed in the request extensions for
/// handlers to pick up.
pub struct RoleGuard {
    required: Role,
}

impl RoleGuard {
    /// Admits users and admins.
    pub fn user() -> Self {
        Self {
            required: Role::User,
        }
    }

    /// Admits admins only.
    pub fn admin() -> Self {
        Self {
            required: Role::Admin,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RoleGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleGuardService {
            service: Rc::new(service),
            required: self.required,
        }))
    }
}

pub struct RoleGuardService<S> {
    service: Rc<S>,
    required: Role,
}

impl<S, B> Service<ServiceRequest> for RoleGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required = self.required;

        Box::pin(async move {
            let user = admit(&req, required).await?;
            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}

/// Runs the extract -> verify -> resolve -> authorize sequence, returning
/// the resolved user on success. Holds no state across requests.
async fn admit(req: &ServiceRequest, required: Role) -> Result<User, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::MissingOrMalformedToken)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Unexpected("application state is not configured".into()))?;

    let claims = state.tokens.verify(token)?;

    // The subject may have been deleted after issuance. Reject without
    // revealing whether the id still resolves.
    let user = state
        .accounts
        .get_user_by_id(&claims.sub)
        .await
        .map_err(|_| AppError::TokenInvalid)?;

    if !user.role.satisfies(required) {
        return Err(AppError::InsufficientPermissions(required));
    }

    Ok(user)
}

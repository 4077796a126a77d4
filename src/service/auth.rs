use std::future::{ready, Ready};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::HttpMessage;
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

/// Header placed by the upstream auth gateway once the session cookie has
/// been validated. Requests reaching this service are already
/// authenticated; this middleware only carries the identity forward.
pub const USER_ID_HEADER: &str = "X-User-Id";

pub struct UserAuthData {
    pub user_id: Uuid
}

pub struct IdentityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
    where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = IdentityMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService { service }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: S
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
    where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // handlers that need an identity reject requests without one;
        // public reads go through untouched
        if let Some(user_id) = parse_user_id(&req) {
            req.extensions_mut().insert(UserAuthData { user_id });
        }
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

fn parse_user_id(req: &ServiceRequest) -> Option<Uuid> {
    req.headers()
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .parse::<Uuid>()
        .ok()
}

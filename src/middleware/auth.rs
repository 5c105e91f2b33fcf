use crate::{services::auth_service, state::AppState};
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

/// Rejects requests without a valid bearer token; on success the verified
/// `Principal` is stored in the request extensions for `web::ReqData`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let principal = match req.app_data::<web::Data<AppState>>() {
            Some(state) => {
                let auth_header = req
                    .headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok());
                auth_service::verify_bearer(&state.tokens, auth_header).ok()
            }
            None => {
                log::error!("❌ AppState missing, cannot verify tokens");
                None
            }
        };

        match principal {
            Some(principal) => {
                req.extensions_mut().insert(principal);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            None => {
                log::warn!("❌ Unauthorized request: {} {}", req.method(), req.path());

                let (req, _payload) = req.into_parts();
                let res = HttpResponse::Unauthorized()
                    .json(serde_json::json!({ "message": "Unauthorized" }))
                    .map_into_right_body();

                Box::pin(async move { Ok(ServiceResponse::new(req, res)) })
            }
        }
    }
}

use crate::utils::AppError;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

/// When enabled, re-renders `AppError` responses with the unredacted cause
/// and a `stackTrace` field. Meant for local debugging only.
pub struct ErrorDetails {
    enabled: bool,
}

impl ErrorDetails {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorDetails
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorDetailsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorDetailsMiddleware {
            service,
            enabled: self.enabled,
        }))
    }
}

pub struct ErrorDetailsMiddleware<S> {
    service: S,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for ErrorDetailsMiddleware<S>
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
        let enabled = self.enabled;
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            if !enabled {
                return Ok(res.map_into_left_body());
            }

            let detailed = res
                .response()
                .error()
                .and_then(|err| err.as_error::<AppError>())
                .map(|err| err.to_response(true));

            match detailed {
                Some(response) => Ok(res.into_response(response).map_into_right_body()),
                None => Ok(res.map_into_left_body()),
            }
        })
    }
}

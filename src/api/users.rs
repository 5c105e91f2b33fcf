use actix_web::{web, HttpResponse};
use crate::{
    models::{LoginRequest, LoginResponse, Principal, RegisterRequest, RegisterResponse, UserResponse},
    services::auth_service,
    state::AppState,
    utils::{AppError, ErrorBody},
};

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing fields or email already registered", body = ErrorBody)
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /api/users/register - email: {}", request.email.as_deref().unwrap_or("N/A"));

    let response = auth_service::register(&state, &request).await?;
    Ok(HttpResponse::Created().json(response))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /api/users/login - email: {}", request.email.as_deref().unwrap_or("N/A"));

    let response = auth_service::login(&state, &request).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Authenticated user", body = Principal),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(principal: web::ReqData<Principal>) -> HttpResponse {
    log::info!("👤 GET /api/users/me - user: {}", principal.id);
    HttpResponse::Ok().json(auth_service::get_self(&principal))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Deleted user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the caller's account", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    state: web::Data<AppState>,
    principal: web::ReqData<Principal>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🗑️ DELETE /api/users/{} - user: {}", id, principal.id);

    let deleted = auth_service::delete_user(&state, &principal, &id).await?;
    Ok(HttpResponse::Ok().json(deleted))
}

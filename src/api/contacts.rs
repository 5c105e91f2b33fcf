use actix_web::{web, HttpResponse};
use crate::{
    models::{ContactPatch, ContactResponse, CreateContactRequest, Principal},
    services::contact_service,
    state::AppState,
    utils::{AppError, ErrorBody},
};

/// GET /api/contacts - contacts owned by the authenticated user
#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = "Contacts",
    responses(
        (status = 200, description = "Caller's contacts", body = [ContactResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_contacts(
    state: web::Data<AppState>,
    principal: web::ReqData<Principal>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /api/contacts - user: {}", principal.id);

    let contacts = contact_service::list(&state, &principal).await?;
    Ok(HttpResponse::Ok().json(contacts))
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    tag = "Contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_contact(
    state: web::Data<AppState>,
    principal: web::ReqData<Principal>,
    request: web::Json<CreateContactRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /api/contacts - user: {}", principal.id);

    let contact = contact_service::create(&state, &principal, &request).await?;
    Ok(HttpResponse::Created().json(contact))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = String, Path, description = "Contact id")
    ),
    responses(
        (status = 200, description = "Contact", body = ContactResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Contact belongs to another user", body = ErrorBody),
        (status = 404, description = "Contact not found", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_contact(
    state: web::Data<AppState>,
    principal: web::ReqData<Principal>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let contact = contact_service::get(&state, &principal, &path).await?;
    Ok(HttpResponse::Ok().json(contact))
}

#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = String, Path, description = "Contact id")
    ),
    request_body = ContactPatch,
    responses(
        (status = 200, description = "Updated contact", body = ContactResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Contact belongs to another user", body = ErrorBody),
        (status = 404, description = "Contact not found", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_contact(
    state: web::Data<AppState>,
    principal: web::ReqData<Principal>,
    path: web::Path<String>,
    patch: web::Json<ContactPatch>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️ PUT /api/contacts/{} - user: {}", path.as_str(), principal.id);

    let contact = contact_service::update(&state, &principal, &path, &patch).await?;
    Ok(HttpResponse::Ok().json(contact))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    tag = "Contacts",
    params(
        ("id" = String, Path, description = "Contact id")
    ),
    responses(
        (status = 200, description = "Deleted contact", body = ContactResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Contact belongs to another user", body = ErrorBody),
        (status = 404, description = "Contact not found", body = ErrorBody)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_contact(
    state: web::Data<AppState>,
    principal: web::ReqData<Principal>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ DELETE /api/contacts/{} - user: {}", path.as_str(), principal.id);

    let contact = contact_service::delete(&state, &principal, &path).await?;
    Ok(HttpResponse::Ok().json(contact))
}

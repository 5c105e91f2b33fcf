use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contacts Service API",
        version = "1.0.0",
        description = "Contact book API. \n\n**Authentication:** every endpoint except register, login and health requires a JWT Bearer token obtained from `/api/users/login`."
    ),
    paths(
        // Users
        crate::api::users::register,
        crate::api::users::login,
        crate::api::users::get_me,
        crate::api::users::delete_user,

        // Contacts
        crate::api::contacts::list_contacts,
        crate::api::contacts::create_contact,
        crate::api::contacts::get_contact,
        crate::api::contacts::update_contact,
        crate::api::contacts::delete_contact,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::RegisterRequest,
            crate::models::RegisterResponse,
            crate::models::LoginRequest,
            crate::models::LoginResponse,
            crate::models::Principal,
            crate::models::UserResponse,
            crate::models::CreateContactRequest,
            crate::models::ContactPatch,
            crate::models::ContactResponse,
            crate::utils::ErrorBody,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Registration, login and account management."),
        (name = "Contacts", description = "Contacts owned by the authenticated user."),
        (name = "Health", description = "Service and storage health."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}

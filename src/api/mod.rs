pub mod contacts;
pub mod health;
pub mod swagger;
pub mod users;

use actix_web::{guard, web, HttpResponse};
use crate::{middleware::auth::AuthMiddleware, utils::AppError};

/// Unreadable or mistyped JSON bodies become 400 responses in the usual error shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid request body: {}", err)).into()
    })
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().finish()
}

/// Registers every route. Shared by `main` and the HTTP tests below.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/users")
                .route("/register", web::post().to(users::register))
                .route("/login", web::post().to(users::login))
                // Auth only wraps the methods that exist; anything else on a
                // user path falls through to the unauthenticated 405 below.
                .service(
                    web::resource("/me")
                        .guard(guard::Get())
                        .wrap(AuthMiddleware)
                        .route(web::get().to(users::get_me)),
                )
                .service(
                    web::resource("/{id}")
                        .guard(guard::Delete())
                        .wrap(AuthMiddleware)
                        .route(web::delete().to(users::delete_user)),
                )
                .service(web::resource("/{id}").to(method_not_allowed)),
        )
        .service(
            web::scope("/api/contacts")
                .wrap(AuthMiddleware)
                .route("", web::get().to(contacts::list_contacts))
                .route("", web::post().to(contacts::create_contact))
                .route("/{id}", web::get().to(contacts::get_contact))
                .route("/{id}", web::put().to(contacts::update_contact))
                .route("/{id}", web::delete().to(contacts::delete_contact)),
        );
}

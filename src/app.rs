use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{Condition, ErrorHandlers, Logger};
use actix_web::{web, App, Error};

use crate::error::expose_details;
use crate::routes;
use crate::state::AppState;

fn cors(origins: &[String]) -> Cors {
    origins.iter().fold(
        Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        |cors, origin| cors.allowed_origin(origin),
    )
}

/// Assembles the application served by `main` and driven by the integration tests.
///
/// Error details are re-rendered by `expose_details` only when the configured
/// environment is development.
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let development = state.config.is_development();
    let cors = cors(&state.config.cors_origins);

    App::new()
        .app_data(state)
        .wrap(Condition::new(
            development,
            ErrorHandlers::new().default_handler(expose_details),
        ))
        .wrap(cors)
        .wrap(Logger::default())
        .configure(routes::config)
}

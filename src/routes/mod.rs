pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::auth::Protect;
use crate::error::{json_error_handler, path_error_handler, query_error_handler};

/// Versioned prefix for every API route. `/health` sits outside it.
pub const API_PREFIX: &str = "/api/v1";

/// Registers every route. `/users` and `/tasks` are wrapped by `Protect`; `/auth` is open.
/// Expects `web::Data<AppState>` to be registered on the `App`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health::health)
        .service(
            web::scope(API_PREFIX)
                .service(
                    web::scope("/auth")
                        .service(auth::signup)
                        .service(auth::login)
                        .service(auth::logout),
                )
                .service(
                    web::scope("/users")
                        .wrap(Protect)
                        .service(users::get_me)
                        .service(users::get_user),
                )
                .service(
                    web::scope("/tasks")
                        .wrap(Protect)
                        .service(tasks::get_tasks)
                        .service(tasks::create_task)
                        .service(tasks::get_task)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                ),
        );
}

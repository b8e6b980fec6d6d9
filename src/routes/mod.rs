pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{guard, web};

use crate::auth::RoleGuard;

/// Wires the full route table.
///
/// Registration and login are public; everything under `/api` passes
/// through a `RoleGuard`. Task reads admit any authenticated user, task
/// writes and promotion are admin-only, matching the role column of the
/// API surface. The same path is registered once per method group so each
/// group carries its own guard; method guards keep the resources from
/// shadowing each other.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(auth::register)
        .service(auth::login)
        .service(
            web::scope("/api")
                .service(
                    web::resource("/promote/{id}")
                        .wrap(RoleGuard::admin())
                        .route(web::post().to(auth::promote)),
                )
                .service(
                    web::resource("/tasks")
                        .guard(guard::Get())
                        .wrap(RoleGuard::user())
                        .route(web::get().to(tasks::get_tasks)),
                )
                .service(
                    web::resource("/tasks")
                        .guard(guard::Post())
                        .wrap(RoleGuard::admin())
                        .route(web::post().to(tasks::create_task)),
                )
                .service(
                    web::resource("/tasks/{id}")
                        .guard(guard::Get())
                        .wrap(RoleGuard::user())
                        .route(web::get().to(tasks::get_task)),
                )
                .service(
                    web::resource("/tasks/{id}")
                        .guard(guard::Put())
                        .wrap(RoleGuard::admin())
                        .route(web::put().to(tasks::update_task)),
                )
                .service(
                    web::resource("/tasks/{id}")
                        .guard(guard::Delete())
                        .wrap(RoleGuard::admin())
                        .route(web::delete().to(tasks::delete_task)),
                ),
        );
}

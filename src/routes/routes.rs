use actix_web::web;

use super::areas::areas_handlers;
use super::assignments::assignments_handlers;
use super::auth::auth_handlers;
use super::reports::reports_handlers;
use super::roles::roles_handlers;
use super::tasks::tasks_handlers;
use super::users::users_handlers;

pub fn auth_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/login", web::post().to(auth_handlers::login))
            .route("/refresh", web::post().to(auth_handlers::refresh))
            .route("/me", web::get().to(auth_handlers::me))
            .route("/logout", web::post().to(auth_handlers::logout)),
    );
}

pub fn tasks_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tasks")
            .route("", web::get().to(tasks_handlers::list_tasks))
            .route("", web::post().to(tasks_handlers::create_task))
            .route("/{task_id}", web::get().to(tasks_handlers::get_task))
            .route("/{task_id}", web::put().to(tasks_handlers::update_task))
            .route("/{task_id}", web::delete().to(tasks_handlers::delete_task)),
    );
}

pub fn areas_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/areas")
            .route("", web::get().to(areas_handlers::list_areas))
            .route("", web::post().to(areas_handlers::create_area))
            .route("/{area_id}", web::get().to(areas_handlers::get_area))
            .route("/{area_id}", web::put().to(areas_handlers::update_area))
            .route("/{area_id}", web::delete().to(areas_handlers::delete_area)),
    );
}

pub fn users_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .route("", web::get().to(users_handlers::list_users))
            .route("", web::post().to(users_handlers::create_user))
            .route("/{user_id}", web::get().to(users_handlers::get_user))
            .route("/{user_id}", web::put().to(users_handlers::update_user))
            .route("/{user_id}", web::delete().to(users_handlers::delete_user)),
    );
}

pub fn roles_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/roles").route("", web::get().to(roles_handlers::list_roles)),
    );
}

pub fn assignments_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .route("", web::get().to(assignments_handlers::list_assignments))
            .route("", web::post().to(assignments_handlers::create_assignment))
            .route(
                "/{assignment_id}",
                web::delete().to(assignments_handlers::delete_assignment),
            ),
    );
}

pub fn reports_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports").route("/summary", web::get().to(reports_handlers::summary)),
    );
}

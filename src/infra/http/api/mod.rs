pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::{ApiState, RoutedResource};

use axum::{
    Router, middleware as axum_middleware,
    routing::{MethodRouter, get},
};

use crate::domain::entities::{EventRecord, FunctionRecord};

pub fn build_api_router(state: ApiState) -> Router<ApiState> {
    let owner_routes = Router::new()
        .route("/api/v1/events", collection::<EventRecord>())
        .route("/api/v1/events/{id}", member::<EventRecord>())
        .route("/api/v1/functions", collection::<FunctionRecord>())
        .route("/api/v1/functions/{id}", member::<FunctionRecord>())
        .route_layer(axum_middleware::from_fn(middleware::resolve_owner));

    let admin_routes = Router::new()
        .route("/api/v1/admin/users", get(handlers::admin_list_users))
        .route("/api/v1/admin/users/{id}", get(handlers::admin_get_user))
        .route("/api/v1/admin/events", get(handlers::admin_list_events))
        .route("/api/v1/admin/events/{id}", get(handlers::admin_get_event))
        .route("/api/v1/admin/functions", get(handlers::admin_list_functions))
        .route(
            "/api/v1/admin/functions/{id}",
            get(handlers::admin_get_function),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_admin,
        ));

    owner_routes.merge(admin_routes)
}

fn collection<R: RoutedResource>() -> MethodRouter<ApiState> {
    get(handlers::list_records::<R>)
        .post(handlers::create_record::<R>)
        .delete(handlers::delete_all_records::<R>)
}

fn member<R: RoutedResource>() -> MethodRouter<ApiState> {
    get(handlers::get_record::<R>)
        .put(handlers::update_record::<R>)
        .delete(handlers::delete_record::<R>)
}

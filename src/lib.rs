//! Nuptial - content API for a marriage-services website
//!
//! Serves the FAQ, category, service, blog, contact and user collections behind
//! the public site and its admin console. FAQs keep a gap-free per-category order
//! maintained by [`services::OrderedIndex`].

pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod store;
pub mod types;
pub mod utils;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use config::Config;
pub use errors::{SiteError, SiteResult};
pub use store::Store;
pub use types::AppState;

use handlers::{blogs, categories, contacts, faqs, services as service_handlers, users};

/// Build the API router over `state`
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);
    let body_limit = state.config.body_limit;

    Router::new()
        .route("/api/faqs", get(faqs::list_faqs).post(faqs::create_faq))
        .route("/api/faqs/reorder", post(faqs::reorder_faq))
        .route(
            "/api/faqs/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/faqs/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/api/faqs/:id",
            get(faqs::get_faq).put(faqs::update_faq).delete(faqs::delete_faq),
        )
        .route("/api/services", get(service_handlers::list_services).post(service_handlers::create_service))
        .route(
            "/api/services/id/:id",
            get(service_handlers::get_service_by_id)
                .put(service_handlers::update_service_by_id)
                .delete(service_handlers::delete_service_by_id),
        )
        .route(
            "/api/services/:slug",
            get(service_handlers::get_service)
                .put(service_handlers::update_service)
                .delete(service_handlers::delete_service),
        )
        .route("/api/blogs", get(blogs::list_blogs).post(blogs::create_blog))
        .route(
            "/api/blogs/:slug",
            get(blogs::get_blog).put(blogs::update_blog).delete(blogs::delete_blog),
        )
        .route("/api/contacts", get(contacts::list_contacts).post(contacts::submit_contact))
        .route(
            "/api/contacts/:id",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route("/api/monitor", get(handlers::handle_monitor))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                log::warn!("Invalid CORS origin '{}', allowing any", origin);
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, HeaderName::from_static("x-requested-with")])
}

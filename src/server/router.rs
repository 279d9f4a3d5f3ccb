use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::SchoolStore;
use crate::handlers::{
    attendance, dashboard, fees, health, holidays, not_found, sessions, staff, students, users,
    vendors,
};

/// Request bodies are small JSON documents.
const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone)]
pub struct SchoolState {
    pub store: SchoolStore,
    pub api_key: Arc<str>,
}

impl SchoolState {
    pub fn new(store: SchoolStore, api_key: Arc<str>) -> Self {
        Self { store, api_key }
    }
}

pub fn school_router(state: SchoolState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route(
            "/sessions",
            get(sessions::list_sessions).post(sessions::create_session),
        )
        .route("/sessions/{id}/current", post(sessions::set_current_session))
        .route(
            "/classes",
            get(sessions::list_classes).post(sessions::create_class),
        )
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route(
            "/students/{id}/enrollments",
            get(students::list_enrollments).post(students::create_enrollment),
        )
        .route("/staff", get(staff::list_staff).post(staff::create_staff))
        .route(
            "/staff/{id}",
            put(staff::update_staff).delete(staff::delete_staff),
        )
        .route(
            "/attendance",
            get(attendance::list_attendance).post(attendance::mark_attendance),
        )
        .route("/attendance/summary", get(attendance::attendance_summary))
        .route(
            "/holidays",
            get(holidays::list_holidays).post(holidays::create_holiday),
        )
        .route(
            "/holidays/{id}",
            put(holidays::update_holiday).delete(holidays::delete_holiday),
        )
        .route("/fees", get(fees::list_fees).post(fees::create_fee))
        .route("/fees/generate", post(fees::generate_fees))
        .route(
            "/fees/{id}/payments",
            get(fees::list_fee_payments).post(fees::record_fee_payment),
        )
        .route(
            "/vendors",
            get(vendors::list_vendors).post(vendors::create_vendor),
        )
        .route(
            "/vendors/{id}",
            get(vendors::get_vendor)
                .put(vendors::update_vendor)
                .delete(vendors::delete_vendor),
        )
        .route("/vendors/{id}/bills", post(vendors::add_vendor_bill))
        .route("/vendors/{id}/payments", post(vendors::record_vendor_payment))
        .route("/vendors/{id}/ledger", get(vendors::vendor_ledger))
        .route("/dashboard", get(dashboard::dashboard));

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

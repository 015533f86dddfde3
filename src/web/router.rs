use axum::{
    Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{
    AppState,
    admin::{self, exhibits, workshops},
    api, auth, public,
};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(public::landing_page))
        .route("/exhibits", get(public::exhibits_page))
        .route("/workshops", get(public::workshops_page))
        .route("/api/exhibits", get(api::list_exhibits))
        .route("/login", get(auth::login_page).post(auth::process_login))
        .route("/logout", post(auth::logout))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .route("/dashboard", get(admin::dashboard))
        .route(
            "/dashboard/exhibits",
            get(exhibits::exhibits_page).post(exhibits::create_exhibit),
        )
        .route("/dashboard/exhibits/edit", get(exhibits::exhibit_edit_page))
        .route("/dashboard/exhibits/update", post(exhibits::update_exhibit))
        .route(
            "/dashboard/exhibits/publish",
            post(exhibits::toggle_exhibit_published),
        )
        .route("/dashboard/exhibits/delete", post(exhibits::delete_exhibit))
        .route(
            "/dashboard/workshops",
            get(workshops::workshops_page).post(workshops::create_workshop),
        )
        .route(
            "/dashboard/workshops/edit",
            get(workshops::workshop_edit_page),
        )
        .route(
            "/dashboard/workshops/update",
            post(workshops::update_workshop),
        )
        .route(
            "/dashboard/workshops/publish",
            post(workshops::toggle_workshop_published),
        )
        .route(
            "/dashboard/workshops/delete",
            post(workshops::delete_workshop),
        )
        .with_state(state)
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

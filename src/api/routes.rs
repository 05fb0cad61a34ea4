use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::defaults::{delete_default, get_default, list_defaults, put_default};
use super::health::health;
use super::metrics::prometheus_metrics;
use super::render::{list_variables, render, validate};
use super::template::{
    create_template, delete_template, get_template, get_template_translation, list_templates,
    render_template, translate_template, update_template,
};
use super::translation::{translate, translate_lesson};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                // Templates
                .route("/templates", get(list_templates).post(create_template))
                .route(
                    "/templates/{id}",
                    get(get_template).put(update_template).delete(delete_template),
                )
                .route("/templates/{id}/render", post(render_template))
                .route("/templates/{id}/translations", post(translate_template))
                .route(
                    "/templates/{id}/translations/{language}",
                    get(get_template_translation),
                )
                // Substitution
                .route("/render", post(render))
                .route("/validate", post(validate))
                .route("/variables", get(list_variables))
                // Default values
                .route("/defaults", get(list_defaults))
                .route(
                    "/defaults/{key}",
                    get(get_default).put(put_default).delete(delete_default),
                )
                // Translation
                .route("/translate", post(translate))
                .route("/lessons/translate", post(translate_lesson))
                .route_layer(from_fn_with_state(state, api_key_auth)),
        )
}

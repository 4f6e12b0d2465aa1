//! Course selection page and recommendation form handler

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::html;
use crate::AppState;

/// Form submitted from the course selection page
#[derive(Debug, Deserialize)]
pub struct RecommendForm {
    pub course_name: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler).post(recommend_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for `GET /` - shows the course selection form
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(html::index_page(state.model.names(), None, None))
}

/// Handler for `POST /` - recommends courses similar to the submitted one
pub async fn recommend_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RecommendForm>,
) -> Html<String> {
    let recommendations = state.model.recommend(&form.course_name);

    tracing::info!(
        "Recommended {} courses for {:?}",
        recommendations.len(),
        form.course_name
    );

    Html(html::index_page(
        state.model.names(),
        Some(form.course_name.as_str()),
        Some(recommendations.as_slice()),
    ))
}

//! HTTP API over a [`Dataset`]

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use ontograph_types::{
    ApiMessage, EntityId, HealthResponse, SearchParams, SearchResponse, Work, WorkType,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::search;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/search", get(search_entities))
        .route("/works", get(list_works))
        .route("/works/:id", get(get_work))
        .route("/works/type/:type", get(works_by_type))
        .route("/works/genre/:genre", get(works_by_genre))
        .route("/works/creator/:creator", get(works_by_creator))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        persons: state.dataset.persons.len(),
        works: state.dataset.works.len(),
    })
}

// A query string that fails to deserialize is treated as empty
async fn search_entities(
    State(state): State<AppState>,
    params: Option<Query<SearchParams>>,
) -> Json<SearchResponse> {
    let query = params.map(|Query(p)| p).unwrap_or_default().into_query();
    let response = search::filter(&state.dataset, &query);
    info!(
        "search category={} search={:?} type={:?} role={:?}: {} persons, {} works",
        query.category.as_str(),
        query.search,
        query.work_type,
        query.role,
        response.persons.len(),
        response.works.len()
    );
    Json(response)
}

async fn list_works(State(state): State<AppState>) -> Json<Vec<Work>> {
    Json(state.dataset.works.clone())
}

async fn get_work(Path(id): Path<String>, State(state): State<AppState>) -> Response {
    match id.parse::<EntityId>().ok().and_then(|id| state.dataset.work(id)) {
        Some(work) => Json(work.clone()).into_response(),
        None => {
            debug!("work {} not found", id);
            not_found("Work not found")
        }
    }
}

// Unknown type names match nothing
async fn works_by_type(
    Path(work_type): Path<String>,
    State(state): State<AppState>,
) -> Json<Vec<Work>> {
    let works = WorkType::parse_lenient(&work_type)
        .map(|t| search::works_by_type(&state.dataset, t))
        .unwrap_or_default();
    Json(works)
}

async fn works_by_genre(
    Path(genre): Path<String>,
    State(state): State<AppState>,
) -> Json<Vec<Work>> {
    Json(search::works_by_genre(&state.dataset, &genre))
}

async fn works_by_creator(
    Path(creator): Path<String>,
    State(state): State<AppState>,
) -> Json<Vec<Work>> {
    Json(search::works_by_creator(&state.dataset, &creator))
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(ApiMessage::new(message))).into_response()
}

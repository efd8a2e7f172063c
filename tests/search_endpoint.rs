//! Router-level tests: requests go through the full middleware stack

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use ontograph::{create_router, AppState, Dataset};
use ontograph_types::{ApiMessage, HealthResponse, SearchResponse, Work};
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

async fn get<T: DeserializeOwned>(uri: &str) -> (StatusCode, T) {
    let app = create_router(AppState::new(Dataset::sample()));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn search_by_person_name() {
    let (status, body): (_, SearchResponse) =
        get("/search?category=Person&search=kubrick&type=&role=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.persons.len(), 1);
    assert_eq!(body.persons[0].name, "Stanley Kubrick");
    assert_eq!(
        body.works.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![9]
    );
}

#[tokio::test]
async fn search_without_params_returns_everything() {
    let dataset = Dataset::sample();
    let (status, body): (_, SearchResponse) = get("/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.works.len(), dataset.works.len());
    assert_eq!(body.persons.len(), dataset.persons.len());
}

#[tokio::test]
async fn unknown_category_falls_back_to_works() {
    let (_, fallback): (_, SearchResponse) = get("/search?category=Music&search=night").await;
    let (_, works): (_, SearchResponse) = get("/search?category=Work&search=night").await;
    assert_eq!(fallback, works);
    assert_eq!(
        fallback.works.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![1, 7]
    );
}

#[tokio::test]
async fn work_lookup_and_not_found() {
    let (status, work): (_, Work) = get("/works/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(work.title, "The Godfather");

    for uri in ["/works/404", "/works/abc"] {
        let (status, body): (_, ApiMessage) = get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, ApiMessage::new("Work not found"));
    }
}

#[tokio::test]
async fn work_listings() {
    let (_, all): (_, Vec<Work>) = get("/works").await;
    assert_eq!(all.len(), 9);

    let (_, films): (_, Vec<Work>) = get("/works/type/film").await;
    assert_eq!(films.iter().map(|w| w.id).collect::<Vec<_>>(), vec![3, 6, 9]);

    let (_, crime): (_, Vec<Work>) = get("/works/genre/Crime").await;
    assert_eq!(crime.len(), 2);

    let (_, dali): (_, Vec<Work>) = get("/works/creator/Salvador%20Dal%C3%AD").await;
    assert_eq!(dali.iter().map(|w| w.id).collect::<Vec<_>>(), vec![2]);

    let (_, none): (_, Vec<Work>) = get("/works/type/Sculpture").await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn health_reports_dataset_size() {
    let (status, body): (_, HealthResponse) = get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        HealthResponse {
            status: "ok".to_string(),
            persons: 12,
            works: 9,
        }
    );
}

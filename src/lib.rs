//! Ontograph search provider
//!
//! Serves persons and works over HTTP so the graph viewer can fetch entity
//! snapshots. The dataset is held in memory; filtering lives in [`search`],
//! routing in [`server`].

pub mod dataset;
pub mod search;
pub mod server;

pub use dataset::{Dataset, DatasetError, DATASET_ENV};
pub use server::{create_router, AppState};

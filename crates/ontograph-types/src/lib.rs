//! Shared Entity and API Types for Ontograph
//!
//! This crate is the SINGLE SOURCE OF TRUTH for all types crossing the HTTP boundary.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  Search Server   │  JSON   │  Graph Viewer    │
//! │  (Axum)          │ ◄─────► │  (egui)          │
//! └──────────────────┘         └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. All wire types live here - no inline struct definitions in handlers
//! 2. Works are a tagged enum on the `type` field
//! 3. Field names are camelCase on the wire

pub mod entity;
pub mod search;
pub mod status;

pub use entity::*;
pub use search::*;
pub use status::*;

//! REST API client module for the LinguaNote backend.
//!
//! This module provides the `ApiClient` for talking to the notebook
//! service: auth endpoints, vocabulary, flashcards, and the dashboard.
//!
//! The API uses JWT bearer token authentication; the client pulls its
//! credential from the shared `TokenStore` on every request.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;

//! # SaludContigo backend
//!
//! CRUD service for a clinic: administrators, doctors, patients and the
//! appointments, exams and clinical histories that link a patient to a
//! doctor.
//!
//! ## Architecture
//!
//! - [`models`]: record types, response labels and payload validation
//! - [`db`]: repository traits, the Postgres and in-memory backends, and the
//!   service layer
//! - [`http`]: axum router exposing everything under `/api`
//!
//! ## Features
//!
//! - `local-repo` (default): in-memory backend
//! - `postgres-repo`: PostgreSQL through Diesel with embedded migrations
//! - `http-server` (default): the REST API and the `saludcontigo-server` binary

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;

#[cfg(feature = "http-server")]
pub mod http;

#![deny(missing_docs)]

//! Core library for the docgen backend.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Plain-text extraction from PDF and DOCX files.
pub mod extraction;
/// Gemini text generation adapter.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;

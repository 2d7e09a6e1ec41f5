//! HTTP/REST API layer for salesdesk.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format and CORS
//! support, plus the static inquiry page.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;

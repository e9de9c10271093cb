//! HTTP handlers.
//!
//! Each module owns one route group and its request/response types.

pub mod auth_service;
pub mod health_service;
pub mod inspection_service;
pub mod scan_service;

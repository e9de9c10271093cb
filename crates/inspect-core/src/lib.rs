//! # inspect-core: Pure Logic for the Inspection Service
//!
//! This crate holds everything about product inspections that can be
//! computed without touching the outside world: reading product codes out of
//! scanner text, the domain types, and input validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Inspection Service Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web client (camera capture)                  │   │
//! │  │    Scan ──► Product form ──► 4 photos ──► Submit                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP + JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    inspect-api (axum)                           │   │
//! │  │    /api/scan, /api/auth/*, /api/inspection                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ inspect-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐ ┌───────────┐ ┌───────────┐ ┌────────────┐   │   │
//! │  │   │product_code │ │   types   │ │   photo   │ │ validation │   │   │
//! │  │   │ DataMatrix  │ │   User    │ │  base64   │ │   rules    │   │   │
//! │  │   │ label text  │ │Inspection │ │ 4 sides   │ │   checks   │   │   │
//! │  │   └─────────────┘ └───────────┘ └───────────┘ └────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  inspect-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`product_code`] - Product-name extraction from Data-Matrix and label text
//! - [`types`] - Domain types (User, Inspection, MirrorReceipt)
//! - [`photo`] - Four-direction photo set and base64 decoding
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use inspect_core::{parse_product_code, Symbology};
//!
//! let raw = "[)>\u{1E}06\u{1D}VSBH4\u{1D}P91958CU810PD\u{1D}SHB81\u{1D}EJW124052\u{1D}C020100007000000A2\u{1D}";
//! let code = parse_product_code(raw).unwrap();
//!
//! assert_eq!(code.as_str(), "91958CU810JW007");
//! assert_eq!(code.symbology(), Symbology::DataMatrix);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod photo;
pub mod product_code;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ParseError, ValidationError};
pub use photo::{decode_photo, InspectionPhotos, PhotoDirection};
pub use product_code::{diagnose_product_code, parse_product_code, ProductCode, Symbology};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name of the metadata file written into every mirror folder.
pub const INSPECTION_JSON_FILE: &str = "inspection-data.json";

/// Default mirror base folder, both on SharePoint and on disk.
pub const DEFAULT_MIRROR_FOLDER: &str = "InspectionData";

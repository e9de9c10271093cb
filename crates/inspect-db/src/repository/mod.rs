//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.inspections().list_for_user(&user_id)                      │
//! │       ▼                                                                 │
//! │  InspectionRepository                                                  │
//! │  ├── create / insert                                                   │
//! │  ├── list_for_user                                                     │
//! │  └── count_for_user                                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and credential lookup
//! - [`InspectionRepository`](inspection::InspectionRepository) - Inspection records

pub mod inspection;
pub mod user;

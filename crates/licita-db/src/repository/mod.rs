//! # Repository Module
//!
//! Database repository implementations for Licita.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RPC procedure                                                         │
//! │       │                                                                 │
//! │       │  db.documents().list_classified(owner, ReferenceInstant)        │
//! │       ▼                                                                 │
//! │  DocumentRepository                                                    │
//! │  ├── upload / get / update_expiration / delete   (owner-scoped SQL)    │
//! │  └── list_classified / expiring / summary        (SQL + classifier)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`DocumentRepository`](document::DocumentRepository) - Habilitation documents

pub mod document;

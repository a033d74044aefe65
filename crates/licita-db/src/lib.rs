//! # licita-db: Database Layer for Licita
//!
//! Stores habilitation documents in SQLite and hands out listings that are
//! classified at read time by `licita-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Licita Data Flow                                 │
//! │                                                                         │
//! │  RPC procedure (listDocuments)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     licita-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (document.rs) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ DocumentRepo  │    │ 001_docs.sql │  │   │
//! │  │   │ AppConfig     │    │ ReferenceInst │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ classify_batch                │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │                    licita-core::documents (pure)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Environment-driven application configuration
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Document repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use licita_db::{Database, DbConfig, ReferenceInstant};
//!
//! let db = Database::new(DbConfig::new("./licita.db")).await?;
//!
//! let listing = db
//!     .documents()
//!     .list_classified("user-42", ReferenceInstant::capture())
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::document::{DocumentRepository, ReferenceInstant};

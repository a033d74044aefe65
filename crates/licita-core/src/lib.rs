//! # licita-core: Pricing & Document Lifecycle Engine
//!
//! Pure business logic for the tender-management platform (Lei 14.133/2021
//! compliance). Every function is deterministic with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Licita Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Front end (React) / RPC procedures                  │   │
//! │  │  calculateProductPrice, calculateBDI, listDocuments, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ licita-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │    bdi    │  │ documents │  │ proposal  │  │   │
//! │  │   │ waterfall │  │ cost-plus │  │ classifier│  │  totals   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │          money • types • validation • error                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  licita-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` with stage-wise rounding to centavos
//! - [`types`] - `Percentage`, tax regime, freight mode, document enums
//! - [`pricing`] - Product pricing waterfall
//! - [`bdi`] - Cost-plus (BDI) pricing for services and works
//! - [`documents`] - Document expiration classifier
//! - [`proposal`] - Commercial proposal totals
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, byte-identical output
//! 2. **No I/O**: not even the wall clock; callers pass the reference instant
//! 3. **Decimal Money**: no binary floating point anywhere in the arithmetic
//! 4. **Explicit Errors**: typed, with a reason code per violated constraint
//!
//! ## Example Usage
//!
//! ```rust
//! use licita_core::pricing::{price_product, Freight, ProductPricingInput};
//! use licita_core::types::{Percentage, TaxRegime};
//! use licita_core::Money;
//! use rust_decimal::Decimal;
//!
//! let input = ProductPricingInput {
//!     product_name: "Papel A4".to_string(),
//!     unit_cost: Decimal::from(100),
//!     quantity: Decimal::from(2),
//!     profit_margin: Percentage::new("profitMarginPct", Decimal::from(20)).unwrap(),
//!     tax_regime: TaxRegime::LucroPresumido,
//!     tax: Percentage::new("taxPct", Decimal::from(10)).unwrap(),
//!     freight: Freight::Percentage {
//!         rate: Percentage::new("freightValue", Decimal::from(5)).unwrap(),
//!     },
//! };
//!
//! let breakdown = price_product(&input).unwrap();
//! assert_eq!(breakdown.unit_price, Money::from_cents(13860));
//! assert_eq!(breakdown.total_price, Money::from_cents(27720));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bdi;
pub mod documents;
pub mod error;
pub mod money;
pub mod pricing;
pub mod proposal;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

use rust_decimal::Decimal;

/// Maximum length of product, service, client and item names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Largest accepted monetary input (R$ 1 trillion).
///
/// ## Why a ceiling?
/// Monetary inputs, quantities and weights are multiplied together along
/// the waterfalls. Bounding each factor keeps every intermediate product far
/// inside `Decimal`'s 28-digit range, so arithmetic never overflows.
pub const MAX_MONEY_INPUT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Largest accepted quantity or weight (one million units).
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Maximum number of items on one commercial proposal.
pub const MAX_PROPOSAL_ITEMS: usize = 500;

/// Validity applied to an uploaded document without an expiration date.
pub const DEFAULT_DOCUMENT_VALIDITY_DAYS: i64 = 180;

/// Longest default document validity accepted (ten years).
pub const MAX_DOCUMENT_VALIDITY_DAYS: i64 = 3650;

/// Validity of a commercial proposal when the caller does not set one.
pub const DEFAULT_PROPOSAL_VALIDITY_DAYS: u32 = 30;

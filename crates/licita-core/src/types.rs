//! # Domain Types
//!
//! Shared value types used by the calculators and the classifier.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Percentage    │   │   TaxRegime     │   │  FreightMode    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Decimal [0,100]│   │  SimplesNacional│   │  Percentage     │       │
//! │  │  12.5 = 12.5%   │   │  LucroPresumido │   │  PerWeight      │       │
//! │  └─────────────────┘   │  LucroReal      │   │  Fixed          │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  DocumentType   │   │ DocumentStatus  │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  cnpj, fgts,    │   │  Valid  (> 90d) │                             │
//! │  │  inss, dre, ... │   │  Warning(31-90) │                             │
//! │  └─────────────────┘   │  Critical(0-30) │                             │
//! │                        │  Expired (< 0)  │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage in `[0, 100]`, e.g. `12.5` for 12.5%.
///
/// Only constructible through [`Percentage::new`], so every value in
/// circulation has been range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Upper bound (inclusive). No rule currently allows exceeding it.
    pub const MAX: Decimal = Decimal::ONE_HUNDRED;

    /// Validates `value` for `field` and wraps it.
    ///
    /// ## Example
    /// ```rust
    /// use licita_core::types::Percentage;
    /// use rust_decimal::Decimal;
    ///
    /// assert!(Percentage::new("taxPct", Decimal::from(15)).is_ok());
    /// assert!(Percentage::new("taxPct", Decimal::from(101)).is_err());
    /// assert!(Percentage::new("taxPct", Decimal::from(-1)).is_err());
    /// ```
    pub fn new(field: &str, value: Decimal) -> ValidationResult<Self> {
        if value < Decimal::ZERO || value > Self::MAX {
            return Err(ValidationError::PercentageOutOfRange {
                field: field.to_string(),
                value,
            });
        }
        Ok(Percentage(value))
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// Returns the raw percentage value (`12.5` for 12.5%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// `base * value / 100`, unrounded.
    #[inline]
    pub fn of(&self, base: Decimal) -> Decimal {
        base * self.0 / Decimal::ONE_HUNDRED
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

// =============================================================================
// Tax Regime
// =============================================================================

/// Brazilian corporate tax regime of the bidding company.
///
/// Carried for display and record purposes only: the effective tax rate is
/// always the caller-supplied percentage, whatever the regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    SimplesNacional,
    LucroPresumido,
    LucroReal,
}

impl TaxRegime {
    /// Human-readable label (pt-BR).
    pub fn label(&self) -> &'static str {
        match self {
            TaxRegime::SimplesNacional => "Simples Nacional",
            TaxRegime::LucroPresumido => "Lucro Presumido",
            TaxRegime::LucroReal => "Lucro Real",
        }
    }
}

// =============================================================================
// Freight Mode
// =============================================================================

/// How freight is charged on the product waterfall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FreightMode {
    /// Percentage of the cost with tax.
    Percentage,
    /// Rate per unit of weight (R$/kg).
    PerWeight,
    /// Flat amount per unit.
    Fixed,
}

// =============================================================================
// Document Type
// =============================================================================

/// Habilitation document categories tracked for a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Cnpj,
    CertidaoJudicial,
    CertidaoNegativaFederal,
    CertidaoNegativaEstadual,
    Fgts,
    Inss,
    JusticaTrabalho,
    BalancoPatrimonial,
    Dre,
    AtestadoTecnico,
    /// Anything not covered above; unknown tags from clients land here.
    #[serde(other)]
    Outro,
}

impl DocumentType {
    /// All document types in display order.
    pub const ALL: [DocumentType; 11] = [
        DocumentType::Cnpj,
        DocumentType::CertidaoJudicial,
        DocumentType::CertidaoNegativaFederal,
        DocumentType::CertidaoNegativaEstadual,
        DocumentType::Fgts,
        DocumentType::Inss,
        DocumentType::JusticaTrabalho,
        DocumentType::BalancoPatrimonial,
        DocumentType::Dre,
        DocumentType::AtestadoTecnico,
        DocumentType::Outro,
    ];

    /// Human-readable label (pt-BR).
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Cnpj => "CNPJ",
            DocumentType::CertidaoJudicial => "Certidão Judicial",
            DocumentType::CertidaoNegativaFederal => "Certidão Negativa Federal",
            DocumentType::CertidaoNegativaEstadual => "Certidão Negativa Estadual",
            DocumentType::Fgts => "FGTS",
            DocumentType::Inss => "INSS",
            DocumentType::JusticaTrabalho => "Justiça do Trabalho",
            DocumentType::BalancoPatrimonial => "Balanço Patrimonial",
            DocumentType::Dre => "DRE",
            DocumentType::AtestadoTecnico => "Atestado Técnico",
            DocumentType::Outro => "Outro",
        }
    }
}

// =============================================================================
// Document Status
// =============================================================================

/// Lifecycle status derived from days until expiration.
///
/// Never stored: recomputed on every read from the expiration date and the
/// reference instant of the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// More than 90 days left.
    Valid,
    /// 31 to 90 days left.
    Warning,
    /// 0 to 30 days left.
    Critical,
    /// Past its expiration.
    Expired,
}

impl DocumentStatus {
    /// Last day count (inclusive) still classified as critical.
    pub const CRITICAL_MAX_DAYS: i64 = 30;
    /// Last day count (inclusive) still classified as warning.
    pub const WARNING_MAX_DAYS: i64 = 90;

    /// Maps a day count to a status. First match wins:
    /// `< 0` expired, `<= 30` critical, `<= 90` warning, else valid.
    pub fn from_days(days_until_expiration: i64) -> Self {
        if days_until_expiration < 0 {
            DocumentStatus::Expired
        } else if days_until_expiration <= Self::CRITICAL_MAX_DAYS {
            DocumentStatus::Critical
        } else if days_until_expiration <= Self::WARNING_MAX_DAYS {
            DocumentStatus::Warning
        } else {
            DocumentStatus::Valid
        }
    }

    /// Whether the dashboard surfaces this document as an alert.
    #[inline]
    pub fn needs_alert(&self) -> bool {
        matches!(self, DocumentStatus::Critical | DocumentStatus::Expired)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Proposal Module
//!
//! Totals of a commercial proposal sent to a contracting agency.
//!
//! ```text
//! item ──► line total = round(quantity × unit price)
//!            │
//!            └─► subtotal = Σ line totals
//!                   ├─► tax   = round(subtotal × company tax% / 100)
//!                   └─► total = subtotal + tax
//! ```
//!
//! The tax rate is the company's, not the request's: callers look it up in
//! the company profile and pass it in. Rendering the proposal document is
//! somebody else's job.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Percentage;
use crate::validation::{validate_cnpj, validate_name, validate_positive_bounded, ValidationResult};
use crate::{DEFAULT_PROPOSAL_VALIDITY_DAYS, MAX_MONEY_INPUT, MAX_PROPOSAL_ITEMS, MAX_QUANTITY};

// =============================================================================
// Request
// =============================================================================

fn default_unit() -> String {
    "un".to_string()
}

fn default_validity_days() -> u32 {
    DEFAULT_PROPOSAL_VALIDITY_DAYS
}

fn default_payment_terms() -> String {
    "A combinar".to_string()
}

/// One line of a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProposalItem {
    pub description: String,
    #[ts(type = "number")]
    pub quantity: Decimal,
    #[ts(type = "number")]
    pub unit_price: Decimal,
    #[serde(default = "default_unit")]
    pub unit: String,
}

/// `createProposal` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    pub proposal_number: String,
    pub client_name: String,
    #[serde(default, alias = "clientCNPJ")]
    pub client_cnpj: Option<String>,
    pub items: Vec<ProposalItem>,
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    #[serde(default = "default_payment_terms")]
    pub payment_terms: String,
}

impl ProposalRequest {
    /// Checks the header fields and every item.
    ///
    /// Returns the normalized client CNPJ, if one was given.
    pub fn validate(&self) -> ValidationResult<Option<String>> {
        validate_name("proposalNumber", &self.proposal_number)?;
        validate_name("clientName", &self.client_name)?;

        let cnpj = match self.client_cnpj.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(validate_cnpj(raw)?),
            _ => None,
        };

        if self.items.is_empty() {
            return Err(ValidationError::TooFewItems {
                field: "items".to_string(),
                min: 1,
            });
        }
        if self.items.len() > MAX_PROPOSAL_ITEMS {
            return Err(ValidationError::TooManyItems {
                field: "items".to_string(),
                max: MAX_PROPOSAL_ITEMS,
            });
        }

        for (i, item) in self.items.iter().enumerate() {
            validate_name(&format!("items[{i}].description"), &item.description)?;
            validate_positive_bounded(
                &format!("items[{i}].quantity"),
                item.quantity,
                MAX_QUANTITY,
            )?;
            validate_positive_bounded(
                &format!("items[{i}].unitPrice"),
                item.unit_price,
                MAX_MONEY_INPUT,
            )?;
        }

        if self.validity_days == 0 {
            return Err(ValidationError::MustBePositive {
                field: "validityDays".to_string(),
            });
        }

        Ok(cnpj)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// A priced proposal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProposalLine {
    pub description: String,
    pub unit: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[ts(type = "number")]
    pub quantity: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[ts(type = "number")]
    pub unit_price: Decimal,
    #[ts(type = "number")]
    pub line_total: Money,
}

/// Result of [`compute_proposal_totals`].
///
/// ## Invariants
/// - `subtotal == Σ lines[i].line_total`
/// - `total == subtotal + tax`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProposalTotals {
    pub lines: Vec<ProposalLine>,
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax_pct: Percentage,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub total: Money,
}

/// Validates a proposal and computes its totals.
///
/// ## Example
/// ```rust
/// use licita_core::proposal::{compute_proposal_totals, ProposalItem, ProposalRequest};
/// use licita_core::{Money, Percentage};
/// use rust_decimal::Decimal;
///
/// let request = ProposalRequest {
///     proposal_number: "PROP-2025-001".to_string(),
///     client_name: "Prefeitura de Campinas".to_string(),
///     client_cnpj: None,
///     items: vec![ProposalItem {
///         description: "Resma de papel A4".to_string(),
///         quantity: Decimal::from(10),
///         unit_price: Decimal::new(2590, 2),
///         unit: "cx".to_string(),
///     }],
///     validity_days: 30,
///     payment_terms: "30 dias".to_string(),
/// };
///
/// let tax = Percentage::new("taxPercentage", Decimal::from(6)).unwrap();
/// let totals = compute_proposal_totals(&request, tax).unwrap();
/// assert_eq!(totals.subtotal, Money::from_cents(25900));
/// assert_eq!(totals.tax, Money::from_cents(1554));
/// assert_eq!(totals.total, Money::from_cents(27454));
/// ```
pub fn compute_proposal_totals(
    request: &ProposalRequest,
    company_tax_pct: Percentage,
) -> CoreResult<ProposalTotals> {
    request.validate()?;

    let lines: Vec<ProposalLine> = request
        .items
        .iter()
        .map(|item| ProposalLine {
            description: item.description.trim().to_string(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: Money::from_decimal(item.quantity * item.unit_price),
        })
        .collect();

    let subtotal: Money = lines.iter().map(|line| line.line_total).sum();
    let tax = subtotal.percent(company_tax_pct);

    Ok(ProposalTotals {
        lines,
        subtotal,
        tax_pct: company_tax_pct,
        tax,
        total: subtotal + tax,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

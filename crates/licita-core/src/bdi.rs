//! # BDI (Cost-Plus) Module
//!
//! Pricing for services and public works: direct costs, then the BDI layer
//! (Benefícios e Despesas Indiretas = overhead + profit), then tax.
//!
//! ## How BDI Differs From the Product Waterfall
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total direct cost = other + labor + equipment + material              │
//! │          │                                                              │
//! │          ├──► overhead = total direct × overhead%   ┐ both against the │
//! │          └──► profit   = total direct × profit%     ┘ SAME base        │
//! │                                                                         │
//! │  bdi           = overhead + profit                                      │
//! │  cost with BDI = total direct + bdi                                     │
//! │  tax           = cost with BDI × tax%   ◄── tax IS cascaded             │
//! │  final price   = cost with BDI + tax                                    │
//! │                                                                         │
//! │  bdi% (diagnostic only) = bdi / total direct × 100                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Percentage;
use crate::validation::{
    validate_name, validate_non_negative_bounded, validate_positive_bounded, ValidationResult,
};
use crate::MAX_MONEY_INPUT;

// =============================================================================
// Typed Input
// =============================================================================

/// Fully typed input of [`price_bdi`].
#[derive(Debug, Clone, PartialEq)]
pub struct BdiInput {
    pub service_name: String,
    /// Direct cost not covered by the labor/equipment/material buckets.
    pub direct_cost: Decimal,
    pub labor_cost: Decimal,
    pub equipment_cost: Decimal,
    pub material_cost: Decimal,
    pub overhead: Percentage,
    pub profit: Percentage,
    pub tax: Percentage,
}

// =============================================================================
// Wire Request
// =============================================================================

/// `calculateBDI` request as sent by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BdiRequest {
    pub service_name: String,
    #[ts(type = "number")]
    pub direct_cost: Decimal,
    #[serde(default)]
    #[ts(type = "number")]
    pub labor_cost: Decimal,
    #[serde(default)]
    #[ts(type = "number")]
    pub equipment_cost: Decimal,
    #[serde(default)]
    #[ts(type = "number")]
    pub material_cost: Decimal,
    #[serde(alias = "overheadPercentage")]
    #[ts(type = "number")]
    pub overhead_pct: Decimal,
    #[serde(alias = "profitPercentage", alias = "profitMarcentage")]
    #[ts(type = "number")]
    pub profit_pct: Decimal,
    #[serde(alias = "taxPercentage")]
    #[ts(type = "number")]
    pub tax_pct: Decimal,
}

impl BdiRequest {
    /// Validates every field and produces the typed input.
    pub fn validate(&self) -> ValidationResult<BdiInput> {
        let input = BdiInput {
            service_name: validate_name("serviceName", &self.service_name)?,
            direct_cost: self.direct_cost,
            labor_cost: self.labor_cost,
            equipment_cost: self.equipment_cost,
            material_cost: self.material_cost,
            overhead: Percentage::new("overheadPct", self.overhead_pct)?,
            profit: Percentage::new("profitPct", self.profit_pct)?,
            tax: Percentage::new("taxPct", self.tax_pct)?,
        };
        validate_input(&input)?;
        Ok(input)
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// Direct cost buckets, as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DirectCosts {
    #[ts(type = "number")]
    pub labor: Money,
    #[ts(type = "number")]
    pub equipment: Money,
    #[ts(type = "number")]
    pub material: Money,
    #[ts(type = "number")]
    pub other: Money,
    #[ts(type = "number")]
    pub total: Money,
}

/// The BDI layer, as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IndirectCosts {
    #[ts(type = "number")]
    pub overhead: Money,
    #[ts(type = "number")]
    pub profit: Money,
    #[ts(type = "number")]
    pub total: Money,
}

/// Compact view of where the final price comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BdiComponents {
    #[ts(type = "number")]
    pub direct_cost: Money,
    #[ts(type = "number")]
    pub overhead: Money,
    #[ts(type = "number")]
    pub profit: Money,
    #[ts(type = "number")]
    pub tax: Money,
}

/// Result of [`price_bdi`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BdiBreakdown {
    pub service_name: String,
    #[ts(type = "number")]
    pub total_direct_cost: Money,
    #[ts(type = "number")]
    pub overhead_amount: Money,
    #[ts(type = "number")]
    pub profit_amount: Money,
    #[ts(type = "number")]
    pub bdi_amount: Money,
    /// `bdi / total direct × 100`, two decimals. Never fed back into the price.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub bdi_percentage_reported: Decimal,
    /// Same value under the key existing clients read.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub bdi_percentage: Decimal,
    #[serde(rename = "costWithBDI")]
    #[ts(type = "number")]
    pub cost_with_bdi: Money,
    #[ts(type = "number")]
    pub tax_amount: Money,
    #[ts(type = "number")]
    pub final_price: Money,
    pub direct_costs: DirectCosts,
    pub indirect_costs: IndirectCosts,
    pub breakdown: BdiComponents,
}

// =============================================================================
// Operations
// =============================================================================

/// `calculateBDI`: validates the wire request, then prices it.
pub fn calculate_bdi(request: &BdiRequest) -> CoreResult<BdiBreakdown> {
    let input = request.validate()?;
    price_bdi(&input)
}

/// Runs the cost-plus calculation.
///
/// ## Errors
/// - `CoreError::Validation` for out-of-range input
/// - `CoreError::Precondition` when the total direct cost rounds to zero
///   (e.g. a direct cost of 0.001), which would divide by zero in the
///   reported BDI percentage
///
/// ## Example
/// ```rust
/// use licita_core::bdi::{price_bdi, BdiInput};
/// use licita_core::types::Percentage;
/// use licita_core::Money;
/// use rust_decimal::Decimal;
///
/// let pct = |v: i64| Percentage::new("pct", Decimal::from(v)).unwrap();
/// let input = BdiInput {
///     service_name: "Manutenção predial".to_string(),
///     direct_cost: Decimal::from(1000),
///     labor_cost: Decimal::ZERO,
///     equipment_cost: Decimal::ZERO,
///     material_cost: Decimal::ZERO,
///     overhead: pct(20),
///     profit: pct(15),
///     tax: pct(15),
/// };
///
/// let result = price_bdi(&input).unwrap();
/// assert_eq!(result.final_price, Money::from_cents(155250));
/// ```
pub fn price_bdi(input: &BdiInput) -> CoreResult<BdiBreakdown> {
    validate_input(input)?;

    let other = Money::from_decimal(input.direct_cost);
    let labor = Money::from_decimal(input.labor_cost);
    let equipment = Money::from_decimal(input.equipment_cost);
    let material = Money::from_decimal(input.material_cost);

    let total_direct_cost = Money::from_decimal(
        input.direct_cost + input.labor_cost + input.equipment_cost + input.material_cost,
    );
    if !total_direct_cost.is_positive() {
        return Err(CoreError::Precondition {
            reason: format!(
                "total direct cost must be greater than 0, got {}",
                total_direct_cost.amount()
            ),
        });
    }

    let overhead_amount = total_direct_cost.percent(input.overhead);
    let profit_amount = total_direct_cost.percent(input.profit);
    let bdi_amount = overhead_amount + profit_amount;

    let cost_with_bdi = total_direct_cost + bdi_amount;
    let tax_amount = cost_with_bdi.percent(input.tax);
    let final_price = cost_with_bdi + tax_amount;

    let bdi_percentage_reported =
        Money::from_decimal(bdi_amount.amount() / total_direct_cost.amount() * Decimal::ONE_HUNDRED)
            .amount();

    Ok(BdiBreakdown {
        service_name: input.service_name.clone(),
        total_direct_cost,
        overhead_amount,
        profit_amount,
        bdi_amount,
        bdi_percentage_reported,
        bdi_percentage: bdi_percentage_reported,
        cost_with_bdi,
        tax_amount,
        final_price,
        direct_costs: DirectCosts {
            labor,
            equipment,
            material,
            other,
            total: total_direct_cost,
        },
        indirect_costs: IndirectCosts {
            overhead: overhead_amount,
            profit: profit_amount,
            total: bdi_amount,
        },
        breakdown: BdiComponents {
            direct_cost: total_direct_cost,
            overhead: overhead_amount,
            profit: profit_amount,
            tax: tax_amount,
        },
    })
}

fn validate_input(input: &BdiInput) -> ValidationResult<()> {
    validate_name("serviceName", &input.service_name)?;
    validate_positive_bounded("directCost", input.direct_cost, MAX_MONEY_INPUT)?;
    validate_non_negative_bounded("laborCost", input.labor_cost, MAX_MONEY_INPUT)?;
    validate_non_negative_bounded("equipmentCost", input.equipment_cost, MAX_MONEY_INPUT)?;
    validate_non_negative_bounded("materialCost", input.material_cost, MAX_MONEY_INPUT)
}

// =============================================================================
// Unit Tests
// =============================================================================

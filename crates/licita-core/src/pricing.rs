//! # Product Pricing Module
//!
//! Cost → tax → freight → margin waterfall for a sellable unit.
//!
//! ## The Waterfall
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every arrow produces a Money, i.e. a value rounded to centavos.        │
//! │  Later stages consume the ROUNDED earlier stage.                        │
//! │                                                                         │
//! │  unit cost ─┬─► tax = cost × tax%                                      │
//! │             └─► cost with tax = cost + tax                             │
//! │                      │                                                  │
//! │                      ├─► freight (percentage | per weight | fixed)     │
//! │                      └─► cost with freight = cost with tax + freight   │
//! │                               │                                         │
//! │                               ├─► profit = cost with freight × margin% │
//! │                               └─► unit price = cost w/ freight + profit│
//! │                                        │                                │
//! │                                        └─► total = unit price × qty    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tax regime is echoed in the breakdown but never changes the
//! arithmetic: the effective tax rate is always the caller-supplied `taxPct`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{FreightMode, Percentage, TaxRegime};
use crate::validation::{
    validate_name, validate_non_negative_bounded, validate_positive_bounded, ValidationResult,
};
use crate::{MAX_MONEY_INPUT, MAX_QUANTITY};

// =============================================================================
// Freight
// =============================================================================

/// Freight charged on one unit, each mode carrying its own named value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freight {
    /// Percentage of the cost with tax.
    Percentage { rate: Percentage },
    /// `weight × rate_per_unit` (R$/kg).
    PerWeight { rate_per_unit: Decimal, weight: Decimal },
    /// Flat amount.
    Fixed { amount: Decimal },
}

impl Freight {
    /// The wire mode tag for this freight.
    pub fn mode(&self) -> FreightMode {
        match self {
            Freight::Percentage { .. } => FreightMode::Percentage,
            Freight::PerWeight { .. } => FreightMode::PerWeight,
            Freight::Fixed { .. } => FreightMode::Fixed,
        }
    }

    /// Freight amount for a unit whose cost with tax is `cost_with_tax`.
    pub fn amount(&self, cost_with_tax: Money) -> Money {
        match *self {
            Freight::Percentage { rate } => cost_with_tax.percent(rate),
            Freight::PerWeight {
                rate_per_unit,
                weight,
            } => Money::from_decimal(weight * rate_per_unit),
            Freight::Fixed { amount } => Money::from_decimal(amount),
        }
    }

    fn validate(&self) -> ValidationResult<()> {
        match *self {
            Freight::Percentage { .. } => Ok(()),
            Freight::PerWeight {
                rate_per_unit,
                weight,
            } => {
                validate_non_negative_bounded("freightValue", rate_per_unit, MAX_MONEY_INPUT)?;
                validate_non_negative_bounded("weight", weight, MAX_QUANTITY)
            }
            Freight::Fixed { amount } => {
                validate_non_negative_bounded("freightValue", amount, MAX_MONEY_INPUT)
            }
        }
    }
}

// =============================================================================
// Typed Input
// =============================================================================

/// Fully typed input of [`price_product`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPricingInput {
    pub product_name: String,
    pub unit_cost: Decimal,
    pub quantity: Decimal,
    pub profit_margin: Percentage,
    pub tax_regime: TaxRegime,
    pub tax: Percentage,
    pub freight: Freight,
}

// =============================================================================
// Wire Request
// =============================================================================

/// `calculateProductPrice` request as sent by the front end.
///
/// ## The `freightValue` Overload
/// On the wire `freightValue` means a percentage, a rate per kg or a flat
/// amount depending on `freightMode`. [`PricingRequest::freight`] resolves
/// it into a [`Freight`] variant. Fields irrelevant to the selected mode are
/// accepted and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub product_name: String,
    #[ts(type = "number")]
    pub unit_cost: Decimal,
    #[ts(type = "number")]
    pub quantity: Decimal,
    #[serde(alias = "profitMargin")]
    #[ts(type = "number")]
    pub profit_margin_pct: Decimal,
    pub tax_regime: TaxRegime,
    #[serde(alias = "taxPercentage")]
    #[ts(type = "number")]
    pub tax_pct: Decimal,
    #[serde(alias = "freightType")]
    pub freight_mode: FreightMode,
    #[serde(default)]
    #[ts(type = "number")]
    pub freight_value: Decimal,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub weight: Option<Decimal>,
    /// Legacy percentage field; wins over `freightValue` in percentage mode.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub freight_percentage: Option<Decimal>,
}

impl PricingRequest {
    /// Resolves the flat freight fields into a [`Freight`] variant.
    ///
    /// A missing weight in per-weight mode is zero weight (zero freight),
    /// not an error.
    pub fn freight(&self) -> ValidationResult<Freight> {
        match self.freight_mode {
            FreightMode::Percentage => {
                let (field, value) = match self.freight_percentage {
                    Some(pct) => ("freightPercentage", pct),
                    None => ("freightValue", self.freight_value),
                };
                Ok(Freight::Percentage {
                    rate: Percentage::new(field, value)?,
                })
            }
            FreightMode::PerWeight => Ok(Freight::PerWeight {
                rate_per_unit: self.freight_value,
                weight: self.weight.unwrap_or(Decimal::ZERO),
            }),
            FreightMode::Fixed => Ok(Freight::Fixed {
                amount: self.freight_value,
            }),
        }
    }

    /// Validates every field and produces the typed input.
    ///
    /// Freight fields are range-checked whatever the mode; the ones the mode
    /// doesn't use are then ignored.
    pub fn validate(&self) -> ValidationResult<ProductPricingInput> {
        validate_non_negative_bounded("freightValue", self.freight_value, MAX_MONEY_INPUT)?;
        if let Some(weight) = self.weight {
            validate_non_negative_bounded("weight", weight, MAX_QUANTITY)?;
        }
        if let Some(pct) = self.freight_percentage {
            Percentage::new("freightPercentage", pct)?;
        }

        let input = ProductPricingInput {
            product_name: validate_name("productName", &self.product_name)?,
            unit_cost: self.unit_cost,
            quantity: self.quantity,
            profit_margin: Percentage::new("profitMarginPct", self.profit_margin_pct)?,
            tax_regime: self.tax_regime,
            tax: Percentage::new("taxPct", self.tax_pct)?,
            freight: self.freight()?,
        };
        validate_input(&input)?;
        Ok(input)
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// Compact view of where the unit price comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceComponents {
    #[ts(type = "number")]
    pub unit_cost: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub freight: Money,
    #[ts(type = "number")]
    pub profit: Money,
}

/// Result of [`price_product`].
///
/// ## Invariants
/// - `unit_price == cost_with_freight + profit_amount`
/// - `unit_price == unit_cost + tax_amount + freight_amount + profit_amount`,
///   up to one centavo when `unit_cost` itself had sub-centavo digits
/// - `total_price == unit_price × quantity`, rounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub product_name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[ts(type = "number")]
    pub quantity: Decimal,
    pub tax_regime: TaxRegime,
    pub freight_mode: FreightMode,
    #[ts(type = "number")]
    pub tax_pct: Percentage,
    #[ts(type = "number")]
    pub profit_margin_pct: Percentage,
    #[ts(type = "number")]
    pub unit_cost: Money,
    #[ts(type = "number")]
    pub tax_amount: Money,
    #[ts(type = "number")]
    pub cost_with_tax: Money,
    #[ts(type = "number")]
    pub freight_amount: Money,
    #[ts(type = "number")]
    pub cost_with_freight: Money,
    #[ts(type = "number")]
    pub profit_amount: Money,
    #[ts(type = "number")]
    pub unit_price: Money,
    #[ts(type = "number")]
    pub total_price: Money,
    pub breakdown: PriceComponents,
}

// =============================================================================
// Operations
// =============================================================================

/// `calculateProductPrice`: validates the wire request, then prices it.
///
/// ## Errors
/// `CoreError::Validation` naming the first violated constraint; nothing is
/// computed for an invalid request.
pub fn calculate_product_price(request: &PricingRequest) -> CoreResult<PricingBreakdown> {
    let input = request.validate()?;
    price_product(&input)
}

/// Runs the pricing waterfall.
///
/// ## Example
/// ```rust
/// use licita_core::pricing::{price_product, Freight, ProductPricingInput};
/// use licita_core::types::{Percentage, TaxRegime};
/// use licita_core::Money;
/// use rust_decimal::Decimal;
///
/// let input = ProductPricingInput {
///     product_name: "Luva nitrílica".to_string(),
///     unit_cost: Decimal::from(100),
///     quantity: Decimal::from(2),
///     profit_margin: Percentage::new("profitMarginPct", Decimal::from(20)).unwrap(),
///     tax_regime: TaxRegime::SimplesNacional,
///     tax: Percentage::new("taxPct", Decimal::from(10)).unwrap(),
///     freight: Freight::PerWeight { rate_per_unit: Decimal::from(2), weight: Decimal::from(10) },
/// };
///
/// let result = price_product(&input).unwrap();
/// assert_eq!(result.freight_amount, Money::from_cents(2000));
/// assert_eq!(result.unit_price, Money::from_cents(15600));
/// ```
pub fn price_product(input: &ProductPricingInput) -> CoreResult<PricingBreakdown> {
    validate_input(input)?;

    let tax_amount = Money::from_decimal(input.tax.of(input.unit_cost));
    let cost_with_tax = Money::from_decimal(input.unit_cost + tax_amount.amount());

    let freight_amount = input.freight.amount(cost_with_tax);
    let cost_with_freight = cost_with_tax + freight_amount;

    let profit_amount = cost_with_freight.percent(input.profit_margin);
    let unit_price = cost_with_freight + profit_amount;

    let total_price = unit_price.times(input.quantity);
    let unit_cost = Money::from_decimal(input.unit_cost);

    Ok(PricingBreakdown {
        product_name: input.product_name.clone(),
        quantity: input.quantity,
        tax_regime: input.tax_regime,
        freight_mode: input.freight.mode(),
        tax_pct: input.tax,
        profit_margin_pct: input.profit_margin,
        unit_cost,
        tax_amount,
        cost_with_tax,
        freight_amount,
        cost_with_freight,
        profit_amount,
        unit_price,
        total_price,
        breakdown: PriceComponents {
            unit_cost,
            tax: tax_amount,
            freight: freight_amount,
            profit: profit_amount,
        },
    })
}

fn validate_input(input: &ProductPricingInput) -> ValidationResult<()> {
    validate_name("productName", &input.product_name)?;
    validate_positive_bounded("unitCost", input.unit_cost, MAX_MONEY_INPUT)?;
    validate_positive_bounded("quantity", input.quantity, MAX_QUANTITY)?;
    input.freight.validate()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn request(mode: FreightMode) -> PricingRequest {
        PricingRequest {
            product_name: "Resma papel A4".to_string(),
            unit_cost: dec("100"),
            quantity: dec("2"),
            profit_margin_pct: dec("20"),
            tax_regime: TaxRegime::LucroPresumido,
            tax_pct: dec("10"),
            freight_mode: mode,
            freight_value: dec("5"),
            weight: None,
            freight_percentage: None,
        }
    }

    #[test]
    fn test_percentage_freight_reference_values() {
        let result = calculate_product_price(&request(FreightMode::Percentage)).unwrap();

        assert_eq!(result.tax_amount, Money::from_cents(1000));
        assert_eq!(result.cost_with_tax, Money::from_cents(11000));
        assert_eq!(result.freight_amount, Money::from_cents(550));
        assert_eq!(result.cost_with_freight, Money::from_cents(11550));
        assert_eq!(result.profit_amount, Money::from_cents(2310));
        assert_eq!(result.unit_price, Money::from_cents(13860));
        assert_eq!(result.total_price, Money::from_cents(27720));
    }

    #[test]
    fn test_per_weight_freight_reference_values() {
        let mut req = request(FreightMode::PerWeight);
        req.weight = Some(dec("10"));
        req.freight_value = dec("2");

        let result = calculate_product_price(&req).unwrap();

        assert_eq!(result.freight_amount, Money::from_cents(2000));
        assert_eq!(result.cost_with_freight, Money::from_cents(13000));
        assert_eq!(result.profit_amount, Money::from_cents(2600));
        assert_eq!(result.unit_price, Money::from_cents(15600));
        assert_eq!(result.total_price, Money::from_cents(31200));
    }

    #[test]
    fn test_fixed_freight() {
        let mut req = request(FreightMode::Fixed);
        req.freight_value = dec("7.25");
        req.weight = Some(dec("999")); // ignored

        let result = calculate_product_price(&req).unwrap();
        assert_eq!(result.freight_amount, Money::from_cents(725));
        assert_eq!(result.freight_mode, FreightMode::Fixed);
    }

    #[test]
    fn test_per_weight_without_weight_is_zero_freight() {
        let mut req = request(FreightMode::PerWeight);
        req.freight_value = dec("3");

        let result = calculate_product_price(&req).unwrap();
        assert!(result.freight_amount.is_zero());

        req.weight = Some(Decimal::ZERO);
        let result = calculate_product_price(&req).unwrap();
        assert!(result.freight_amount.is_zero());
    }

    #[test]
    fn test_legacy_freight_percentage_wins_in_percentage_mode() {
        let mut req = request(FreightMode::Percentage);
        req.freight_percentage = Some(dec("10"));

        let result = calculate_product_price(&req).unwrap();
        assert_eq!(result.freight_amount, Money::from_cents(1100));
    }

    #[test]
    fn test_stage_wise_rounding() {
        // 33.33 × 7.5% = 2.49975 → 2.50; 35.83 × 3% = 1.0749 → 1.07
        // 36.90 × 12.5% = 4.6125 → 4.61; unit 41.51
        let req = PricingRequest {
            unit_cost: dec("33.33"),
            tax_pct: dec("7.5"),
            freight_value: dec("3"),
            profit_margin_pct: dec("12.5"),
            quantity: dec("3"),
            ..request(FreightMode::Percentage)
        };

        let result = calculate_product_price(&req).unwrap();
        assert_eq!(result.tax_amount, Money::from_cents(250));
        assert_eq!(result.cost_with_tax, Money::from_cents(3583));
        assert_eq!(result.freight_amount, Money::from_cents(107));
        assert_eq!(result.cost_with_freight, Money::from_cents(3690));
        assert_eq!(result.profit_amount, Money::from_cents(461));
        assert_eq!(result.unit_price, Money::from_cents(4151));
        assert_eq!(result.total_price, Money::from_cents(12453));
    }

    #[test]
    fn test_fractional_quantity() {
        let req = PricingRequest {
            quantity: dec("1.5"),
            ..request(FreightMode::Percentage)
        };
        let result = calculate_product_price(&req).unwrap();
        assert_eq!(result.total_price, Money::from_cents(20790));
    }

    #[test]
    fn test_tax_regime_does_not_change_arithmetic() {
        let mut a = request(FreightMode::Percentage);
        a.tax_regime = TaxRegime::SimplesNacional;
        let mut b = a.clone();
        b.tax_regime = TaxRegime::LucroReal;

        let ra = calculate_product_price(&a).unwrap();
        let rb = calculate_product_price(&b).unwrap();
        assert_eq!(ra.unit_price, rb.unit_price);
        assert_eq!(ra.tax_amount, rb.tax_amount);
        assert_eq!(rb.tax_regime, TaxRegime::LucroReal);
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let cases: Vec<(PricingRequest, &str, &str)> = vec![
            (
                PricingRequest { unit_cost: Decimal::ZERO, ..request(FreightMode::Fixed) },
                "unitCost",
                "MUST_BE_POSITIVE",
            ),
            (
                PricingRequest { quantity: dec("-1"), ..request(FreightMode::Fixed) },
                "quantity",
                "MUST_BE_POSITIVE",
            ),
            (
                PricingRequest { tax_pct: dec("100.5"), ..request(FreightMode::Fixed) },
                "taxPct",
                "PERCENTAGE_OUT_OF_RANGE",
            ),
            (
                PricingRequest { profit_margin_pct: dec("-3"), ..request(FreightMode::Fixed) },
                "profitMarginPct",
                "PERCENTAGE_OUT_OF_RANGE",
            ),
            (
                PricingRequest { product_name: "  ".to_string(), ..request(FreightMode::Fixed) },
                "productName",
                "REQUIRED",
            ),
            (
                PricingRequest { freight_value: dec("-1"), ..request(FreightMode::Fixed) },
                "freightValue",
                "MUST_NOT_BE_NEGATIVE",
            ),
            (
                PricingRequest { freight_value: dec("120"), ..request(FreightMode::Percentage) },
                "freightValue",
                "PERCENTAGE_OUT_OF_RANGE",
            ),
            (
                PricingRequest {
                    weight: Some(dec("-2")),
                    ..request(FreightMode::PerWeight)
                },
                "weight",
                "MUST_NOT_BE_NEGATIVE",
            ),
            (
                PricingRequest {
                    weight: Some(dec("-2")),
                    ..request(FreightMode::Fixed)
                },
                "weight",
                "MUST_NOT_BE_NEGATIVE",
            ),
            (
                PricingRequest {
                    freight_value: dec("-5"),
                    freight_percentage: Some(dec("10")),
                    ..request(FreightMode::Percentage)
                },
                "freightValue",
                "MUST_NOT_BE_NEGATIVE",
            ),
            (
                PricingRequest {
                    freight_percentage: Some(dec("500")),
                    ..request(FreightMode::Fixed)
                },
                "freightPercentage",
                "PERCENTAGE_OUT_OF_RANGE",
            ),
            (
                PricingRequest {
                    weight: Some(MAX_QUANTITY + Decimal::ONE),
                    ..request(FreightMode::Percentage)
                },
                "weight",
                "TOO_LARGE",
            ),
            (
                PricingRequest {
                    unit_cost: MAX_MONEY_INPUT + Decimal::ONE,
                    ..request(FreightMode::Fixed)
                },
                "unitCost",
                "TOO_LARGE",
            ),
        ];

        for (req, field, code) in cases {
            let err = calculate_product_price(&req).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{err:?}");
            assert_eq!(err.field(), Some(field));
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_boundary_percentages_accepted() {
        let req = PricingRequest {
            tax_pct: dec("100"),
            profit_margin_pct: Decimal::ZERO,
            ..request(FreightMode::Percentage)
        };
        let result = calculate_product_price(&req).unwrap();
        assert_eq!(result.tax_amount, Money::from_cents(10000));
        assert!(result.profit_amount.is_zero());
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "productName": "Cadeira",
            "unitCost": 100,
            "quantity": 2,
            "profitMargin": 20,
            "taxRegime": "lucro_real",
            "taxPercentage": 10,
            "freightType": "percentage",
            "freightValue": 5
        }"#;
        let req: PricingRequest = serde_json::from_str(json).unwrap();
        let result = calculate_product_price(&req).unwrap();

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["unitPrice"], serde_json::json!(138.6));
        assert_eq!(value["totalPrice"], serde_json::json!(277.2));
        assert_eq!(value["freightMode"], "percentage");
        assert_eq!(value["quantity"], serde_json::json!(2.0));
        assert_eq!(value["breakdown"]["freight"], serde_json::json!(5.5));
    }

    fn valid_request() -> impl Strategy<Value = PricingRequest> {
        (
            1i64..10_000_000,
            1i64..1_000,
            0i64..=10_000,
            0i64..=10_000,
            0i64..=10_000,
            0i64..100_000,
        )
            .prop_map(|(cost, qty, margin, tax, freight, weight)| PricingRequest {
                product_name: "Item".to_string(),
                unit_cost: Decimal::new(cost, 2),
                quantity: Decimal::from(qty),
                profit_margin_pct: Decimal::new(margin, 2),
                tax_regime: TaxRegime::LucroPresumido,
                tax_pct: Decimal::new(tax, 2),
                freight_mode: FreightMode::Percentage,
                freight_value: Decimal::new(freight, 2),
                weight: Some(Decimal::new(weight, 3)),
                freight_percentage: None,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the components sum to the unit price.
        #[test]
        fn waterfall_identity(req in valid_request()) {
            let r = calculate_product_price(&req).unwrap();
            prop_assert_eq!(
                r.unit_cost + r.tax_amount + r.freight_amount + r.profit_amount,
                r.unit_price
            );
            prop_assert_eq!(r.cost_with_freight + r.profit_amount, r.unit_price);
        }

        /// Property: the total is the unit price times the quantity.
        #[test]
        fn total_scales_with_quantity(req in valid_request()) {
            let r = calculate_product_price(&req).unwrap();
            prop_assert_eq!(r.total_price.amount(), r.unit_price.amount() * req.quantity);
        }

        /// Property: switching freight mode only touches freight and below.
        #[test]
        fn freight_mode_isolation(req in valid_request()) {
            let base = calculate_product_price(&req).unwrap();
            for mode in [FreightMode::PerWeight, FreightMode::Fixed] {
                let switched = PricingRequest { freight_mode: mode, ..req.clone() };
                let other = calculate_product_price(&switched).unwrap();
                prop_assert_eq!(other.tax_amount, base.tax_amount);
                prop_assert_eq!(other.cost_with_tax, base.cost_with_tax);
                prop_assert_eq!(
                    other.cost_with_freight,
                    other.cost_with_tax + other.freight_amount
                );
            }
        }

        /// Property: identical input, identical output.
        #[test]
        fn idempotent(req in valid_request()) {
            let a = serde_json::to_string(&calculate_product_price(&req).unwrap()).unwrap();
            let b = serde_json::to_string(&calculate_product_price(&req).unwrap()).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}

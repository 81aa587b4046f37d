//! VAT and margin policies.
//!
//! The `tax` module turns a component's production cost into
//! customer-facing prices.  Two pricing rules are in use and they are
//! not equivalent, so each is a [`PricingPolicy`] implementation and
//! callers pick one via [`PolicyKind`].

use crate::models::{Costs, OperationCharge, OperationKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Factors applied around the margin computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatRates {
    /// Multiplies the price excluding VAT.
    pub vat_factor: f64,
    /// Share of the deduction base credited back as input tax.
    pub deduction_rate: f64,
}

impl Default for VatRates {
    fn default() -> Self {
        VatRates {
            vat_factor: 1.12,
            deduction_rate: 0.115,
        }
    }
}

/// Prices produced by a policy, before division by quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolicyPrices {
    pub vat_deduction: f64,
    pub price_excl_vat: f64,
    pub price_incl_vat: f64,
}

/// A rule for deriving prices from costs.
///
/// Policies must be thread-safe (`Send + Sync`) because the engine
/// prices the components of a job concurrently.
pub trait PricingPolicy: Send + Sync {
    /// Stable name, as accepted by [`PolicyKind`].
    fn name(&self) -> &str;

    fn rates(&self) -> VatRates;

    /// The part of the total cost the input-tax credit is computed on.
    fn vat_deduction_base(&self, costs: &Costs, charges: &[OperationCharge]) -> f64;

    /// Apply the profit margin (in percent) to the total cost.
    fn price_excl_vat(&self, total_cost: f64, profit_margin: f64) -> f64;

    fn price(&self, costs: &Costs, charges: &[OperationCharge], profit_margin: f64) -> PolicyPrices {
        let rates = self.rates();
        let vat_deduction = self.vat_deduction_base(costs, charges) * rates.deduction_rate;
        let price_excl_vat = self.price_excl_vat(costs.total, profit_margin);
        PolicyPrices {
            vat_deduction,
            price_excl_vat,
            price_incl_vat: price_excl_vat * rates.vat_factor - vat_deduction,
        }
    }
}

/// Margin as a share of the selling price: `cost / (1 - margin)`.
/// The whole cost is deductible.
#[derive(Debug, Clone, Default)]
pub struct DivideByMargin {
    pub rates: VatRates,
}

impl PricingPolicy for DivideByMargin {
    fn name(&self) -> &str {
        "divide-by-margin"
    }

    fn rates(&self) -> VatRates {
        self.rates
    }

    fn vat_deduction_base(&self, costs: &Costs, _charges: &[OperationCharge]) -> f64 {
        costs.total
    }

    fn price_excl_vat(&self, total_cost: f64, profit_margin: f64) -> f64 {
        total_cost / (1.0 - profit_margin / 100.0)
    }
}

/// Margin as a markup on cost: `cost * (1 + margin)`.  Charges for
/// the `exempt` operations are excluded from the deduction base.
#[derive(Debug, Clone)]
pub struct MarkupWithExemptions {
    pub rates: VatRates,
    pub exempt: Vec<OperationKind>,
}

impl Default for MarkupWithExemptions {
    fn default() -> Self {
        MarkupWithExemptions {
            rates: VatRates::default(),
            exempt: vec![
                OperationKind::ManualGluing,
                OperationKind::SpotLacquer,
                OperationKind::Mounting,
            ],
        }
    }
}

impl MarkupWithExemptions {
    /// Sum of the charges that carry no input-tax credit.
    pub fn no_vat_deduction_cost(&self, charges: &[OperationCharge]) -> f64 {
        charges
            .iter()
            .filter(|charge| self.exempt.contains(&charge.operation))
            .map(|charge| charge.cost)
            .sum()
    }
}

impl PricingPolicy for MarkupWithExemptions {
    fn name(&self) -> &str {
        "markup-with-exemptions"
    }

    fn rates(&self) -> VatRates {
        self.rates
    }

    fn vat_deduction_base(&self, costs: &Costs, charges: &[OperationCharge]) -> f64 {
        costs.total - self.no_vat_deduction_cost(charges)
    }

    fn price_excl_vat(&self, total_cost: f64, profit_margin: f64) -> f64 {
        total_cost * (1.0 + profit_margin / 100.0)
    }
}

/// Selects one of the built-in policies, e.g. from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    DivideByMargin,
    MarkupWithExemptions,
}

impl PolicyKind {
    /// Build the policy with its default rates.
    pub fn build(self) -> Arc<dyn PricingPolicy> {
        match self {
            PolicyKind::DivideByMargin => Arc::new(DivideByMargin::default()),
            PolicyKind::MarkupWithExemptions => Arc::new(MarkupWithExemptions::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn costs(total: f64) -> Costs {
        Costs {
            paper: total,
            total,
            ..Costs::default()
        }
    }

    #[test]
    fn test_divide_by_margin() {
        let prices = DivideByMargin::default().price(&costs(1000.0), &[], 20.0);
        assert_close(prices.vat_deduction, 115.0);
        assert_close(prices.price_excl_vat, 1250.0);
        assert_close(prices.price_incl_vat, 1285.0);
    }

    #[test]
    fn test_markup_excludes_exempt_operations() {
        let charges = [
            OperationCharge {
                operation: OperationKind::Mounting,
                cost: 100.0,
            },
            OperationCharge {
                operation: OperationKind::Foil,
                cost: 50.0,
            },
        ];
        let policy = MarkupWithExemptions::default();
        assert_close(policy.no_vat_deduction_cost(&charges), 100.0);

        let prices = policy.price(&costs(1000.0), &charges, 30.0);
        assert_close(prices.vat_deduction, 103.5);
        assert_close(prices.price_excl_vat, 1300.0);
        assert_close(prices.price_incl_vat, 1352.5);
    }

    #[test]
    fn test_zero_margin_policies_agree_without_exemptions() {
        let a = DivideByMargin::default().price(&costs(500.0), &[], 0.0);
        let b = MarkupWithExemptions::default().price(&costs(500.0), &[], 0.0);
        assert_close(a.price_incl_vat, b.price_incl_vat);
    }

    #[test]
    fn test_policy_kind_names() {
        let kind: PolicyKind = serde_json::from_str("\"markup-with-exemptions\"").unwrap();
        assert_eq!(kind, PolicyKind::MarkupWithExemptions);
        assert_eq!(kind.build().name(), "markup-with-exemptions");
        assert_eq!(PolicyKind::default().build().name(), "divide-by-margin");
    }
}

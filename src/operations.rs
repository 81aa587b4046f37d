//! Finishing-operation rules.
//!
//! Every enabled [`Operation`] contributes one independent, additive
//! [`OperationCharge`].  Operations whose tariff has no rate for the
//! component's format are charged zero and reported as a
//! [`Diagnostic`] instead of failing the computation.

use crate::models::{Diagnostic, JobSpec, Operation, OperationCharge};
use crate::press::sides;
use crate::sheets::SheetCounts;
use crate::tariff::{FormatTable, TariffTable};

/// Charges and diagnostics produced by the finishing operations of one
/// component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationPricing {
    pub charges: Vec<OperationCharge>,
    pub diagnostics: Vec<Diagnostic>,
}

impl OperationPricing {
    pub fn total(&self) -> f64 {
        self.charges.iter().fold(0.0, |acc, c| acc + c.cost)
    }
}

pub fn price_operations(
    spec: &JobSpec,
    sheets: &SheetCounts,
    tariff: &TariffTable,
) -> OperationPricing {
    let mut pricing = OperationPricing::default();
    for operation in spec.operations.enabled() {
        match operation_cost(&operation, spec, sheets, tariff) {
            Some(cost) => pricing.charges.push(OperationCharge {
                operation: operation.kind(),
                cost,
            }),
            None => {
                let kind = operation.kind();
                tracing::warn!(
                    component = %spec.name,
                    operation = %kind,
                    format = %spec.format,
                    "operation not available for format, charging nothing"
                );
                pricing.diagnostics.push(Diagnostic {
                    operation: kind,
                    format: spec.format,
                    message: format!("{kind} is not available for format {}", spec.format),
                });
            }
        }
    }
    pricing
}

/// Cost of a single operation, or `None` when the tariff has no rate
/// for the component's format.
pub fn operation_cost(
    operation: &Operation,
    spec: &JobSpec,
    sheets: &SheetCounts,
    tariff: &TariffTable,
) -> Option<f64> {
    let quantity = spec.quantity as f64;
    let total_sheets = sheets.total_sheets as f64;
    let area = sheets.total_area;

    let cost = match *operation {
        Operation::Lamination { double_sided } => {
            area * tariff.lamination_per_m2 * sides(double_sided)
        }
        Operation::UvCoating { double_sided } => {
            area * tariff.uv_coating_per_m2 * sides(double_sided)
        }
        Operation::Embossing { double_sided } => {
            area * tariff.embossing_per_m2 * sides(double_sided)
        }
        Operation::DieCutting { double_sided } => {
            let rate = tariff.die_cutting.get(spec.format);
            (rate.base + total_sheets * rate.per_unit) * sides(double_sided)
        }
        Operation::Congreve { double_sided } => {
            let rate = tariff.congreve.get(spec.format);
            let over = spec.quantity.saturating_sub(tariff.volume_threshold) as f64;
            (rate.base + over * rate.per_unit) * sides(double_sided)
        }
        Operation::Foil => tariff.foil,
        Operation::Binding { rings_count } => tariff.ring_price * rings_count as f64 * quantity,
        Operation::Stapling => {
            let rates = &tariff.stapling;
            // The bulk rate applies to the whole run, not just the units
            // above the threshold.
            if spec.quantity <= rates.bulk_threshold {
                rates.base * quantity
            } else {
                rates.bulk * quantity
            }
        }
        Operation::ThermalBinding => tariff.thermal_binding_per_block * quantity,
        Operation::ThreadSewing { signatures } => {
            tariff.thread_sewing_per_signature * signatures as f64 * quantity
        }
        Operation::Folding { folds } => tariff.folding_per_fold * folds as f64 * total_sheets,
        Operation::Mounting => per_sheet(&tariff.mounting, spec, sheets)?,
        Operation::ThreeDLacquer => per_sheet(&tariff.three_d_lacquer, spec, sheets)?,
        Operation::ThreeDFoil => per_sheet(&tariff.three_d_foil, spec, sheets)?,
        Operation::SpotLacquer {
            base,
            per_unit,
            threshold,
        } => {
            let rate = tariff.spot_lacquer.get(spec.format);
            let base = base.unwrap_or(rate.base);
            let per_unit = per_unit.unwrap_or(rate.per_unit);
            let threshold = threshold.unwrap_or(rate.threshold);
            base + sheets.total_sheets.saturating_sub(threshold) as f64 * per_unit
        }
        Operation::UvPrinting { white_color } => {
            let rates = &tariff.uv_printing;
            let per_m2 = if white_color {
                rates.white_price_per_m2
            } else {
                rates.base_price_per_m2
            };
            per_m2 * area
        }
        Operation::Plotter => per_sheet(&tariff.plotter, spec, sheets)?,
        Operation::FoldGluing => tariff.fold_gluing.base + tariff.fold_gluing.per_unit * quantity,
        Operation::ManualGluing { price_per_unit } => price_per_unit * quantity,
    };
    Some(cost)
}

fn per_sheet(table: &FormatTable<Option<f64>>, spec: &JobSpec, sheets: &SheetCounts) -> Option<f64> {
    table
        .get(spec.format)
        .map(|price| price * sheets.total_sheets as f64)
}

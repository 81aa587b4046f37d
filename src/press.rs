//! Press and printing-plate costs.
//!
//! A component is printed either on the offset press or digitally,
//! never both; [`JobSpec::validate`](crate::models::JobSpec::validate)
//! rejects specs that enable both.

use crate::models::JobSpec;
use crate::sheets::SheetCounts;
use crate::tariff::TariffTable;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PressCosts {
    pub printing: f64,
    pub forms: f64,
}

pub fn press_costs(spec: &JobSpec, sheets: &SheetCounts, tariff: &TariffTable) -> PressCosts {
    let ops = &spec.operations;
    if ops.printing.enabled {
        let rates = tariff.press.get(spec.format);
        let sides = sides(ops.printing.double_sided);
        let over_threshold = spec.quantity.saturating_sub(tariff.volume_threshold) as f64;
        let printing = (rates.print_setup + over_threshold * rates.print_per_unit) * sides;
        let forms = rates.forms
            * sides
            * spec.printed_sheets as f64
            * if ops.printing.double_forms { 2.0 } else { 1.0 };
        PressCosts { printing, forms }
    } else if ops.digital_printing.enabled {
        let digital = &ops.digital_printing;
        let bucket = if digital.large_format {
            &tariff.digital.large_format
        } else {
            &tariff.digital.standard
        };
        // No makeready or plates on the digital press.
        PressCosts {
            printing: bucket.for_sides(digital.double_sided) * sheets.run_sheets as f64,
            forms: 0.0,
        }
    } else {
        PressCosts::default()
    }
}

/// Multiplier for operations charged once per printed side.
pub(crate) fn sides(double_sided: bool) -> f64 {
    if double_sided {
        2.0
    } else {
        1.0
    }
}

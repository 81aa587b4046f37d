//! Sheet-count resolution.
//!
//! Converts ordered quantities into physical sheets, printed area and
//! paper weight.  Partial sheets always round up to a whole sheet.

use crate::error::PricingError;
use crate::models::{JobSpec, PriceType};

/// Physical quantities derived from a [`JobSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetCounts {
    pub sheets_per_product: u64,
    /// `quantity * sheets_per_product`: what the run itself consumes.
    pub run_sheets: u64,
    /// Run sheets plus makeready, times the number of printed sheets.
    pub total_sheets: u64,
    pub total_area: f64,
    /// Kilograms.  `paper_weight` is applied as a plain multiplier on
    /// the area, not divided by 1000.
    pub paper_weight: f64,
}

impl SheetCounts {
    pub fn resolve(spec: &JobSpec) -> Result<SheetCounts, PricingError> {
        let sheets_per_product = spec.pages_per_product.div_ceil(spec.shares_per_sheet);
        let run_sheets = spec
            .quantity
            .checked_mul(sheets_per_product)
            .ok_or_else(|| PricingError::invalid("run sheet count overflows"))?;
        let total_sheets = run_sheets
            .checked_add(spec.setup_sheets)
            .and_then(|sheets| sheets.checked_mul(spec.printed_sheets))
            .ok_or_else(|| PricingError::invalid("total sheet count overflows"))?;
        let total_area = total_sheets as f64 * spec.sheet_area;
        Ok(SheetCounts {
            sheets_per_product,
            run_sheets,
            total_sheets,
            total_area,
            paper_weight: total_area * spec.paper_weight,
        })
    }

    /// Paper cost: by weight or by sheet, depending on the price type.
    pub fn paper_cost(&self, spec: &JobSpec) -> f64 {
        match spec.price_type {
            PriceType::PerKilogram => self.paper_weight * spec.paper_price,
            PriceType::PerSheet => self.total_sheets as f64 * spec.paper_price,
        }
    }
}

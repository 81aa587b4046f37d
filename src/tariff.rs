//! Tariff reference data.
//!
//! The [`TariffTable`] holds every rate the pricing rules consult.  It
//! is plain data: constructed once (either the compiled-in
//! [`TariffTable::default`] or a table read from JSON with
//! [`TariffTable::load_from_file`]) and then shared read-only by every
//! computation.  Passing an alternate table into the engine is how
//! tests and callers price against different rates.

use crate::models::Format;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One value per sheet format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatTable<T> {
    #[serde(rename = "A1")]
    pub a1: T,
    #[serde(rename = "A2")]
    pub a2: T,
    #[serde(rename = "A3")]
    pub a3: T,
}

impl<T> FormatTable<T> {
    pub fn get(&self, format: Format) -> &T {
        match format {
            Format::A1 => &self.a1,
            Format::A2 => &self.a2,
            Format::A3 => &self.a3,
        }
    }
}

/// Offset press rates for one format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressRates {
    /// Makeready charge covering the first `volume_threshold` units.
    pub print_setup: f64,
    /// Charged per unit above `volume_threshold`.
    pub print_per_unit: f64,
    /// One set of printing plates.
    pub forms: f64,
}

/// Per-sheet digital press rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidedRate {
    pub single: f64,
    pub double: f64,
}

impl SidedRate {
    pub fn for_sides(&self, double_sided: bool) -> f64 {
        if double_sided {
            self.double
        } else {
            self.single
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalRates {
    pub standard: SidedRate,
    pub large_format: SidedRate,
}

/// A fixed charge plus a rate per unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRate {
    #[serde(default)]
    pub base: f64,
    pub per_unit: f64,
}

/// A fixed charge covering `threshold` sheets, then a rate per sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdRate {
    pub base: f64,
    pub per_unit: f64,
    pub threshold: u64,
}

/// Stapling switches to the bulk rate for the whole run once the
/// quantity exceeds `bulk_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaplingRates {
    pub base: f64,
    pub bulk: f64,
    pub bulk_threshold: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UvPrintingRates {
    pub base_price_per_m2: f64,
    pub white_price_per_m2: f64,
}

/// Static rate data for every press mode and finishing operation.
///
/// A `None` entry in a per-format table means the operation is not
/// offered for that format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffTable {
    /// Units included in the press and congreve setup charges.
    pub volume_threshold: u64,
    pub press: FormatTable<PressRates>,
    pub digital: DigitalRates,
    pub lamination_per_m2: f64,
    pub uv_coating_per_m2: f64,
    pub embossing_per_m2: f64,
    pub die_cutting: FormatTable<BaseRate>,
    pub congreve: FormatTable<BaseRate>,
    pub foil: f64,
    pub ring_price: f64,
    pub stapling: StaplingRates,
    pub thermal_binding_per_block: f64,
    pub thread_sewing_per_signature: f64,
    pub folding_per_fold: f64,
    pub mounting: FormatTable<Option<f64>>,
    pub three_d_lacquer: FormatTable<Option<f64>>,
    pub three_d_foil: FormatTable<Option<f64>>,
    pub spot_lacquer: FormatTable<ThresholdRate>,
    pub uv_printing: UvPrintingRates,
    pub plotter: FormatTable<Option<f64>>,
    pub fold_gluing: BaseRate,
}

impl Default for TariffTable {
    fn default() -> Self {
        TariffTable {
            volume_threshold: 1000,
            press: FormatTable {
                a1: PressRates {
                    print_setup: 900_000.0,
                    print_per_unit: 220.0,
                    forms: 280_000.0,
                },
                a2: PressRates {
                    print_setup: 400_000.0,
                    print_per_unit: 120.0,
                    forms: 160_000.0,
                },
                a3: PressRates {
                    print_setup: 200_000.0,
                    print_per_unit: 80.0,
                    forms: 100_000.0,
                },
            },
            digital: DigitalRates {
                standard: SidedRate {
                    single: 300.0,
                    double: 500.0,
                },
                large_format: SidedRate {
                    single: 900.0,
                    double: 1500.0,
                },
            },
            lamination_per_m2: 1500.0,
            uv_coating_per_m2: 1100.0,
            embossing_per_m2: 1500.0,
            die_cutting: FormatTable {
                a1: BaseRate {
                    base: 0.0,
                    per_unit: 150.0,
                },
                a2: BaseRate {
                    base: 0.0,
                    per_unit: 100.0,
                },
                a3: BaseRate {
                    base: 100_000.0,
                    per_unit: 70.0,
                },
            },
            congreve: FormatTable {
                a1: BaseRate {
                    base: 350_000.0,
                    per_unit: 350.0,
                },
                a2: BaseRate {
                    base: 280_000.0,
                    per_unit: 150.0,
                },
                a3: BaseRate {
                    base: 200_000.0,
                    per_unit: 90.0,
                },
            },
            foil: 150_000.0,
            ring_price: 80.0,
            stapling: StaplingRates {
                base: 1000.0,
                bulk: 500.0,
                bulk_threshold: 100,
            },
            thermal_binding_per_block: 3000.0,
            thread_sewing_per_signature: 200.0,
            folding_per_fold: 20.0,
            mounting: FormatTable {
                a1: Some(12_000.0),
                a2: Some(6000.0),
                a3: Some(3000.0),
            },
            three_d_lacquer: FormatTable {
                a1: None,
                a2: Some(12_000.0),
                a3: Some(8000.0),
            },
            three_d_foil: FormatTable {
                a1: None,
                a2: Some(29_000.0),
                a3: Some(18_000.0),
            },
            spot_lacquer: FormatTable {
                a1: ThresholdRate {
                    base: 1_200_000.0,
                    per_unit: 1200.0,
                    threshold: 1000,
                },
                a2: ThresholdRate {
                    base: 600_000.0,
                    per_unit: 600.0,
                    threshold: 1000,
                },
                a3: ThresholdRate {
                    base: 400_000.0,
                    per_unit: 400.0,
                    threshold: 1000,
                },
            },
            uv_printing: UvPrintingRates {
                base_price_per_m2: 200_000.0,
                white_price_per_m2: 400_000.0,
            },
            plotter: FormatTable {
                a1: None,
                a2: Some(25_000.0),
                a3: Some(15_000.0),
            },
            fold_gluing: BaseRate {
                base: 100_000.0,
                per_unit: 30.0,
            },
        }
    }
}

impl TariffTable {
    /// Load a tariff table from a JSON file.
    ///
    /// The file must describe the complete table; there is no merging
    /// with the compiled-in defaults.
    pub fn load_from_file(path: &Path) -> Result<TariffTable> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading tariff table {}", path.display()))?;
        let table = serde_json::from_str::<TariffTable>(&data)
            .with_context(|| format!("parsing tariff table {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded tariff table");
        Ok(table)
    }
}

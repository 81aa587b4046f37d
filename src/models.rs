//! Data models for the Print Cost Engine.
//!
//! The `models` module defines the serialisable input and output
//! records of the engine.  A [`JobSpec`] describes one component of a
//! print job (a cover, a block of inner pages, an insert) and a
//! [`CostBreakdown`] is what the engine hands back for it.  Field
//! names serialise in camelCase so the records can be exchanged with
//! the calculator form unchanged.

use crate::error::PricingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sheet size category.  Drives every format-dependent tariff lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    A1,
    A2,
    A3,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::A1, Format::A2, Format::A3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::A1 => "A1",
            Format::A2 => "A2",
            Format::A3 => "A3",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How `JobSpec::paper_price` is to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceType {
    /// Price per kilogram of paper.
    #[default]
    #[serde(rename = "kg", alias = "perKilogram")]
    PerKilogram,
    /// Price per printed sheet.
    #[serde(rename = "sheet", alias = "perSheet")]
    PerSheet,
}

/// One component of a print job, as entered on the calculator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobSpec {
    /// Row identifier assigned by the form.  Not used in pricing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Free-form label shown next to the component's results.
    #[serde(default)]
    pub name: String,
    /// Number of finished units ordered.
    pub quantity: u64,
    pub format: Format,
    /// How many product pages fit on one printed sheet.
    pub shares_per_sheet: u64,
    #[serde(default = "one")]
    pub pages_per_product: u64,
    /// Makeready allowance, added once regardless of run length.
    #[serde(default)]
    pub setup_sheets: u64,
    /// Multiplies the total sheet count, e.g. when front and back are
    /// counted as separate plates.
    #[serde(default = "one")]
    pub printed_sheets: u64,
    /// Square metres per sheet.
    pub sheet_area: f64,
    /// Multiplier from printed area to paper weight in kilograms.
    pub paper_weight: f64,
    pub paper_price: f64,
    #[serde(default)]
    pub price_type: PriceType,
    /// Desired margin in percent, `0 <= margin < 100`.
    pub profit_margin: f64,
    /// The form sends these as `options`.
    #[serde(default, alias = "options")]
    pub operations: Operations,
}

fn one() -> u64 {
    1
}

impl Default for JobSpec {
    /// The calculator form's initial component, with nothing enabled.
    fn default() -> Self {
        JobSpec {
            id: None,
            name: String::new(),
            quantity: 100,
            format: Format::A1,
            shares_per_sheet: 1,
            pages_per_product: 1,
            setup_sheets: 200,
            printed_sheets: 1,
            sheet_area: 0.5,
            paper_weight: 0.3,
            paper_price: 14200.0,
            price_type: PriceType::PerKilogram,
            profit_margin: 30.0,
            operations: Operations::default(),
        }
    }
}

impl JobSpec {
    /// Parse a component from JSON.  Unknown formats, unknown operation
    /// keys and malformed numbers are all reported as
    /// [`PricingError::InvalidJobSpec`].
    pub fn from_json(data: &str) -> Result<JobSpec, PricingError> {
        let spec: JobSpec = serde_json::from_str(data)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check the preconditions the pricing rules rely on.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.quantity == 0 {
            return Err(PricingError::invalid("quantity must be positive"));
        }
        if self.shares_per_sheet == 0 {
            return Err(PricingError::invalid("sharesPerSheet must be positive"));
        }
        if self.pages_per_product == 0 {
            return Err(PricingError::invalid("pagesPerProduct must be positive"));
        }
        if self.printed_sheets == 0 {
            return Err(PricingError::invalid("printedSheets must be positive"));
        }
        positive("sheetArea", self.sheet_area)?;
        positive("paperWeight", self.paper_weight)?;
        positive("paperPrice", self.paper_price)?;
        if !self.profit_margin.is_finite() || !(0.0..100.0).contains(&self.profit_margin) {
            return Err(PricingError::invalid(format!(
                "profitMargin must be in [0, 100), got {}",
                self.profit_margin
            )));
        }
        self.operations.validate()
    }
}

fn positive(field: &str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(format!(
            "{field} must be a positive number, got {value}"
        )))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

/// An operation with nothing to configure beyond being switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Toggle {
    pub enabled: bool,
}

/// An operation that costs twice as much when applied to both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Sided {
    pub enabled: bool,
    pub double_sided: bool,
}

/// Offset press run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OffsetPrinting {
    pub enabled: bool,
    pub double_sided: bool,
    /// A second set of plates is made for every printed sheet.
    pub double_forms: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DigitalPrinting {
    pub enabled: bool,
    pub double_sided: bool,
    pub large_format: bool,
}

/// Ring binding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Binding {
    pub enabled: bool,
    pub rings_count: u32,
}

impl Default for Binding {
    fn default() -> Self {
        Binding {
            enabled: false,
            rings_count: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ThreadSewing {
    pub enabled: bool,
    pub signatures: u32,
}

impl Default for ThreadSewing {
    fn default() -> Self {
        ThreadSewing {
            enabled: false,
            signatures: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Folding {
    pub enabled: bool,
    pub folds: u32,
}

impl Default for Folding {
    fn default() -> Self {
        Folding {
            enabled: false,
            folds: 1,
        }
    }
}

/// Gluing by hand, priced per unit by the operator rather than the tariff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ManualGluing {
    pub enabled: bool,
    pub price_per_unit: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct UvPrinting {
    pub enabled: bool,
    /// Print an underlay of white ink, charged at the higher rate.
    pub white_color: bool,
}

/// Spot lacquer with optional per-job overrides of the tariff rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SpotLacquer {
    pub enabled: bool,
    pub base: Option<f64>,
    pub per_unit: Option<f64>,
    pub threshold: Option<u64>,
}

/// Every operation a component can request, keyed by operation name.
///
/// This is the shape the calculator form sends.  Unknown keys are
/// rejected at deserialisation time.  The engine itself works on the
/// [`Operation`] values returned by [`Operations::enabled`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Operations {
    pub printing: OffsetPrinting,
    pub digital_printing: DigitalPrinting,
    pub lamination: Sided,
    pub uv_coating: Sided,
    pub embossing: Sided,
    pub die_cutting: Sided,
    pub congreve: Sided,
    pub foil: Toggle,
    pub binding: Binding,
    pub stapling: Toggle,
    pub thermal_binding: Toggle,
    pub thread_sewing: ThreadSewing,
    pub folding: Folding,
    pub mounting: Toggle,
    pub three_d_lacquer: Toggle,
    pub three_d_foil: Toggle,
    pub spot_lacquer: SpotLacquer,
    pub uv_printing: UvPrinting,
    pub plotter: Toggle,
    pub fold_gluing: Toggle,
    pub manual_gluing: ManualGluing,
}

impl Operations {
    /// The enabled finishing operations, in a fixed order.  Press
    /// operations (offset and digital printing) are not included; they
    /// are priced separately from the additional operations.
    pub fn enabled(&self) -> Vec<Operation> {
        let sided = |cfg: &Sided, make: fn(bool) -> Operation| {
            cfg.enabled.then(|| make(cfg.double_sided))
        };
        let toggle = |cfg: &Toggle, op: Operation| cfg.enabled.then_some(op);

        [
            sided(&self.lamination, |double_sided| Operation::Lamination { double_sided }),
            sided(&self.uv_coating, |double_sided| Operation::UvCoating { double_sided }),
            sided(&self.embossing, |double_sided| Operation::Embossing { double_sided }),
            sided(&self.die_cutting, |double_sided| Operation::DieCutting { double_sided }),
            sided(&self.congreve, |double_sided| Operation::Congreve { double_sided }),
            toggle(&self.foil, Operation::Foil),
            self.binding.enabled.then_some(Operation::Binding {
                rings_count: self.binding.rings_count,
            }),
            toggle(&self.stapling, Operation::Stapling),
            toggle(&self.thermal_binding, Operation::ThermalBinding),
            self.thread_sewing.enabled.then_some(Operation::ThreadSewing {
                signatures: self.thread_sewing.signatures,
            }),
            self.folding.enabled.then_some(Operation::Folding {
                folds: self.folding.folds,
            }),
            toggle(&self.mounting, Operation::Mounting),
            toggle(&self.three_d_lacquer, Operation::ThreeDLacquer),
            toggle(&self.three_d_foil, Operation::ThreeDFoil),
            self.spot_lacquer.enabled.then_some(Operation::SpotLacquer {
                base: self.spot_lacquer.base,
                per_unit: self.spot_lacquer.per_unit,
                threshold: self.spot_lacquer.threshold,
            }),
            self.uv_printing.enabled.then_some(Operation::UvPrinting {
                white_color: self.uv_printing.white_color,
            }),
            toggle(&self.plotter, Operation::Plotter),
            toggle(&self.fold_gluing, Operation::FoldGluing),
            self.manual_gluing.enabled.then_some(Operation::ManualGluing {
                price_per_unit: self.manual_gluing.price_per_unit,
            }),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn validate(&self) -> Result<(), PricingError> {
        if self.printing.enabled && self.digital_printing.enabled {
            return Err(PricingError::invalid(
                "offset printing and digital printing cannot both be enabled",
            ));
        }
        if self.manual_gluing.enabled {
            non_negative("manualGluing.pricePerUnit", self.manual_gluing.price_per_unit)?;
        }
        if self.spot_lacquer.enabled {
            if let Some(base) = self.spot_lacquer.base {
                non_negative("spotLacquer.base", base)?;
            }
            if let Some(per_unit) = self.spot_lacquer.per_unit {
                non_negative("spotLacquer.perUnit", per_unit)?;
            }
        }
        Ok(())
    }
}

/// An enabled finishing operation together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Lamination { double_sided: bool },
    UvCoating { double_sided: bool },
    Embossing { double_sided: bool },
    DieCutting { double_sided: bool },
    Congreve { double_sided: bool },
    Foil,
    Binding { rings_count: u32 },
    Stapling,
    ThermalBinding,
    ThreadSewing { signatures: u32 },
    Folding { folds: u32 },
    Mounting,
    ThreeDLacquer,
    ThreeDFoil,
    SpotLacquer {
        base: Option<f64>,
        per_unit: Option<f64>,
        threshold: Option<u64>,
    },
    UvPrinting { white_color: bool },
    Plotter,
    FoldGluing,
    ManualGluing { price_per_unit: f64 },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Lamination { .. } => OperationKind::Lamination,
            Operation::UvCoating { .. } => OperationKind::UvCoating,
            Operation::Embossing { .. } => OperationKind::Embossing,
            Operation::DieCutting { .. } => OperationKind::DieCutting,
            Operation::Congreve { .. } => OperationKind::Congreve,
            Operation::Foil => OperationKind::Foil,
            Operation::Binding { .. } => OperationKind::Binding,
            Operation::Stapling => OperationKind::Stapling,
            Operation::ThermalBinding => OperationKind::ThermalBinding,
            Operation::ThreadSewing { .. } => OperationKind::ThreadSewing,
            Operation::Folding { .. } => OperationKind::Folding,
            Operation::Mounting => OperationKind::Mounting,
            Operation::ThreeDLacquer => OperationKind::ThreeDLacquer,
            Operation::ThreeDFoil => OperationKind::ThreeDFoil,
            Operation::SpotLacquer { .. } => OperationKind::SpotLacquer,
            Operation::UvPrinting { .. } => OperationKind::UvPrinting,
            Operation::Plotter => OperationKind::Plotter,
            Operation::FoldGluing => OperationKind::FoldGluing,
            Operation::ManualGluing { .. } => OperationKind::ManualGluing,
        }
    }
}

/// Operation names, as they appear in [`Operations`] and in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Printing,
    DigitalPrinting,
    Lamination,
    UvCoating,
    Embossing,
    DieCutting,
    Congreve,
    Foil,
    Binding,
    Stapling,
    ThermalBinding,
    ThreadSewing,
    Folding,
    Mounting,
    ThreeDLacquer,
    ThreeDFoil,
    SpotLacquer,
    UvPrinting,
    Plotter,
    FoldGluing,
    ManualGluing,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Printing => "printing",
            OperationKind::DigitalPrinting => "digitalPrinting",
            OperationKind::Lamination => "lamination",
            OperationKind::UvCoating => "uvCoating",
            OperationKind::Embossing => "embossing",
            OperationKind::DieCutting => "dieCutting",
            OperationKind::Congreve => "congreve",
            OperationKind::Foil => "foil",
            OperationKind::Binding => "binding",
            OperationKind::Stapling => "stapling",
            OperationKind::ThermalBinding => "thermalBinding",
            OperationKind::ThreadSewing => "threadSewing",
            OperationKind::Folding => "folding",
            OperationKind::Mounting => "mounting",
            OperationKind::ThreeDLacquer => "threeDLacquer",
            OperationKind::ThreeDFoil => "threeDFoil",
            OperationKind::SpotLacquer => "spotLacquer",
            OperationKind::UvPrinting => "uvPrinting",
            OperationKind::Plotter => "plotter",
            OperationKind::FoldGluing => "foldGluing",
            OperationKind::ManualGluing => "manualGluing",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The cost contributed by one finishing operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationCharge {
    pub operation: OperationKind,
    pub cost: f64,
}

/// A non-fatal problem noticed while pricing, e.g. an operation that
/// has no tariff for the requested format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub operation: OperationKind,
    pub format: Format,
    pub message: String,
}

/// Cost decomposition of one component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Costs {
    pub paper: f64,
    pub printing: f64,
    pub forms: f64,
    /// Sum of every [`OperationCharge`].
    pub additional: f64,
    pub total: f64,
}

/// Customer-facing prices derived from [`Costs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prices {
    pub vat_deduction: f64,
    pub price_excl_vat: f64,
    pub price_incl_vat: f64,
    pub price_per_unit: f64,
}

/// The result of pricing a single [`JobSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub name: String,
    pub pages_per_product: u64,
    pub sheets_per_product: u64,
    /// Sheets consumed by the run itself, before makeready and plates.
    pub run_sheets: u64,
    pub total_sheets: u64,
    pub total_area: f64,
    /// Paper weight in kilograms.
    pub paper_weight: f64,
    pub costs: Costs,
    pub charges: Vec<OperationCharge>,
    pub prices: Prices,
    pub diagnostics: Vec<Diagnostic>,
}

/// A multi-component job: every component is priced independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    pub components: Vec<JobSpec>,
}

/// Totals across the components of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalSummary {
    pub component_count: usize,
    pub total_cost: f64,
    pub total_price_excl_vat: f64,
    pub total_price_incl_vat: f64,
}

/// The aggregate result of pricing a [`PrintJob`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuote {
    /// Breakdowns in the same order as the job's components.
    pub components: Vec<CostBreakdown>,
    pub summary: TotalSummary,
}

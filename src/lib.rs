//! Print Cost Engine library crate.
//!
//! This crate prices print jobs: sheet counts, paper, press and plate
//! costs, finishing operations, and the VAT/margin step that turns
//! production cost into a customer price.  Callers build a
//! [`JobSpec`] per component and call [`engine::compute_cost`] (or
//! [`PricingEngine::compute_cost`]); multi-component jobs go through
//! [`engine::quote_job`].

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod operations;
pub mod press;
pub mod sheets;
pub mod tariff;
pub mod tax;

pub use config::EngineConfig;
pub use engine::{compute_cost, quote_job, summarize, PricingEngine};
pub use error::PricingError;
pub use models::{
    CostBreakdown, Costs, Diagnostic, Format, JobQuote, JobSpec, Operation, OperationCharge,
    OperationKind, Operations, PriceType, Prices, PrintJob, TotalSummary,
};
pub use tariff::TariffTable;
pub use tax::{DivideByMargin, MarkupWithExemptions, PolicyKind, PricingPolicy, VatRates};

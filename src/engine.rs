//! Pricing engine.
//!
//! The `engine` module turns a [`JobSpec`] into a [`CostBreakdown`]
//! and a [`PrintJob`] into a [`JobQuote`].  Components of a job share
//! no state, so [`quote_job`] prices them in parallel with [`rayon`].
//! Rates come from a [`TariffTable`] and prices from a
//! [`PricingPolicy`]; both are passed in rather than looked up.

use crate::config::EngineConfig;
use crate::error::PricingError;
use crate::models::{CostBreakdown, Costs, JobQuote, JobSpec, Prices, PrintJob, TotalSummary};
use crate::operations::price_operations;
use crate::press::press_costs;
use crate::sheets::SheetCounts;
use crate::tariff::TariffTable;
use crate::tax::{PolicyKind, PricingPolicy};
use anyhow::Result;
use rayon::prelude::*;
use std::sync::Arc;

/// Price a single component.
pub fn compute_cost(
    spec: &JobSpec,
    tariff: &TariffTable,
    policy: &dyn PricingPolicy,
) -> Result<CostBreakdown, PricingError> {
    spec.validate()?;

    let sheets = SheetCounts::resolve(spec)?;
    let paper = sheets.paper_cost(spec);
    let press = press_costs(spec, &sheets, tariff);
    let operations = price_operations(spec, &sheets, tariff);
    let additional = operations.total();

    let costs = Costs {
        paper,
        printing: press.printing,
        forms: press.forms,
        additional,
        total: paper + press.printing + press.forms + additional,
    };
    let priced = policy.price(&costs, &operations.charges, spec.profit_margin);
    let prices = Prices {
        vat_deduction: priced.vat_deduction,
        price_excl_vat: priced.price_excl_vat,
        price_incl_vat: priced.price_incl_vat,
        // quantity > 0 is checked by validate()
        price_per_unit: priced.price_incl_vat / spec.quantity as f64,
    };

    tracing::debug!(
        component = %spec.name,
        policy = policy.name(),
        total_sheets = sheets.total_sheets,
        total_cost = costs.total,
        price_incl_vat = prices.price_incl_vat,
        "priced component"
    );

    Ok(CostBreakdown {
        name: spec.name.clone(),
        pages_per_product: spec.pages_per_product,
        sheets_per_product: sheets.sheets_per_product,
        run_sheets: sheets.run_sheets,
        total_sheets: sheets.total_sheets,
        total_area: sheets.total_area,
        paper_weight: sheets.paper_weight,
        costs,
        charges: operations.charges,
        prices,
        diagnostics: operations.diagnostics,
    })
}

/// Price every component of a job and total them up.
///
/// Components are priced in parallel; the breakdowns come back in the
/// order of `job.components`.  The first invalid component fails the
/// whole quote.
pub fn quote_job(
    job: &PrintJob,
    tariff: &TariffTable,
    policy: &dyn PricingPolicy,
) -> Result<JobQuote, PricingError> {
    let components: Vec<CostBreakdown> = job
        .components
        .par_iter()
        .map(|spec| compute_cost(spec, tariff, policy))
        .collect::<Result<_, _>>()?;
    let summary = summarize(&components);
    Ok(JobQuote {
        components,
        summary,
    })
}

/// Sum costs and prices across breakdowns.  An empty slice yields an
/// all-zero summary.
pub fn summarize(breakdowns: &[CostBreakdown]) -> TotalSummary {
    breakdowns
        .iter()
        .fold(TotalSummary::default(), |mut summary, breakdown| {
            summary.component_count += 1;
            summary.total_cost += breakdown.costs.total;
            summary.total_price_excl_vat += breakdown.prices.price_excl_vat;
            summary.total_price_incl_vat += breakdown.prices.price_incl_vat;
            summary
        })
}

/// A tariff table and pricing policy bundled for repeated use.
///
/// Cloning is cheap; the table and the policy are shared.
#[derive(Clone)]
pub struct PricingEngine {
    tariff: Arc<TariffTable>,
    policy: Arc<dyn PricingPolicy>,
}

impl Default for PricingEngine {
    fn default() -> Self {
        PricingEngine::new(TariffTable::default(), PolicyKind::default().build())
    }
}

impl PricingEngine {
    pub fn new(tariff: TariffTable, policy: Arc<dyn PricingPolicy>) -> Self {
        PricingEngine {
            tariff: Arc::new(tariff),
            policy,
        }
    }

    /// Build an engine from configuration, loading the tariff file if
    /// one is named.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let tariff = match &config.tariff_path {
            Some(path) => TariffTable::load_from_file(path)?,
            None => TariffTable::default(),
        };
        tracing::info!(policy = ?config.policy, "pricing engine configured");
        Ok(PricingEngine::new(tariff, config.policy.build()))
    }

    pub fn tariff(&self) -> &TariffTable {
        &self.tariff
    }

    pub fn policy(&self) -> &dyn PricingPolicy {
        self.policy.as_ref()
    }

    pub fn compute_cost(&self, spec: &JobSpec) -> Result<CostBreakdown, PricingError> {
        compute_cost(spec, &self.tariff, self.policy.as_ref())
    }

    pub fn quote_job(&self, job: &PrintJob) -> Result<JobQuote, PricingError> {
        quote_job(job, &self.tariff, self.policy.as_ref())
    }
}

//! Pricing properties checked through the public API.
//!
//! Scenario tests pin literal figures; the proptest blocks check the
//! structural properties (monotone sheet counts, purity, additive
//! aggregation) over generated components.

use print_cost_engine::{
    compute_cost, quote_job, summarize, DivideByMargin, Format, JobSpec, MarkupWithExemptions,
    OperationKind, Operations, PolicyKind, PriceType, PricingEngine, PricingError, PrintJob,
    TariffTable,
};
use proptest::prelude::*;

fn reference_spec() -> JobSpec {
    let mut spec = JobSpec {
        quantity: 100,
        format: Format::A3,
        shares_per_sheet: 1,
        setup_sheets: 200,
        sheet_area: 0.5,
        paper_weight: 0.3,
        paper_price: 14200.0,
        price_type: PriceType::PerKilogram,
        profit_margin: 30.0,
        ..JobSpec::default()
    };
    spec.operations.printing.enabled = true;
    spec
}

fn price(spec: &JobSpec) -> print_cost_engine::CostBreakdown {
    PricingEngine::default().compute_cost(spec).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_reference_scenario() {
    let breakdown = price(&reference_spec());
    assert_eq!(breakdown.total_sheets, 300);
    assert_eq!(breakdown.total_area, 150.0);
    assert!((breakdown.paper_weight - 45.0).abs() < 1e-9);
    assert!((breakdown.costs.paper - 639_000.0).abs() < 1e-6);
    assert_eq!(breakdown.costs.printing, 200_000.0);
    assert_eq!(breakdown.costs.forms, 100_000.0);
}

#[test]
fn test_stapling_discontinuity() {
    let mut spec = reference_spec();
    spec.operations.printing.enabled = false;
    spec.operations.stapling.enabled = true;

    spec.quantity = 100;
    assert_eq!(price(&spec).costs.additional, 100_000.0);
    spec.quantity = 101;
    assert_eq!(price(&spec).costs.additional, 50_500.0);
}

#[test]
fn test_offset_threshold_on_a1() {
    let mut spec = reference_spec();
    spec.format = Format::A1;
    spec.quantity = 1000;
    let at = price(&spec).costs.printing;
    spec.quantity = 1001;
    let over = price(&spec).costs.printing;
    assert_eq!(over - at, 220.0);
}

#[test]
fn test_three_d_foil_on_a1_charges_nothing() {
    let mut spec = reference_spec();
    spec.format = Format::A1;
    spec.operations.three_d_foil.enabled = true;
    let breakdown = price(&spec);
    assert_eq!(breakdown.costs.additional, 0.0);
    assert_eq!(breakdown.diagnostics.len(), 1);
}

#[test]
fn test_both_press_modes_rejected() {
    let mut spec = reference_spec();
    spec.operations.digital_printing.enabled = true;
    let err = PricingEngine::default().compute_cost(&spec).unwrap_err();
    assert!(matches!(err, PricingError::InvalidJobSpec(_)));
}

#[test]
fn test_zero_quantity_rejected_instead_of_infinite_unit_price() {
    let mut spec = reference_spec();
    spec.quantity = 0;
    assert!(PricingEngine::default().compute_cost(&spec).is_err());
}

#[test]
fn test_policies_diverge_on_same_costs() {
    let tariff = TariffTable::default();
    let spec = reference_spec();
    let divided = compute_cost(&spec, &tariff, &DivideByMargin::default()).unwrap();
    let marked_up = compute_cost(&spec, &tariff, &MarkupWithExemptions::default()).unwrap();
    assert_eq!(divided.costs, marked_up.costs);
    assert!(divided.prices.price_excl_vat > marked_up.prices.price_excl_vat);
}

#[test]
fn test_component_json_from_form() {
    let spec = JobSpec::from_json(
        r#"{
            "name": "Inner block",
            "quantity": 500,
            "format": "A2",
            "sharesPerSheet": 4,
            "pagesPerProduct": 16,
            "setupSheets": 150,
            "sheetArea": 0.25,
            "paperWeight": 0.115,
            "paperPrice": 9800,
            "priceType": "kg",
            "profitMargin": 25,
            "operations": {
                "printing": { "enabled": true, "doubleSided": true },
                "threadSewing": { "enabled": true, "signatures": 2 },
                "folding": { "enabled": true, "folds": 3 }
            }
        }"#,
    )
    .unwrap();
    let breakdown = price(&spec);
    assert_eq!(breakdown.sheets_per_product, 4);
    assert_eq!(breakdown.total_sheets, 2150);
    assert_eq!(breakdown.charges.len(), 2);
    assert_eq!(breakdown.costs.printing, 800_000.0);
}

#[test]
fn test_empty_job_sums_to_zero() {
    let quote = quote_job(
        &PrintJob::default(),
        &TariffTable::default(),
        &DivideByMargin::default(),
    )
    .unwrap();
    assert!(quote.components.is_empty());
    assert_eq!(quote.summary.total_cost, 0.0);
    assert_eq!(quote.summary.total_price_incl_vat, 0.0);
}

// ============================================================================
// Properties
// ============================================================================

fn arb_format() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::A1), Just(Format::A2), Just(Format::A3)]
}

fn arb_policy() -> impl Strategy<Value = PolicyKind> {
    prop_oneof![
        Just(PolicyKind::DivideByMargin),
        Just(PolicyKind::MarkupWithExemptions)
    ]
}

prop_compose! {
    fn arb_operations()(
        press in 0u8..3,
        double_sided in any::<bool>(),
        large_format in any::<bool>(),
        finishing in prop::collection::vec(any::<bool>(), 19),
        rings_count in 1u32..6,
        folds in 1u32..4,
        signatures in 1u32..10,
        white_color in any::<bool>(),
        manual_price in 0.0f64..200.0,
        spot_threshold in prop::option::of(0u64..3000),
    ) -> Operations {
        let mut ops = Operations::default();
        match press {
            1 => {
                ops.printing.enabled = true;
                ops.printing.double_sided = double_sided;
            }
            2 => {
                ops.digital_printing.enabled = true;
                ops.digital_printing.double_sided = double_sided;
                ops.digital_printing.large_format = large_format;
            }
            _ => {}
        }
        ops.lamination.enabled = finishing[0];
        ops.lamination.double_sided = double_sided;
        ops.uv_coating.enabled = finishing[1];
        ops.embossing.enabled = finishing[2];
        ops.die_cutting.enabled = finishing[3];
        ops.congreve.enabled = finishing[4];
        ops.foil.enabled = finishing[5];
        ops.binding.enabled = finishing[6];
        ops.binding.rings_count = rings_count;
        ops.stapling.enabled = finishing[7];
        ops.thermal_binding.enabled = finishing[8];
        ops.thread_sewing.enabled = finishing[9];
        ops.thread_sewing.signatures = signatures;
        ops.folding.enabled = finishing[10];
        ops.folding.folds = folds;
        ops.mounting.enabled = finishing[11];
        ops.three_d_lacquer.enabled = finishing[12];
        ops.three_d_foil.enabled = finishing[13];
        ops.spot_lacquer.enabled = finishing[14];
        ops.spot_lacquer.threshold = spot_threshold;
        ops.uv_printing.enabled = finishing[15];
        ops.uv_printing.white_color = white_color;
        ops.plotter.enabled = finishing[16];
        ops.fold_gluing.enabled = finishing[17];
        ops.manual_gluing.enabled = finishing[18];
        ops.manual_gluing.price_per_unit = manual_price;
        ops
    }
}

prop_compose! {
    fn arb_spec()(
        quantity in 1u64..20_000,
        format in arb_format(),
        shares_per_sheet in 1u64..16,
        pages_per_product in 1u64..64,
        setup_sheets in 0u64..500,
        printed_sheets in 1u64..4,
        sheet_area in 0.01f64..1.0,
        paper_weight in 0.05f64..0.5,
        paper_price in 1.0f64..50_000.0,
        profit_margin in 0.0f64..90.0,
    ) -> JobSpec {
        JobSpec {
            id: None,
            name: String::new(),
            quantity,
            format,
            shares_per_sheet,
            pages_per_product,
            setup_sheets,
            printed_sheets,
            sheet_area,
            paper_weight,
            paper_price,
            price_type: PriceType::PerKilogram,
            profit_margin,
            operations: Operations::default(),
        }
    }
}

prop_compose! {
    fn arb_spec_with_operations()(
        spec in arb_spec(),
        operations in arb_operations(),
    ) -> JobSpec {
        JobSpec { operations, ..spec }
    }
}

proptest! {
    #[test]
    fn prop_no_operations_costs_only_paper(spec in arb_spec()) {
        let breakdown = price(&spec);
        prop_assert_eq!(breakdown.costs.additional, 0.0);
        prop_assert!(breakdown.costs.additional.is_sign_positive());
        prop_assert_eq!(breakdown.costs.total, breakdown.costs.paper);
    }

    #[test]
    fn prop_total_sheets_monotone(spec in arb_spec(), extra in 1u64..1000) {
        let base = price(&spec).total_sheets;

        let mut more = spec.clone();
        more.quantity += extra;
        prop_assert!(price(&more).total_sheets >= base);

        let mut more = spec.clone();
        more.setup_sheets += extra;
        prop_assert!(price(&more).total_sheets >= base);

        let mut more = spec;
        more.printed_sheets += 1;
        prop_assert!(price(&more).total_sheets >= base);
    }

    #[test]
    fn prop_compute_cost_is_deterministic(
        spec in arb_spec_with_operations(),
        policy in arb_policy(),
    ) {
        let engine = PricingEngine::new(TariffTable::default(), policy.build());
        let first = engine.compute_cost(&spec).unwrap();
        let second = engine.compute_cost(&spec).unwrap();
        prop_assert_eq!(first.costs.total.to_bits(), second.costs.total.to_bits());
        prop_assert_eq!(
            first.prices.price_incl_vat.to_bits(),
            second.prices.price_incl_vat.to_bits()
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_charges_sum_to_additional_cost(spec in arb_spec_with_operations()) {
        let breakdown = price(&spec);
        let charged: f64 = breakdown.charges.iter().map(|c| c.cost).sum();
        prop_assert!((breakdown.costs.additional - charged).abs() <= 1e-6 * charged.abs().max(1.0));
        prop_assert_eq!(
            breakdown.charges.len() + breakdown.diagnostics.len(),
            spec.operations.enabled().len()
        );
        for diagnostic in &breakdown.diagnostics {
            prop_assert_eq!(diagnostic.format, Format::A1);
            prop_assert!(matches!(
                diagnostic.operation,
                OperationKind::ThreeDLacquer | OperationKind::ThreeDFoil | OperationKind::Plotter
            ));
        }
    }

    #[test]
    fn prop_unavailable_a1_operations_add_nothing(
        spec in arb_spec_with_operations(),
        lacquer in any::<bool>(),
    ) {
        let mut plain = spec;
        plain.format = Format::A1;
        plain.operations.three_d_lacquer.enabled = false;
        plain.operations.three_d_foil.enabled = false;
        plain.operations.plotter.enabled = false;

        let mut with_3d = plain.clone();
        if lacquer {
            with_3d.operations.three_d_lacquer.enabled = true;
        } else {
            with_3d.operations.three_d_foil.enabled = true;
        }

        let plain = price(&plain);
        let with_3d = price(&with_3d);
        prop_assert_eq!(plain.costs, with_3d.costs);
        prop_assert_eq!(with_3d.diagnostics.len(), 1);
    }

    #[test]
    fn prop_summary_is_sum_of_components(
        specs in prop::collection::vec(arb_spec_with_operations(), 0..6),
        policy in arb_policy(),
    ) {
        let engine = PricingEngine::new(TariffTable::default(), policy.build());
        let quote = engine
            .quote_job(&PrintJob { components: specs.clone() })
            .unwrap();
        prop_assert_eq!(quote.components.len(), specs.len());
        prop_assert_eq!(quote.summary, summarize(&quote.components));
        let expected: f64 = quote.components.iter().map(|c| c.costs.total).sum();
        prop_assert!((quote.summary.total_cost - expected).abs() <= 1e-6 * expected.max(1.0));
    }
}

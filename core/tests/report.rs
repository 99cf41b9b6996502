use upsell_ab_core::{
    report::{render_summary, ConversionChart, PurchaseBoxPlot},
    run_analysis,
    types::Group,
    SimulationParameters,
};

#[test]
fn summary_text_names_rates_and_decision() {
    let report = run_analysis(&SimulationParameters::default()).unwrap();
    let text = render_summary(&report);

    assert!(text.contains("Store-Brand = "));
    assert!(text.contains(&format!("{:.2}%", report.control_conversion_rate * 100.0)));
    assert!(text.contains(&format!("(p-value = {:.4})", report.conversion_test.p_value)));
    assert!(text.contains("At a 95% confidence level"));
    assert!(text.contains(report.decision.message()));
}

#[test]
fn chart_data_covers_both_arms() {
    let report = run_analysis(&SimulationParameters::default()).unwrap();

    let bars = ConversionChart::from_report(&report).bars;
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].label, "Store-Brand");
    assert_eq!(bars[1].label, "National-Brand");
    assert_eq!(bars[1].value, report.treatment_conversion_rate);

    let plot = PurchaseBoxPlot::from_users(&report.users);
    for (series, group) in plot.series.iter().zip(Group::ALL) {
        assert_eq!(series.count, report.purchases(group).len());
        let s = series.summary.expect("converted users present");
        assert!(s.min <= s.q1 && s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max);
    }
}

#[test]
fn report_serializes_to_json() {
    let report = run_analysis(&SimulationParameters {
        population: 1_000,
        ..SimulationParameters::default()
    })
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["users"].as_array().unwrap().len(), 1_000);
    assert!(json["decision"].is_string());
    assert!(json["conversion_test"]["p_value"].is_number());
}

#[test]
fn summary_text_is_the_report_display() {
    let report = run_analysis(&SimulationParameters::default()).unwrap();
    let text = render_summary(&report);

    assert_eq!(text, report.to_string());
    assert!(text.starts_with("=== STATISTICAL RESULTS ==="));
    assert!(text.contains("=== CONVERSION TABLE ==="));
}

use upsell_ab_core::decision::{decide, Decision};

#[test]
fn both_significant_means_national_brand_wins() {
    assert_eq!(decide(0.01, 0.02, 0.05), Decision::NationalBrandWins);
}

#[test]
fn neither_significant_means_no_difference() {
    assert_eq!(decide(0.40, 0.90, 0.05), Decision::NoSignificantDifference);
}

#[test]
fn one_significant_means_mixed_results() {
    assert_eq!(decide(0.01, 0.30, 0.05), Decision::MixedResults);
    assert_eq!(decide(0.30, 0.01, 0.05), Decision::MixedResults);
}

#[test]
fn p_value_equal_to_alpha_is_not_significant() {
    let alpha = 0.05;
    assert_eq!(decide(alpha, alpha, alpha), Decision::NoSignificantDifference);
    assert_eq!(decide(0.01, alpha, alpha), Decision::MixedResults);
    assert_eq!(decide(alpha, 0.01, alpha), Decision::MixedResults);
}

#[test]
fn decision_is_a_pure_function_of_its_inputs() {
    for &(pc, pp, a) in &[(0.01, 0.01, 0.05), (0.2, 0.01, 0.1), (0.5, 0.5, 0.01)] {
        assert_eq!(decide(pc, pp, a), decide(pc, pp, a));
    }
}

#[test]
fn messages_match_recommendation_text() {
    assert_eq!(
        Decision::NationalBrandWins.message(),
        "National-Brand items perform significantly better."
    );
    assert_eq!(
        Decision::NoSignificantDifference.to_string(),
        "No significant difference; consider sticking with Store-Brand items."
    );
    assert_eq!(
        Decision::MixedResults.message(),
        "Mixed results; further investigation needed."
    );
}

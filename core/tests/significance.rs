use approx::assert_abs_diff_eq;
use upsell_ab_core::{
    error::ErrorKind,
    significance::{chi_square_independence, t_test, TTestType},
    summary::ContingencyTable,
};

fn table(counts: [[u64; 2]; 2]) -> ContingencyTable {
    ContingencyTable { counts }
}

#[test]
fn chi_square_with_yates_matches_reference() {
    // Rows: control, treatment. Columns: not converted, converted.
    let result = chi_square_independence(&table([[90, 10], [80, 20]]), true).unwrap();

    assert_abs_diff_eq!(result.statistic, 3.176470588235294, epsilon = 1e-9);
    assert_abs_diff_eq!(result.p_value, 0.07470593331213041, epsilon = 1e-6);
    assert_eq!(result.degrees_of_freedom, 1.0);
}

#[test]
fn chi_square_without_yates_matches_reference() {
    let result = chi_square_independence(&table([[90, 10], [80, 20]]), false).unwrap();

    assert_abs_diff_eq!(result.statistic, 3.9215686274509807, epsilon = 1e-9);
    assert_abs_diff_eq!(result.p_value, 0.04767038065616144, epsilon = 1e-6);
}

#[test]
fn chi_square_of_proportional_table_is_not_significant() {
    let result = chi_square_independence(&table([[90, 10], [90, 10]]), true).unwrap();

    assert_eq!(result.statistic, 0.0);
    assert_abs_diff_eq!(result.p_value, 1.0, epsilon = 1e-12);
}

#[test]
fn chi_square_rejects_empty_rows_and_columns() {
    let empty_row = chi_square_independence(&table([[0, 0], [80, 20]]), true).unwrap_err();
    assert_eq!(empty_row.kind(), ErrorKind::InsufficientData);

    let no_conversions = chi_square_independence(&table([[90, 0], [80, 0]]), true).unwrap_err();
    assert_eq!(no_conversions.kind(), ErrorKind::InsufficientData);
}

#[test]
fn student_t_test_matches_reference() {
    let result = t_test(&[1.0, 2.0, 3.0], &[7.0, 8.0, 9.0], TTestType::Student).unwrap();

    assert_abs_diff_eq!(result.statistic, -7.348469228349534, epsilon = 1e-9);
    assert_eq!(result.degrees_of_freedom, 4.0);
    assert_abs_diff_eq!(result.p_value, 0.0018262606682599646, epsilon = 1e-6);
}

#[test]
fn welch_t_test_uses_satterthwaite_degrees_of_freedom() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let y = [2.0, 4.0, 6.0, 8.0, 10.0];
    let result = t_test(&x, &y, TTestType::Welch).unwrap();

    // var(x) = 5/3, var(y) = 10
    let se2 = (5.0 / 3.0) / 4.0 + 10.0 / 5.0;
    let expected_t = (2.5 - 6.0) / f64::sqrt(se2);
    let expected_df = se2 * se2 / (((5.0 / 3.0) / 4.0_f64).powi(2) / 3.0 + 2.0_f64.powi(2) / 4.0);

    assert_abs_diff_eq!(result.statistic, expected_t, epsilon = 1e-12);
    assert_abs_diff_eq!(result.degrees_of_freedom, expected_df, epsilon = 1e-12);
    assert!(result.p_value > 0.0 && result.p_value < 1.0);
}

#[test]
fn identical_samples_give_zero_statistic_and_unit_p_value() {
    let x = [4.0, 5.0, 6.0];
    let result = t_test(&x, &x, TTestType::Student).unwrap();

    assert_eq!(result.statistic, 0.0);
    assert_abs_diff_eq!(result.p_value, 1.0, epsilon = 1e-12);
}

#[test]
fn t_test_needs_two_observations_per_sample() {
    let err = t_test(&[1.0], &[1.0, 2.0, 3.0], TTestType::Student).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);

    let err = t_test(&[1.0, 2.0], &[], TTestType::Welch).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn constant_samples_are_insufficient_not_nan() {
    let err = t_test(&[5.0, 5.0], &[5.0, 5.0, 5.0], TTestType::Student).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn p_values_stay_in_unit_interval() {
    let far = t_test(&[0.0, 0.1, 0.2], &[1000.0, 1000.1, 1000.2], TTestType::Student).unwrap();
    assert!((0.0..=1.0).contains(&far.p_value));

    let skewed = chi_square_independence(&table([[5000, 0], [0, 5000]]), true).unwrap();
    assert!((0.0..=1.0).contains(&skewed.p_value));
    assert!(skewed.p_value < 1e-10);
}

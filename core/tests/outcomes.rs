use upsell_ab_core::{
    error::ErrorKind,
    rng::{RngBank, StageSlot},
    simulation::{simulate_outcomes, ArmParams, ArmTable},
    types::{Group, UserRecord},
};

fn simulate(groups: &[Group], control: ArmParams, treatment: ArmParams, seed: u64) -> Vec<UserRecord> {
    let bank = RngBank::new(seed);
    let mut conversion = bank.for_stage(StageSlot::Conversion);
    let mut purchase = bank.for_stage(StageSlot::Purchase);
    simulate_outcomes(groups, &ArmTable::new(control, treatment), &mut conversion, &mut purchase)
}

fn alternating(n: usize) -> Vec<Group> {
    (0..n).map(|i| if i % 2 == 0 { Group::Control } else { Group::Treatment }).collect()
}

#[test]
fn non_converted_users_always_have_zero_purchase() {
    let control = ArmParams::new(0.3, 5.0, 1.5).unwrap();
    let treatment = ArmParams::new(0.6, 6.0, 2.0).unwrap();
    let users = simulate(&alternating(10_000), control, treatment, 11);

    for u in users.iter().filter(|u| !u.converted) {
        assert_eq!(u.purchase_amount, 0.0, "user {} did not convert but spent", u.id);
    }
    assert!(users.iter().any(|u| u.converted));
}

#[test]
fn user_ids_run_from_one_to_n_in_group_order() {
    let groups = alternating(50);
    let users = simulate(&groups, ArmParams::new(0.5, 5.0, 1.0).unwrap(), ArmParams::new(0.5, 5.0, 1.0).unwrap(), 2);

    for (i, (u, g)) in users.iter().zip(&groups).enumerate() {
        assert_eq!(u.id, i as u64 + 1);
        assert_eq!(u.group, *g);
    }
}

#[test]
fn rate_zero_never_converts_and_rate_one_always_converts() {
    let never = ArmParams::new(0.0, 5.0, 1.5).unwrap();
    let always = ArmParams::new(1.0, 6.0, 2.0).unwrap();
    let users = simulate(&alternating(2_000), never, always, 5);

    assert!(users.iter().filter(|u| u.group == Group::Control).all(|u| !u.converted));
    assert!(users.iter().filter(|u| u.group == Group::Treatment).all(|u| u.converted));
}

#[test]
fn conversion_rates_follow_each_arm() {
    let control = ArmParams::new(0.08, 5.0, 1.5).unwrap();
    let treatment = ArmParams::new(0.20, 6.0, 2.0).unwrap();
    let users = simulate(&alternating(100_000), control, treatment, 17);

    let rate = |g: Group| {
        let members: Vec<_> = users.iter().filter(|u| u.group == g).collect();
        members.iter().filter(|u| u.converted).count() as f64 / members.len() as f64
    };
    assert!((rate(Group::Control) - 0.08).abs() < 0.01);
    assert!((rate(Group::Treatment) - 0.20).abs() < 0.01);
}

#[test]
fn wide_distributions_keep_negative_purchases_unclamped() {
    let wide = ArmParams::new(1.0, 1.0, 5.0).unwrap();
    let users = simulate(&alternating(1_000), wide, wide, 8);

    let negatives = users.iter().filter(|u| u.purchase_amount < 0.0).count();
    // P(X < 0) for N(1, 5) is ~0.42.
    assert!(negatives > 300, "expected many negative draws, got {negatives}");
    assert!(users.iter().filter(|u| u.purchase_amount < 0.0).all(|u| u.converted));
}

#[test]
fn invalid_arm_parameters_report_every_violation() {
    let err = ArmParams::new(1.2, 5.0, 0.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, vec!["conversion_rate", "purchase_std"]);

    assert!(ArmParams::new(-0.1, 5.0, 1.0).is_err());
    assert!(ArmParams::new(0.1, 5.0, -1.0).is_err());
}

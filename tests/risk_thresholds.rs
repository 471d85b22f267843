#[path = "../src/risk.rs"]
mod risk;

use risk::{classify, RiskTier, Thresholds};

#[test]
fn worked_examples_with_default_thresholds() {
    let t = Thresholds::default();
    assert_eq!(classify(35.0, 70.0, &t), RiskTier::High);
    assert_eq!(classify(55.0, 80.0, &t), RiskTier::Medium);
    assert_eq!(classify(95.0, 95.0, &t), RiskTier::Low);
}

#[test]
fn low_attendance_forces_high_regardless_of_marks() {
    let t = Thresholds::default();
    assert_eq!(classify(98.0, 49.9, &t), RiskTier::High);
    assert_eq!(classify(98.0, 50.0, &t), RiskTier::Low);
}

#[test]
fn cutoffs_are_strict_less_than() {
    let t = Thresholds::default();
    // Exactly at the marks cutoff is not High, and exactly at the medium
    // cutoff is not Medium.
    assert_eq!(classify(40.0, 80.0, &t), RiskTier::Medium);
    assert_eq!(classify(60.0, 80.0, &t), RiskTier::Low);
    assert_eq!(classify(39.9, 80.0, &t), RiskTier::High);
}

#[test]
fn total_and_deterministic_over_the_whole_domain() {
    let t = Thresholds::default();
    for marks in (0..=100).step_by(5) {
        for attendance in (0..=100).step_by(5) {
            let a = classify(marks as f64, attendance as f64, &t);
            let b = classify(marks as f64, attendance as f64, &t);
            assert_eq!(a, b, "marks={} attendance={}", marks, attendance);
            assert!(matches!(
                a,
                RiskTier::High | RiskTier::Medium | RiskTier::Low
            ));
        }
    }
}

#[test]
fn changing_thresholds_reclassifies() {
    let relaxed = Thresholds {
        high_risk_cutoff: 20.0,
        medium_risk_cutoff: 40.0,
        attendance_cutoff: 30.0,
    };
    let strict = Thresholds {
        high_risk_cutoff: 60.0,
        medium_risk_cutoff: 80.0,
        attendance_cutoff: 70.0,
    };
    assert_eq!(classify(55.0, 75.0, &relaxed), RiskTier::Low);
    assert_eq!(classify(55.0, 75.0, &strict), RiskTier::High);
}

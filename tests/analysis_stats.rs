#[path = "../src/stats.rs"]
mod stats;

fn close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
}

#[test]
fn pearson_detects_perfect_linear_relations() {
    let xs = [1.0, 2.0, 3.0, 4.0];
    let up = [10.0, 20.0, 30.0, 40.0];
    let down = [8.0, 6.0, 4.0, 2.0];
    close(stats::pearson(&xs, &up).expect("positive"), 1.0);
    close(stats::pearson(&xs, &down).expect("negative"), -1.0);
}

#[test]
fn pearson_is_symmetric() {
    let xs = [3.0, 7.0, 1.0, 9.0, 4.0];
    let ys = [2.0, 8.0, 3.0, 7.0, 5.0];
    close(
        stats::pearson(&xs, &ys).expect("xy"),
        stats::pearson(&ys, &xs).expect("yx"),
    );
}

#[test]
fn pearson_is_undefined_for_constant_or_short_columns() {
    assert!(stats::pearson(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).is_none());
    assert!(stats::pearson(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).is_none());
    assert!(stats::pearson(&[1.0], &[2.0]).is_none());
    assert!(stats::pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
}

#[test]
fn attendance_bands_are_right_inclusive() {
    assert_eq!(stats::attendance_band(0.0), 0);
    assert_eq!(stats::attendance_band(50.0), 0);
    assert_eq!(stats::attendance_band(50.1), 1);
    assert_eq!(stats::attendance_band(60.0), 1);
    assert_eq!(stats::attendance_band(90.0), 4);
    assert_eq!(stats::attendance_band(90.5), 5);
    assert_eq!(stats::attendance_band(100.0), 5);
}

#[test]
fn attendance_impact_averages_marks_per_band() {
    // (attendance, marks)
    let rows = [
        (45.0, 30.0),
        (48.0, 40.0),
        (75.0, 60.0),
        (95.0, 90.0),
        (100.0, 80.0),
    ];
    let impact = stats::attendance_impact(&rows);
    close(impact[0].expect("low band"), 35.0);
    assert!(impact[1].is_none());
    assert!(impact[2].is_none());
    close(impact[3].expect("70-80 band"), 60.0);
    assert!(impact[4].is_none());
    close(impact[5].expect("top band"), 85.0);
}

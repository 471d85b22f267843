//! Numeric helpers behind the correlation and absentee-impact views. The
//! presentation layer draws the charts; this module only supplies the values.

/// Pearson correlation coefficient. None when either column has zero
/// variance (the coefficient is undefined there, not zero).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx) * (x - mx);
        vy += (y - my) * (y - my);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

pub const ATTENDANCE_BANDS: [&str; 6] = [
    "<50%", "50-60%", "60-70%", "70-80%", "80-90%", "90-100%",
];

/// Band index for an attendance percentage. Bands are right-inclusive
/// ((50,60] and so on) with the first band absorbing everything up to 50.
pub fn attendance_band(attendance: f64) -> usize {
    if attendance <= 50.0 {
        0
    } else if attendance <= 60.0 {
        1
    } else if attendance <= 70.0 {
        2
    } else if attendance <= 80.0 {
        3
    } else if attendance <= 90.0 {
        4
    } else {
        5
    }
}

/// Average marks per attendance band. None for empty bands.
pub fn attendance_impact(rows: &[(f64, f64)]) -> [Option<f64>; 6] {
    let mut sums = [0.0f64; 6];
    let mut counts = [0usize; 6];
    for &(attendance, marks) in rows {
        let b = attendance_band(attendance);
        sums[b] += marks;
        counts[b] += 1;
    }
    let mut out = [None; 6];
    for i in 0..6 {
        if counts[i] > 0 {
            out[i] = Some(sums[i] / counts[i] as f64);
        }
    }
    out
}

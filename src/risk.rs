/// Classification tiers, ordered worst-first to match how the UI sorts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Medium => "Medium Risk",
            Self::Low => "Low Risk",
        }
    }
}

/// Runtime-adjustable cutoffs. Never persisted; every read reclassifies
/// against whatever the operator last set.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub high_risk_cutoff: f64,
    pub medium_risk_cutoff: f64,
    pub attendance_cutoff: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_risk_cutoff: 40.0,
            medium_risk_cutoff: 60.0,
            attendance_cutoff: 50.0,
        }
    }
}

/// Pure and total: marks below the high cutoff or attendance below the
/// attendance cutoff is High; otherwise marks below the medium cutoff is
/// Medium; everything else is Low.
pub fn classify(marks: f64, attendance: f64, t: &Thresholds) -> RiskTier {
    if marks < t.high_risk_cutoff || attendance < t.attendance_cutoff {
        RiskTier::High
    } else if marks < t.medium_risk_cutoff {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

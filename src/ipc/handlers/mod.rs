pub mod admissions;
pub mod analysis;
pub mod core;
pub mod exports;
pub mod insights;
pub mod overview;
pub mod removal;
pub mod thresholds;

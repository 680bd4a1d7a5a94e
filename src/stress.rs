use serde::{Deserialize, Serialize};
use tracing::warn;

/// Heat-stress tier derived from the ITH (temperature-humidity index).
///
/// Tier ranges partition the whole real line: `<68`, `[68,72)`, `[72,80)`,
/// `[80,90)`, `>=90`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressTier {
    NoStress,
    Mild,
    Moderate,
    Heavy,
    Severe,
}

impl StressTier {
    /// Classify an ITH value. Total over all floats: a NaN reading is
    /// treated as NoStress and logged as an anomaly.
    pub fn classify(ith: f64) -> Self {
        if ith.is_nan() {
            warn!("NaN ITH value passed to classifier, treating as NoStress");
            return StressTier::NoStress;
        }
        if ith < 68.0 {
            StressTier::NoStress
        } else if ith < 72.0 {
            StressTier::Mild
        } else if ith < 80.0 {
            StressTier::Moderate
        } else if ith < 90.0 {
            StressTier::Heavy
        } else {
            StressTier::Severe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressTier::NoStress => "Sin estrés calórico",
            StressTier::Mild => "Estrés calórico leve",
            StressTier::Moderate => "Estrés calórico moderado",
            StressTier::Heavy => "Estrés calórico pesado",
            StressTier::Severe => "Estrés calórico grave/mortal",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StressTier::NoStress => "#4CAF50",
            StressTier::Mild => "#CDDC39",
            StressTier::Moderate => "#FFEB3B",
            StressTier::Heavy => "#FF9800",
            StressTier::Severe => "#F44336",
        }
    }

    /// Ordinal severity, 0 (no stress) through 4 (severe).
    pub fn level(&self) -> u8 {
        match self {
            StressTier::NoStress => 0,
            StressTier::Mild => 1,
            StressTier::Moderate => 2,
            StressTier::Heavy => 3,
            StressTier::Severe => 4,
        }
    }
}

use std::fmt;

use serde::Serialize;

/// Verdict final du pipeline.
///
/// `Display` rend exactement le libellé publié sur stdout.
///
/// # Example
/// ```
/// use lc_core::category::Category;
/// assert_eq!(Category::TooLoud.to_string(), "Too Loud");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Near-silent clip; the model is not consulted for these.
    #[serde(rename = "Low / Silent")]
    LowSilent,
    #[serde(rename = "Acceptable")]
    Acceptable,
    #[serde(rename = "Too Loud")]
    TooLoud,
}

impl Category {
    /// Libellé texte de la catégorie.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowSilent => "Low / Silent",
            Self::Acceptable => "Acceptable",
            Self::TooLoud => "Too Loud",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seuils du catégoriseur.
///
/// # Example
/// ```
/// use lc_core::category::{Category, Thresholds};
/// let t = Thresholds::default();
/// assert_eq!(t.categorize(0.2, 0.10), Category::Acceptable);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Below this RMS the clip is `LowSilent`, whatever the model says.
    pub silence_rms: f64,
    /// Predictions below this value are `Acceptable`.
    pub loud_prediction: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            silence_rms: 0.05,
            loud_prediction: 0.15,
        }
    }
}

impl Thresholds {
    /// Applique les règles dans l'ordre ; la première qui correspond gagne.
    ///
    /// The RMS gate runs first: the model is unreliable on near-zero energy input.
    #[must_use]
    pub fn categorize(&self, rms: f64, prediction: f64) -> Category {
        if rms < self.silence_rms {
            Category::LowSilent
        } else if prediction < self.loud_prediction {
            Category::Acceptable
        } else {
            Category::TooLoud
        }
    }
}

/// Categorize with the default thresholds (0.05 RMS, 0.15 prediction).
///
/// # Example
/// ```
/// use lc_core::category::{Category, categorize};
/// assert_eq!(categorize(0.01, 5.0), Category::LowSilent);
/// ```
#[must_use]
pub fn categorize(rms: f64, prediction: f64) -> Category {
    Thresholds::default().categorize(rms, prediction)
}

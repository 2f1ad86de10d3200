use serde::Serialize;

/// Nombre de descripteurs attendus par le modèle.
pub const FEATURE_COUNT: usize = 4;

/// Descripteurs d'un clip, dans l'ordre fixe attendu par le modèle :
/// `[peak, loudness_db, zcr, centroid]`.
///
/// L'ordre est un contrat avec le modèle entraîné, il ne doit jamais changer.
///
/// # Example
/// ```
/// use lc_core::features::FeatureVector;
/// let fv = FeatureVector::new(0.5, -12.0, 0.1, 3999.5);
/// assert_eq!(fv.as_array()[1], -12.0);
/// assert_eq!(fv.zero_crossing_rate(), 0.1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub const fn new(peak: f64, loudness_db: f64, zcr: f64, centroid: f64) -> Self {
        Self([peak, loudness_db, zcr, centroid])
    }

    /// Valeurs brutes, dans l'ordre du modèle.
    #[must_use]
    pub const fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Amplitude crête `max |y|`.
    #[must_use]
    pub const fn peak(&self) -> f64 {
        self.0[0]
    }

    /// Proxy de sonie en dB : `20·log10(mean |y| + ε)`.
    #[must_use]
    pub const fn loudness_db(&self) -> f64 {
        self.0[1]
    }

    #[must_use]
    pub const fn zero_crossing_rate(&self) -> f64 {
        self.0[2]
    }

    /// Indice moyen pondéré par l'amplitude (domaine temporel).
    #[must_use]
    pub const fn centroid(&self) -> f64 {
        self.0[3]
    }

    /// `true` si aucune valeur n'est NaN ou infinie.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Result of one extraction call: the model inputs plus the RMS used by the categorizer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Extraction {
    pub features: FeatureVector,
    /// Root-mean-square amplitude of the analysed window. Always `>= 0`.
    pub rms: f64,
}

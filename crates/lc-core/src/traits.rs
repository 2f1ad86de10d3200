use crate::error::ModelError;
use crate::features::FeatureVector;

/// Modèle prédictif opaque : quatre descripteurs → un scalaire.
///
/// Le cœur ne suppose rien de l'algorithme interne. `Send + Sync` : un modèle
/// chargé une fois peut être lu depuis plusieurs threads tant que personne ne
/// le modifie.
///
/// # Example
/// ```
/// use lc_core::traits::Predictor;
/// use lc_core::features::FeatureVector;
/// use lc_core::error::ModelError;
///
/// struct Constant(f64);
/// impl Predictor for Constant {
///     fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
///         Ok(self.0)
///     }
/// }
/// let p = Constant(0.1);
/// assert_eq!(p.predict(&FeatureVector::new(0.0, 0.0, 0.0, 0.0)).unwrap(), 0.1);
/// ```
pub trait Predictor: Send + Sync {
    /// Évalue le modèle sur un vecteur de descripteurs.
    ///
    /// # Errors
    /// Returns a [`ModelError`] if the model cannot produce a finite value.
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

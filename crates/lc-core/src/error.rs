use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}

/// Errors raised while loading or evaluating a predictive model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The model artifact could not be read or deserialized.
    #[error("Chargement du modèle impossible ({path}) : {reason}")]
    Load {
        /// Path of the artifact.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// The artifact was read but describes an unusable model.
    #[error("Modèle invalide : {0}")]
    Invalid(String),

    /// The model produced NaN or an infinite value.
    #[error("Prédiction non finie : {0}")]
    NonFinite(f64),
}

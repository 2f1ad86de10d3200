use std::path::Path;

use lc_core::error::ModelError;

use crate::model::LoudnessModel;

/// Encodage de l'artefact modèle sur disque.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    /// `serde_json`, human-editable. Default for unknown extensions.
    Json,
    /// `bincode`, compact.
    Bincode,
}

impl ModelFormat {
    /// Déduit le format depuis l'extension (`.bin` → bincode, sinon JSON).
    ///
    /// # Example
    /// ```
    /// use lc_model::io::ModelFormat;
    /// use std::path::Path;
    /// assert_eq!(ModelFormat::from_path(Path::new("m.bin")), ModelFormat::Bincode);
    /// assert_eq!(ModelFormat::from_path(Path::new("m.json")), ModelFormat::Json);
    /// assert_eq!(ModelFormat::from_path(Path::new("model")), ModelFormat::Json);
    /// ```
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("bin") => Self::Bincode,
            _ => Self::Json,
        }
    }
}

fn load_error(path: &Path, reason: impl ToString) -> ModelError {
    ModelError::Load {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Charge et valide un modèle. Appelé une seule fois au démarrage.
///
/// # Errors
/// Returns [`ModelError::Load`] if the file cannot be read or decoded, and
/// [`ModelError::Invalid`] if the decoded model fails validation.
///
/// # Example
/// ```no_run
/// use lc_model::io::load_model;
/// use std::path::Path;
/// let model = load_model(Path::new("loudness_model.json")).unwrap();
/// ```
pub fn load_model(path: &Path) -> Result<LoudnessModel, ModelError> {
    let bytes = std::fs::read(path).map_err(|e| load_error(path, e))?;
    let model: LoudnessModel = match ModelFormat::from_path(path) {
        ModelFormat::Json => serde_json::from_slice(&bytes).map_err(|e| load_error(path, e))?,
        ModelFormat::Bincode => bincode::deserialize(&bytes).map_err(|e| load_error(path, e))?,
    };
    model.validate()?;
    log::info!("Modèle chargé : {} depuis {}", model.describe(), path.display());
    Ok(model)
}

/// Écrit un modèle dans le format déduit de l'extension.
///
/// # Errors
/// Returns [`ModelError::Load`] if encoding or writing fails.
pub fn save_model(model: &LoudnessModel, path: &Path) -> Result<(), ModelError> {
    let bytes = match ModelFormat::from_path(path) {
        ModelFormat::Json => serde_json::to_vec_pretty(model).map_err(|e| load_error(path, e))?,
        ModelFormat::Bincode => bincode::serialize(model).map_err(|e| load_error(path, e))?,
    };
    std::fs::write(path, bytes).map_err(|e| load_error(path, e))
}

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::category::Thresholds;
use crate::error::CoreError;

/// Chemin par défaut de l'artefact modèle, relatif au répertoire courant.
pub const DEFAULT_MODEL_PATH: &str = "loudness_model.json";

/// Fenêtre d'analyse par défaut en échantillons (0,5 s à 16 kHz).
pub const DEFAULT_WINDOW_SAMPLES: usize = 8000;

/// Fenêtre d'analyse appliquée au signal mono avant extraction.
///
/// # Example
/// ```
/// use lc_core::config::AnalysisWindow;
/// assert_eq!(AnalysisWindow::default().frames(44100), 8000);
/// assert_eq!(AnalysisWindow::Duration(0.5).frames(44100), 22050);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnalysisWindow {
    /// Fixed number of samples, whatever the sample rate.
    Fixed(usize),
    /// Fixed duration in seconds; `round(rate * seconds)` samples.
    Duration(f64),
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self::Fixed(DEFAULT_WINDOW_SAMPLES)
    }
}

impl AnalysisWindow {
    /// Nombre d'échantillons mono conservés pour un taux donné. Toujours `>= 1`.
    #[must_use]
    pub fn frames(&self, sample_rate: u32) -> usize {
        match *self {
            Self::Fixed(n) => n.max(1),
            Self::Duration(secs) => ((f64::from(sample_rate) * secs).round() as usize).max(1),
        }
    }
}

/// Window selector as written in TOML.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    #[default]
    Fixed,
    Duration,
}

/// Format des lignes écrites sur stdout.
///
/// # Example
/// ```
/// use lc_core::config::OutputFormat;
/// assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Label only (or `error: ...`).
    #[default]
    Text,
    /// `<rms>,<label>`.
    Csv,
    /// One JSON object per line.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(CoreError::Config(format!("format de sortie inconnu '{other}'"))),
        }
    }
}

/// Configuration complète du classifieur.
///
/// Chargée depuis TOML, chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use lc_core::config::ClassifierConfig;
/// let config = ClassifierConfig::default();
/// assert_eq!(config.thresholds.silence_rms, 0.05);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifierConfig {
    // === Modèle ===
    pub model_path: PathBuf,

    // === Analyse ===
    pub window: AnalysisWindow,

    // === Catégorisation ===
    pub thresholds: Thresholds,

    // === Sortie ===
    pub output_format: OutputFormat,
    /// Threads used in batch mode. 0 = rayon default.
    pub jobs: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            window: AnalysisWindow::default(),
            thresholds: Thresholds::default(),
            output_format: OutputFormat::Text,
            jobs: 0,
        }
    }
}

impl ClassifierConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.window = match self.window {
            AnalysisWindow::Fixed(n) => AnalysisWindow::Fixed(n.clamp(1, 10_000_000)),
            AnalysisWindow::Duration(s) => AnalysisWindow::Duration(s.clamp(0.001, 600.0)),
        };
        self.thresholds.silence_rms = self.thresholds.silence_rms.clamp(0.0, 1.0);
        self.jobs = self.jobs.min(256);
    }

    /// Rejette les valeurs que `clamp_all` ne peut pas corriger.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for non-finite thresholds or window length.
    pub fn validate(&self) -> Result<(), CoreError> {
        let t = &self.thresholds;
        if !t.silence_rms.is_finite() || !t.loud_prediction.is_finite() {
            return Err(CoreError::Config(format!(
                "seuils non finis (silence_rms = {}, loud_prediction = {})",
                t.silence_rms, t.loud_prediction
            )));
        }
        if let AnalysisWindow::Duration(s) = self.window
            && !s.is_finite()
        {
            return Err(CoreError::Config(format!("window_seconds non fini : {s}")));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    model: Option<ModelSection>,
    analysis: Option<AnalysisSection>,
    thresholds: Option<ThresholdSection>,
    output: Option<OutputSection>,
}

#[derive(Deserialize)]
struct ModelSection {
    path: Option<PathBuf>,
}

#[derive(Deserialize)]
struct AnalysisSection {
    window: Option<WindowMode>,
    window_samples: Option<usize>,
    window_seconds: Option<f64>,
}

#[derive(Deserialize)]
struct ThresholdSection {
    silence_rms: Option<f64>,
    loud_prediction: Option<f64>,
}

#[derive(Deserialize)]
struct OutputSection {
    format: Option<OutputFormat>,
    jobs: Option<usize>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or holds non-finite values.
///
/// # Example
/// ```no_run
/// use lc_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ClassifierConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}

/// Parse un document TOML déjà en mémoire.
///
/// # Errors
/// Returns an error on TOML syntax errors or invalid values.
pub fn parse_config(content: &str) -> Result<ClassifierConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = ClassifierConfig::default();

    if let Some(m) = file.model
        && let Some(v) = m.path
    {
        config.model_path = v;
    }

    if let Some(a) = file.analysis {
        let mode = a.window.unwrap_or_default();
        config.window = match mode {
            WindowMode::Fixed => {
                AnalysisWindow::Fixed(a.window_samples.unwrap_or(DEFAULT_WINDOW_SAMPLES))
            }
            WindowMode::Duration => AnalysisWindow::Duration(a.window_seconds.unwrap_or(0.5)),
        };
        if mode == WindowMode::Fixed && a.window_seconds.is_some() {
            log::warn!("window_seconds ignoré : window = \"fixed\"");
        }
        if mode == WindowMode::Duration && a.window_samples.is_some() {
            log::warn!("window_samples ignoré : window = \"duration\"");
        }
    }

    if let Some(t) = file.thresholds {
        if let Some(v) = t.silence_rms {
            config.thresholds.silence_rms = v;
        }
        if let Some(v) = t.loud_prediction {
            config.thresholds.loud_prediction = v;
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.format {
            config.output_format = v;
        }
        if let Some(v) = o.jobs {
            config.jobs = v;
        }
    }

    config.validate()?;
    config.clamp_all();
    Ok(config)
}

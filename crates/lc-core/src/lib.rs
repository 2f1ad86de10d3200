/// Shared types, configuration, and the predictor seam for loudclass.
///
/// This crate holds everything the audio, model, and app crates exchange:
/// the feature vector, the category labels, thresholds, and error types.

pub mod category;
pub mod config;
pub mod error;
pub mod features;
pub mod traits;

pub use category::{Category, Thresholds, categorize};
pub use config::{AnalysisWindow, ClassifierConfig, OutputFormat};
pub use error::{CoreError, ModelError};
pub use features::{Extraction, FEATURE_COUNT, FeatureVector};
pub use traits::Predictor;

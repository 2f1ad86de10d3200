use std::path::Path;

use lc_core::config::OutputFormat;
use lc_core::{Category, Extraction};
use serde::Serialize;

use crate::pipeline::Verdict;

/// Issue d'une classification, succès ou erreur, pour un fichier.
pub type Outcome = anyhow::Result<Verdict>;

#[derive(Serialize)]
struct JsonVerdict<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    label: Category,
    prediction: f64,
    #[serde(flatten)]
    extraction: &'a Extraction,
}

#[derive(Serialize)]
struct JsonError {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    error: String,
}

/// Rend une ligne de sortie (sans saut de ligne).
///
/// `path` is `Some` in batch mode: text lines are then prefixed with the path
/// and a tab, csv lines with the path and a comma.
#[must_use]
pub fn render_line(format: OutputFormat, path: Option<&Path>, outcome: &Outcome) -> String {
    match format {
        OutputFormat::Text => {
            let body = match outcome {
                Ok(v) => v.category.to_string(),
                Err(e) => format!("error: {e:#}"),
            };
            match path {
                Some(p) => format!("{}\t{body}", p.display()),
                None => body,
            }
        }
        OutputFormat::Csv => {
            let body = match outcome {
                Ok(v) => format!("{},{}", v.extraction.rms, v.category),
                Err(e) => format!("error: {e:#}"),
            };
            match path {
                Some(p) => format!("{},{body}", p.display()),
                None => body,
            }
        }
        OutputFormat::Json => {
            let file = path.map(|p| p.display().to_string());
            let rendered = match outcome {
                Ok(v) => serde_json::to_string(&JsonVerdict {
                    file,
                    label: v.category,
                    prediction: v.prediction,
                    extraction: &v.extraction,
                }),
                Err(e) => serde_json::to_string(&JsonError {
                    file,
                    error: format!("{e:#}"),
                }),
            };
            rendered.unwrap_or_else(|e| format!("error: {e}"))
        }
    }
}

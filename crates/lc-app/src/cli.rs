use std::path::PathBuf;

use clap::Parser;

/// loudclass — classe la sonie perçue d'un court clip audio.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier(s) audio à classer. Plusieurs fichiers : une ligne par fichier.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Artefact modèle (.json ou .bin). Remplace [model] path.
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Fenêtre d'analyse en secondes (dépend du taux d'échantillonnage).
    #[arg(long, conflicts_with = "window_samples")]
    pub window_seconds: Option<f64>,

    /// Fenêtre d'analyse en échantillons, quel que soit le taux.
    #[arg(long)]
    pub window_samples: Option<usize>,

    /// Format de sortie : text, csv, json.
    #[arg(long)]
    pub format: Option<String>,

    /// Threads pour le mode lot (0 = automatique).
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// `true` when more than one input was given.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        self.inputs.len() > 1
    }
}

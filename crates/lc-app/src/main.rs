use anyhow::Result;
use clap::Parser;
use lc_core::config::{AnalysisWindow, ClassifierConfig, OutputFormat};

pub mod batch;
pub mod cli;
pub mod pipeline;
pub mod report;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging (stderr : stdout reste réservé au verdict)
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3..5. Config, modèle, classification
    for line in run(&cli) {
        println!("{line}");
    }

    Ok(())
}

/// Exécute une invocation complète et renvoie les lignes à écrire sur stdout.
///
/// Global failures (config, model) still yield one line per input, so the
/// caller never has to special-case them.
fn run(cli: &cli::Cli) -> Vec<String> {
    // 3. Charger la config puis appliquer les overrides CLI
    let config = match resolve_config(cli) {
        Ok(config) => config,
        Err(e) => return failure_lines(cli, requested_format(cli), &e),
    };

    // 4. Charger le modèle une seule fois, partagé en lecture seule
    let model = match lc_model::load_model(&config.model_path) {
        Ok(m) => m,
        Err(e) => return failure_lines(cli, config.output_format, &anyhow::Error::from(e)),
    };

    // 5. Classer
    if cli.is_batch() {
        let outcomes = batch::run_batch(&cli.inputs, &model, &config);
        cli.inputs
            .iter()
            .zip(&outcomes)
            .map(|(path, outcome)| {
                report::render_line(config.output_format, Some(path.as_path()), outcome)
            })
            .collect()
    } else {
        cli.inputs
            .first()
            .map(|path| {
                let outcome = pipeline::classify_file(path, &model, &config);
                report::render_line(config.output_format, None, &outcome)
            })
            .into_iter()
            .collect()
    }
}

/// Resolve config: --config if present, defaults otherwise, then CLI overrides.
fn resolve_config(cli: &cli::Cli) -> Result<ClassifierConfig> {
    let mut config = if cli.config.exists() {
        lc_core::config::load_config(&cli.config)?
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        ClassifierConfig::default()
    };

    if let Some(ref path) = cli.model {
        config.model_path.clone_from(path);
    }
    if let Some(secs) = cli.window_seconds {
        config.window = AnalysisWindow::Duration(secs);
    }
    if let Some(n) = cli.window_samples {
        config.window = AnalysisWindow::Fixed(n);
    }
    if let Some(ref fmt) = cli.format {
        config.output_format = match fmt.parse::<OutputFormat>() {
            Ok(f) => f,
            Err(e) => {
                log::warn!("{e}, utilisation de '{:?}'.", config.output_format);
                config.output_format
            }
        };
    }
    if let Some(jobs) = cli.jobs {
        config.jobs = jobs;
    }

    config.validate()?;
    config.clamp_all();
    Ok(config)
}

/// Format demandé en ligne de commande, texte s'il est absent ou inconnu.
fn requested_format(cli: &cli::Cli) -> OutputFormat {
    cli.format
        .as_deref()
        .and_then(|f| f.parse().ok())
        .unwrap_or_default()
}

/// Une erreur globale (config, modèle) : une ligne d'erreur par entrée.
fn failure_lines(cli: &cli::Cli, format: OutputFormat, error: &anyhow::Error) -> Vec<String> {
    log::debug!("échec global : {error:?}");
    let render = |path: Option<&std::path::Path>| {
        let outcome: report::Outcome = Err(anyhow::anyhow!("{error:#}"));
        report::render_line(format, path, &outcome)
    };
    if cli.is_batch() {
        cli.inputs.iter().map(|p| render(Some(p.as_path()))).collect()
    } else {
        vec![render(None)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    const NO_CONFIG: &str = "/nonexistent/loudclass.toml";

    fn parse(args: &[&str]) -> cli::Cli {
        cli::Cli::try_parse_from(std::iter::once("loudclass").chain(args.iter().copied()))
            .unwrap()
    }

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("loudclass.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    fn write_loud_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..8000 {
            writer
                .write_sample(if (i / 10) % 2 == 0 { 20_000_i16 } else { -20_000 })
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let config = resolve_config(&parse(&["-c", NO_CONFIG, "a.wav"])).unwrap();
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn cli_flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [model]
            path = "from_file.json"

            [analysis]
            window = "duration"
            window_seconds = 0.25

            [output]
            format = "csv"
            jobs = 3
            "#,
        );
        let path = path.to_str().unwrap();

        let config = resolve_config(&parse(&["-c", path, "a.wav"])).unwrap();
        assert_eq!(config.model_path, PathBuf::from("from_file.json"));
        assert_eq!(config.window, AnalysisWindow::Duration(0.25));
        assert_eq!(config.jobs, 3);

        let config = resolve_config(&parse(&[
            "-c",
            path,
            "--model",
            "other.bin",
            "--window-samples",
            "2048",
            "-j",
            "5",
            "a.wav",
        ]))
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("other.bin"));
        assert_eq!(config.window, AnalysisWindow::Fixed(2048));
        assert_eq!(config.jobs, 5);
        assert_eq!(config.output_format, OutputFormat::Csv);

        let config =
            resolve_config(&parse(&["-c", NO_CONFIG, "--window-seconds", "1.5", "a.wav"])).unwrap();
        assert_eq!(config.window, AnalysisWindow::Duration(1.5));
    }

    #[test]
    fn unknown_format_keeps_the_configured_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[output]\nformat = \"json\"\n");
        let cli = parse(&["-c", path.to_str().unwrap(), "--format", "xml", "a.wav"]);
        assert_eq!(resolve_config(&cli).unwrap().output_format, OutputFormat::Json);
        assert_eq!(requested_format(&cli), OutputFormat::Text);

        let cli = parse(&["-c", NO_CONFIG, "--format", "CSV", "a.wav"]);
        assert_eq!(resolve_config(&cli).unwrap().output_format, OutputFormat::Csv);
        assert_eq!(requested_format(&cli), OutputFormat::Csv);
    }

    #[test]
    fn unloadable_model_prints_one_error_line() {
        let lines = run(&parse(&[
            "-c",
            NO_CONFIG,
            "--model",
            "/nonexistent/model.json",
            "a.wav",
        ]));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("error: Chargement du modèle impossible"));
        assert!(lines[0].contains("/nonexistent/model.json"));
    }

    #[test]
    fn unloadable_model_in_batch_prints_one_line_per_input() {
        let lines = run(&parse(&[
            "-c",
            NO_CONFIG,
            "--model",
            "/nonexistent/model.json",
            "a.wav",
            "b.wav",
        ]));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a.wav\terror: "));
        assert!(lines[1].starts_with("b.wav\terror: "));
    }

    #[test]
    fn invalid_config_is_rendered_in_the_requested_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[thresholds]\nsilence_rms = nan\n");
        let lines = run(&parse(&["-c", path.to_str().unwrap(), "--format", "json", "a.wav"]));
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert!(value["error"].as_str().unwrap().contains("seuils non finis"));
    }

    #[test]
    fn classifies_with_a_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        std::fs::write(
            &model,
            r#"{ "linear": { "coefficients": [0.0, 0.0, 0.0, 0.0], "intercept": 0.9 } }"#,
        )
        .unwrap();
        let clip = dir.path().join("loud.wav");
        write_loud_wav(&clip);

        let lines = run(&parse(&[
            "-c",
            NO_CONFIG,
            "--model",
            model.to_str().unwrap(),
            clip.to_str().unwrap(),
        ]));
        assert_eq!(lines, vec!["Too Loud".to_string()]);
    }
}

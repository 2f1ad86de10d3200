use std::path::Path;

use anyhow::Result;
use lc_audio::buffer::AudioBuffer;
use lc_audio::decode::decode_file;
use lc_audio::features::extract;
use lc_core::config::ClassifierConfig;
use lc_core::{Category, Extraction, Predictor};

/// Résultat complet d'une classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verdict {
    pub category: Category,
    pub extraction: Extraction,
    pub prediction: f64,
}

/// extract → predict → categorize, sur un buffer déjà décodé.
///
/// The model is always consulted, even when the RMS gate will decide the
/// category, so a broken model surfaces on every input.
///
/// # Errors
/// Returns an error if the buffer is empty or the predictor fails.
pub fn classify_buffer(
    buffer: &AudioBuffer,
    predictor: &dyn Predictor,
    config: &ClassifierConfig,
) -> Result<Verdict> {
    let extraction = extract(buffer, config.window)?;
    let prediction = predictor.predict(&extraction.features)?;
    let category = config.thresholds.categorize(extraction.rms, prediction);

    log::debug!(
        "features={:?} rms={:.5} prediction={:.5} → {}",
        extraction.features.as_array(),
        extraction.rms,
        prediction,
        category
    );

    Ok(Verdict {
        category,
        extraction,
        prediction,
    })
}

/// Décode `path` (borné à la fenêtre d'analyse) puis classe le buffer.
///
/// # Errors
/// Returns an error if decoding, extraction, or prediction fails.
pub fn classify_file(
    path: &Path,
    predictor: &dyn Predictor,
    config: &ClassifierConfig,
) -> Result<Verdict> {
    let buffer = decode_file(path, Some(config.window))?;
    classify_buffer(&buffer, predictor, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lc_core::error::ModelError;
    use lc_core::features::FeatureVector;
    use std::sync::Mutex;

    struct Fixed(f64);
    impl Predictor for Fixed {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            Ok(self.0)
        }
    }

    struct Failing;
    impl Predictor for Failing {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            Err(ModelError::Invalid("boom".into()))
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<FeatureVector>>);
    impl Predictor for Recording {
        fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(*features);
            }
            Ok(0.0)
        }
    }

    fn square(n: usize, amp: f32) -> AudioBuffer {
        AudioBuffer::mono(
            (0..n).map(|i| if (i / 8) % 2 == 0 { amp } else { -amp }).collect(),
            16000,
        )
    }

    #[test]
    fn audible_clip_follows_prediction() {
        let config = ClassifierConfig::default();
        let buf = square(8000, 0.5);
        assert_eq!(
            classify_buffer(&buf, &Fixed(0.10), &config).unwrap().category,
            Category::Acceptable
        );
        assert_eq!(
            classify_buffer(&buf, &Fixed(0.20), &config).unwrap().category,
            Category::TooLoud
        );
    }

    #[test]
    fn quiet_clip_ignores_prediction() {
        let config = ClassifierConfig::default();
        let verdict = classify_buffer(&square(8000, 0.01), &Fixed(5.0), &config).unwrap();
        assert_eq!(verdict.category, Category::LowSilent);
        assert!((verdict.prediction - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn predictor_sees_extracted_features() {
        let config = ClassifierConfig::default();
        let recorder = Recording::default();
        let verdict = classify_buffer(&square(20_000, 0.3), &recorder, &config).unwrap();
        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.as_slice(), &[verdict.extraction.features]);
    }

    #[test]
    fn model_failure_propagates() {
        let config = ClassifierConfig::default();
        let err = classify_buffer(&square(100, 0.5), &Failing, &config).unwrap_err();
        assert_eq!(format!("{err:#}"), "Modèle invalide : boom");
    }

    #[test]
    fn empty_buffer_fails() {
        let config = ClassifierConfig::default();
        let buf = AudioBuffer::mono(Vec::new(), 16000);
        let err = classify_buffer(&buf, &Fixed(0.0), &config).unwrap_err();
        assert!(err.to_string().contains("Aucun échantillon"));
    }

    #[test]
    fn classifies_a_wav_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loud.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..16_000 {
            let s: i16 = if (i / 20) % 2 == 0 { 20_000 } else { -20_000 };
            writer.write_sample(s).unwrap();
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let verdict = classify_file(&path, &Fixed(0.9), &ClassifierConfig::default()).unwrap();
        assert_eq!(verdict.category, Category::TooLoud);
        assert!(verdict.extraction.rms > 0.5);
    }
}

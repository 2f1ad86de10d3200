use lc_core::config::AnalysisWindow;
use lc_core::features::{Extraction, FeatureVector};

use crate::buffer::AudioBuffer;
use crate::error::AudioError;

/// Additive guard against `log10(0)` and zero denominators.
pub const EPSILON: f64 = 1e-6;

/// Extract the model features and RMS from a decoded buffer.
///
/// Collapses to mono, keeps the first `window.frames(rate)` samples, then
/// delegates to [`extract_mono`]. Pure: same buffer, same result.
///
/// # Errors
/// Returns [`AudioError::EmptyInput`] if the buffer holds no sample.
///
/// # Example
/// ```
/// use lc_audio::buffer::AudioBuffer;
/// use lc_audio::features::extract;
/// use lc_core::config::AnalysisWindow;
///
/// let buf = AudioBuffer::mono(vec![0.0f32; 1024], 16000);
/// let out = extract(&buf, AnalysisWindow::default()).unwrap();
/// assert_eq!(out.rms, 0.0);
/// assert_eq!(out.features.peak(), 0.0);
/// ```
pub fn extract(buffer: &AudioBuffer, window: AnalysisWindow) -> Result<Extraction, AudioError> {
    if buffer.is_empty() {
        return Err(AudioError::EmptyInput);
    }
    let mono = buffer.to_mono(window.frames(buffer.sample_rate()));
    extract_mono(&mono)
}

/// Calcule les descripteurs sur un signal déjà mono et déjà fenêtré.
///
/// Single pass for peak, mean |y|, mean y² and the index-weighted sum; a second
/// pass over consecutive pairs for the zero-crossing rate. Accumulation is in
/// `f64`. Non-finite samples count as silence.
///
/// # Errors
/// Returns [`AudioError::EmptyInput`] if `samples` is empty.
pub fn extract_mono(samples: &[f32]) -> Result<Extraction, AudioError> {
    if samples.is_empty() {
        return Err(AudioError::EmptyInput);
    }

    let n = samples.len() as f64;
    let mut peak = 0.0f64;
    let mut abs_sum = 0.0f64;
    let mut sq_sum = 0.0f64;
    let mut weighted = 0.0f64;

    for (i, &s) in samples.iter().enumerate() {
        let a = f64::from(sanitize(s)).abs();
        peak = peak.max(a);
        abs_sum += a;
        sq_sum += a * a;
        weighted += i as f64 * a;
    }

    let loudness_db = 20.0 * (abs_sum / n + EPSILON).log10();
    let centroid = weighted / (abs_sum + EPSILON);
    let rms = (sq_sum / n).sqrt();

    Ok(Extraction {
        features: FeatureVector::new(peak, loudness_db, zero_crossing_rate(samples), centroid),
        rms,
    })
}

/// `mean |sign(y_i) - sign(y_{i-1})| / 2`, in `[0, 1]`. Zero below two samples.
fn zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let total: u64 = samples
        .windows(2)
        .map(|w| u64::from((sign(w[1]) - sign(w[0])).unsigned_abs()))
        .sum();
    total as f64 / (samples.len() - 1) as f64 / 2.0
}

#[inline]
fn sign(x: f32) -> i8 {
    let x = sanitize(x);
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

#[inline]
fn sanitize(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}

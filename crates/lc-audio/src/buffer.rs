use std::borrow::Cow;

use crate::error::AudioError;

/// Buffer audio décodé : échantillons `f32` entrelacés, nombre de canaux, taux.
///
/// Possédé par l'appelant ; l'extracteur ne fait que le lire.
///
/// # Example
/// ```
/// use lc_audio::buffer::AudioBuffer;
/// let buf = AudioBuffer::new(vec![0.5, -0.5, 0.25, -0.25], 2, 16000).unwrap();
/// assert_eq!(buf.frames(), 2);
/// assert_eq!(buf.to_mono(usize::MAX).as_ref(), &[0.0, 0.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Construit un buffer à partir d'échantillons entrelacés.
    ///
    /// # Errors
    /// Returns [`AudioError::ChannelLayout`] if `channels` is zero or does not divide
    /// the sample count.
    pub fn new(samples: Vec<f32>, channels: usize, sample_rate: u32) -> Result<Self, AudioError> {
        if channels == 0 || samples.len() % channels != 0 {
            return Err(AudioError::ChannelLayout {
                samples: samples.len(),
                channels,
            });
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Buffer mono, toujours valide.
    #[must_use]
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: 1,
            sample_rate,
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Nombre de frames (échantillons par canal).
    #[must_use]
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Downmix mono des `max_frames` premières frames.
    ///
    /// Each output sample is the arithmetic mean across channels at that index.
    /// Mono input is borrowed, not copied.
    #[must_use]
    pub fn to_mono(&self, max_frames: usize) -> Cow<'_, [f32]> {
        let frames = self.frames().min(max_frames);
        if self.channels == 1 {
            return Cow::Borrowed(&self.samples[..frames]);
        }

        let n = self.channels as f32;
        Cow::Owned(
            self.samples
                .chunks_exact(self.channels)
                .take(frames)
                .map(|frame| frame.iter().sum::<f32>() / n)
                .collect(),
        )
    }
}

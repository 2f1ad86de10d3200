use thiserror::Error;

/// Errors originating from the audio module.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The file could not be opened, probed, or decoded.
    #[error("Erreur de décodage : {0}")]
    Decode(String),

    /// Unsupported audio format or codec.
    #[error("Format audio non supporté : {0}")]
    UnsupportedFormat(String),

    /// The buffer holds no usable sample.
    #[error("Aucun échantillon audio exploitable")]
    EmptyInput,

    /// Interleaved data does not split into whole frames.
    #[error("Disposition de canaux invalide : {samples} échantillons pour {channels} canal(aux)")]
    ChannelLayout {
        /// Total interleaved sample count.
        samples: usize,
        /// Declared channel count.
        channels: usize,
    },
}

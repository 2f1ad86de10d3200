use std::fs::File;
use std::path::Path;

use lc_core::config::AnalysisWindow;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::buffer::AudioBuffer;
use crate::error::AudioError;

/// Fallback rate when neither the container nor the first packet reports one.
const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// Decode an audio file into an interleaved [`AudioBuffer`].
///
/// Supports WAV, MP3, FLAC, OGG, AAC via symphonia. Channels are kept as-is;
/// the mono downmix belongs to the extractor.
///
/// With `window`, decoding stops as soon as enough frames are buffered to
/// fill it, so long files cost no more than short ones.
///
/// # Errors
/// Returns [`AudioError::Decode`] if the file cannot be opened, holds no audio
/// track, or yields no decodable packet, [`AudioError::UnsupportedFormat`] if
/// no demuxer or codec handles it.
///
/// # Example
/// ```no_run
/// use lc_audio::decode::decode_file;
/// use lc_core::config::AnalysisWindow;
/// let buffer = decode_file("clip.wav", Some(AnalysisWindow::default())).unwrap();
/// ```
pub fn decode_file(
    path: impl AsRef<Path>,
    window: Option<AnalysisWindow>,
) -> Result<AudioBuffer, AudioError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        AudioError::Decode(format!("impossible d'ouvrir {} : {e}", path.display()))
    })?;
    let mss = MediaSourceStream::new(
        Box::new(file),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::UnsupportedFormat(format!("{}: {e}", path.display())))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::Decode(format!("aucune piste audio dans {}", path.display())))?;

    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track
        .codec_params
        .channels
        .map(symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::UnsupportedFormat(format!("codec : {e}")))?;

    let track_id = track.id;
    let mut all_samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut max_sample_frames: usize = 0;
    let mut frame_limit: Option<usize> = None;
    let mut last_frame_error: Option<String> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(e) => {
                end_of_stream(e, all_samples.len(), path)?;
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Audio decode frame error: {e}");
                last_frame_error = Some(e.to_string());
                continue;
            }
            Err(e) => return Err(AudioError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        let ch = *channels.get_or_insert(spec.channels.count());
        let rate = *sample_rate.get_or_insert(spec.rate);
        if frame_limit.is_none() {
            frame_limit = window.map(|w| w.frames(rate));
        }

        let num_frames = decoded.capacity();
        // Reuse SampleBuffer: only reallocate if this packet is bigger than current capacity
        if sample_buf.is_none() || num_frames > max_sample_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            max_sample_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);
        all_samples.extend_from_slice(buf.samples());

        if let Some(limit) = frame_limit
            && all_samples.len() >= limit.saturating_mul(ch.max(1))
        {
            break;
        }
    }

    // Des paquets présents mais tous illisibles : le fichier est corrompu, pas vide.
    if all_samples.is_empty()
        && let Some(e) = last_frame_error
    {
        return Err(AudioError::Decode(format!(
            "aucun paquet décodable dans {} : {e}",
            path.display()
        )));
    }

    let channels = channels.unwrap_or(1).max(1);
    let sample_rate = sample_rate.unwrap_or(FALLBACK_SAMPLE_RATE);
    if let Some(limit) = frame_limit {
        all_samples.truncate(limit.saturating_mul(channels));
    }
    // Un paquet tronqué peut laisser une frame incomplète.
    all_samples.truncate(all_samples.len() - all_samples.len() % channels);

    log::info!(
        "Decoded {} frames x {} ch @ {}Hz from {}",
        all_samples.len() / channels,
        channels,
        sample_rate,
        path.display()
    );

    AudioBuffer::new(all_samples, channels, sample_rate)
}

/// Classe une erreur de `next_packet` : fin normale du flux ou échec.
///
/// EOF ends the stream. Any other demuxer error is fatal when nothing has been
/// decoded yet; after that, the samples already read are kept.
fn end_of_stream(err: SymphoniaError, decoded: usize, path: &Path) -> Result<(), AudioError> {
    match err {
        SymphoniaError::IoError(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(()),
        e if decoded == 0 => Err(AudioError::Decode(format!("{} : {e}", path.display()))),
        SymphoniaError::ResetRequired => {
            log::warn!("Flux réinitialisé dans {}, arrêt du décodage", path.display());
            Ok(())
        }
        e => {
            log::warn!(
                "Audio decode packet error: {e}, {decoded} échantillons conservés ({})",
                path.display()
            );
            Ok(())
        }
    }
}

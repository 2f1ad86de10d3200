// Audio decoding and signal-level feature extraction for loudclass.

pub mod buffer;
pub mod decode;
pub mod error;
pub mod features;

pub use buffer::AudioBuffer;
pub use error::AudioError;

//! Optional inputs: a background image and a looping audio track.

pub mod audio;
pub mod image;
pub mod media;

pub use audio::{AudioTrack, PcmTrack};
pub use image::RasterImage;
pub use media::AudioPcm;

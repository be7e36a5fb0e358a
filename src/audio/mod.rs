//! Audio payload handling: transport decoding and WAV container encoding.

mod container;
mod resource;

pub use container::{
    decode_bytes, encode_container, ContainerInfo, DEFAULT_SAMPLE_RATE, HEADER_LEN,
};
pub use resource::AudioResource;

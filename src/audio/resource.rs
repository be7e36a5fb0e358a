//! Owned handle to a finished WAV buffer.

use super::container::ContainerInfo;
use crate::error::Result;
use std::sync::Arc;

/// Opaque handle to an encoded briefing.
///
/// Cloning is cheap and shares the buffer; the bytes are freed when the last
/// handle is dropped, so releasing a resource means dropping every handle.
#[derive(Clone)]
pub struct AudioResource {
    bytes: Arc<[u8]>,
    info: ContainerInfo,
}

impl AudioResource {
    /// Take ownership of a WAV buffer, validating its header.
    pub fn from_wav(bytes: Vec<u8>) -> Result<Self> {
        let info = ContainerInfo::parse(&bytes)?;
        Ok(Self {
            bytes: bytes.into(),
            info,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn info(&self) -> ContainerInfo {
        self.info
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Playback length derived from the header.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.info.duration_seconds()
    }

    /// Number of live handles to this buffer.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.bytes)
    }

    /// Write the container to disk.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

impl std::fmt::Debug for AudioResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioResource")
            .field("len", &self.bytes.len())
            .field("info", &self.info)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encode_container;

    #[test]
    fn test_handles_share_buffer() {
        let resource = AudioResource::from_wav(encode_container(&[0u8; 480], 24_000)).unwrap();
        assert_eq!(resource.handle_count(), 1);

        let copy = resource.clone();
        assert_eq!(resource.handle_count(), 2);
        drop(copy);
        assert_eq!(resource.handle_count(), 1);
        assert_eq!(resource.duration_seconds(), Some(0.01));
    }

    #[test]
    fn test_save_writes_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("briefing.wav");
        let resource = AudioResource::from_wav(encode_container(&[1, 2, 3, 4], 24_000)).unwrap();

        resource.save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), resource.bytes());
    }
}

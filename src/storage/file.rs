//! File-backed blob store
//!
//! Each key lives in `{dir}/{key}.blob`. Writes go to a sibling temp file
//! that is fsynced and renamed over the target.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, StoreError};

use super::BlobStore;

/// Frame magic bytes
pub const MAGIC: &[u8; 4] = b"SBLB";

/// Magic (4) + CRC (4) + Len (4)
pub const HEADER_SIZE: usize = 12;

/// Blob store writing one file per key
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Blob files are created under `dir` (created on first write)
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.blob", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.blob.tmp", key))
    }

    /// Wrap a payload in magic + checksum + length
    fn encode_frame(payload: &[u8]) -> Result<Bytes> {
        let len = u32::try_from(payload.len()).map_err(|_| {
            StoreError::StoreWrite(format!("blob of {} bytes is too large", payload.len()))
        })?;

        let mut frame = BytesMut::with_capacity(HEADER_SIZE + payload.len());
        frame.put_slice(MAGIC);
        frame.put_u32_le(crc32fast::hash(payload));
        frame.put_u32_le(len);
        frame.put_slice(payload);
        Ok(frame.freeze())
    }

    /// Validate a frame and return its payload
    fn decode_frame(key: &str, mut frame: Bytes) -> Result<Bytes> {
        if frame.len() < HEADER_SIZE {
            return Err(StoreError::StoreRead(format!(
                "blob '{}' truncated: {} bytes",
                key,
                frame.len()
            )));
        }
        if &frame[..4] != MAGIC {
            return Err(StoreError::StoreRead(format!("blob '{}' has bad magic", key)));
        }
        frame.advance(4);

        let crc = frame.get_u32_le();
        let len = frame.get_u32_le() as usize;
        if frame.len() != len {
            return Err(StoreError::StoreRead(format!(
                "blob '{}' length mismatch: header says {}, found {}",
                key,
                len,
                frame.len()
            )));
        }
        if crc32fast::hash(&frame) != crc {
            return Err(StoreError::StoreRead(format!(
                "blob '{}' checksum mismatch",
                key
            )));
        }

        Ok(frame)
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let path = self.blob_path(key);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::StoreRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Self::decode_frame(key, Bytes::from(raw)).map(Some)
    }

    async fn set(&self, key: &str, blob: Bytes) -> Result<()> {
        let write_err = |e: std::io::Error| StoreError::StoreWrite(e.to_string());

        let frame = Self::encode_frame(&blob)?;
        fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        // Step 1: Write and sync the temp file
        let temp = self.temp_path(key);
        let mut file = fs::File::create(&temp).await.map_err(write_err)?;
        file.write_all(&frame).await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);

        // Step 2: Atomically replace the previous blob
        fs::rename(&temp, self.blob_path(key))
            .await
            .map_err(write_err)?;

        tracing::trace!(key, bytes = blob.len(), "blob written");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

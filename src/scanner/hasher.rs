//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//! [`Hasher`] reads a file front to back in fixed-size chunks and feeds it
//! through BLAKE3. The byte count is checked against the size recorded at
//! scan time so a file that changed between walking and hashing is caught
//! instead of silently producing a digest for different content.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::HashError;

/// A 256-bit BLAKE3 content digest.
pub type Hash = [u8; 32];

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming BLAKE3 file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Compute the digest of a file's full content.
    ///
    /// # Arguments
    ///
    /// * `path` - File to hash
    /// * `expected_size` - Size recorded when the file was discovered
    ///
    /// # Errors
    ///
    /// - `NotFound` / `PermissionDenied` / `Io` if the file cannot be opened or read
    /// - `ShortRead` if the number of bytes read differs from `expected_size`
    pub fn full_hash(&self, path: &Path, expected_size: u64) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let (hash, read) = self
            .hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))?;

        if read != expected_size {
            log::warn!(
                "Size of {} changed since scan: expected {} bytes, read {}",
                path.display(),
                expected_size,
                read
            );
            return Err(HashError::ShortRead {
                path: path.to_path_buf(),
                expected: expected_size,
                actual: read,
            });
        }

        log::trace!("Hashed {} ({} bytes)", path.display(), read);
        Ok(hash)
    }

    /// Hash everything a reader yields, returning the digest and byte count.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<(Hash, u64)> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];
        let mut total: u64 = 0;

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
            total += n as u64;
        }

        Ok((*hasher.finalize().as_bytes(), total))
    }
}

/// Format a digest as lowercase hexadecimal (64 characters).
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut out = String::with_capacity(hash.len() * 2);
    for byte in hash {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

//! Byte-for-byte identity verification for digest collisions.
//!
//! Two records with the same digest are re-read side by side in fixed-size
//! chunks and compared; the first differing chunk ends the comparison. Memory
//! use is two chunk buffers regardless of file size.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::scanner::FileEntry;

/// Chunk size used for side-by-side comparison.
pub const COMPARE_CHUNK_SIZE: usize = 64 * 1024;

/// Errors raised while re-reading a collided pair.
#[derive(thiserror::Error, Debug)]
pub enum VerifyError {
    /// A file could not be opened or read.
    #[error("I/O error re-reading {path}: {source}")]
    Io {
        /// File being re-read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file's length no longer matches the size recorded at scan time.
    #[error("Short read for {path}: expected {expected} bytes, read {actual}")]
    ShortRead {
        /// File being re-read
        path: PathBuf,
        /// Size recorded at scan time
        expected: u64,
        /// Bytes observed
        actual: u64,
    },
}

impl VerifyError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Check whether two records have byte-identical content.
///
/// Returns `Ok(false)` when recorded sizes differ or any byte differs; that
/// is a digest collision without identity, not an error.
///
/// # Errors
///
/// - `Io` if either file cannot be opened or read
/// - `ShortRead` if a file ends before, or runs past, its recorded size
pub fn verify_identical(a: &FileEntry, b: &FileEntry) -> Result<bool, VerifyError> {
    verify_with_chunk_size(a, b, COMPARE_CHUNK_SIZE)
}

pub(crate) fn verify_with_chunk_size(
    a: &FileEntry,
    b: &FileEntry,
    chunk_size: usize,
) -> Result<bool, VerifyError> {
    if a.size != b.size {
        log::debug!(
            "Size mismatch between {} ({}) and {} ({})",
            a.path.display(),
            a.size,
            b.path.display(),
            b.size
        );
        return Ok(false);
    }

    let mut reader_a = File::open(&a.path).map_err(|e| VerifyError::io(&a.path, e))?;
    let mut reader_b = File::open(&b.path).map_err(|e| VerifyError::io(&b.path, e))?;

    let chunk_size = chunk_size.max(1);
    let mut buf_a = vec![0u8; chunk_size];
    let mut buf_b = vec![0u8; chunk_size];
    let mut read_a: u64 = 0;
    let mut read_b: u64 = 0;

    loop {
        let n_a = fill(&mut reader_a, &mut buf_a).map_err(|e| VerifyError::io(&a.path, e))?;
        let n_b = fill(&mut reader_b, &mut buf_b).map_err(|e| VerifyError::io(&b.path, e))?;
        read_a += n_a as u64;
        read_b += n_b as u64;

        check_length(a, read_a, n_a < chunk_size)?;
        check_length(b, read_b, n_b < chunk_size)?;

        if buf_a[..n_a] != buf_b[..n_b] {
            log::debug!(
                "Content differs between {} and {} near byte {}",
                a.path.display(),
                b.path.display(),
                read_a.saturating_sub(n_a as u64)
            );
            return Ok(false);
        }

        if n_a == 0 {
            return Ok(true);
        }
    }
}

/// Fail if a file has produced more bytes than recorded, or hit EOF early.
fn check_length(entry: &FileEntry, read: u64, at_eof: bool) -> Result<(), VerifyError> {
    if read > entry.size || (at_eof && read != entry.size) {
        return Err(VerifyError::ShortRead {
            path: entry.path.clone(),
            expected: entry.size,
            actual: read,
        });
    }
    Ok(())
}

/// Read until `buf` is full or the reader is exhausted.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

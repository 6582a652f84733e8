use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

const BUFFER_SIZE: usize = 8192;

/// 128-bit content fingerprint: the leading 16 bytes of the BLAKE3 hash.
///
/// Only used as an equality and ordering key inside one size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest {
    high: u64,
    low: u64,
}

impl Digest {
    pub const fn from_parts(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    fn from_blake3(hash: &blake3::Hash) -> Self {
        let bytes = hash.as_bytes();
        let mut high = [0u8; 8];
        let mut low = [0u8; 8];
        high.copy_from_slice(&bytes[..8]);
        low.copy_from_slice(&bytes[8..16]);
        Self {
            high: u64::from_be_bytes(high),
            low: u64::from_be_bytes(low),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.high, self.low)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Hashes the whole content of `file_path`.
///
/// `expected_len` is the size seen during the scan; reading a different
/// number of bytes means the file changed underneath us and is an error.
pub fn hash_file(file_path: &Path, expected_len: u64) -> Result<Digest> {
    debug!("Calculating hash for: '{}'", file_path.display());

    let file = File::open(file_path).map_err(|e| Error::io(file_path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0; BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| Error::io(file_path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
        total_bytes += bytes_read as u64;
    }

    if total_bytes != expected_len {
        return Err(Error::SizeChanged {
            path: file_path.to_path_buf(),
            expected: expected_len,
            actual: total_bytes,
        });
    }

    let digest = Digest::from_blake3(&hasher.finalize());
    debug!("Hash calculated for '{}': {} ({} bytes)", file_path.display(), digest, total_bytes);
    Ok(digest)
}

/// Byte-for-byte comparison of two files.
pub fn files_identical(first: &Path, second: &Path) -> Result<bool> {
    let first_len = first.metadata().map_err(|e| Error::io(first, e))?.len();
    let second_len = second.metadata().map_err(|e| Error::io(second, e))?.len();
    if first_len != second_len {
        warn!(
            "logic error: comparing files of different sizes: '{}' ({}) and '{}' ({})",
            first.display(),
            first_len,
            second.display(),
            second_len
        );
        return Ok(false);
    }

    let mut first_reader = BufReader::new(File::open(first).map_err(|e| Error::io(first, e))?);
    let mut second_reader = BufReader::new(File::open(second).map_err(|e| Error::io(second, e))?);
    let mut first_buf = [0; BUFFER_SIZE];
    let mut second_buf = [0; BUFFER_SIZE];

    loop {
        let n = read_full(&mut first_reader, &mut first_buf).map_err(|e| Error::io(first, e))?;
        let m = read_full(&mut second_reader, &mut second_buf).map_err(|e| Error::io(second, e))?;
        if n != m || first_buf[..n] != second_buf[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

// `Read::read` may return short counts, so fill the buffer before comparing.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

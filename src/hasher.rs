//! Content digests for provenance using BLAKE3
//!
//! Text and file digests use the same algorithm over the same bytes, so a string and the
//! file it was written to always produce the same hex digest.

use crate::error::StorageError;
use blake3::Hasher;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Read size for streamed file hashing.
const CHUNK_SIZE: usize = 1024 * 1024;

/// Compute the hex digest of UTF-8 text
pub fn digest_text(text: &str) -> String {
    digest_bytes(text.as_bytes())
}

/// Compute the hex digest of arbitrary bytes
pub fn digest_bytes(data: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hex::encode(hasher.finalize().as_bytes())
}

/// Compute the hex digest of a file's full contents
///
/// The file is read in fixed-size chunks so memory stays bounded for large artifacts.
pub fn digest_file(path: &Path) -> Result<String, StorageError> {
    let mut file = File::open(path).map_err(|e| StorageError::read(path, e))?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(StorageError::read(path, e)),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize().as_bytes()))
}

/// Compute a digest over named member digests
///
/// Entries are sorted by name so the result does not depend on directory listing order.
pub fn digest_members(members: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = members.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Hasher::new();
    for (name, digest) in sorted {
        hasher.update(name.as_bytes());
        hasher.update(b":");
        hasher.update(digest.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize().as_bytes())
}

//! Content fingerprints for files referenced by call arguments

use crate::error::{MemoirError, MemoirResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Digest a file's contents using SHA256, returning the full hex string
pub fn fingerprint_file(path: &Path) -> MemoirResult<String> {
    let wrap = |source| MemoirError::Fingerprint {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(wrap)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf).map_err(wrap)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

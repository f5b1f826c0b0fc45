//! Content digests recorded in the report's `md5` column.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

const CHUNK_SIZE: usize = 8192;

/// MD5 of a byte buffer as 32 lowercase hex characters.
pub fn content_digest(data: &[u8]) -> String {
    to_hex(&Md5::digest(data))
}

/// MD5 of a file, streamed in fixed-size chunks.
pub fn file_digest<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        assert_eq!(content_digest(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            content_digest(b"The quick brown fox jumps over the lazy dog"),
            "9e107d9d372bb6826bd81d3542a419d6"
        );
    }

    #[test]
    fn test_file_digest_matches_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        let data: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let digest = file_digest(&path).unwrap();
        assert_eq!(digest, content_digest(&data));
        assert_eq!(digest.len(), 32);
    }
}

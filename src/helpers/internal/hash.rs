//! SHA-256 file hashing
//!
//! Used by the packager to write the archive checksum sidecar.

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Chunk size for reading files during hashing (1MB)
const CHUNK_SIZE: usize = 1024 * 1024;

/// Threshold for showing progress (100MB)
const PROGRESS_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Compute the lowercase hex SHA-256 of a file.
///
/// Shows percentage progress for files larger than 100MB.
pub fn sha256_file(file: &Path) -> std::io::Result<String> {
    let mut f = std::fs::File::open(file)?;
    let file_size = f.metadata().map(|m| m.len()).unwrap_or(0);
    sha256_reader(&mut f, file_size, file_size > PROGRESS_THRESHOLD)
}

fn sha256_reader(
    reader: &mut impl Read,
    file_size: u64,
    show_progress: bool,
) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut total_read = 0u64;
    let mut last_percent = 0u8;

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }

        hasher.update(&buffer[..n]);
        total_read += n as u64;

        if show_progress && file_size > 0 {
            let percent = ((total_read * 100) / file_size) as u8;
            if percent >= last_percent + 10 {
                print!("\r     checksum: {}%...", percent);
                std::io::Write::flush(&mut std::io::stdout()).ok();
                last_percent = percent;
            }
        }
    }

    if show_progress {
        println!();
    }

    Ok(hex::encode(hasher.finalize()))
}

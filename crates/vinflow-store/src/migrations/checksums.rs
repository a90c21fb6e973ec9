//! Migration checksums
//!
//! SHA-256 of the migration SQL with line endings normalized, so a CRLF
//! checkout hashes the same as the committed file.

use sha2::{Digest, Sha256};

pub fn compute_checksum(sql: &str) -> String {
    let normalized = sql.replace("\r\n", "\n");
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

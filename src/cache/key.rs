//! Partition naming for remote endpoints
//!
//! Responses from different API servers must never share cache entries, so
//! each endpoint gets its own partition named after a hash of its identity.

use sha2::{Digest, Sha256};

/// Hash the server URL and API base path into a partition name
///
/// A trailing slash on the server URL does not change the result.
pub fn partition_for_endpoint(server_url: &str, api_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(server_url.trim_end_matches('/').as_bytes());
    hasher.update(api_path.as_bytes());
    hex::encode(hasher.finalize())
}

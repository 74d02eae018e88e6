//! Deterministic pseudo-embedding.
//!
//! This is a placeholder, not a semantic vector: texts that mean the same thing
//! get unrelated vectors. It exists so the similarity RPC has something stable
//! to compare against until a real embedding model is wired in.

use md5::{Digest, Md5};

/// Width of the `vector` column the similarity RPC expects.
pub const EMBEDDING_DIM: usize = 384;

/// MD5 digest of `text`, each byte mapped into [-1, 1] and cycled to
/// [`EMBEDDING_DIM`] values.
pub fn pseudo_embedding(text: &str) -> Vec<f32> {
    let digest = Md5::digest(text.as_bytes());
    digest
        .iter()
        .cycle()
        .take(EMBEDDING_DIM)
        .map(|&b| b as f32 / 127.5 - 1.0)
        .collect()
}

/// pgvector text literal, e.g. `[0.1,-0.5]`.
pub fn to_vector_literal(embedding: &[f32]) -> String {
    let parts: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}

use sha2::{Digest, Sha256};

use super::model::{DuplicateCheckResult, ImageHash, DEFAULT_SIMILARITY_THRESHOLD};
use super::store::MediaStore;
use crate::error::StoreError;

/// SHA-256 content fingerprint of the raw file bytes, lowercase hex.
pub fn compute_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Store the fingerprint of a freshly uploaded image.
pub async fn register_image_hash<S: MediaStore>(
    store: &S,
    property_id: &str,
    agent_id: &str,
    bytes: &[u8],
) -> Result<ImageHash, StoreError> {
    let record = ImageHash {
        image_hash: compute_digest(bytes),
        property_id: property_id.to_string(),
        agent_id: agent_id.to_string(),
        similarity_score: 1.0,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    store.put_image_hash(&record).await?;
    Ok(record)
}

/// Ask the backend whether any other agent already registered this image.
///
/// Similarity comparison is delegated to the store lookup; nothing perceptual
/// is computed here.
pub async fn check_duplicates<S: MediaStore>(
    store: &S,
    agent_id: &str,
    bytes: &[u8],
    threshold: Option<f64>,
) -> Result<DuplicateCheckResult, StoreError> {
    let image_hash = compute_digest(bytes);
    let threshold = threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);

    let matches = store
        .find_similar_hashes(&image_hash, agent_id, threshold)
        .await?;

    if !matches.is_empty() {
        tracing::info!(
            "🔁 Duplicate image detected - hash: {} matches: {}",
            image_hash,
            matches.len()
        );
    }

    Ok(DuplicateCheckResult {
        image_hash,
        warning: !matches.is_empty(),
        matches,
    })
}

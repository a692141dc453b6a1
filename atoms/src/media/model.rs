use serde::{Deserialize, Serialize};

/// Similarity cutoff applied when the caller does not supply one.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Content fingerprint of an uploaded listing image. Immutable once stored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageHash {
    pub image_hash: String,
    pub property_id: String,
    pub agent_id: String,
    pub similarity_score: f64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterImageHashPayload {
    pub property_id: String,
    pub agent_id: String,
    /// Raw image bytes, base64-encoded by the uploader.
    pub image_base64: String,
}

#[derive(Debug, Deserialize)]
pub struct DuplicateCheckPayload {
    pub agent_id: String,
    pub image_base64: String,
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DuplicateCheckResult {
    pub image_hash: String,
    /// True when another agent already registered a matching image. The
    /// upload itself is never blocked.
    pub warning: bool,
    pub matches: Vec<ImageHash>,
}

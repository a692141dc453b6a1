use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::model::{DuplicateCheckPayload, RegisterImageHashPayload};
use super::service::{check_duplicates, register_image_hash};
use super::store::MediaStore;

/// HTTP Handler: POST /media/hashes
pub async fn register_image_hash_handler<S: MediaStore>(
    store: &S,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: RegisterImageHashPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to parse register-hash payload: {}", e);
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "Invalid payload"}),
            );
        }
    };

    let bytes = match BASE64.decode(&payload.image_base64) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Invalid base64 image payload: {}", e);
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "image_base64 is not valid base64"}),
            );
        }
    };

    match register_image_hash(store, &payload.property_id, &payload.agent_id, &bytes).await {
        Ok(record) => Ok(Response::builder()
            .status(StatusCode::CREATED)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&record)?.into())
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!(
                "Failed to register image hash for property {}: {}",
                payload.property_id,
                e
            );
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({"error": e.to_string()}),
            )
        }
    }
}

/// HTTP Handler: POST /media/duplicate-check
///
/// Surfaces a warning list; never blocks the upload itself.
pub async fn check_duplicates_handler<S: MediaStore>(
    store: &S,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let payload: DuplicateCheckPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to parse duplicate-check payload: {}", e);
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "Invalid payload"}),
            );
        }
    };

    let bytes = match BASE64.decode(&payload.image_base64) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Invalid base64 image payload: {}", e);
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "image_base64 is not valid base64"}),
            );
        }
    };

    match check_duplicates(store, &payload.agent_id, &bytes, payload.threshold).await {
        Ok(result) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&result)?.into())
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!("Duplicate check failed for agent {}: {}", payload.agent_id, e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({"error": e.to_string()}),
            )
        }
    }
}

fn json_response(
    status: StatusCode,
    value: serde_json::Value,
) -> Result<Response<Body>, LambdaError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(value.to_string().into())
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::media::model::{DuplicateCheckResult, ImageHash};
    use crate::media::service::compute_digest;
    use std::sync::Mutex;

    struct FakeMediaStore {
        records: Mutex<Vec<ImageHash>>,
    }

    impl FakeMediaStore {
        fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
            }
        }
    }

    impl MediaStore for FakeMediaStore {
        async fn put_image_hash(&self, record: &ImageHash) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            let exists = records.iter().any(|r| {
                r.image_hash == record.image_hash
                    && r.agent_id == record.agent_id
                    && r.property_id == record.property_id
            });
            if !exists {
                records.push(record.clone());
            }
            Ok(())
        }

        async fn find_similar_hashes(
            &self,
            image_hash: &str,
            agent_id: &str,
            threshold: f64,
        ) -> Result<Vec<ImageHash>, StoreError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.image_hash == image_hash
                        && r.agent_id != agent_id
                        && r.similarity_score >= threshold
                })
                .cloned()
                .collect())
        }
    }

    fn register_body(property_id: &str, agent_id: &str, bytes: &[u8]) -> Vec<u8> {
        serde_json::json!({
            "property_id": property_id,
            "agent_id": agent_id,
            "image_base64": BASE64.encode(bytes),
        })
        .to_string()
        .into_bytes()
    }

    fn check_body(agent_id: &str, bytes: &[u8]) -> Vec<u8> {
        serde_json::json!({
            "agent_id": agent_id,
            "image_base64": BASE64.encode(bytes),
        })
        .to_string()
        .into_bytes()
    }

    fn result_of(resp: &Response<Body>) -> DuplicateCheckResult {
        let text = match resp.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("expected text body"),
        };
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn flags_identical_image_registered_by_another_agent() {
        let store = FakeMediaStore::new();
        let image = b"identical listing photo";

        let resp = register_image_hash_handler(&store, &register_body("prop-1", "agent-a", image))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = check_duplicates_handler(&store, &check_body("agent-b", image))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let result = result_of(&resp);
        assert!(result.warning);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].agent_id, "agent-a");
        assert_eq!(result.image_hash, compute_digest(image));
    }

    #[tokio::test]
    async fn does_not_flag_the_registering_agent_itself() {
        let store = FakeMediaStore::new();
        let image = b"identical listing photo";

        register_image_hash_handler(&store, &register_body("prop-1", "agent-a", image))
            .await
            .unwrap();

        let resp = check_duplicates_handler(&store, &check_body("agent-a", image))
            .await
            .unwrap();

        let result = result_of(&resp);
        assert!(!result.warning);
        assert!(result.matches.is_empty());
    }

    #[tokio::test]
    async fn different_bytes_do_not_match() {
        let store = FakeMediaStore::new();

        register_image_hash_handler(&store, &register_body("prop-1", "agent-a", b"photo one"))
            .await
            .unwrap();

        let resp = check_duplicates_handler(&store, &check_body("agent-b", b"photo two"))
            .await
            .unwrap();

        let result = result_of(&resp);
        assert!(!result.warning);
    }

    #[tokio::test]
    async fn caller_threshold_above_stored_score_excludes_match() {
        let store = FakeMediaStore::new();
        let image = b"identical listing photo";

        register_image_hash_handler(&store, &register_body("prop-1", "agent-a", image))
            .await
            .unwrap();

        let body = serde_json::json!({
            "agent_id": "agent-b",
            "image_base64": BASE64.encode(image.as_slice()),
            "threshold": 1.5,
        })
        .to_string()
        .into_bytes();

        let resp = check_duplicates_handler(&store, &body).await.unwrap();
        let result = result_of(&resp);
        assert!(!result.warning);
    }

    #[tokio::test]
    async fn rejects_invalid_base64() {
        let store = FakeMediaStore::new();
        let body = serde_json::json!({
            "agent_id": "agent-b",
            "image_base64": "%%% not base64 %%%",
        })
        .to_string()
        .into_bytes();

        let resp = check_duplicates_handler(&store, &body).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

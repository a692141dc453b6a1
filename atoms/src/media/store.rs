use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::ImageHash;
use crate::error::StoreError;

/// Backend collaborations of the duplicate detector. Tests substitute an
/// in-memory fake for the DynamoDB implementation.
#[allow(async_fn_in_trait)]
pub trait MediaStore {
    async fn put_image_hash(&self, record: &ImageHash) -> Result<(), StoreError>;
    /// Stored hashes of *other* agents scoring at or above `threshold`
    /// against `image_hash`.
    async fn find_similar_hashes(
        &self,
        image_hash: &str,
        agent_id: &str,
        threshold: f64,
    ) -> Result<Vec<ImageHash>, StoreError>;
}

pub struct DynamoMediaStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoMediaStore {
    pub fn new(client: &DynamoClient, table_name: &str) -> Self {
        Self {
            client: client.clone(),
            table_name: table_name.to_string(),
        }
    }
}

impl MediaStore for DynamoMediaStore {
    async fn put_image_hash(&self, record: &ImageHash) -> Result<(), StoreError> {
        let pk = format!("IMAGEHASH#{}", record.image_hash);
        let sk = format!(
            "AGENT#{}#PROPERTY#{}",
            record.agent_id, record.property_id
        );

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(pk))
            .item("SK", AttributeValue::S(sk))
            .item("image_hash", AttributeValue::S(record.image_hash.clone()))
            .item("property_id", AttributeValue::S(record.property_id.clone()))
            .item("agent_id", AttributeValue::S(record.agent_id.clone()))
            .item(
                "similarity_score",
                AttributeValue::N(record.similarity_score.to_string()),
            )
            .item("created_at", AttributeValue::S(record.created_at.clone()))
            // Hashes are immutable once stored; re-registering the same
            // image for the same listing is a no-op, not an overwrite.
            .condition_expression("attribute_not_exists(SK)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    Ok(())
                } else {
                    Err(StoreError::Backend(format!(
                        "DynamoDB put_item error: {}",
                        service_err
                    )))
                }
            }
        }
    }

    async fn find_similar_hashes(
        &self,
        image_hash: &str,
        agent_id: &str,
        threshold: f64,
    ) -> Result<Vec<ImageHash>, StoreError> {
        let pk = format!("IMAGEHASH#{}", image_hash);

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk")
            .expression_attribute_values(":pk", AttributeValue::S(pk))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("DynamoDB query error: {}", e)))?;

        let mut matches = Vec::new();
        for item in result.items() {
            let owner = item
                .get("agent_id")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .unwrap_or_default();
            if owner == agent_id {
                continue;
            }

            // Exact-digest matches score 1.0; the stored score is echoed so
            // a backend with perceptual comparison plugs in unchanged.
            let similarity_score = item
                .get("similarity_score")
                .and_then(|v| v.as_n().ok())
                .and_then(|n| n.parse().ok())
                .unwrap_or(1.0);
            if similarity_score < threshold {
                continue;
            }

            matches.push(ImageHash {
                image_hash: image_hash.to_string(),
                property_id: item
                    .get("property_id")
                    .and_then(|v| v.as_s().ok())
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                agent_id: owner,
                similarity_score,
                created_at: item
                    .get("created_at")
                    .and_then(|v| v.as_s().ok())
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            });
        }

        Ok(matches)
    }
}

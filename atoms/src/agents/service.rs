use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::Agent;
use crate::error::StoreError;

/// Resolve the agent owning a phone line via the `phone-index` GSI.
/// Numbers are stored normalized, so the caller must normalize first.
pub async fn find_agent_by_phone(
    client: &DynamoClient,
    table_name: &str,
    phone: &str,
) -> Result<Option<Agent>, StoreError> {
    if phone.is_empty() {
        return Ok(None);
    }

    let result = client
        .query()
        .table_name(table_name)
        .index_name("phone-index")
        .key_condition_expression("agent_phone = :phone")
        .expression_attribute_values(":phone", AttributeValue::S(phone.to_string()))
        .limit(1)
        .send()
        .await
        .map_err(|e| StoreError::Backend(format!("DynamoDB query error: {}", e)))?;

    let Some(item) = result.items().first() else {
        return Ok(None);
    };

    let agent_id = item
        .get("PK")
        .and_then(|v| v.as_s().ok())
        .and_then(|s| s.strip_prefix("AGENT#"))
        .map(|s| s.to_string())
        .unwrap_or_default();

    Ok(Some(Agent {
        agent_id,
        agent_name: item
            .get("agent_name")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        agent_email: item
            .get("agent_email")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        agent_phone: phone.to_string(),
    }))
}

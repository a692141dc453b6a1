use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::Notification;
use crate::error::StoreError;

/// Insert an unread notification for a user. Callers on webhook paths treat
/// a failure here as best-effort and keep going.
pub async fn insert_notification(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    message: &str,
) -> Result<Notification, StoreError> {
    let notification_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(format!("USER#{}", user_id)))
        .item(
            "SK",
            AttributeValue::S(format!("NOTIFICATION#{}", notification_id)),
        )
        .item("message", AttributeValue::S(message.to_string()))
        .item("read", AttributeValue::Bool(false))
        .item("created_at", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| StoreError::Backend(format!("DynamoDB put_item error: {}", e)))?;

    Ok(Notification {
        notification_id,
        user_id: user_id.to_string(),
        message: message.to_string(),
        read: false,
        created_at: now,
    })
}

/// Load all notifications for a user, newest first.
pub async fn list_notifications_for_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Vec<Notification>, StoreError> {
    let pk = format!("USER#{}", user_id);

    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(pk))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("NOTIFICATION#".to_string()))
        .send()
        .await
        .map_err(|e| StoreError::Backend(format!("DynamoDB query error: {}", e)))?;

    let mut notifications = Vec::new();
    for item in result.items() {
        if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
            if let Some(notification_id) = sk.strip_prefix("NOTIFICATION#") {
                notifications.push(Notification {
                    notification_id: notification_id.to_string(),
                    user_id: user_id.to_string(),
                    message: item
                        .get("message")
                        .and_then(|v| v.as_s().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    read: item
                        .get("read")
                        .and_then(|v| v.as_bool().ok())
                        .copied()
                        .unwrap_or(false),
                    created_at: item
                        .get("created_at")
                        .and_then(|v| v.as_s().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                });
            }
        }
    }

    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(notifications)
}

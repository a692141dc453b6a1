use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::service::list_notifications_for_user;

/// HTTP Handler: GET /users/{user_id}/notifications
pub async fn list_notifications_handler(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Response<Body>, LambdaError> {
    match list_notifications_for_user(client, table_name, user_id).await {
        Ok(notifications) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&notifications)?.into())
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!("Failed to list notifications for {}: {}", user_id, e);
            Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(serde_json::json!({"error": e.to_string()}).to_string().into())
                .map_err(Box::new)?)
        }
    }
}

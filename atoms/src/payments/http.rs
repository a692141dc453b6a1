use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::model::ChargeEvent;
use super::service::{apply_charge_success, ChargeOutcome};
use super::signature::verify_signature;
use super::store::PaymentStore;
use crate::error::StoreError;

/// HTTP Handler: POST /webhooks/payments
///
/// Verify-before-trust: the HMAC check runs on the raw body before anything
/// is parsed, and a rejected request never reaches the store.
pub async fn handle_payment_webhook<S: PaymentStore>(
    store: &S,
    secret: &str,
    signature_header: Option<&str>,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    if let Err(e) = verify_signature(secret, body, signature_header) {
        tracing::warn!("Rejected payment webhook: {}", e);
        return json_response(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"error": "Invalid signature"}),
        );
    }

    let event: ChargeEvent = match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!("Failed to parse payment webhook payload: {}", e);
            return json_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": "Invalid payload"}),
            );
        }
    };

    if event.event != "charge.success" {
        tracing::info!("Ignoring payment webhook event: {}", event.event);
        return json_response(StatusCode::OK, serde_json::json!({"status": "ignored"}));
    }

    tracing::info!(
        "💳 charge.success received - reference: {} amount: {}",
        event.data.reference,
        event.data.amount
    );

    match apply_charge_success(store, &event.data.reference).await {
        Ok(ChargeOutcome::Processed) => {
            json_response(StatusCode::OK, serde_json::json!({"status": "processed"}))
        }
        Ok(ChargeOutcome::AlreadyProcessed) => json_response(
            StatusCode::OK,
            serde_json::json!({"status": "already_processed"}),
        ),
        Err(StoreError::NotFound(_)) => json_response(
            StatusCode::NOT_FOUND,
            serde_json::json!({"error": "Unknown payment reference"}),
        ),
        Err(e) => {
            tracing::error!(
                "Failed to process charge.success for {}: {}",
                event.data.reference,
                e
            );
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

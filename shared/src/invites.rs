use aws_sdk_sesv2::Client as SesClient;
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::{Deserialize, Serialize};
use std::env;

use crate::email::{render_invitation_email, send_invitation_email};

#[derive(Deserialize)]
pub struct InvitationRequest {
    pub email: String,
    pub role: String,
    #[serde(rename = "invitationToken")]
    pub invitation_token: String,
    #[serde(rename = "inviterName")]
    pub inviter_name: String,
}

#[derive(Serialize)]
struct InvitationResponse {
    message_id: String,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// HTTP Handler: POST /invitations/send
///
/// Sends the templated invitation mail and echoes the provider send result.
pub async fn handle_send_invitation(
    ses_client: &SesClient,
    body: &Body,
) -> Result<Response<Body>, Error> {
    let body_str = match body {
        Body::Text(text) => text,
        Body::Binary(bytes) => std::str::from_utf8(bytes).unwrap_or(""),
        Body::Empty => "",
    };

    tracing::info!("Invitation send request received");

    let request: InvitationRequest = match serde_json::from_str(body_str) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!("Failed to parse invitation request: {}", e);
            let error = ErrorResponse {
                error: "InvalidRequest".to_string(),
                message: format!("Invalid request body: {}", e),
            };
            return Ok(Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .header("Content-Type", "application/json")
                .body(serde_json::to_string(&error)?.into())
                .map_err(Box::new)?);
        }
    };

    if request.email.is_empty() || !request.email.contains('@') {
        let error = ErrorResponse {
            error: "InvalidEmail".to_string(),
            message: "Please provide a valid email address".to_string(),
        };
        return Ok(Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&error)?.into())
            .map_err(Box::new)?);
    }

    if request.invitation_token.is_empty() {
        let error = ErrorResponse {
            error: "InvalidToken".to_string(),
            message: "Invitation token must not be empty".to_string(),
        };
        return Ok(Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&error)?.into())
            .map_err(Box::new)?);
    }

    let base_url =
        env::var("APP_BASE_URL").unwrap_or_else(|_| "https://app.settlesmart.ai".to_string());
    let from_address =
        env::var("SES_FROM_ADDRESS").unwrap_or_else(|_| "invites@settlesmart.ai".to_string());

    let accept_link = format!(
        "{}/invitations/accept?token={}",
        base_url, request.invitation_token
    );
    let email = render_invitation_email(&request.inviter_name, &request.role, &accept_link);

    match send_invitation_email(ses_client, &from_address, &request.email, &email).await {
        Ok(message_id) => {
            tracing::info!(
                "✉️ Invitation sent to {} (message id {})",
                request.email,
                message_id
            );
            let response = InvitationResponse {
                message_id,
                message: "Invitation sent".to_string(),
            };
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .body(serde_json::to_string(&response)?.into())
                .map_err(Box::new)?)
        }
        Err(e) => {
            tracing::error!("Failed to send invitation to {}: {}", request.email, e);
            let error = ErrorResponse {
                error: "EmailFailed".to_string(),
                message: "Failed to send invitation. Please try again later.".to_string(),
            };
            Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(serde_json::to_string(&error)?.into())
                .map_err(Box::new)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sesv2::config::BehaviorVersion;

    /// Client with no credentials or region; fine for branches that return
    /// before SES is contacted.
    fn offline_ses_client() -> SesClient {
        SesClient::from_conf(
            aws_sdk_sesv2::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .build(),
        )
    }

    fn request_body(email: &str, token: &str) -> Body {
        Body::Text(
            serde_json::json!({
                "email": email,
                "role": "agent",
                "invitationToken": token,
                "inviterName": "Ada Okafor",
            })
            .to_string(),
        )
    }

    #[tokio::test]
    async fn rejects_invalid_email_with_400() {
        let ses_client = offline_ses_client();
        let body = request_body("not-an-email-address", "tok-123");

        let resp = handle_send_invitation(&ses_client, &body).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let text = match resp.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("expected text body"),
        };
        assert!(text.contains("InvalidEmail"));
    }

    #[tokio::test]
    async fn rejects_empty_email_with_400() {
        let ses_client = offline_ses_client();
        let body = request_body("", "tok-123");

        let resp = handle_send_invitation(&ses_client, &body).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_empty_invitation_token_with_400() {
        let ses_client = offline_ses_client();
        let body = request_body("new.agent@example.com", "");

        let resp = handle_send_invitation(&ses_client, &body).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let text = match resp.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("expected text body"),
        };
        assert!(text.contains("InvalidToken"));
    }

    #[tokio::test]
    async fn rejects_unparseable_body_with_400() {
        let ses_client = offline_ses_client();
        let body = Body::Text("not json".to_string());

        let resp = handle_send_invitation(&ses_client, &body).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parses_provider_shaped_payload() {
        let request: InvitationRequest = serde_json::from_str(
            r#"{"email":"new.agent@example.com","role":"agent","invitationToken":"tok-123","inviterName":"Ada Okafor"}"#,
        )
        .unwrap();

        assert_eq!(request.email, "new.agent@example.com");
        assert_eq!(request.invitation_token, "tok-123");
        assert_eq!(request.inviter_name, "Ada Okafor");
    }
}

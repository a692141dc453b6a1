use lambda_http::http::header::{HeaderValue, VARY};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use settlesmart_atoms as atoms;
use settlesmart_shared::{invites, AppState};
use std::env;
use std::sync::Arc;

use settlesmart_atoms::media::store::DynamoMediaStore;
use settlesmart_atoms::payments::store::DynamoPaymentStore;
use settlesmart_atoms::voice::store::DynamoVoiceStore;

fn with_cors_headers(mut resp: Response<Body>) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));
    resp
}

fn finalize_response(resp: Result<Response<Body>, Error>) -> Result<Response<Body>, Error> {
    resp.map(with_cors_headers)
}

/// Main Lambda handler - routes provider webhooks and dashboard calls
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    tracing::info!(
        "🚀 Webhook Lambda invoked - Method: {} Path: {}",
        method,
        path
    );

    // Handle CORS preflight
    if method == "OPTIONS" {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp));
    }

    let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "settlesmart".to_string());

    // Payment provider webhook (signature-authenticated, no CORS needed)
    if path == "/webhooks/payments" {
        if method != &Method::POST {
            return method_not_allowed();
        }
        let secret =
            env::var("PAYSTACK_SECRET_KEY").expect("PAYSTACK_SECRET_KEY must be set");
        let signature = event
            .headers()
            .get("x-paystack-signature")
            .and_then(|v| v.to_str().ok());
        let store = DynamoPaymentStore::new(&state.dynamo_client, &table_name);
        return atoms::payments::handle_payment_webhook(&store, &secret, signature, body).await;
    }

    // Voice provider webhook (form-encoded callback)
    if path == "/webhooks/voice" {
        if method != &Method::POST {
            return method_not_allowed();
        }
        let store = DynamoVoiceStore::new(&state.dynamo_client, &table_name);
        return atoms::voice::handle_voice_webhook(&store, body).await;
    }

    // Invitation email sender (dashboard call)
    if path == "/invitations/send" {
        return match method {
            &Method::POST => {
                finalize_response(invites::handle_send_invitation(&state.ses_client, body).await)
            }
            _ => finalize_response(method_not_allowed()),
        };
    }

    // Image fingerprint routes (dashboard calls)
    if path.starts_with("/media") {
        let store = DynamoMediaStore::new(&state.dynamo_client, &table_name);
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        return match (method, parts.as_slice()) {
            // POST /media/hashes - register an uploaded image's fingerprint
            (&Method::POST, ["media", "hashes"]) => {
                finalize_response(atoms::media::register_image_hash_handler(&store, body).await)
            }
            // POST /media/duplicate-check - warn about cross-agent duplicates
            (&Method::POST, ["media", "duplicate-check"]) => {
                finalize_response(atoms::media::check_duplicates_handler(&store, body).await)
            }
            (_, ["media", "hashes"]) | (_, ["media", "duplicate-check"]) => {
                finalize_response(method_not_allowed())
            }
            _ => finalize_response(not_found()),
        };
    }

    // Notification feed (dashboard call)
    if path.starts_with("/users") {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        return match (method, parts.as_slice()) {
            // GET /users/{uid}/notifications
            (&Method::GET, ["users", user_id, "notifications"]) => finalize_response(
                atoms::notifications::list_notifications_handler(
                    &state.dynamo_client,
                    &table_name,
                    user_id,
                )
                .await,
            ),
            (_, ["users", _, "notifications"]) => finalize_response(method_not_allowed()),
            _ => finalize_response(not_found()),
        };
    }

    // No matching route
    tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
    finalize_response(not_found())
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({"error": "Method not allowed"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}

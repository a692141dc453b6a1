use lambda_http::{http::StatusCode, Body, Error as LambdaError, Response};

use super::model::InboundMessageForm;
use super::service::{ingest_inbound_message, IngestOutcome};
use super::store::VoiceStore;

/// HTTP Handler: POST /webhooks/voice
///
/// The provider treats anything but a 200 as a delivery failure, so filtered
/// messages are acknowledged rather than rejected.
pub async fn handle_voice_webhook<S: VoiceStore>(
    store: &S,
    body: &[u8],
) -> Result<Response<Body>, LambdaError> {
    let form = InboundMessageForm::from_form_body(body);

    tracing::info!(
        "📞 Voice webhook received - sid: {} from: {} media: {}",
        form.message_sid,
        form.from,
        form.num_media
    );

    match ingest_inbound_message(store, &form).await {
        Ok(IngestOutcome::Ignored(reason)) => {
            tracing::info!("Acknowledging voice webhook without record: {}", reason);
            json_response(StatusCode::OK, serde_json::json!({"status": "ignored"}))
        }
        Ok(IngestOutcome::Accepted { message_sid, job_id }) => json_response(
            StatusCode::OK,
            serde_json::json!({
                "status": "accepted",
                "message_sid": message_sid,
                "transcription_job_id": job_id,
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to ingest voice message {}: {}", form.message_sid, e);
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
    use crate::agents::model::Agent;
    use crate::error::StoreError;
    use crate::voice::model::{TranscriptionJob, VoiceMessage};
    use std::sync::Mutex;

    struct FakeVoiceStore {
        agents: Vec<Agent>,
        messages: Mutex<Vec<VoiceMessage>>,
        jobs: Mutex<Vec<TranscriptionJob>>,
    }

    impl FakeVoiceStore {
        fn with_agent(agent_id: &str, phone: &str) -> Self {
            Self {
                agents: vec![Agent {
                    agent_id: agent_id.to_string(),
                    agent_name: "Test Agent".to_string(),
                    agent_email: "agent@settlesmart.test".to_string(),
                    agent_phone: phone.to_string(),
                }],
                messages: Mutex::new(Vec::new()),
                jobs: Mutex::new(Vec::new()),
            }
        }

        fn message_count(&self) -> usize {
            self.messages.lock().unwrap().len()
        }
    }

    impl VoiceStore for FakeVoiceStore {
        async fn find_agent_by_phone(&self, phone: &str) -> Result<Option<Agent>, StoreError> {
            Ok(self
                .agents
                .iter()
                .find(|a| a.agent_phone == phone)
                .cloned())
        }

        async fn put_voice_message(&self, message: &VoiceMessage) -> Result<(), StoreError> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn enqueue_transcription(&self, job: &TranscriptionJob) -> Result<(), StoreError> {
            self.jobs.lock().unwrap().push(job.clone());
            Ok(())
        }
    }

    fn audio_body(sid: &str, to: &str) -> Vec<u8> {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("MessageSid", sid)
            .append_pair("From", "+15551234567")
            .append_pair("To", to)
            .append_pair("NumMedia", "1")
            .append_pair("MediaUrl0", "https://api.twilio.example/media/1")
            .append_pair("MediaContentType0", "audio/ogg")
            .finish()
            .into_bytes()
    }

    #[tokio::test]
    async fn ingests_audio_message_for_known_agent() {
        let store = FakeVoiceStore::with_agent("agent-1", "+15557654321");

        let resp = handle_voice_webhook(&store, &audio_body("MM123", "+1 (555) 765-4321"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let messages = store.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].transcription_status, "pending");
        assert_eq!(messages[0].agent_id.as_deref(), Some("agent-1"));
        assert_eq!(messages[0].to_number, "+15557654321");

        let jobs = store.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_status, "queued");
        assert_eq!(jobs[0].attempts, 0);
        assert_eq!(jobs[0].message_sid, "MM123");
    }

    #[tokio::test]
    async fn acknowledges_webhook_without_media() {
        let store = FakeVoiceStore::with_agent("agent-1", "+15557654321");
        let body = b"MessageSid=MM124&From=%2B15551234567&To=%2B15557654321&NumMedia=0";

        let resp = handle_voice_webhook(&store, body).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(store.message_count(), 0);
    }

    #[tokio::test]
    async fn acknowledges_non_audio_media_without_record() {
        let store = FakeVoiceStore::with_agent("agent-1", "+15557654321");
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("MessageSid", "MM125")
            .append_pair("From", "+15551234567")
            .append_pair("To", "+15557654321")
            .append_pair("NumMedia", "1")
            .append_pair("MediaUrl0", "https://api.twilio.example/media/2")
            .append_pair("MediaContentType0", "image/jpeg")
            .finish()
            .into_bytes();

        let resp = handle_voice_webhook(&store, &body).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(store.message_count(), 0);
        assert!(store.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_unassigned_message_when_no_agent_matches() {
        let store = FakeVoiceStore::with_agent("agent-1", "+15557654321");

        let resp = handle_voice_webhook(&store, &audio_body("MM126", "+15550000000"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let messages = store.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].agent_id.is_none());
    }
}

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{TranscriptionJob, VoiceMessage};
use crate::agents::{self, model::Agent};
use crate::error::StoreError;

/// Backend collaborations of the voice-webhook ingester. Tests substitute an
/// in-memory fake for the DynamoDB implementation.
#[allow(async_fn_in_trait)]
pub trait VoiceStore {
    async fn find_agent_by_phone(&self, phone: &str) -> Result<Option<Agent>, StoreError>;
    async fn put_voice_message(&self, message: &VoiceMessage) -> Result<(), StoreError>;
    async fn enqueue_transcription(&self, job: &TranscriptionJob) -> Result<(), StoreError>;
}

pub struct DynamoVoiceStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoVoiceStore {
    pub fn new(client: &DynamoClient, table_name: &str) -> Self {
        Self {
            client: client.clone(),
            table_name: table_name.to_string(),
        }
    }
}

impl VoiceStore for DynamoVoiceStore {
    async fn find_agent_by_phone(&self, phone: &str) -> Result<Option<Agent>, StoreError> {
        agents::service::find_agent_by_phone(&self.client, &self.table_name, phone).await
    }

    async fn put_voice_message(&self, message: &VoiceMessage) -> Result<(), StoreError> {
        let pk = format!("VOICEMSG#{}", message.message_sid);

        let mut builder = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(pk.clone()))
            .item("SK", AttributeValue::S(pk))
            .item("from_number", AttributeValue::S(message.from_number.clone()))
            .item("to_number", AttributeValue::S(message.to_number.clone()))
            .item("media_url", AttributeValue::S(message.media_url.clone()))
            .item(
                "media_content_type",
                AttributeValue::S(message.media_content_type.clone()),
            )
            .item(
                "transcription_status",
                AttributeValue::S(message.transcription_status.clone()),
            )
            .item("received_at", AttributeValue::S(message.received_at.clone()));

        if let Some(agent_id) = &message.agent_id {
            builder = builder.item("agent_id", AttributeValue::S(agent_id.clone()));
        }

        builder
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("DynamoDB put_item error: {}", e)))?;

        Ok(())
    }

    /// Jobs land under a single queue partition so the transcription worker
    /// can claim them with one query.
    async fn enqueue_transcription(&self, job: &TranscriptionJob) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S("TRANSCRIPTION".to_string()))
            .item("SK", AttributeValue::S(format!("JOB#{}", job.job_id)))
            .item("message_sid", AttributeValue::S(job.message_sid.clone()))
            .item("media_url", AttributeValue::S(job.media_url.clone()))
            .item("job_status", AttributeValue::S(job.job_status.clone()))
            .item("attempts", AttributeValue::N(job.attempts.to_string()))
            .item("enqueued_at", AttributeValue::S(job.enqueued_at.clone()))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("DynamoDB put_item error: {}", e)))?;

        Ok(())
    }
}

use super::model::{InboundMessageForm, TranscriptionJob, VoiceMessage};
use super::store::VoiceStore;
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Acknowledged without creating a record.
    Ignored(&'static str),
    Accepted {
        message_sid: String,
        job_id: String,
    },
}

/// Strip display formatting from a phone number, keeping a leading `+`.
pub fn normalize_phone(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for (i, c) in raw.trim().char_indices() {
        if c.is_ascii_digit() || (c == '+' && i == 0) {
            normalized.push(c);
        }
    }
    normalized
}

/// Ingest an inbound provider callback: audio media only, owning agent
/// resolved by the line it arrived on, message stored as `pending`, and an
/// explicit transcription job submitted for the downstream worker.
pub async fn ingest_inbound_message<S: VoiceStore>(
    store: &S,
    form: &InboundMessageForm,
) -> Result<IngestOutcome, StoreError> {
    if form.message_sid.is_empty() {
        return Ok(IngestOutcome::Ignored("missing MessageSid"));
    }
    if form.num_media == 0 {
        return Ok(IngestOutcome::Ignored("no media attached"));
    }

    let content_type = form.media_content_type.as_deref().unwrap_or("");
    if !content_type.starts_with("audio/") {
        return Ok(IngestOutcome::Ignored("media is not audio"));
    }

    let Some(media_url) = form.media_url.as_deref() else {
        return Ok(IngestOutcome::Ignored("missing media URL"));
    };

    let to_number = normalize_phone(&form.to);
    let agent = store.find_agent_by_phone(&to_number).await?;
    if agent.is_none() {
        // The provider will not redeliver; record unassigned rather than drop
        tracing::warn!(
            "No agent matches line {}, recording unassigned message {}",
            to_number,
            form.message_sid
        );
    }

    let now = chrono::Utc::now().to_rfc3339();
    let message = VoiceMessage {
        message_sid: form.message_sid.clone(),
        from_number: normalize_phone(&form.from),
        to_number,
        media_url: media_url.to_string(),
        media_content_type: content_type.to_string(),
        transcription_status: "pending".to_string(),
        agent_id: agent.map(|a| a.agent_id),
        received_at: now.clone(),
    };
    store.put_voice_message(&message).await?;

    let job = TranscriptionJob {
        job_id: uuid::Uuid::new_v4().to_string(),
        message_sid: message.message_sid.clone(),
        media_url: message.media_url.clone(),
        job_status: "queued".to_string(),
        attempts: 0,
        enqueued_at: now,
    };
    store.enqueue_transcription(&job).await?;

    tracing::info!(
        "🎙️ Voice message {} ingested - job: {} agent: {:?}",
        message.message_sid,
        job.job_id,
        message.agent_id
    );

    Ok(IngestOutcome::Accepted {
        message_sid: message.message_sid,
        job_id: job.job_id,
    })
}

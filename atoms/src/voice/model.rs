use serde::{Deserialize, Serialize};

/// Inbound voice message, created on webhook receipt. Transcription moves
/// `transcription_status` from `pending` to `completed` downstream.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VoiceMessage {
    pub message_sid: String,
    pub from_number: String,
    pub to_number: String,
    pub media_url: String,
    pub media_content_type: String,
    pub transcription_status: String,
    pub agent_id: Option<String>,
    pub received_at: String,
}

/// Persisted work-queue entry for the transcription worker. A job row makes
/// submission failures visible instead of fire-and-forget.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionJob {
    pub job_id: String,
    pub message_sid: String,
    pub media_url: String,
    pub job_status: String,
    pub attempts: u32,
    pub enqueued_at: String,
}

/// Provider callback form fields (Twilio shape).
#[derive(Debug, Default)]
pub struct InboundMessageForm {
    pub message_sid: String,
    pub from: String,
    pub to: String,
    pub num_media: u32,
    pub media_url: Option<String>,
    pub media_content_type: Option<String>,
}

impl InboundMessageForm {
    /// Parse an `application/x-www-form-urlencoded` webhook body. Unknown
    /// fields (there are dozens) are ignored.
    pub fn from_form_body(body: &[u8]) -> Self {
        let mut form = InboundMessageForm::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "MessageSid" => form.message_sid = value.into_owned(),
                "From" => form.from = value.into_owned(),
                "To" => form.to = value.into_owned(),
                "NumMedia" => form.num_media = value.parse().unwrap_or(0),
                "MediaUrl0" => form.media_url = Some(value.into_owned()),
                "MediaContentType0" => form.media_content_type = Some(value.into_owned()),
                _ => {}
            }
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_form_fields() {
        let body = b"MessageSid=MM123&From=%2B15551234567&To=%2B15557654321&NumMedia=1\
&MediaUrl0=https%3A%2F%2Fapi.twilio.example%2Fmedia%2F1&MediaContentType0=audio%2Fogg&SmsStatus=received";
        let form = InboundMessageForm::from_form_body(body);

        assert_eq!(form.message_sid, "MM123");
        assert_eq!(form.from, "+15551234567");
        assert_eq!(form.to, "+15557654321");
        assert_eq!(form.num_media, 1);
        assert_eq!(
            form.media_url.as_deref(),
            Some("https://api.twilio.example/media/1")
        );
        assert_eq!(form.media_content_type.as_deref(), Some("audio/ogg"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let form = InboundMessageForm::from_form_body(b"NumMedia=not-a-number");
        assert_eq!(form.num_media, 0);
        assert!(form.message_sid.is_empty());
        assert!(form.media_url.is_none());
    }
}

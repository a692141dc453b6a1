// Re-export model types, store trait and handlers
pub mod http;
pub mod model;
pub mod service;
pub mod store;

pub use model::{InboundMessageForm, TranscriptionJob, VoiceMessage};
pub use http::*;
pub use service::*;
pub use store::*;

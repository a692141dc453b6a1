use serde::{Deserialize, Serialize};

/// Agent domain model. Agents are provisioned through the invitation flow;
/// webhook paths only read this record.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Agent {
    pub agent_id: String,
    pub agent_name: String,
    pub agent_email: String,
    /// Normalized, `+`-prefixed where known. Keyed by the `phone-index` GSI.
    pub agent_phone: String,
}

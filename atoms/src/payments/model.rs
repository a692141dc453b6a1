use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
        }
    }
}

/// Payment domain model. Payments are created by the billing flow upstream;
/// the webhook only ever transitions an existing row to `Paid`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Payment {
    pub reference: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub user_id: String,
    pub paid_at: Option<String>,
}

/// Provider callback payload (Paystack shape).
#[derive(Debug, Deserialize)]
pub struct ChargeEvent {
    pub event: String,
    pub data: ChargeEventData,
}

#[derive(Debug, Deserialize)]
pub struct ChargeEventData {
    pub reference: String,
    pub amount: i64,
    #[serde(default)]
    pub customer: serde_json::Value,
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub notification_id: String,
    pub user_id: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

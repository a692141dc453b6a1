use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{Payment, PaymentStatus};
use crate::error::StoreError;
use crate::notifications;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPaidOutcome {
    Updated,
    /// The conditional update found the payment already confirmed - a
    /// replayed provider delivery, acknowledged without side effects.
    AlreadyPaid,
}

/// Backend collaborations of the payment webhook. Tests substitute an
/// in-memory fake for the DynamoDB implementation.
#[allow(async_fn_in_trait)]
pub trait PaymentStore {
    async fn find_payment(&self, reference: &str) -> Result<Option<Payment>, StoreError>;
    async fn mark_paid(&self, reference: &str) -> Result<MarkPaidOutcome, StoreError>;
    async fn insert_notification(&self, user_id: &str, message: &str) -> Result<(), StoreError>;
}

pub struct DynamoPaymentStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoPaymentStore {
    pub fn new(client: &DynamoClient, table_name: &str) -> Self {
        Self {
            client: client.clone(),
            table_name: table_name.to_string(),
        }
    }
}

impl PaymentStore for DynamoPaymentStore {
    async fn find_payment(&self, reference: &str) -> Result<Option<Payment>, StoreError> {
        let pk = format!("PAYMENT#{}", reference);

        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk.clone()))
            .key("SK", AttributeValue::S(pk))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("DynamoDB get_item error: {}", e)))?;

        let Some(item) = result.item() else {
            return Ok(None);
        };

        let status = match item
            .get("payment_status")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.as_str())
        {
            Some("Paid") => PaymentStatus::Paid,
            _ => PaymentStatus::Pending,
        };

        Ok(Some(Payment {
            reference: reference.to_string(),
            amount: item
                .get("amount")
                .and_then(|v| v.as_n().ok())
                .and_then(|n| n.parse().ok())
                .unwrap_or(0),
            status,
            user_id: item
                .get("user_id")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .unwrap_or_default(),
            paid_at: item
                .get("paid_at")
                .and_then(|v| v.as_s().ok())
                .map(|s| s.to_string()),
        }))
    }

    /// Conditional transition to `Paid`. The condition expression is the
    /// replay guard: a redelivered `charge.success` fails the condition
    /// instead of re-applying the update.
    async fn mark_paid(&self, reference: &str) -> Result<MarkPaidOutcome, StoreError> {
        let pk = format!("PAYMENT#{}", reference);
        let now = chrono::Utc::now().to_rfc3339();

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(pk.clone()))
            .key("SK", AttributeValue::S(pk))
            .update_expression("SET payment_status = :paid, paid_at = :now")
            .condition_expression("payment_status <> :paid")
            .expression_attribute_values(":paid", AttributeValue::S("Paid".to_string()))
            .expression_attribute_values(":now", AttributeValue::S(now))
            .send()
            .await;

        match result {
            Ok(_) => Ok(MarkPaidOutcome::Updated),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    Ok(MarkPaidOutcome::AlreadyPaid)
                } else {
                    Err(StoreError::Backend(format!(
                        "DynamoDB update_item error: {}",
                        service_err
                    )))
                }
            }
        }
    }

    async fn insert_notification(&self, user_id: &str, message: &str) -> Result<(), StoreError> {
        notifications::service::insert_notification(&self.client, &self.table_name, user_id, message)
            .await
            .map(|_| ())
    }
}

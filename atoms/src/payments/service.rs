use super::store::{MarkPaidOutcome, PaymentStore};
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeOutcome {
    Processed,
    AlreadyProcessed,
}

/// Apply a verified `charge.success` callback to the payment it references.
///
/// Confirmation is the critical path: a failed notification insert is logged
/// and does not roll back or fail the status update.
pub async fn apply_charge_success<S: PaymentStore>(
    store: &S,
    reference: &str,
) -> Result<ChargeOutcome, StoreError> {
    let payment = store
        .find_payment(reference)
        .await?
        .ok_or(StoreError::NotFound("payment"))?;

    match store.mark_paid(reference).await? {
        MarkPaidOutcome::AlreadyPaid => {
            tracing::info!(
                "Payment {} already confirmed, acknowledging replayed delivery",
                reference
            );
            Ok(ChargeOutcome::AlreadyProcessed)
        }
        MarkPaidOutcome::Updated => {
            let message = format!(
                "Payment of {} confirmed for reference {}",
                format_minor_amount(payment.amount),
                reference
            );
            if let Err(e) = store.insert_notification(&payment.user_id, &message).await {
                tracing::error!(
                    "Failed to insert payment notification for user {}: {}",
                    payment.user_id,
                    e
                );
            }
            Ok(ChargeOutcome::Processed)
        }
    }
}

/// Provider amounts arrive in the minor unit (kobo).
fn format_minor_amount(amount: i64) -> String {
    format!("\u{20a6}{}.{:02}", amount / 100, (amount % 100).abs())
}

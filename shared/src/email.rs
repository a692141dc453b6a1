use aws_sdk_sesv2::types::{Body as EmailBody, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;

/// Invitation accept links stop working after this many days; the token
/// itself is expired server-side by the invitation flow.
pub const INVITE_EXPIRY_DAYS: i64 = 7;

pub struct InvitationEmail {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Render the invitation mail. Pure templating, no SES involved.
pub fn render_invitation_email(
    inviter_name: &str,
    role: &str,
    accept_link: &str,
) -> InvitationEmail {
    let expires_on = (chrono::Utc::now() + chrono::Duration::days(INVITE_EXPIRY_DAYS))
        .format("%-d %B %Y")
        .to_string();

    let subject = format!("{} invited you to join SettleSmart", inviter_name);

    let html_body = format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; color: #1f2933; max-width: 600px; margin: 0 auto;">
    <h2>You've been invited to SettleSmart</h2>
    <p>{inviter_name} has invited you to join their team as a <strong>{role}</strong>.</p>
    <p style="margin: 24px 0;">
      <a href="{accept_link}" style="background: #2563eb; color: #ffffff; padding: 12px 24px; border-radius: 6px; text-decoration: none;">Accept invitation</a>
    </p>
    <p>This invitation expires in {expiry_days} days (on {expires_on}).</p>
    <p style="color: #6b7280; font-size: 12px;">If the button does not work, copy this link into your browser:<br>{accept_link}</p>
  </body>
</html>"#,
        inviter_name = inviter_name,
        role = role,
        accept_link = accept_link,
        expiry_days = INVITE_EXPIRY_DAYS,
        expires_on = expires_on,
    );

    let text_body = format!(
        "{} has invited you to join SettleSmart as a {}.\n\n\
Accept the invitation here: {}\n\n\
This invitation expires in {} days (on {}).",
        inviter_name, role, accept_link, INVITE_EXPIRY_DAYS, expires_on,
    );

    InvitationEmail {
        subject,
        html_body,
        text_body,
    }
}

/// Send the rendered invitation over SES. Returns the provider message id.
pub async fn send_invitation_email(
    ses_client: &SesClient,
    from_address: &str,
    to_address: &str,
    email: &InvitationEmail,
) -> Result<String, String> {
    let destination = Destination::builder().to_addresses(to_address).build();

    let subject = Content::builder()
        .data(&email.subject)
        .charset("UTF-8")
        .build()
        .map_err(|e| format!("SES content build error: {}", e))?;
    let html = Content::builder()
        .data(&email.html_body)
        .charset("UTF-8")
        .build()
        .map_err(|e| format!("SES content build error: {}", e))?;
    let text = Content::builder()
        .data(&email.text_body)
        .charset("UTF-8")
        .build()
        .map_err(|e| format!("SES content build error: {}", e))?;

    let message = Message::builder()
        .subject(subject)
        .body(EmailBody::builder().html(html).text(text).build())
        .build();

    let result = ses_client
        .send_email()
        .from_email_address(from_address)
        .destination(destination)
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await
        .map_err(|e| format!("SES send_email error: {}", e))?;

    Ok(result.message_id().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitation_template_contains_link_and_expiry() {
        let email = render_invitation_email(
            "Ada Okafor",
            "agent",
            "https://app.settlesmart.test/invitations/accept?token=tok-123",
        );

        assert!(email.subject.contains("Ada Okafor"));
        assert!(email
            .html_body
            .contains("https://app.settlesmart.test/invitations/accept?token=tok-123"));
        assert!(email.html_body.contains("agent"));
        assert!(email.html_body.contains("expires in 7 days"));
        assert!(email
            .text_body
            .contains("https://app.settlesmart.test/invitations/accept?token=tok-123"));
        assert!(email.text_body.contains("7 days"));
    }
}

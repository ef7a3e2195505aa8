//! Input rules for the email and password forms.

use devlink_api_types::{ChangePasswordRequest, SendEmailRequest};

use super::error::DomainError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Split a comma separated recipient field, trimming and dropping empties.
pub fn parse_recipients(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the send payload from raw form fields.
pub fn build_send_request(
    subject: &str,
    body: &str,
    recipients: &str,
) -> Result<SendEmailRequest, DomainError> {
    let recipients = parse_recipients(recipients);
    if recipients.is_empty() {
        return Err(DomainError::validation("Add at least one recipient"));
    }
    if let Some(bad) = recipients.iter().find(|r| !looks_like_email(r)) {
        return Err(DomainError::validation(format!("`{bad}` is not an email address")));
    }
    if subject.trim().is_empty() {
        return Err(DomainError::required("subject"));
    }
    if body.trim().is_empty() {
        return Err(DomainError::required("body"));
    }

    Ok(SendEmailRequest {
        subject: subject.to_string(),
        body: body.to_string(),
        recipients,
    })
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(' ')
        }
        None => false,
    }
}

pub fn build_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<ChangePasswordRequest, DomainError> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(DomainError::validation("All fields are required"));
    }
    if new != confirm {
        return Err(DomainError::validation("New passwords do not match"));
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    Ok(ChangePasswordRequest {
        current_password: current.to_string(),
        new_password: new.to_string(),
        confirm_password: confirm.to_string(),
    })
}

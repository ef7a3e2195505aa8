use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GmailStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token_valid: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GmailAuthUrl {
    pub auth_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GmailSendResponse {
    #[serde(default)]
    pub gmail_message_id: Option<String>,
}

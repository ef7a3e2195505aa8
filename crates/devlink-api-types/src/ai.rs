use serde::{Deserialize, Serialize};

pub const DEFAULT_DEVELOPER_NAME: &str = "Developer";
pub const DEFAULT_DEVELOPER_SERVICES: &str = "Web development and digital solutions";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateEmailRequest {
    pub business_name: String,
    pub business_category: String,
    pub developer_name: String,
    pub developer_services: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateBulkEmailRequest {
    pub category: String,
    pub developer_name: String,
    pub developer_services: String,
}

/// Subject/body pair produced by the generator. Missing parts come back empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneratedEmail {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

use std::sync::Arc;

use async_trait::async_trait;
use devlink_api_types::{
    Acknowledgement, AnalyticsReport, Business, Campaign, CampaignCreated,
    CampaignFromBusinessesRequest, CampaignId, CampaignRequest, ChangePasswordRequest,
    EmailTemplate, GenerateBulkEmailRequest, GenerateEmailRequest, GeneratedEmail, GmailAuthUrl,
    GmailSendResponse, GmailStatus, HistoryPage, LoginRequest, NewBusiness, ProfileUpdateRequest,
    RegisterRequest, SendEmailRequest, SendEmailResponse, TemplateId, TemplateRequest, TokenPair,
    User, UserProfile, UserStats,
};
use metrics::counter;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::backend::{
    AiApi, AuthApi, BusinessApi, EmailApi, GmailApi, ImageUpload,
};
use crate::application::error::ApiError;
use crate::application::session::{SessionSignal, TokenStore};
use crate::infra::error::InfraError;

const METRIC_HTTP_REQUESTS: &str = "devlink_http_requests_total";

/// Body fields checked, in order, for a human-readable failure message.
const DETAIL_FIELDS: [&str; 3] = ["detail", "message", "error"];

enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Backend client shared by every screen.
///
/// Attaches the stored bearer token to each request. A 401 on a request that
/// carried a token clears the store and raises the [`SessionSignal`].
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    tokens: Arc<dyn TokenStore>,
    signal: SessionSignal,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base: Url,
        tokens: Arc<dyn TokenStore>,
        signal: SessionSignal,
    ) -> Result<Self, InfraError> {
        let http = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;
        Ok(Self {
            http,
            base,
            tokens,
            signal,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("devlink/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|err| ApiError::InvalidInput(format!("invalid path {path}: {err}")))?;
        if !query.is_empty() {
            url.set_query(None);
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn bearer(&self) -> Option<String> {
        match self.tokens.load() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "failed to read session token; sending anonymously");
                None
            }
        }
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path, query)?;
        let token = self.bearer();
        let authorized = token.is_some();

        let mut request = self.http.request(method.clone(), url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(form) => request.multipart(form),
        };

        debug!(%method, path, authorized, "sending backend request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                counter!(METRIC_HTTP_REQUESTS, "outcome" => "transport_error").increment(1);
                warn!(%method, path, error = %err, "backend unreachable");
                return Err(ApiError::transport(err));
            }
        };

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(ApiError::transport)?
            .to_vec();

        if status.is_success() {
            counter!(METRIC_HTTP_REQUESTS, "outcome" => "success").increment(1);
            debug!(%method, path, status = status.as_u16(), "backend request succeeded");
            return Ok(bytes);
        }

        let detail = extract_detail(&bytes);
        if status == StatusCode::UNAUTHORIZED {
            counter!(METRIC_HTTP_REQUESTS, "outcome" => "unauthorized").increment(1);
            self.expire_session(authorized);
            return Err(ApiError::Unauthorized { detail });
        }

        counter!(METRIC_HTTP_REQUESTS, "outcome" => "error").increment(1);
        warn!(
            %method,
            path,
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "backend request failed"
        );
        Err(ApiError::server(status.as_u16(), detail))
    }

    fn expire_session(&self, authorized: bool) {
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "failed to clear rejected session token");
        }
        if authorized {
            self.signal.notify_expired();
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<T, ApiError> {
        let bytes = self.execute(method, path, query, body).await?;
        decode(&bytes)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.call(Method::GET, path, query, Body::Empty).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, ApiError> {
        self.call(Method::POST, path, &[], json_body(body)?).await
    }

    async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, ApiError> {
        self.call(Method::PUT, path, &[], json_body(body)?).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, &[], Body::Empty)
            .await
            .map(|_| ())
    }
}

fn json_body(body: &impl Serialize) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(|err| ApiError::InvalidInput(err.to_string()))
}

/// Empty bodies (204, bare acknowledgements) decode as `{}`.
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let bytes = if bytes.trim_ascii().is_empty() {
        b"{}".as_slice()
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(ApiError::decode)
}

fn extract_detail(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|value| detail_from(&value))
}

fn detail_from(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    DETAIL_FIELDS
        .iter()
        .filter_map(|field| object.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn image_part(image: ImageUpload) -> Result<Part, ApiError> {
    let mime = mime_guess::from_path(&image.file_name).first_or_octet_stream();
    Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(mime.essence_str())
        .map_err(|err| ApiError::InvalidInput(err.to_string()))
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.execute(Method::POST, "auth/register/", &[], json_body(request)?)
            .await
            .map(|_| ())
    }

    async fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError> {
        self.post("auth/login/", request).await
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.get("auth/me/", &[]).await
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get("auth/profile/", &[]).await
    }

    async fn update_profile(
        &self,
        update: &ProfileUpdateRequest,
        image: Option<ImageUpload>,
    ) -> Result<UserProfile, ApiError> {
        let Some(image) = image else {
            return self.put("auth/profile/", update).await;
        };

        let form = update
            .fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part("work_image", image_part(image)?);
        self.call(Method::PUT, "auth/profile/", &[], Body::Multipart(form))
            .await
    }

    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<Acknowledgement, ApiError> {
        self.post("auth/change-password/", request).await
    }

    async fn stats(&self) -> Result<UserStats, ApiError> {
        self.get("auth/stats/", &[]).await
    }
}

#[async_trait]
impl BusinessApi for ApiClient {
    async fn search(&self, filters: &Value) -> Result<Vec<Business>, ApiError> {
        let body = self
            .execute(
                Method::POST,
                "ai/generate-businesses/",
                &[],
                Body::Json(filters.clone()),
            )
            .await?;

        match decode::<Value>(&body)? {
            Value::Array(items) => {
                serde_json::from_value(Value::Array(items)).map_err(ApiError::decode)
            }
            other => match detail_from(&other) {
                Some(detail) => Err(ApiError::server(StatusCode::OK.as_u16(), Some(detail))),
                None => Err(ApiError::decode("expected a list of businesses")),
            },
        }
    }

    async fn list(&self, params: &[(&'static str, String)]) -> Result<Vec<Business>, ApiError> {
        self.get("businesses/", params).await
    }

    async fn create(&self, business: &NewBusiness) -> Result<Business, ApiError> {
        self.post("businesses/", business).await
    }
}

#[async_trait]
impl EmailApi for ApiClient {
    async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse, ApiError> {
        self.post("emails/send/", request).await
    }

    async fn history(&self, page: u32, page_size: u32) -> Result<HistoryPage, ApiError> {
        self.get(
            "emails/history/",
            &[("page", page.to_string()), ("page_size", page_size.to_string())],
        )
        .await
    }

    async fn templates(&self) -> Result<Vec<EmailTemplate>, ApiError> {
        self.get("emails/templates/", &[]).await
    }

    async fn create_template(
        &self,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate, ApiError> {
        self.post("emails/templates/", request).await
    }

    async fn update_template(
        &self,
        id: TemplateId,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate, ApiError> {
        self.put(&format!("emails/templates/{id}/"), request).await
    }

    async fn delete_template(&self, id: TemplateId) -> Result<(), ApiError> {
        self.delete(&format!("emails/templates/{id}/")).await
    }

    async fn campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        self.get("emails/campaigns/", &[]).await
    }

    async fn create_campaign(&self, request: &CampaignRequest) -> Result<Campaign, ApiError> {
        self.post("emails/campaigns/", request).await
    }

    async fn update_campaign(
        &self,
        id: CampaignId,
        request: &CampaignRequest,
    ) -> Result<Campaign, ApiError> {
        self.put(&format!("emails/campaigns/{id}/"), request).await
    }

    async fn delete_campaign(&self, id: CampaignId) -> Result<(), ApiError> {
        self.delete(&format!("emails/campaigns/{id}/")).await
    }

    async fn send_campaign(&self, id: CampaignId) -> Result<Acknowledgement, ApiError> {
        self.call(
            Method::POST,
            &format!("emails/campaigns/{id}/send/"),
            &[],
            Body::Empty,
        )
        .await
    }

    async fn campaign_from_businesses(
        &self,
        request: &CampaignFromBusinessesRequest,
    ) -> Result<CampaignCreated, ApiError> {
        self.post("emails/campaigns/create-from-businesses/", request)
            .await
    }

    async fn analytics(&self, days: u32) -> Result<AnalyticsReport, ApiError> {
        self.get("emails/analytics/", &[("days", days.to_string())])
            .await
    }

    async fn refresh_analytics(&self) -> Result<Acknowledgement, ApiError> {
        self.call(Method::POST, "emails/analytics/update/", &[], Body::Empty)
            .await
    }
}

#[async_trait]
impl AiApi for ApiClient {
    async fn generate_email(
        &self,
        request: &GenerateEmailRequest,
    ) -> Result<GeneratedEmail, ApiError> {
        self.post("ai/generate-email/", request).await
    }

    async fn generate_bulk_email(
        &self,
        request: &GenerateBulkEmailRequest,
    ) -> Result<GeneratedEmail, ApiError> {
        self.post("ai/generate-bulk-email/", request).await
    }
}

#[async_trait]
impl GmailApi for ApiClient {
    async fn status(&self) -> Result<GmailStatus, ApiError> {
        self.get("emails/gmail/status/", &[]).await
    }

    async fn auth_url(&self) -> Result<GmailAuthUrl, ApiError> {
        self.get("emails/gmail/auth-url/", &[]).await
    }

    async fn disconnect(&self) -> Result<Acknowledgement, ApiError> {
        self.call(Method::POST, "emails/gmail/disconnect/", &[], Body::Empty)
            .await
    }

    async fn send(&self, request: &SendEmailRequest) -> Result<GmailSendResponse, ApiError> {
        self.post("emails/gmail/send/", request).await
    }
}

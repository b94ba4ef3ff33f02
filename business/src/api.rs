//! The directory API client.
//!
//! [`DirectoryApi`] is the seam commands talk through; production uses
//! [`HttpDirectoryApi`], tests substitute scripted implementations. The
//! handle is held in the state context so commands pick it up from their
//! snapshot.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use roster_states::{State, state_assign_impl};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{Client, Response};
use crate::models::{
    CreateUserOutcome, PagedUsers, Position, PositionsResponse, TokenResponse, User,
};
use crate::multipart::MultipartForm;
use crate::token_store::TokenStore;

/// Fields of a registration request. The photo travels separately as raw
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: i64,
}

#[async_trait]
pub trait DirectoryApi: Send + Sync + Debug {
    async fn get_users(&self, page: u32, count: u32) -> Result<PagedUsers, ApiError>;
    async fn get_user(&self, id: i64) -> Result<User, ApiError>;
    async fn get_positions(&self) -> Result<Vec<Position>, ApiError>;
    /// Fetch a fresh registration token without persisting it.
    async fn get_token(&self) -> Result<String, ApiError>;
    /// Fetch a fresh registration token and persist it for later requests.
    async fn refresh_token(&self) -> Result<(), ApiError>;
    async fn create_user(
        &self,
        fields: &NewUser,
        photo: &[u8],
    ) -> Result<CreateUserOutcome, ApiError>;
}

/// Production client against the REST API.
#[derive(Debug, Clone)]
pub struct HttpDirectoryApi {
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl HttpDirectoryApi {
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            base_url: base_url.into(),
            store,
        }
    }

    pub fn from_config(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Self {
        Self::new(config.api_base_url.clone(), store)
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if !response.is_success() {
            return Err(ApiError::from_status(response.status));
        }
        response.json()
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let mut request = Client::get(format!("{}{path}", self.base_url))
            .header("Content-Type", "application/json");
        if let Some(token) = self.store.load() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        Self::decode(request.send().await?)
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn get_users(&self, page: u32, count: u32) -> Result<PagedUsers, ApiError> {
        self.get_json(&format!("/users?page={page}&count={count}"))
            .await
    }

    async fn get_user(&self, id: i64) -> Result<User, ApiError> {
        self.get_json(&format!("/users/{id}")).await
    }

    async fn get_positions(&self) -> Result<Vec<Position>, ApiError> {
        let response: PositionsResponse = self.get_json("/positions").await?;
        Ok(response.positions)
    }

    async fn get_token(&self) -> Result<String, ApiError> {
        let response = Client::post(format!("{}/token", self.base_url))
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let token: TokenResponse = Self::decode(response)?;
        Ok(token.token)
    }

    async fn refresh_token(&self) -> Result<(), ApiError> {
        let token = self.get_token().await?;
        self.store.store(&token).map_err(|e| {
            log::error!("failed to persist API token: {e}");
            ApiError::Unknown
        })?;
        info!("refreshed API token");
        Ok(())
    }

    async fn create_user(
        &self,
        fields: &NewUser,
        photo: &[u8],
    ) -> Result<CreateUserOutcome, ApiError> {
        // Registration needs a previously fetched token; the raw value
        // goes in the Token header, not an Authorization bearer.
        let Some(token) = self.store.load() else {
            return Err(ApiError::Unauthorized);
        };

        let form = MultipartForm::new()
            .text("name", &fields.name)
            .text("email", &fields.email)
            .text("phone", &fields.phone)
            .text("position_id", &fields.position_id.to_string())
            .file("photo", "photo.jpg", "image/jpeg", photo);

        let response = Client::post(format!("{}/users", self.base_url))
            .header("Token", token)
            .header("Content-Type", form.content_type())
            .body(form.finish())
            .send()
            .await?;
        Self::decode(response)
    }
}

/// State-context carrier for the API client, so command snapshots can
/// reach it.
#[derive(Debug, Clone)]
pub struct ApiHandle {
    inner: Arc<dyn DirectoryApi>,
}

impl ApiHandle {
    pub fn new(api: Arc<dyn DirectoryApi>) -> Self {
        Self { inner: api }
    }

    pub fn api(&self) -> Arc<dyn DirectoryApi> {
        Arc::clone(&self.inner)
    }
}

impl State for ApiHandle {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn std::any::Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn std::any::Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Client for the directory backend that issues codes and owns the
/// identity data (users, zones).
pub struct DirectoryClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryData {
    #[serde(default)]
    pub users: Vec<ApiUser>,
    #[serde(default)]
    pub zones: Vec<ApiZone>,
    #[serde(default)]
    pub codes: Vec<ApiCode>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub id: Uuid,
    pub nombre: String,
    pub correo: String,
    pub matricula: String,
    pub carrera: String,
    pub grupo: String,
    pub activo: bool,
    #[serde(default)]
    pub imagen: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiZone {
    pub id: Uuid,
    pub nombre: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiCode {
    pub codigo: String,
    pub user_id: Uuid,
    #[serde(default)]
    pub usado: bool,
    #[serde(default)]
    pub usado_at: Option<String>,
}

impl DirectoryClient {
    pub fn new(endpoint: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Fetch the full directory snapshot: users, zones and issued codes.
    pub async fn fetch_data(&self) -> Result<DirectoryData> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("api_key", &self.api_key)])
            .send()
            .await
            .context("Failed to send request to directory backend")?;

        if !response.status().is_success() {
            bail!(
                "Directory backend returned error status: {}",
                response.status()
            );
        }

        response
            .json::<DirectoryData>()
            .await
            .context("Failed to parse JSON response from directory backend")
    }
}

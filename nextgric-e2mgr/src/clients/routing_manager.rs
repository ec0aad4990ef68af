//! Routing manager HTTP client
//!
//! The routing manager keeps the message router's tables in line with which
//! RAN is bound to which terminator. Every call is a JSON request; any 2xx
//! answer is success and everything else is a [`RoutingManagerClientError`].

use async_trait::async_trait;
use nextgric_common::RoutingManagerConfig;
use reqwest::{Client, Method};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const ADD_E2T_INSTANCE_PATH: &str = "e2t";
pub const ASSOCIATE_RAN_TO_E2T_INSTANCE_PATH: &str = "associate-ran-to-e2t";
pub const DISSOCIATE_RAN_E2T_INSTANCE_PATH: &str = "dissociate-ran";
pub const DELETE_E2T_INSTANCE_PATH: &str = "e2t";

/// Routing manager failures.
#[derive(Debug, Error)]
pub enum RoutingManagerClientError {
    /// The request never got an answer
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The routing manager answered with a non-2xx status
    #[error("{url} answered with status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The client could not be built
    #[error("invalid routing manager client configuration: {0}")]
    Configuration(String),
}

/// Terminator address with the RANs concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingManagerE2TData {
    #[serde(rename = "E2TAddress")]
    pub e2t_address: String,
    #[serde(rename = "ranNamelist", skip_serializing_if = "Vec::is_empty")]
    pub ran_name_list: Vec<String>,
}

impl RoutingManagerE2TData {
    pub fn new(e2t_address: &str, ran_names: Vec<String>) -> Self {
        Self {
            e2t_address: e2t_address.to_string(),
            ran_name_list: ran_names,
        }
    }
}

/// Body of an instance deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingManagerDeleteRequest {
    #[serde(rename = "E2TAddress")]
    pub e2t_address: String,
    #[serde(rename = "ranNamelistTobeDissociated", skip_serializing_if = "Vec::is_empty")]
    pub ran_names_to_dissociate: Vec<String>,
}

/// Operations of the routing manager used by the E2 manager.
#[async_trait]
pub trait RoutingManagerClient: Send + Sync {
    /// Registers a new terminator.
    async fn add_e2t_instance(&self, e2t_address: &str) -> Result<(), RoutingManagerClientError>;

    /// Routes `ran_name` through `e2t_address`.
    async fn associate_ran_to_e2t_instance(
        &self,
        e2t_address: &str,
        ran_name: &str,
    ) -> Result<(), RoutingManagerClientError>;

    /// Removes the route of `ran_name` through `e2t_address`.
    async fn dissociate_ran_e2t_instance(
        &self,
        e2t_address: &str,
        ran_name: &str,
    ) -> Result<(), RoutingManagerClientError>;

    /// Removes a terminator and the routes of `ran_names`.
    async fn delete_e2t_instance(
        &self,
        e2t_address: &str,
        ran_names: &[String],
    ) -> Result<(), RoutingManagerClientError>;
}

/// [`RoutingManagerClient`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRoutingManagerClient {
    client: Client,
    base_url: String,
}

impl HttpRoutingManagerClient {
    /// Builds a client from the routing manager section of the configuration.
    pub fn new(config: &RoutingManagerConfig) -> Result<Self, RoutingManagerClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RoutingManagerClientError::Configuration(e.to_string()))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Self { client, base_url }
    }

    async fn send_json<T: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<(), RoutingManagerClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Routing manager request: {} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| RoutingManagerClientError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!("Routing manager answered {} for {}", status, url);
            return Ok(());
        }

        warn!("Routing manager answered {} for {}", status, url);
        Err(RoutingManagerClientError::UnexpectedStatus {
            url,
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl RoutingManagerClient for HttpRoutingManagerClient {
    async fn add_e2t_instance(&self, e2t_address: &str) -> Result<(), RoutingManagerClientError> {
        let data = RoutingManagerE2TData::new(e2t_address, Vec::new());
        self.send_json(Method::POST, ADD_E2T_INSTANCE_PATH, &data).await
    }

    async fn associate_ran_to_e2t_instance(
        &self,
        e2t_address: &str,
        ran_name: &str,
    ) -> Result<(), RoutingManagerClientError> {
        let data = vec![RoutingManagerE2TData::new(e2t_address, vec![ran_name.to_string()])];
        self.send_json(Method::POST, ASSOCIATE_RAN_TO_E2T_INSTANCE_PATH, &data)
            .await
    }

    async fn dissociate_ran_e2t_instance(
        &self,
        e2t_address: &str,
        ran_name: &str,
    ) -> Result<(), RoutingManagerClientError> {
        let data = vec![RoutingManagerE2TData::new(e2t_address, vec![ran_name.to_string()])];
        self.send_json(Method::POST, DISSOCIATE_RAN_E2T_INSTANCE_PATH, &data)
            .await
    }

    async fn delete_e2t_instance(
        &self,
        e2t_address: &str,
        ran_names: &[String],
    ) -> Result<(), RoutingManagerClientError> {
        let data = RoutingManagerDeleteRequest {
            e2t_address: e2t_address.to_string(),
            ran_names_to_dissociate: ran_names.to_vec(),
        };
        self.send_json(Method::DELETE, DELETE_E2T_INSTANCE_PATH, &data)
            .await
    }
}

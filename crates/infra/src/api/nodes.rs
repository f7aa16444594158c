//! `nodes` endpoint adapter

use async_trait::async_trait;
use pvekit_core::NodePort;
use pvekit_domain::{Node, Result};

use super::client::PveClient;

/// [`NodePort`] over the HTTP API.
#[derive(Debug, Clone)]
pub struct NodesApi {
    client: PveClient,
}

impl NodesApi {
    pub fn new(client: PveClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NodePort for NodesApi {
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.client.get("nodes").await?)
    }
}

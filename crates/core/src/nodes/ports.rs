//! Port interface for node inventory

use async_trait::async_trait;
use pvekit_domain::{Node, Result};

/// Read access to the cluster's nodes.
#[async_trait]
pub trait NodePort: Send + Sync {
    /// List every node of the cluster (`GET nodes`)
    async fn list_nodes(&self) -> Result<Vec<Node>>;
}

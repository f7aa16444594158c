//! Port interface for storage management
//!
//! Paths are relative to `nodes/{node}/storage`.

use async_trait::async_trait;
use pvekit_domain::{NewVolume, Result, Storage, StorageVolume};

/// Storage pools of a node and the volumes they hold.
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// List the storage pools visible on `node`
    async fn list_storage(&self, node: &str) -> Result<Vec<Storage>>;

    /// List the volumes of one pool (`{storage}/content`)
    async fn list_volumes(&self, node: &str, storage: &str) -> Result<Vec<StorageVolume>>;

    /// Fetch a single volume by its volume id (`local-lvm:vm-100-disk-0`)
    async fn volume(&self, node: &str, storage: &str, volid: &str) -> Result<StorageVolume>;

    /// Allocate a volume
    ///
    /// # Returns
    /// The volume id assigned by the server
    async fn create_volume(&self, node: &str, storage: &str, volume: &NewVolume)
        -> Result<String>;

    /// Delete a volume
    ///
    /// # Returns
    /// The task id when the server runs the deletion asynchronously
    async fn delete_volume(&self, node: &str, storage: &str, volid: &str)
        -> Result<Option<String>>;
}

//! `nodes/{node}/storage` endpoint adapter

use async_trait::async_trait;
use pvekit_core::vm_config::WireMap;
use pvekit_core::StoragePort;
use pvekit_domain::{NewVolume, Result, Storage, StorageVolume};
use urlencoding::encode;

use super::client::PveClient;

/// [`StoragePort`] over the HTTP API.
#[derive(Debug, Clone)]
pub struct StorageApi {
    client: PveClient,
}

impl StorageApi {
    pub fn new(client: PveClient) -> Self {
        Self { client }
    }
}

fn content_path(node: &str, storage: &str) -> String {
    format!("nodes/{}/storage/{}/content", encode(node), encode(storage))
}

fn volume_path(node: &str, storage: &str, volid: &str) -> String {
    format!("{}/{}", content_path(node, storage), encode(volid))
}

fn volume_params(volume: &NewVolume) -> WireMap {
    let mut params = WireMap::new();
    params.insert("vmid".into(), volume.vmid.to_string());
    params.insert("filename".into(), volume.filename.clone());
    params.insert("size".into(), volume.size.clone());
    if let Some(format) = volume.format {
        params.insert("format".into(), format.to_string());
    }
    params
}

#[async_trait]
impl StoragePort for StorageApi {
    async fn list_storage(&self, node: &str) -> Result<Vec<Storage>> {
        Ok(self.client.get(&format!("nodes/{}/storage", encode(node))).await?)
    }

    async fn list_volumes(&self, node: &str, storage: &str) -> Result<Vec<StorageVolume>> {
        Ok(self.client.get(&content_path(node, storage)).await?)
    }

    async fn volume(&self, node: &str, storage: &str, volid: &str) -> Result<StorageVolume> {
        let mut volume: StorageVolume =
            self.client.get(&volume_path(node, storage, volid)).await?;
        // The single-volume endpoint omits the id it was asked for.
        if volume.volid.is_empty() {
            volume.volid = volid.to_string();
        }
        Ok(volume)
    }

    async fn create_volume(
        &self,
        node: &str,
        storage: &str,
        volume: &NewVolume,
    ) -> Result<String> {
        let path = content_path(node, storage);
        Ok(self.client.post(&path, &volume_params(volume)).await?)
    }

    async fn delete_volume(
        &self,
        node: &str,
        storage: &str,
        volid: &str,
    ) -> Result<Option<String>> {
        Ok(self.client.delete(&volume_path(node, storage, volid)).await?)
    }
}

#[cfg(test)]
mod tests {
    use pvekit_domain::types::VolumeFormat;

    use super::*;

    #[test]
    fn volume_ids_are_escaped_as_one_segment() {
        assert_eq!(
            volume_path("pve1", "local-lvm", "local-lvm:vm-100-disk-0"),
            "nodes/pve1/storage/local-lvm/content/local-lvm%3Avm-100-disk-0"
        );
    }

    #[test]
    fn new_volume_params() {
        let volume = NewVolume::new(100, "vm-100-disk-1", "4G").with_format(VolumeFormat::Qcow2);
        let params = volume_params(&volume);
        assert_eq!(params["vmid"], "100");
        assert_eq!(params["filename"], "vm-100-disk-1");
        assert_eq!(params["size"], "4G");
        assert_eq!(params["format"], "qcow2");
    }
}

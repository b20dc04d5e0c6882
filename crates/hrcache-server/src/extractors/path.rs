use hrcache_core::{CacheError, ResourceModel};
use serde::Deserialize;

/// Extractor para rutas /cache/{model}
#[derive(Debug, Deserialize)]
pub struct ModelPath {
    pub model: String,
}

impl ModelPath {
    /// Valida el nombre y lo convierte en modelo.
    pub fn resource_model(&self) -> Result<ResourceModel, CacheError> {
        ResourceModel::new(self.model.trim())
    }
}

pub mod backend;
pub mod image_client;

use crate::config::HfConfig;
use std::sync::Arc;

pub use backend::{HttpBackend, InferenceBackend};
pub use image_client::ImageClient;

/// Entry point for the library. Holds the configured sub-clients; stateless
/// beyond configuration, so cloning is cheap and safe.
#[derive(Clone)]
pub struct HfClient {
    image_client: ImageClient,
}

impl HfClient {
    pub fn new(config: HfConfig) -> Self {
        let backend = Arc::new(HttpBackend::new(config.api_base()));
        Self::with_backend(config, backend)
    }

    /// Build the client over a custom backend, e.g. a stub in tests or a
    /// self-hosted endpoint speaking the same protocol.
    pub fn with_backend(config: HfConfig, backend: Arc<dyn InferenceBackend>) -> Self {
        HfClient {
            image_client: ImageClient::new(backend, &config),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}

use crate::client::{HttpService, RemoteService};
use crate::workflow::WorkflowController;

use super::{ClientConfig, Result};

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ClientConfig,
    service: HttpService,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let service = HttpService::new(config.server_url.clone(), config.timeout())
            .with_chunk_size(config.upload_chunk_bytes);
        log::debug!("using server {}", service.base_url());
        Ok(Self { config, service })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn service(&self) -> &HttpService {
        &self.service
    }

    pub fn controller(&self) -> WorkflowController<HttpService> {
        WorkflowController::new(self.service.clone())
    }

    pub fn health(&self) -> Result<String> {
        Ok(self.service.health()?)
    }

    pub fn uploads(&self) -> Result<Vec<String>> {
        Ok(self.service.list_uploads()?)
    }
}

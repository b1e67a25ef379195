use super::{ProviderInvoker, ProviderPayload};
use crate::models::EndpointConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub struct MockProviderInvoker {
    responses: Arc<Mutex<Vec<String>>>,
    payloads: Arc<Mutex<Vec<ProviderPayload>>>,
    failure: Option<String>,
}

impl MockProviderInvoker {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            payloads: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Make every call fail with an upstream error carrying `message`.
    pub fn with_failure(mut self, message: String) -> Self {
        self.failure = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    /// Payloads received so far, in call order.
    pub fn payloads(&self) -> Vec<ProviderPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

impl Default for MockProviderInvoker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderInvoker for MockProviderInvoker {
    async fn invoke(&self, _config: &EndpointConfig, payload: ProviderPayload) -> Result<String> {
        let family = payload.family();
        let count = {
            let mut payloads = self.payloads.lock().unwrap();
            payloads.push(payload);
            payloads.len()
        };

        if let Some(message) = &self.failure {
            return Err(Error::upstream(family, message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("---BEGIN PROMPT---\nmock schema\n---END PROMPT---".to_string())
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

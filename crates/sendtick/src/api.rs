//! One method per Sendtick operation over an injected [`ApiClient`].

use std::sync::Arc;

use {
    serde_json::Value,
    tracing::{debug, instrument},
};

#[cfg(feature = "metrics")]
use {
    crate::metrics as names,
    metrics::{counter, histogram},
};

use sendtick_config::SendtickConfig;

use crate::{
    client::{ApiClient, HttpApiClient},
    error::{Error, Result},
    operations::{self, Call, ContactUpdate, ListOptions, NewContact, SendMessage},
    request::RequestSpec,
    resource::{Capabilities, Operation, Resource},
};

/// Entry point for calling the Sendtick API.
#[derive(Clone)]
pub struct SendtickApi {
    client: Arc<dyn ApiClient>,
    capabilities: Capabilities,
}

impl SendtickApi {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            client,
            capabilities: Capabilities::default(),
        }
    }

    /// Build an HTTP-backed API from loaded configuration.
    pub fn from_config(config: &SendtickConfig) -> Result<Self> {
        let client = HttpApiClient::from_config(&config.api)?;
        Ok(Self::new(Arc::new(client)).with_capabilities(Capabilities::from(&config.connector)))
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Run any operation described as a [`Call`].
    pub async fn call(&self, call: &Call) -> Result<Value> {
        let (resource, operation) = (call.resource(), call.operation());
        self.ensure_enabled(resource, operation)?;
        let spec = call.to_request()?;
        self.execute(resource, operation, &spec).await
    }

    /// Build the request for `call` without sending it.
    pub fn plan(&self, call: &Call) -> Result<RequestSpec> {
        self.ensure_enabled(call.resource(), call.operation())?;
        call.to_request()
    }

    pub async fn send_message(&self, input: &SendMessage) -> Result<Value> {
        let spec = operations::send_message(input)?;
        self.execute(Resource::Message, Operation::Send, &spec).await
    }

    pub async fn create_contact(&self, input: &NewContact) -> Result<Value> {
        let spec = operations::create_contact(input)?;
        self.execute(Resource::Contact, Operation::Create, &spec).await
    }

    pub async fn get_contact(&self, contact_id: &str) -> Result<Value> {
        let spec = operations::get_contact(contact_id)?;
        self.execute(Resource::Contact, Operation::Get, &spec).await
    }

    pub async fn list_contacts(&self, options: ListOptions) -> Result<Value> {
        let spec = operations::list_contacts(options)?;
        self.execute(Resource::Contact, Operation::GetAll, &spec).await
    }

    pub async fn update_contact(&self, contact_id: &str, update: &ContactUpdate) -> Result<Value> {
        let spec = operations::update_contact(contact_id, update)?;
        self.execute(Resource::Contact, Operation::Update, &spec).await
    }

    pub async fn delete_contact(&self, contact_id: &str) -> Result<Value> {
        let spec = operations::delete_contact(contact_id)?;
        self.execute(Resource::Contact, Operation::Delete, &spec).await
    }

    pub async fn upload_media(&self, file_url: &str) -> Result<Value> {
        self.ensure_enabled(Resource::Media, Operation::Upload)?;
        let spec = operations::upload_media(file_url)?;
        self.execute(Resource::Media, Operation::Upload, &spec).await
    }

    pub async fn get_media(&self, media_id: &str) -> Result<Value> {
        self.ensure_enabled(Resource::Media, Operation::Get)?;
        let spec = operations::get_media(media_id)?;
        self.execute(Resource::Media, Operation::Get, &spec).await
    }

    pub async fn list_media(&self, options: ListOptions) -> Result<Value> {
        self.ensure_enabled(Resource::Media, Operation::GetAll)?;
        let spec = operations::list_media(options)?;
        self.execute(Resource::Media, Operation::GetAll, &spec).await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Value> {
        let spec = operations::get_session(session_id)?;
        self.execute(Resource::Session, Operation::Get, &spec).await
    }

    pub async fn list_sessions(&self, options: ListOptions) -> Result<Value> {
        let spec = operations::list_sessions(options)?;
        self.execute(Resource::Session, Operation::GetAll, &spec).await
    }

    fn ensure_enabled(&self, resource: Resource, operation: Operation) -> Result<()> {
        if self.capabilities.allows(resource) {
            Ok(())
        } else {
            Err(Error::unsupported(resource, operation))
        }
    }

    #[instrument(skip_all, fields(resource = %resource, operation = %operation))]
    async fn execute(
        &self,
        resource: Resource,
        operation: Operation,
        spec: &RequestSpec,
    ) -> Result<Value> {
        #[cfg(feature = "metrics")]
        let started = std::time::Instant::now();

        let result = self.client.request(spec).await;

        #[cfg(feature = "metrics")]
        {
            let (r, o) = (resource.as_str(), operation.as_str());
            counter!(names::REQUESTS_TOTAL, "resource" => r, "operation" => o).increment(1);
            histogram!(names::REQUEST_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
            if result.is_err() {
                counter!(names::REQUEST_ERRORS_TOTAL, "resource" => r, "operation" => o)
                    .increment(1);
            }
        }

        if let Err(err) = &result {
            debug!(error = %err, "sendtick call failed");
        }
        result
    }
}

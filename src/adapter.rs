//! Request adapter
//!
//! Runs an operation over a batch of items, strictly one after another:
//! prepare parameters, build the request, send it, shape the response.
//! Every item yields exactly one [`OutputRecord`] unless a failure aborts
//! the batch.

use crate::api::{build_request, shape_response, ApiRequest, HttpTransport, RequestBody, Transport};
use crate::config::AdapterConfig;
use crate::error::Result;
use crate::item::{InputItem, OutputRecord};
use crate::operation::{OperationParams, VALIDATE_API_KEY_PATH};
use reqwest::Method;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a credential check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialCheck {
    pub valid: bool,
    pub status_code: u16,
}

/// Maps typed operation parameters onto remote API calls
pub struct Adapter<T = HttpTransport> {
    transport: T,
    config: Arc<AdapterConfig>,
}

impl Adapter<HttpTransport> {
    /// Create an adapter that talks to the configured API over HTTP
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> Adapter<T> {
    pub fn with_transport(transport: T, config: AdapterConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `params` against every item.
    ///
    /// With `continue_on_fail`, a failed item yields `{"error": message}` and
    /// the batch goes on; otherwise the first failure is returned as
    /// [`crate::Error::ItemFailed`] carrying the item index.
    pub async fn execute(
        &self,
        items: &[InputItem],
        params: &OperationParams,
        continue_on_fail: bool,
    ) -> Result<Vec<OutputRecord>> {
        self.execute_with(items, continue_on_fail, |_, _| Ok(params.clone()))
            .await
    }

    /// Like [`Adapter::execute`], resolving parameters separately for each item.
    /// Resolver errors follow the same failure policy as request errors.
    pub async fn execute_with<F>(
        &self,
        items: &[InputItem],
        continue_on_fail: bool,
        mut resolve: F,
    ) -> Result<Vec<OutputRecord>>
    where
        F: FnMut(usize, &InputItem) -> Result<OperationParams>,
    {
        tracing::info!(items = items.len(), continue_on_fail, "executing batch");

        let mut records = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let outcome = match resolve(index, item) {
                Ok(params) => self.process_item(index, item, &params).await,
                Err(e) => Err(e),
            };
            settle(&mut records, index, outcome, continue_on_fail)?;
        }

        Ok(records)
    }

    /// Like [`Adapter::execute`], building each item only when its turn comes.
    /// `load` failures follow the same failure policy as request errors.
    pub async fn execute_loading<F>(
        &self,
        count: usize,
        params: &OperationParams,
        continue_on_fail: bool,
        mut load: F,
    ) -> Result<Vec<OutputRecord>>
    where
        F: FnMut(usize) -> Result<InputItem>,
    {
        tracing::info!(items = count, continue_on_fail, "executing batch");

        let mut records = Vec::with_capacity(count);

        for index in 0..count {
            let outcome = match load(index) {
                Ok(item) => self.process_item(index, &item, params).await,
                Err(e) => Err(e),
            };
            settle(&mut records, index, outcome, continue_on_fail)?;
        }

        Ok(records)
    }

    /// Process a single item: validate, build, send, shape.
    pub async fn process_item(
        &self,
        index: usize,
        item: &InputItem,
        params: &OperationParams,
    ) -> Result<OutputRecord> {
        let prepared = params.prepare(&self.config)?;
        let request = build_request(&prepared, item, &self.config)?;

        tracing::debug!(
            operation = %prepared.operation,
            item = index,
            url = %request.url,
            multipart = matches!(request.body, RequestBody::Multipart(_)),
            "sending request"
        );

        let response = self.transport.send(request).await?;

        if response.is_error() {
            tracing::warn!(
                operation = %prepared.operation,
                item = index,
                status = response.status,
                "remote API returned an error status"
            );
        }

        shape_response(
            response,
            &prepared.output,
            index,
            self.config.fail_on_http_error,
        )
    }

    /// Check the API key against the validation endpoint.
    /// Transport failures are errors; a rejected key is `valid: false`.
    pub async fn validate_credentials(&self) -> Result<CredentialCheck> {
        let request = ApiRequest {
            method: Method::GET,
            url: self.config.endpoint(VALIDATE_API_KEY_PATH)?,
            body: RequestBody::Empty,
            timeout: Some(self.config.timeout()),
        };

        let response = self.transport.send(request).await?;
        let check = CredentialCheck {
            valid: !response.is_error(),
            status_code: response.status,
        };

        tracing::info!(valid = check.valid, status = check.status_code, "credential check");
        Ok(check)
    }
}

/// Apply the failure policy to one item's outcome.
fn settle(
    records: &mut Vec<OutputRecord>,
    index: usize,
    outcome: Result<OutputRecord>,
    continue_on_fail: bool,
) -> Result<()> {
    match outcome {
        Ok(record) => records.push(record),
        Err(e) if continue_on_fail => {
            tracing::warn!(item = index, error = %e, "item failed, continuing");
            records.push(OutputRecord::error(index, e.to_string()));
        }
        Err(e) => {
            tracing::warn!(item = index, error = %e, "item failed, aborting batch");
            return Err(e.at_item(index));
        }
    }
    Ok(())
}

impl<T> std::fmt::Debug for Adapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

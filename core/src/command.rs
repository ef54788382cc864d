//! Command executor: one endpoint definition plus merged parameters.
//!
//! # Design
//! A `Command` is split like the rest of the core: `build_request` turns it
//! into an `HttpRequest` without touching the network, and `parse_response`
//! turns the transport's `HttpResponse` into a post-processed JSON value.
//! `JoindInClient` sits between the two with the transport.

use serde_json::Value;
use url::Url;

use crate::endpoint::{self, EndpointDefinition, ParamKind, ParamLocation};
use crate::error::ClientError;
use crate::hook::CompletionHook;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{ParamValue, Params};

#[derive(Debug, Clone)]
pub struct Command {
    endpoint: &'static EndpointDefinition,
    params: Params,
}

impl Command {
    pub fn new(name: &str, params: Params) -> Result<Self, ClientError> {
        let endpoint =
            endpoint::lookup(name).ok_or_else(|| ClientError::UnknownCommand(name.to_string()))?;
        Ok(Self::for_endpoint(endpoint, params))
    }

    pub fn for_endpoint(endpoint: &'static EndpointDefinition, params: Params) -> Self {
        Self { endpoint, params }
    }

    pub fn name(&self) -> &'static str {
        self.endpoint.name
    }

    pub fn endpoint(&self) -> &'static EndpointDefinition {
        self.endpoint
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Check the parameters against the endpoint's declared schema.
    pub fn validate(&self) -> Result<(), ClientError> {
        for (name, value) in &self.params {
            let spec = self
                .endpoint
                .parameter(name)
                .ok_or_else(|| self.invalid(format!("unknown parameter `{name}`")))?;
            if spec.kind == ParamKind::Integer && !matches!(value, ParamValue::Integer(_)) {
                return Err(self.invalid(format!(
                    "parameter `{name}` must be an integer, got `{value}`"
                )));
            }
        }
        if let Some(missing) = self
            .endpoint
            .parameters
            .iter()
            .find(|p| p.required && !self.params.contains(p.name))
        {
            return Err(self.invalid(format!("missing required parameter `{}`", missing.name)));
        }
        Ok(())
    }

    /// Expand the URI template against `base_url` and attach query parameters.
    pub fn build_request(&self, base_url: &Url) -> Result<HttpRequest, ClientError> {
        self.validate()?;

        let mut url = base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ClientError::Configuration(format!("base URL `{base_url}` cannot carry a path"))
            })?;
            segments.pop_if_empty();
            for segment in self.endpoint.uri_template.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = self.params.get(name).ok_or_else(|| {
                            self.invalid(format!("missing required parameter `{name}`"))
                        })?;
                        segments.push(&value.to_string());
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        let query: Vec<(&String, &ParamValue)> = self
            .params
            .iter()
            .filter(|(name, _)| {
                self.endpoint
                    .parameter(name)
                    .is_some_and(|p| p.location == ParamLocation::Query)
            })
            .collect();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, &value.to_string());
            }
        }

        Ok(HttpRequest {
            method: self.endpoint.method,
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        })
    }

    /// Interpret the response and run `hook` over the decoded body.
    pub fn parse_response<H>(&self, response: HttpResponse, hook: &H) -> Result<Value, ClientError>
    where
        H: CompletionHook + ?Sized,
    {
        check_status(&response)?;
        let body: Value = serde_json::from_str(&response.body).map_err(|e| {
            ClientError::Decode(format!("`{}` returned invalid JSON: {e}", self.name()))
        })?;
        Ok(hook.complete(body))
    }

    fn invalid(&self, reason: String) -> ClientError {
        ClientError::Validation {
            command: self.name().to_string(),
            reason,
        }
    }
}

/// Map non-2xx statuses to `HttpStatus`.
fn check_status(response: &HttpResponse) -> Result<(), ClientError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ClientError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

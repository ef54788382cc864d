//! The joind.in client.
//!
//! # Design
//! `JoindInClient` holds a resolved base URL, the default completion hook and
//! an injected transport; none of it changes after construction. Each public
//! method computes the parameters its command always needs, merges the
//! caller's options on top, runs the command through the transport and
//! shapes the post-processed JSON into records.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, debug_span};
use url::Url;

use crate::command::Command;
use crate::config::ClientConfig;
use crate::endpoint;
use crate::error::ClientError;
use crate::hook::CompletionHook;
use crate::http::{HttpRequest, Transport};
use crate::ids::assign_ids_from_uri;
use crate::params::{Options, Params};
use crate::types::{Comment, Event, Record, Talk, User};

/// Synchronous client for the joind.in API.
///
/// Every method issues exactly one request and blocks until the transport
/// returns.
#[derive(Clone)]
pub struct JoindInClient<T> {
    base_url: Url,
    completion_hook: Arc<dyn CompletionHook>,
    transport: T,
}

impl<T: fmt::Debug> fmt::Debug for JoindInClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoindInClient")
            .field("base_url", &self.base_url.as_str())
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "ureq")]
impl JoindInClient<crate::ureq_transport::UreqTransport> {
    /// Build a client over a default `UreqTransport`, applying defaults.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        Self::factory(config, crate::ureq_transport::UreqTransport::new())
    }
}

impl<T: Transport> JoindInClient<T> {
    /// Build a client, filling unset options with their defaults.
    pub fn factory(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        Self::new(config.with_defaults(), transport)
    }

    /// Build a client from `config` as given; `base_url` and `version` must
    /// both be set.
    pub fn new(config: ClientConfig, transport: T) -> Result<Self, ClientError> {
        let resolved = config.resolve()?;
        debug!(base_url = %resolved.base_url, "joind.in client configured");
        Ok(Self {
            base_url: resolved.base_url,
            completion_hook: resolved.completion_hook,
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get_events(&self, options: &Options) -> Result<Vec<Event>, ClientError> {
        let mut events = into_records(
            "events.get",
            self.run_command("events.get", Params::new(), options)?,
        )?;
        assign_ids_from_uri(&mut events);
        Ok(events)
    }

    pub fn get_event(&self, event_id: u64, options: &Options) -> Result<Event, ClientError> {
        let defaults = Params::new().set("eventId", event_id).verbose(true);
        into_record("event.get", self.run_command("event.get", defaults, options)?)
    }

    pub fn get_event_comments(
        &self,
        event_id: u64,
        options: &Options,
    ) -> Result<Vec<Comment>, ClientError> {
        let defaults = Params::new().set("eventId", event_id);
        into_records(
            "event.comments.get",
            self.run_command("event.comments.get", defaults, options)?,
        )
    }

    pub fn get_event_talks(
        &self,
        event_id: u64,
        options: &Options,
    ) -> Result<Vec<Talk>, ClientError> {
        let defaults = Params::new().set("eventId", event_id);
        let mut talks = into_records(
            "event.talks.get",
            self.run_command("event.talks.get", defaults, options)?,
        )?;
        assign_ids_from_uri(&mut talks);
        Ok(talks)
    }

    pub fn get_talk_comments(
        &self,
        talk_id: u64,
        options: &Options,
    ) -> Result<Vec<Comment>, ClientError> {
        let defaults = Params::new().set("talkId", talk_id);
        into_records(
            "talk.comments.get",
            self.run_command("talk.comments.get", defaults, options)?,
        )
    }

    pub fn get_talk(&self, talk_id: u64, options: &Options) -> Result<Talk, ClientError> {
        let defaults = Params::new().set("talkId", talk_id).verbose(true);
        into_record("talk.get", self.run_command("talk.get", defaults, options)?)
    }

    pub fn get_user(&self, user_id: u64, options: &Options) -> Result<User, ClientError> {
        let defaults = Params::new().set("userId", user_id).verbose(true);
        into_record("user.get", self.run_command("user.get", defaults, options)?)
    }

    pub fn get_events_attended_by_user(
        &self,
        user_id: u64,
        options: &Options,
    ) -> Result<Vec<Event>, ClientError> {
        let defaults = Params::new().set("userId", user_id);
        into_records(
            "events.attended.get",
            self.run_command("events.attended.get", defaults, options)?,
        )
    }

    pub fn get_talks_given_by_user(
        &self,
        user_id: u64,
        options: &Options,
    ) -> Result<Vec<Talk>, ClientError> {
        let defaults = Params::new().set("userId", user_id);
        into_records(
            "talks.byuser.get",
            self.run_command("talks.byuser.get", defaults, options)?,
        )
    }

    /// Run any command from the endpoint table with the configured hook.
    pub fn execute(&self, command: &str, params: Params) -> Result<Value, ClientError> {
        self.execute_with(command, params, self.completion_hook.as_ref())
    }

    /// Run a command with `hook` in place of the configured one.
    pub fn execute_with<H>(
        &self,
        command: &str,
        params: Params,
        hook: &H,
    ) -> Result<Value, ClientError>
    where
        H: CompletionHook + ?Sized,
    {
        self.run(&Command::new(command, params)?, hook)
    }

    /// The request `command` would issue, without sending it.
    pub fn build_request(&self, command: &str, params: Params) -> Result<HttpRequest, ClientError> {
        Command::new(command, params)?.build_request(&self.base_url)
    }

    /// Merge `options` over `defaults` and run the command.
    ///
    /// Options never replace a path parameter: identifiers come from the
    /// method arguments.
    fn run_command(
        &self,
        name: &str,
        defaults: Params,
        options: &Options,
    ) -> Result<Value, ClientError> {
        let endpoint = endpoint::lookup(name)
            .ok_or_else(|| ClientError::UnknownCommand(name.to_string()))?;
        let mut params = defaults;
        for (key, value) in options {
            if endpoint.is_path_parameter(key) {
                debug!(command = name, parameter = %key, "ignoring option for path parameter");
                continue;
            }
            params.insert(key.as_str(), value.clone());
        }
        self.run(&Command::for_endpoint(endpoint, params), self.completion_hook.as_ref())
    }

    fn run<H>(&self, command: &Command, hook: &H) -> Result<Value, ClientError>
    where
        H: CompletionHook + ?Sized,
    {
        let request = command.build_request(&self.base_url)?;
        let span = debug_span!(
            "joindin_command",
            command = command.name(),
            method = %request.method,
            url = %request.url
        );
        let _guard = span.enter();

        debug!("sending request");
        let response = self.transport.execute(&request).map_err(ClientError::Transport)?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        command.parse_response(response, hook)
    }
}

/// A list endpoint's result: an array of objects.
fn into_records(command: &str, value: Value) -> Result<Vec<Record>, ClientError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(ClientError::Decode(format!(
                    "`{command}` returned a list entry that is {}",
                    describe(&other)
                ))),
            })
            .collect(),
        other => Err(ClientError::Decode(format!(
            "`{command}` expected a list of records, got {}",
            describe(&other)
        ))),
    }
}

/// A detail endpoint's result: an object, or a list holding exactly one.
fn into_record(command: &str, value: Value) -> Result<Record, ClientError> {
    match value {
        Value::Object(record) => Ok(record),
        Value::Array(items) if items.len() == 1 => match items.into_iter().next() {
            Some(Value::Object(record)) => Ok(record),
            other => Err(ClientError::Decode(format!(
                "`{command}` returned a single entry that is {}",
                other.as_ref().map_or("missing", describe)
            ))),
        },
        other => Err(ClientError::Decode(format!(
            "`{command}` expected a single record, got {}",
            describe(&other)
        ))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(items) if items.is_empty() => "an empty list",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

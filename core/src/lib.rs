//! Synchronous client for the joind.in events API.
//!
//! # Overview
//! `JoindInClient` exposes one method per joind.in operation (events, event
//! comments and talks, talk comments, users and what they attended or
//! presented). Each method merges caller options over its required
//! parameters, runs the matching command from a static endpoint table
//! through an injected [`Transport`], and returns post-processed JSON
//! records.
//!
//! # Design
//! - The endpoint table (`endpoint`) is compiled in; a command name is looked
//!   up once and everything after works on the typed definition.
//! - `Command` keeps the request/response split explicit: `build_request`
//!   does no I/O, `parse_response` does no I/O, the transport sits between.
//! - Response shaping is a [`CompletionHook`] strategy. The default,
//!   [`StripMeta`], removes the `meta` envelope and unwraps a lone payload.
//! - List entries addressed only by `uri` get a numeric `id` from its
//!   trailing digits (`ids`).
//! - With the default `ureq` feature, [`UreqTransport`] provides a blocking
//!   HTTP transport.

pub mod client;
pub mod command;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod hook;
pub mod http;
pub mod ids;
pub mod params;
pub mod types;
#[cfg(feature = "ureq")]
pub mod ureq_transport;

pub use client::JoindInClient;
pub use command::Command;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_VERSION};
pub use endpoint::{EndpointDefinition, ParamKind, ParamLocation, ParamSpec, ENDPOINTS};
pub use error::ClientError;
pub use hook::{CompletionHook, Raw, StripMeta};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use ids::{assign_ids_from_uri, trailing_id};
pub use params::{EventFilter, Options, ParamValue, Params};
pub use types::{Comment, Event, Record, Talk, User};
#[cfg(feature = "ureq")]
pub use ureq_transport::UreqTransport;

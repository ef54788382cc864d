//! The joind.in endpoint table.
//!
//! # Design
//! Every command the client can run is described by one entry in
//! [`ENDPOINTS`], compiled into the crate. Looking a command up by name is the
//! only string dispatch in the library; everything downstream works on the
//! `&'static EndpointDefinition`.

use crate::http::HttpMethod;

/// Where a parameter travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
}

/// Declared value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub location: ParamLocation,
    pub required: bool,
    pub kind: ParamKind,
}

impl ParamSpec {
    /// Path parameters are always required integers in this API.
    const fn path(name: &'static str) -> Self {
        Self {
            name,
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::Integer,
        }
    }

    const fn query(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            location: ParamLocation::Query,
            required: false,
            kind,
        }
    }
}

/// Static description of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDefinition {
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path relative to the API root, `{name}` marking path parameters.
    pub uri_template: &'static str,
    pub parameters: &'static [ParamSpec],
}

impl EndpointDefinition {
    pub fn parameter(&self, name: &str) -> Option<&'static ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn is_path_parameter(&self, name: &str) -> bool {
        self.parameter(name)
            .is_some_and(|p| p.location == ParamLocation::Path)
    }
}

const VERBOSE: ParamSpec = ParamSpec::query("verbose", ParamKind::String);
const START: ParamSpec = ParamSpec::query("start", ParamKind::Integer);
const RESULTS_PER_PAGE: ParamSpec = ParamSpec::query("resultsperpage", ParamKind::Integer);

pub static ENDPOINTS: &[EndpointDefinition] = &[
    EndpointDefinition {
        name: "events.get",
        method: HttpMethod::Get,
        uri_template: "/events",
        parameters: &[
            START,
            RESULTS_PER_PAGE,
            VERBOSE,
            ParamSpec::query("filter", ParamKind::String),
            ParamSpec::query("title", ParamKind::String),
            ParamSpec::query("stub", ParamKind::String),
            ParamSpec::query("tags", ParamKind::String),
            ParamSpec::query("startdate", ParamKind::String),
            ParamSpec::query("enddate", ParamKind::String),
        ],
    },
    EndpointDefinition {
        name: "event.get",
        method: HttpMethod::Get,
        uri_template: "/events/{eventId}",
        parameters: &[ParamSpec::path("eventId"), VERBOSE],
    },
    EndpointDefinition {
        name: "event.comments.get",
        method: HttpMethod::Get,
        uri_template: "/events/{eventId}/comments",
        parameters: &[ParamSpec::path("eventId"), START, RESULTS_PER_PAGE, VERBOSE],
    },
    EndpointDefinition {
        name: "event.talks.get",
        method: HttpMethod::Get,
        uri_template: "/events/{eventId}/talks",
        parameters: &[ParamSpec::path("eventId"), START, RESULTS_PER_PAGE, VERBOSE],
    },
    EndpointDefinition {
        name: "talk.comments.get",
        method: HttpMethod::Get,
        uri_template: "/talks/{talkId}/comments",
        parameters: &[ParamSpec::path("talkId"), START, RESULTS_PER_PAGE, VERBOSE],
    },
    EndpointDefinition {
        name: "talk.get",
        method: HttpMethod::Get,
        uri_template: "/talks/{talkId}",
        parameters: &[ParamSpec::path("talkId"), VERBOSE],
    },
    EndpointDefinition {
        name: "user.get",
        method: HttpMethod::Get,
        uri_template: "/users/{userId}",
        parameters: &[ParamSpec::path("userId"), VERBOSE],
    },
    EndpointDefinition {
        name: "events.attended.get",
        method: HttpMethod::Get,
        uri_template: "/users/{userId}/attended-events",
        parameters: &[ParamSpec::path("userId"), START, RESULTS_PER_PAGE, VERBOSE],
    },
    EndpointDefinition {
        name: "talks.byuser.get",
        method: HttpMethod::Get,
        uri_template: "/users/{userId}/talks",
        parameters: &[ParamSpec::path("userId"), START, RESULTS_PER_PAGE, VERBOSE],
    },
];

pub fn lookup(name: &str) -> Option<&'static EndpointDefinition> {
    ENDPOINTS.iter().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn template_placeholders(template: &str) -> Vec<&str> {
        template
            .split('/')
            .filter_map(|s| s.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
            .collect()
    }

    #[test]
    fn command_names_are_unique() {
        let names: HashSet<&str> = ENDPOINTS.iter().map(|e| e.name).collect();
        assert_eq!(names.len(), ENDPOINTS.len());
        assert_eq!(ENDPOINTS.len(), 9);
    }

    #[test]
    fn placeholders_match_declared_path_parameters() {
        for endpoint in ENDPOINTS {
            let mut placeholders = template_placeholders(endpoint.uri_template);
            placeholders.sort_unstable();
            let mut declared: Vec<&str> = endpoint
                .parameters
                .iter()
                .filter(|p| p.location == ParamLocation::Path)
                .map(|p| p.name)
                .collect();
            declared.sort_unstable();
            assert_eq!(placeholders, declared, "{}", endpoint.name);
        }
    }

    #[test]
    fn parameter_names_are_unique_per_endpoint() {
        for endpoint in ENDPOINTS {
            let names: HashSet<&str> = endpoint.parameters.iter().map(|p| p.name).collect();
            assert_eq!(names.len(), endpoint.parameters.len(), "{}", endpoint.name);
        }
    }

    #[test]
    fn lookup_finds_known_commands_only() {
        let endpoint = lookup("events.attended.get").unwrap();
        assert_eq!(endpoint.method, HttpMethod::Get);
        assert_eq!(endpoint.uri_template, "/users/{userId}/attended-events");
        assert!(lookup("events.delete").is_none());
    }

    #[test]
    fn path_parameters_are_recognised() {
        let endpoint = lookup("talk.comments.get").unwrap();
        assert!(endpoint.is_path_parameter("talkId"));
        assert!(!endpoint.is_path_parameter("resultsperpage"));
        assert!(!endpoint.is_path_parameter("eventId"));
    }
}

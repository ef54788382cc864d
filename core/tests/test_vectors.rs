//! Verify every client method against JSON test vectors in `test-vectors/`.
//!
//! Each case names a client method, its id and options, the request it must
//! produce, a simulated response, and the expected result or error kind.
//! Results are compared as parsed JSON so key order does not matter.

use std::sync::Mutex;

use joindin_core::{
    ClientConfig, ClientError, HttpMethod, HttpRequest, HttpResponse, JoindInClient, Options,
    Transport, TransportError,
};
use serde_json::Value;

/// Replays one simulated response and keeps the requests it saw.
struct Replay {
    response: Option<HttpResponse>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl Transport for Replay {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.response.clone().ok_or_else(|| "vector has no simulated response".into())
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn records(result: Result<Vec<joindin_core::Record>, ClientError>) -> Result<Value, ClientError> {
    result.map(|records| Value::Array(records.into_iter().map(Value::Object).collect()))
}

fn invoke(
    client: &JoindInClient<&Replay>,
    method: &str,
    id: u64,
    options: &Options,
) -> Result<Value, ClientError> {
    match method {
        "get_events" => records(client.get_events(options)),
        "get_event" => client.get_event(id, options).map(Value::Object),
        "get_event_comments" => records(client.get_event_comments(id, options)),
        "get_event_talks" => records(client.get_event_talks(id, options)),
        "get_talk_comments" => records(client.get_talk_comments(id, options)),
        "get_talk" => client.get_talk(id, options).map(Value::Object),
        "get_user" => client.get_user(id, options).map(Value::Object),
        "get_events_attended_by_user" => records(client.get_events_attended_by_user(id, options)),
        "get_talks_given_by_user" => records(client.get_talks_given_by_user(id, options)),
        other => panic!("unknown client method: {other}"),
    }
}

fn error_kind(err: &ClientError) -> &'static str {
    match err {
        ClientError::Configuration(_) => "Configuration",
        ClientError::UnknownCommand(_) => "UnknownCommand",
        ClientError::Validation { .. } => "Validation",
        ClientError::Transport(_) => "Transport",
        ClientError::HttpStatus { .. } => "HttpStatus",
        ClientError::Decode(_) => "Decode",
        _ => "other",
    }
}

#[test]
fn command_test_vectors() {
    let raw = include_str!("../../test-vectors/commands.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let method = case["method"].as_str().unwrap();
        let id = case["id"].as_u64().unwrap_or(0);
        let options: Options = serde_json::from_value(case["options"].clone()).unwrap();

        let response = case.get("simulated_response").map(|sim| HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        });
        let replay = Replay {
            response,
            seen: Mutex::new(Vec::new()),
        };
        let client = JoindInClient::factory(ClientConfig::new(), &replay).unwrap();

        let result = invoke(&client, method, id, &options);

        // Verify the request, if one was expected.
        let seen = replay.seen.lock().unwrap().clone();
        match case.get("expected_request") {
            Some(expected_req) => {
                assert_eq!(seen.len(), 1, "{name}: exactly one request");
                let req = &seen[0];
                assert_eq!(
                    req.method,
                    parse_method(expected_req["method"].as_str().unwrap()),
                    "{name}: method"
                );
                assert_eq!(
                    req.url,
                    format!("{base_url}{}", expected_req["path"].as_str().unwrap()),
                    "{name}: url"
                );
                assert!(req.body.is_none(), "{name}: body should be None");
            }
            None => assert!(seen.is_empty(), "{name}: no request expected"),
        }

        // Verify the result.
        match case.get("expected_error") {
            Some(expected_error) => {
                let err = result.unwrap_err();
                assert_eq!(error_kind(&err), expected_error.as_str().unwrap(), "{name}: {err}");
            }
            None => {
                let value = result.unwrap_or_else(|e| panic!("{name}: {e}"));
                assert_eq!(value, case["expected_result"], "{name}: parsed result");
            }
        }
    }
}

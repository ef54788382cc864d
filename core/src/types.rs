//! Records returned by the joind.in API.
//!
//! The library imposes no schema on them: each is the JSON object the API
//! sent, after post-processing.

use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

pub type Event = Record;
pub type Talk = Record;
pub type Comment = Record;
pub type User = Record;

//! Typed command parameters.
//!
//! `Params` is an ordered key-value set handed to the command executor;
//! `Options` is the same type seen from the caller's side. Keys are the
//! joind.in wire names (`resultsperpage`, `eventId`, ...) and are checked
//! against the endpoint table when a request is built.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(u64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(n) => write!(f, "{n}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Integer(n.into())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// joind.in spells booleans as `yes` / `no`.
impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Text(if b { "yes" } else { "no" }.to_string())
    }
}

/// Server-side filters accepted by the event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    Hot,
    Upcoming,
    Past,
    Cfp,
}

impl EventFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            EventFilter::Hot => "hot",
            EventFilter::Upcoming => "upcoming",
            EventFilter::Past => "past",
            EventFilter::Cfp => "cfp",
        }
    }
}

/// Ordered set of command parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

/// Caller-supplied overrides merged on top of a method's computed defaults.
pub type Options = Params;

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; a later value for the same key wins.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.values.iter()
    }

    pub fn results_per_page(self, count: u64) -> Self {
        self.set("resultsperpage", count)
    }

    /// Zero-based offset of the first result.
    pub fn start(self, offset: u64) -> Self {
        self.set("start", offset)
    }

    pub fn verbose(self, verbose: bool) -> Self {
        self.set("verbose", verbose)
    }

    pub fn filter(self, filter: EventFilter) -> Self {
        self.set("filter", filter.as_str())
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        self.set("title", title.into())
    }

    pub fn stub(self, stub: impl Into<String>) -> Self {
        self.set("stub", stub.into())
    }

    pub fn tags(self, tags: impl Into<String>) -> Self {
        self.set("tags", tags.into())
    }

    /// Inclusive lower bound on the event start date (`YYYY-MM-DD`).
    pub fn start_date(self, date: impl Into<String>) -> Self {
        self.set("startdate", date.into())
    }

    pub fn end_date(self, date: impl Into<String>) -> Self {
        self.set("enddate", date.into())
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

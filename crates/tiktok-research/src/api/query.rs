//! Video search query objects and the request body built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ResearchError;

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Eq,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A single clause such as `region_code IN [JP, US]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub operation: Operation,
    pub field_name: String,
    pub field_values: Vec<String>,
}

impl Condition {
    pub fn new<I, S>(operation: Operation, field_name: impl Into<String>, field_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation,
            field_name: field_name.into(),
            field_values: field_values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equals(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Operation::Eq, field_name, [value])
    }

    pub fn is_in<I, S>(field_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Operation::In, field_name, values)
    }
}

/// Boolean query over video fields: every `and` clause, at least one `or`
/// clause, and no `not` clause must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub and: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub or: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not: Vec<Condition>,
}

impl VideoQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.and.push(condition);
        self
    }

    pub fn or(mut self, condition: Condition) -> Self {
        self.or.push(condition);
        self
    }

    pub fn not(mut self, condition: Condition) -> Self {
        self.not.push(condition);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty() && self.not.is_empty()
    }
}

/// Reasons a video search is rejected before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildQueryError {
    #[error("query needs at least one and/or/not condition")]
    EmptyQuery,

    #[error("end date {end} is before start date {start}")]
    DateRange { start: NaiveDate, end: NaiveDate },
}

/// Parameters of a video search.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVideosRequest {
    pub query: VideoQuery,
    /// Lower bound of the creation date (UTC).
    pub start_date: NaiveDate,
    /// Upper bound of the creation date (UTC); the service allows at most
    /// 30 days after `start_date`.
    pub end_date: NaiveDate,
    /// Ask for results in random order instead of descending video id.
    pub is_random: Option<bool>,
    pub max_count: u32,
}

impl QueryVideosRequest {
    pub fn new(query: VideoQuery, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            query,
            start_date,
            end_date,
            is_random: None,
            max_count: super::DEFAULT_MAX_COUNT,
        }
    }

    pub fn with_random(mut self, is_random: bool) -> Self {
        self.is_random = Some(is_random);
        self
    }

    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    /// Build the first-page request body.
    pub(crate) fn to_body(&self) -> Result<Map<String, Value>, ResearchError> {
        if self.query.is_empty() {
            return Err(BuildQueryError::EmptyQuery.into());
        }
        if self.end_date < self.start_date {
            return Err(BuildQueryError::DateRange {
                start: self.start_date,
                end: self.end_date,
            }
            .into());
        }

        let mut body = Map::new();
        body.insert("query".into(), serde_json::to_value(&self.query)?);
        body.insert(
            "start_date".into(),
            self.start_date.format("%Y%m%d").to_string().into(),
        );
        body.insert(
            "end_date".into(),
            self.end_date.format("%Y%m%d").to_string().into(),
        );
        body.insert("max_count".into(), self.max_count.into());
        if self.is_random == Some(true) {
            body.insert("is_random".into(), true.into());
        }
        Ok(body)
    }
}

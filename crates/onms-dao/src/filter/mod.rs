//! Structured query intent, independent of any wire encoding.
//!
//! A [`Filter`] is rendered into request query parameters by
//! [`Filter::to_query_parameters`], which picks the encoder for the target
//! API generation (see [`encoder`]).

pub mod encoder;

use chrono::{DateTime, Utc};
use onms_core::{ApiVersion, OnmsError, OnmsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use encoder::{encoder_for, QueryEncoder, V1QueryEncoder, V2QueryEncoder};

/// Query parameters ready for the transport, in stable key order.
pub type QueryParameters = BTreeMap<String, QueryValue>;

/// A query parameter value: one string or a repeated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// `key=value`
    Single(String),
    /// `key=a&key=b`
    Multiple(Vec<String>),
}

impl QueryValue {
    /// Returns every value in order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(v) => vec![v.as_str()],
            Self::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// Returns the value when there is exactly one.
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(v) => Some(v),
            Self::Multiple(_) => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

/// Comparison operator of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Case-insensitive pattern match.
    Ilike,
    /// Pattern match (`*` wildcards).
    Like,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Ge,
    /// Less than or equal.
    Le,
    /// Attribute is null.
    Null,
    /// Attribute is not null.
    NotNull,
}

impl Comparator {
    /// Returns the lower-case label used on the wire.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Ilike => "ilike",
            Self::Like => "like",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Ge => "ge",
            Self::Le => "le",
            Self::Null => "null",
            Self::NotNull => "notnull",
        }
    }

    /// Whether the comparator compares against a value.
    #[must_use]
    pub const fn takes_value(&self) -> bool {
        !matches!(self, Self::Null | Self::NotNull)
    }

    /// Parses a comparator label or symbol, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for labels that name no comparator.
    pub fn from_label(label: &str) -> OnmsResult<Self> {
        match label.trim().to_lowercase().as_str() {
            "eq" | "==" | "=" => Ok(Self::Eq),
            "ne" | "!=" => Ok(Self::Ne),
            "ilike" => Ok(Self::Ilike),
            "like" => Ok(Self::Like),
            "gt" | ">" => Ok(Self::Gt),
            "lt" | "<" => Ok(Self::Lt),
            "ge" | ">=" => Ok(Self::Ge),
            "le" | "<=" => Ok(Self::Le),
            "null" | "isnull" => Ok(Self::Null),
            "notnull" | "isnotnull" => Ok(Self::NotNull),
            other => Err(OnmsError::configuration(format!("Unknown comparator: {}", other))),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Boolean operator joining a clause to the clause that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    /// Both clauses must hold.
    #[default]
    And,
    /// Either clause may hold.
    Or,
}

/// Right-hand side of a clause.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ClauseValue {
    /// No value; only meaningful with [`Comparator::Null`] / [`Comparator::NotNull`].
    #[default]
    None,
    /// Text.
    Text(String),
    /// Integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Point in time, rendered in the server's date format.
    Timestamp(DateTime<Utc>),
}

impl ClauseValue {
    /// Server date format: millisecond precision with a numeric offset.
    pub const DATE_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S%.3f%z";

    /// Renders the value as the server expects it, or `None` when empty.
    #[must_use]
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Text(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Timestamp(t) => Some(t.format(Self::DATE_FORMAT).to_string()),
        }
    }
}

impl From<&str> for ClauseValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ClauseValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ClauseValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ClauseValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u8> for ClauseValue {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ClauseValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ClauseValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for ClauseValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// One restriction: `attribute comparator value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// Search property the clause restricts.
    pub attribute: String,
    /// Comparison operator.
    pub comparator: Comparator,
    /// Value compared against.
    pub value: ClauseValue,
    /// How this clause joins the next one. Ignored on the last clause.
    pub conjunction: Conjunction,
}

impl Clause {
    /// Creates a clause joined to the next one with `And`.
    #[must_use]
    pub fn new(
        attribute: impl Into<String>,
        comparator: Comparator,
        value: impl Into<ClauseValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            comparator,
            value: value.into(),
            conjunction: Conjunction::And,
        }
    }

    /// Creates a null check.
    #[must_use]
    pub fn is_null(attribute: impl Into<String>) -> Self {
        Self::new(attribute, Comparator::Null, ClauseValue::None)
    }

    /// Creates a not-null check.
    #[must_use]
    pub fn is_not_null(attribute: impl Into<String>) -> Self {
        Self::new(attribute, Comparator::NotNull, ClauseValue::None)
    }

    /// Joins this clause to the next one with `Or`.
    #[must_use]
    pub fn or(mut self) -> Self {
        self.conjunction = Conjunction::Or;
        self
    }

    /// Returns the wire value for comparators that need one.
    pub(crate) fn required_value(&self) -> OnmsResult<String> {
        self.value.to_wire().ok_or_else(|| {
            OnmsError::configuration(format!(
                "Comparator '{}' on '{}' requires a value",
                self.comparator, self.attribute
            ))
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl Order {
    /// Returns the wire label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Ordering on one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Attribute to sort by.
    pub attribute: String,
    /// Direction.
    pub order: Order,
}

impl OrderBy {
    /// Ascending order on `attribute`.
    #[must_use]
    pub fn asc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            order: Order::Asc,
        }
    }

    /// Descending order on `attribute`.
    #[must_use]
    pub fn desc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            order: Order::Desc,
        }
    }
}

/// Query intent: ordered clauses, ordering, and paging.
///
/// Clause order is significant; it defines conjunction grouping on the
/// server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Clauses in evaluation order.
    pub clauses: Vec<Clause>,
    /// Ordering, most significant first.
    pub order_by: Vec<OrderBy>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u32>,
}

impl Filter {
    /// Creates an empty filter (server defaults, no constraints).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a clause.
    #[must_use]
    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Appends an `And`-joined clause.
    #[must_use]
    pub fn with_restriction(
        self,
        attribute: impl Into<String>,
        comparator: Comparator,
        value: impl Into<ClauseValue>,
    ) -> Self {
        self.with_clause(Clause::new(attribute, comparator, value))
    }

    /// Appends an ordering.
    #[must_use]
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    /// Sets the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the result offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether the filter carries no constraints at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
            && self.order_by.is_empty()
            && self.limit.is_none()
            && self.offset.is_none()
    }

    /// Renders the filter into query parameters for the given API version.
    ///
    /// The output is a pure function of the filter and the version.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the filter uses something the
    /// target API cannot express.
    pub fn to_query_parameters(&self, api_version: ApiVersion) -> OnmsResult<QueryParameters> {
        encoder_for(api_version).encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_comparator_from_label() {
        assert_eq!(Comparator::from_label("EQ").unwrap(), Comparator::Eq);
        assert_eq!(Comparator::from_label(">=").unwrap(), Comparator::Ge);
        assert_eq!(Comparator::from_label("notnull").unwrap(), Comparator::NotNull);
    }

    #[test]
    fn test_comparator_from_unknown_label_fails() {
        let err = Comparator::from_label("between").unwrap_err();
        assert!(matches!(err, OnmsError::Configuration(msg) if msg.contains("between")));
    }

    #[test]
    fn test_clause_value_wire_format() {
        assert_eq!(ClauseValue::from("x").to_wire().as_deref(), Some("x"));
        assert_eq!(ClauseValue::from(5_i64).to_wire().as_deref(), Some("5"));
        assert_eq!(ClauseValue::from(true).to_wire().as_deref(), Some("true"));
        assert_eq!(ClauseValue::None.to_wire(), None);

        let ts = Utc.with_ymd_and_hms(2017, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            ClauseValue::from(ts).to_wire().as_deref(),
            Some("2017-03-04T05:06:07.000+0000")
        );
    }

    #[test]
    fn test_builder_preserves_clause_order() {
        let filter = Filter::new()
            .with_restriction("b", Comparator::Eq, 1_i64)
            .with_restriction("a", Comparator::Eq, 2_i64)
            .with_clause(Clause::is_null("c"));

        let attrs: Vec<&str> = filter.clauses.iter().map(|c| c.attribute.as_str()).collect();
        assert_eq!(attrs, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_filter() {
        assert!(Filter::new().is_empty());
        assert!(!Filter::new().with_limit(10).is_empty());
    }

    #[test]
    fn test_query_value_values() {
        assert_eq!(QueryValue::from("a").values(), vec!["a"]);
        let multiple = QueryValue::Multiple(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(multiple.values(), vec!["a", "b"]);
        assert!(multiple.as_single().is_none());
    }
}

//! Per-version filter encoders.
//!
//! The v1 API takes one query parameter per restricted attribute plus a
//! single global `comparator`. The v2 API takes a FIQL expression in `_s`.
//! Paging and ordering keys are shared.

use super::{Comparator, Conjunction, Filter, QueryParameters, QueryValue};
use onms_core::{ApiVersion, OnmsError, OnmsResult};

/// FIQL stand-in for a null value.
pub const V2_NULL_VALUE: &str = "\u{0000}";

/// Query parameter keys the encoders reserve for themselves.
const RESERVED_KEYS: [&str; 6] = ["limit", "offset", "orderBy", "order", "comparator", "_s"];

/// Renders a [`Filter`] into query parameters for one API generation.
pub trait QueryEncoder: Send + Sync {
    /// Encodes the filter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the filter cannot be expressed.
    fn encode(&self, filter: &Filter) -> OnmsResult<QueryParameters>;
}

/// Returns the encoder for an API version.
#[must_use]
pub fn encoder_for(api_version: ApiVersion) -> &'static dyn QueryEncoder {
    match api_version {
        ApiVersion::V1 => &V1QueryEncoder,
        ApiVersion::V2 => &V2QueryEncoder,
    }
}

/// Encoder for the legacy `rest/` endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1QueryEncoder;

impl QueryEncoder for V1QueryEncoder {
    fn encode(&self, filter: &Filter) -> OnmsResult<QueryParameters> {
        let mut params = QueryParameters::new();
        let mut comparator: Option<Comparator> = None;
        let last = filter.clauses.len().saturating_sub(1);

        for (i, clause) in filter.clauses.iter().enumerate() {
            if i < last && clause.conjunction == Conjunction::Or {
                return Err(OnmsError::configuration("The v1 API does not support OR conjunctions"));
            }
            if RESERVED_KEYS.contains(&clause.attribute.as_str()) {
                return Err(OnmsError::configuration(format!(
                    "'{}' is a reserved query parameter and cannot be filtered on in the v1 API",
                    clause.attribute
                )));
            }
            if params.contains_key(&clause.attribute) {
                return Err(OnmsError::configuration(format!(
                    "The v1 API cannot restrict '{}' more than once",
                    clause.attribute
                )));
            }

            let value = match clause.comparator {
                Comparator::Null => "null".to_string(),
                Comparator::NotNull => "notnull".to_string(),
                current => {
                    if let Some(previous) = comparator.filter(|p| *p != current) {
                        return Err(OnmsError::configuration(format!(
                            "The v1 API supports a single comparator per query, got '{}' and '{}'",
                            previous, current
                        )));
                    }
                    comparator = Some(current);
                    clause.required_value()?
                }
            };

            params.insert(clause.attribute.clone(), QueryValue::Single(value));
        }

        if let Some(comparator) = comparator {
            params.insert("comparator".to_string(), comparator.label().into());
        }

        encode_paging_and_order(filter, &mut params)?;
        Ok(params)
    }
}

/// Encoder for the `api/v2/` endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct V2QueryEncoder;

impl V2QueryEncoder {
    fn operator(comparator: Comparator) -> OnmsResult<&'static str> {
        match comparator {
            Comparator::Eq | Comparator::Like | Comparator::Null => Ok("=="),
            Comparator::Ne | Comparator::NotNull => Ok("!="),
            Comparator::Gt => Ok("=gt="),
            Comparator::Lt => Ok("=lt="),
            Comparator::Ge => Ok("=ge="),
            Comparator::Le => Ok("=le="),
            Comparator::Ilike => Err(OnmsError::configuration(
                "The v2 API does not support the 'ilike' comparator",
            )),
        }
    }
}

impl QueryEncoder for V2QueryEncoder {
    fn encode(&self, filter: &Filter) -> OnmsResult<QueryParameters> {
        let mut params = QueryParameters::new();
        let mut search = String::new();

        for (i, clause) in filter.clauses.iter().enumerate() {
            if i > 0 {
                search.push(match filter.clauses[i - 1].conjunction {
                    Conjunction::And => ';',
                    Conjunction::Or => ',',
                });
            }

            let operator = Self::operator(clause.comparator)?;
            let value = if clause.comparator.takes_value() {
                escape_fiql(&clause.required_value()?)
            } else {
                V2_NULL_VALUE.to_string()
            };

            search.push_str(&clause.attribute);
            search.push_str(operator);
            search.push_str(&value);
        }

        if !search.is_empty() {
            params.insert("_s".to_string(), QueryValue::Single(search));
        }

        encode_paging_and_order(filter, &mut params)?;
        Ok(params)
    }
}

/// Percent-escapes the characters FIQL uses as delimiters.
fn escape_fiql(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ';' => escaped.push_str("%3B"),
            ',' => escaped.push_str("%2C"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn encode_paging_and_order(filter: &Filter, params: &mut QueryParameters) -> OnmsResult<()> {
    if let Some(limit) = filter.limit {
        params.insert("limit".to_string(), limit.to_string().into());
    }
    if let Some(offset) = filter.offset {
        params.insert("offset".to_string(), offset.to_string().into());
    }

    if let Some(first) = filter.order_by.first() {
        if filter.order_by.iter().any(|o| o.order != first.order) {
            return Err(OnmsError::configuration(
                "Mixed ordering directions are not supported",
            ));
        }

        let attributes: Vec<String> = filter.order_by.iter().map(|o| o.attribute.clone()).collect();
        let order_by = if attributes.len() == 1 {
            QueryValue::Single(attributes.into_iter().next().unwrap_or_default())
        } else {
            QueryValue::Multiple(attributes)
        };

        params.insert("orderBy".to_string(), order_by);
        params.insert("order".to_string(), first.order.label().into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Clause, OrderBy};

    fn single(params: &QueryParameters, key: &str) -> String {
        params
            .get(key)
            .and_then(QueryValue::as_single)
            .map(str::to_string)
            .unwrap_or_else(|| panic!("missing key {key}"))
    }

    #[test]
    fn test_empty_filter_yields_empty_parameters() {
        for version in [ApiVersion::V1, ApiVersion::V2] {
            assert!(Filter::new().to_query_parameters(version).unwrap().is_empty());
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let filter = Filter::new()
            .with_restriction("eventSeverity", Comparator::Ge, 5_i64)
            .with_restriction("node.label", Comparator::Ge, "abc")
            .with_order_by(OrderBy::desc("eventTime"))
            .with_limit(10)
            .with_offset(20);

        for version in [ApiVersion::V1, ApiVersion::V2] {
            let first = filter.to_query_parameters(version).unwrap();
            let second = filter.to_query_parameters(version).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_v1_clauses_and_comparator() {
        let filter = Filter::new()
            .with_restriction("eventSeverity", Comparator::Ge, 5_i64)
            .with_restriction("nodeId", Comparator::Ge, 3_i64);

        let params = filter.to_query_parameters(ApiVersion::V1).unwrap();
        assert_eq!(single(&params, "eventSeverity"), "5");
        assert_eq!(single(&params, "nodeId"), "3");
        assert_eq!(single(&params, "comparator"), "ge");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_v1_null_checks_do_not_set_comparator() {
        let filter = Filter::new()
            .with_clause(Clause::is_null("ipAddress"))
            .with_clause(Clause::is_not_null("nodeId"));

        let params = filter.to_query_parameters(ApiVersion::V1).unwrap();
        assert_eq!(single(&params, "ipAddress"), "null");
        assert_eq!(single(&params, "nodeId"), "notnull");
        assert!(!params.contains_key("comparator"));
    }

    #[test]
    fn test_v1_rejects_or() {
        let filter = Filter::new()
            .with_clause(Clause::new("a", Comparator::Eq, "1").or())
            .with_clause(Clause::new("b", Comparator::Eq, "2"));

        let err = filter.to_query_parameters(ApiVersion::V1).unwrap_err();
        assert!(matches!(err, OnmsError::Configuration(_)));
    }

    #[test]
    fn test_v1_ignores_conjunction_of_last_clause() {
        let filter = Filter::new().with_clause(Clause::new("a", Comparator::Eq, "1").or());
        assert!(filter.to_query_parameters(ApiVersion::V1).is_ok());
    }

    #[test]
    fn test_v1_rejects_mixed_comparators() {
        let filter = Filter::new()
            .with_restriction("a", Comparator::Eq, "1")
            .with_restriction("b", Comparator::Gt, "2");

        let err = filter.to_query_parameters(ApiVersion::V1).unwrap_err();
        assert!(matches!(err, OnmsError::Configuration(msg) if msg.contains("single comparator")));
    }

    #[test]
    fn test_v1_rejects_duplicate_and_reserved_attributes() {
        let duplicate = Filter::new()
            .with_restriction("a", Comparator::Eq, "1")
            .with_restriction("a", Comparator::Eq, "2");
        assert!(duplicate.to_query_parameters(ApiVersion::V1).is_err());

        let reserved = Filter::new().with_restriction("limit", Comparator::Eq, "2");
        assert!(reserved.to_query_parameters(ApiVersion::V1).is_err());
    }

    #[test]
    fn test_value_comparator_without_value_fails() {
        let clause = Clause::new("a", Comparator::Eq, crate::filter::ClauseValue::None);
        let filter = Filter::new().with_clause(clause);
        for version in [ApiVersion::V1, ApiVersion::V2] {
            assert!(matches!(
                filter.to_query_parameters(version),
                Err(OnmsError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_v2_fiql_expression() {
        let filter = Filter::new()
            .with_clause(Clause::new("eventSeverity", Comparator::Ge, 5_i64).or())
            .with_clause(Clause::new("node.label", Comparator::Like, "web*"))
            .with_clause(Clause::new("eventUei", Comparator::Ne, "uei.opennms.org/x"));

        let params = filter.to_query_parameters(ApiVersion::V2).unwrap();
        assert_eq!(
            single(&params, "_s"),
            "eventSeverity=ge=5,node.label==web*;eventUei!=uei.opennms.org/x"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_v2_null_checks() {
        let filter = Filter::new()
            .with_clause(Clause::is_null("ipAddress"))
            .with_clause(Clause::is_not_null("nodeId"));

        let params = filter.to_query_parameters(ApiVersion::V2).unwrap();
        assert_eq!(single(&params, "_s"), "ipAddress==\u{0000};nodeId!=\u{0000}");
    }

    #[test]
    fn test_v2_escapes_delimiters() {
        let filter = Filter::new().with_restriction("eventLogMsg", Comparator::Eq, "a;b,c%");
        let params = filter.to_query_parameters(ApiVersion::V2).unwrap();
        assert_eq!(single(&params, "_s"), "eventLogMsg==a%3Bb%2Cc%25");
    }

    #[test]
    fn test_v2_rejects_ilike() {
        let filter = Filter::new().with_restriction("eventUei", Comparator::Ilike, "*down*");
        assert!(matches!(
            filter.to_query_parameters(ApiVersion::V2),
            Err(OnmsError::Configuration(_))
        ));
        assert!(filter.to_query_parameters(ApiVersion::V1).is_ok());
    }

    #[test]
    fn test_paging_and_single_order() {
        let filter = Filter::new()
            .with_order_by(OrderBy::desc("eventTime"))
            .with_limit(25)
            .with_offset(50);

        let params = filter.to_query_parameters(ApiVersion::V2).unwrap();
        assert_eq!(single(&params, "limit"), "25");
        assert_eq!(single(&params, "offset"), "50");
        assert_eq!(single(&params, "orderBy"), "eventTime");
        assert_eq!(single(&params, "order"), "desc");
    }

    #[test]
    fn test_multiple_order_by() {
        let filter = Filter::new()
            .with_order_by(OrderBy::asc("eventSeverity"))
            .with_order_by(OrderBy::asc("eventTime"));

        let params = filter.to_query_parameters(ApiVersion::V1).unwrap();
        assert_eq!(
            params.get("orderBy"),
            Some(&QueryValue::Multiple(vec!["eventSeverity".to_string(), "eventTime".to_string()]))
        );
        assert_eq!(single(&params, "order"), "asc");
    }

    #[test]
    fn test_mixed_order_directions_fail() {
        let filter = Filter::new()
            .with_order_by(OrderBy::asc("eventSeverity"))
            .with_order_by(OrderBy::desc("eventTime"));

        assert!(filter.to_query_parameters(ApiVersion::V2).is_err());
    }
}

use serde_json::Value;
use std::collections::HashMap;

use super::error::FilterError;
use super::types::{CompareOp, Condition, SortDirection, SortKey};
use crate::config;

/// Query-string keys that shape the result set rather than filter it
const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Parsed list parameters: field conditions plus select/sort/pagination.
///
/// Parsed from the raw query string before any handler logic runs, so the
/// list operation itself only ever sees an already-shaped result set:
///
/// ```text
/// /bootcamps?average_cost[lte]=10000&housing=true&select=name,city&sort=-created_at&page=2&limit=10
/// ```
#[derive(Debug, Clone)]
pub struct ListParams {
    pub select: Vec<String>,
    pub conditions: Vec<Condition>,
    pub sort: Vec<SortKey>,
    pub page: i64,
    pub limit: i64,
}

impl ListParams {
    pub fn from_query(raw: &HashMap<String, String>) -> Result<Self, FilterError> {
        let api = &config::config().api;

        let select = match raw.get("select") {
            Some(expr) => parse_columns(expr)?,
            None => vec![],
        };

        let sort = match raw.get("sort") {
            Some(expr) => parse_sort(expr)?,
            None => vec![],
        };

        let page = match raw.get("page") {
            Some(v) => v
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| FilterError::InvalidPage(v.clone()))?,
            None => 1,
        };

        let limit = match raw.get("limit") {
            Some(v) => v
                .parse::<i64>()
                .ok()
                .filter(|l| *l >= 1)
                .ok_or_else(|| FilterError::InvalidLimit(v.clone()))?
                .min(api.max_page_limit),
            None => api.default_page_limit,
        };

        let mut conditions = Vec::new();
        for (key, value) in raw {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            conditions.push(parse_condition(key, value)?);
        }
        // HashMap iteration order is arbitrary; keep SQL deterministic
        conditions.sort_by(|a, b| a.column.cmp(&b.column));

        Ok(Self {
            select,
            conditions,
            sort,
            page,
            limit,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Parse `field` or `field[op]` into a condition
fn parse_condition(key: &str, value: &str) -> Result<Condition, FilterError> {
    let (column, op) = match key.split_once('[') {
        Some((column, rest)) => {
            let op_name = rest
                .strip_suffix(']')
                .ok_or_else(|| FilterError::UnsupportedOperator(key.to_string()))?;
            (column, map_operator(op_name)?)
        }
        None => (key, CompareOp::Eq),
    };

    validate_column(column)?;

    let value = if op == CompareOp::In {
        Value::Array(value.split(',').map(|v| typed_value(v.trim())).collect())
    } else {
        typed_value(value)
    };

    Ok(Condition {
        column: column.to_string(),
        op,
        value,
    })
}

fn map_operator(name: &str) -> Result<CompareOp, FilterError> {
    Ok(match name {
        "eq" => CompareOp::Eq,
        "ne" => CompareOp::Ne,
        "gt" => CompareOp::Gt,
        "gte" => CompareOp::Gte,
        "lt" => CompareOp::Lt,
        "lte" => CompareOp::Lte,
        "in" => CompareOp::In,
        other => return Err(FilterError::UnsupportedOperator(other.to_string())),
    })
}

/// Query values arrive as strings; give the store properly typed bindings
fn typed_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::from(f);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

fn parse_columns(expr: &str) -> Result<Vec<String>, FilterError> {
    let mut out = Vec::new();
    for column in expr.split(',') {
        let column = column.trim();
        if column.is_empty() {
            continue;
        }
        validate_column(column)?;
        out.push(column.to_string());
    }
    Ok(out)
}

/// `sort=-created_at,name` - leading `-` means descending
fn parse_sort(expr: &str) -> Result<Vec<SortKey>, FilterError> {
    let mut out = Vec::new();
    for key in expr.split(',') {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let (column, direction) = match key.strip_prefix('-') {
            Some(column) => (column, SortDirection::Desc),
            None => (key, SortDirection::Asc),
        };
        validate_column(column)?;
        out.push(SortKey {
            column: column.to_string(),
            direction,
        });
    }
    Ok(out)
}

pub(super) fn validate_column(column: &str) -> Result<(), FilterError> {
    let mut chars = column.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FilterError::InvalidColumn(column.to_string()))
    }
}

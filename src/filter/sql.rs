use serde_json::Value;

use super::error::FilterError;
use super::params::{validate_column, ListParams};
use super::types::{CompareOp, Condition, SortKey, SqlResult};

/// Builds parameterized SELECT / COUNT statements from parsed list params.
///
/// Column and table identifiers are validated before they are quoted into
/// the statement; every value travels as a numbered `$n` binding.
pub struct SelectBuilder {
    table_name: String,
    params: ListParams,
}

impl SelectBuilder {
    pub fn new(table_name: impl Into<String>, params: ListParams) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;
        Ok(Self { table_name, params })
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let select_clause = self.build_select_clause();
        let (where_clause, params) = self.build_where_clause();
        let order_clause = build_order_clause(&self.params.sort);
        let limit_clause = format!(
            "LIMIT {} OFFSET {}",
            self.params.limit,
            self.params.offset()
        );

        let query = [
            format!("SELECT {}", select_clause),
            format!("FROM \"{}\"", self.table_name),
            if where_clause.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", where_clause)
            },
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = self.build_where_clause();
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) as count FROM \"{}\"", self.table_name)
        } else {
            format!(
                "SELECT COUNT(*) as count FROM \"{}\" WHERE {}",
                self.table_name, where_clause
            )
        };
        Ok(SqlResult { query, params })
    }

    fn build_select_clause(&self) -> String {
        if self.params.select.is_empty() {
            "*".to_string()
        } else {
            self.params
                .select
                .iter()
                .map(|c| format!("\"{}\"", c))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    fn build_where_clause(&self) -> (String, Vec<Value>) {
        let mut sql_conditions = Vec::new();
        let mut params = Vec::new();

        for condition in &self.params.conditions {
            sql_conditions.push(build_sql_condition(condition, &mut params));
        }

        (sql_conditions.join(" AND "), params)
    }
}

fn build_sql_condition(condition: &Condition, params: &mut Vec<Value>) -> String {
    let quoted_column = format!("\"{}\"", condition.column);
    match condition.op {
        CompareOp::Eq => {
            if condition.value.is_null() {
                format!("{} IS NULL", quoted_column)
            } else {
                format!("{} = {}", quoted_column, param(params, &condition.value))
            }
        }
        CompareOp::Ne => {
            if condition.value.is_null() {
                format!("{} IS NOT NULL", quoted_column)
            } else {
                format!("{} <> {}", quoted_column, param(params, &condition.value))
            }
        }
        CompareOp::Gt => format!("{} > {}", quoted_column, param(params, &condition.value)),
        CompareOp::Gte => format!("{} >= {}", quoted_column, param(params, &condition.value)),
        CompareOp::Lt => format!("{} < {}", quoted_column, param(params, &condition.value)),
        CompareOp::Lte => format!("{} <= {}", quoted_column, param(params, &condition.value)),
        CompareOp::In => match &condition.value {
            Value::Array(values) if values.is_empty() => "1=0".to_string(),
            Value::Array(values) => {
                let placeholders: Vec<String> =
                    values.iter().map(|v| param(params, v)).collect();
                format!("{} IN ({})", quoted_column, placeholders.join(", "))
            }
            single => format!("{} = {}", quoted_column, param(params, single)),
        },
    }
}

fn param(params: &mut Vec<Value>, value: &Value) -> String {
    params.push(value.clone());
    format!("${}", params.len())
}

fn build_order_clause(sort: &[SortKey]) -> String {
    if sort.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = sort
        .iter()
        .map(|key| format!("\"{}\" {}", key.column, key.direction.to_sql()))
        .collect();
    format!("ORDER BY {}", parts.join(", "))
}

fn validate_table_name(name: &str) -> Result<(), FilterError> {
    if name.is_empty() {
        return Err(FilterError::InvalidTableName(
            "Table name cannot be empty".to_string(),
        ));
    }
    validate_column(name).map_err(|_| FilterError::InvalidTableName(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params_from(pairs: &[(&str, &str)]) -> ListParams {
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListParams::from_query(&raw).unwrap()
    }

    #[test]
    fn bare_listing_selects_everything() {
        let builder = SelectBuilder::new("bootcamps", params_from(&[])).unwrap();
        let sql = builder.to_sql().unwrap();
        assert_eq!(sql.query, "SELECT * FROM \"bootcamps\" LIMIT 25 OFFSET 0");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn conditions_become_numbered_params() {
        let builder = SelectBuilder::new(
            "bootcamps",
            params_from(&[("average_cost[lte]", "10000"), ("housing", "true")]),
        )
        .unwrap();
        let sql = builder.to_sql().unwrap();
        // Conditions are sorted by column name for determinism
        assert!(sql
            .query
            .contains("WHERE \"average_cost\" <= $1 AND \"housing\" = $2"));
        assert_eq!(sql.params, vec![Value::from(10000), Value::Bool(true)]);
    }

    #[test]
    fn select_sort_and_paging_are_rendered() {
        let builder = SelectBuilder::new(
            "bootcamps",
            params_from(&[
                ("select", "name,average_cost"),
                ("sort", "-created_at"),
                ("page", "2"),
                ("limit", "10"),
            ]),
        )
        .unwrap();
        let sql = builder.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT \"name\", \"average_cost\" FROM \"bootcamps\" ORDER BY \"created_at\" DESC LIMIT 10 OFFSET 10"
        );
    }

    #[test]
    fn count_sql_shares_conditions_but_not_paging() {
        let builder = SelectBuilder::new(
            "bootcamps",
            params_from(&[("housing", "true"), ("page", "4")]),
        )
        .unwrap();
        let sql = builder.to_count_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT COUNT(*) as count FROM \"bootcamps\" WHERE \"housing\" = $1"
        );
        assert_eq!(sql.params, vec![Value::Bool(true)]);
    }

    #[test]
    fn in_condition_expands_placeholders() {
        let builder = SelectBuilder::new(
            "bootcamps",
            params_from(&[("name[in]", "Devworks,Codemasters")]),
        )
        .unwrap();
        let sql = builder.to_sql().unwrap();
        assert!(sql.query.contains("\"name\" IN ($1, $2)"));
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn rejects_invalid_table_name() {
        assert!(SelectBuilder::new("boot camps", params_from(&[])).is_err());
    }
}

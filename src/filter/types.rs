use serde::Serialize;
use serde_json::Value;

/// Comparison operators accepted in query-string conditions,
/// e.g. `average_cost[lte]=10000` or `housing=true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

/// One parsed field condition
#[derive(Debug, Clone)]
pub struct Condition {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// A SQL fragment with numbered `$n` placeholders and the values to bind
#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// One page cursor in the pagination envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCursor {
    pub page: i64,
    pub limit: i64,
}

/// Pagination links computed against the total number of matching rows.
/// Absent directions are omitted from the serialized envelope.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageCursor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageCursor>,
}

impl Pagination {
    pub fn compute(page: i64, limit: i64, total: i64) -> Self {
        let end = page * limit;
        let next = if end < total {
            Some(PageCursor {
                page: page + 1,
                limit,
            })
        } else {
            None
        };
        let prev = if page > 1 {
            Some(PageCursor {
                page: page - 1,
                limit,
            })
        } else {
            None
        };
        Self { next, prev }
    }
}

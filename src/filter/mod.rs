pub mod error;
pub mod params;
pub mod sql;
pub mod types;

pub use params::ListParams;
pub use sql::SelectBuilder;
pub use types::{Pagination, SqlResult};

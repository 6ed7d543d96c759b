pub mod bulk;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod query;
pub mod search;
pub mod stats;
pub mod todo_query_builder;

pub use bulk::*;
pub use entities::*;
pub use errors::{TaskboardError, TaskboardResult};
pub use ports::*;
pub use query::*;
pub use search::*;
pub use stats::*;
pub use todo_query_builder::TodoQueryBuilder;

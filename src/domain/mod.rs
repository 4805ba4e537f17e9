//! Request-side types: what to page over and how to shape the result

pub mod page_query;
pub mod transform;

pub use page_query::{PageQuery, Sort, SortKey};
pub use transform::{ItemFn, Transform};

pub mod paginate;

#[cfg(test)]
pub(crate) mod test_support;

pub use paginate::{paginate_entity, paginate_entity_with, AsPagination};

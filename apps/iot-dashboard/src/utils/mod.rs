pub mod response;
pub mod validation;

pub use validation::{normalize_filter, normalize_limit, normalize_required};

//! Domain error types.

mod prefetch_error;
mod store_error;

pub use prefetch_error::PrefetchError;
pub use store_error::StoreError;

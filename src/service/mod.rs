//! Storage service handle and worker pools.

mod handle;

pub use handle::StorageService;
pub(crate) use handle::acquire;

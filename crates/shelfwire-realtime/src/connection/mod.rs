//! Live connection tracking.

pub mod handle;
pub mod registry;

pub use handle::ConnectionHandle;
pub use registry::ConnectionRegistry;

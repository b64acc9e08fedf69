//! Business logic services
//!
//! Device discovery and share allocation on top of the detection layer.

pub mod allocator;
pub mod discovery;

pub use allocator::ShareAllocator;
pub use discovery::DiscoveryService;

//! Accelerator plugin layer
//!
//! The plugin contract, the CUDA implementation, and the key-based
//! registry the host agent loads plugins through.

pub mod cuda;
pub mod registry;
pub mod traits;

pub use cuda::{CudaAccelerator, CUDA_SLOT_KEY};
pub use registry::{init, AcceleratorRegistry};
pub use traits::Accelerator;

//! Image preparation for upload: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Downscale** | Lanczos3, longer edge capped by `upload.max_edge` |
//! | **Encode → JPEG** | `image` crate's JPEG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Quality and size-cap settings
//! - **Encode**: Decode → resize → JPEG, plus the supported-extension list

mod calculations;
pub mod encode;
mod params;

pub use encode::{EncodeError, encode_jpeg, is_supported_image, supported_input_extensions};
pub use params::{EncodeParams, Quality};

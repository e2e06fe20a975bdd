//! HTTP building blocks
//!
//! Response builders, MIME type lookup, and cache validation.

pub mod cache;
pub mod mime;
pub mod response;

pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
    build_500_response, build_options_response,
};

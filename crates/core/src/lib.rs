pub mod analysis;
pub mod common;
pub mod config;
pub mod market;
pub mod scan;

#[cfg(feature = "test-utils")]
pub mod test_utils;

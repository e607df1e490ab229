//! Core components for signing AWS requests.
//!
//! This crate provides the primitives shared by the signers in the awsig
//! ecosystem. It owns no signing algorithm itself.
//!
//! ## Overview
//!
//! - [`Error`] and [`ErrorKind`]: the error type returned by every fallible operation
//! - [`hash`]: SHA256 and HMAC-SHA256 helpers
//! - [`time`]: timestamp formatting and normalization
//! - [`utils`]: general utilities including data redaction
//!
//! ## Example
//!
//! ```
//! use awsig_core::hash::hex_sha256;
//! use awsig_core::time::normalize_timestamp;
//!
//! assert_eq!(
//!     normalize_timestamp("2015-08-30T12:36:00Z").unwrap(),
//!     "20150830T123600Z"
//! );
//! assert_eq!(
//!     hex_sha256(b""),
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
//! );
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

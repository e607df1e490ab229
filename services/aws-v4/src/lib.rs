//! AWS SigV4 signer
//!
//! This crate computes [AWS Signature Version 4](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_aws-signing.html)
//! signatures as a pure pipeline:
//!
//! ```text
//! SigningRequest -> CanonicalRequest -> string to sign -> signature -> Authorization
//! ```
//!
//! Every stage is exposed on its own, and [`Signer`] runs them all.
//!
//! ## Example
//!
//! ```
//! use awsig_v4::{Credential, Signer, SigningRequest};
//!
//! # fn main() -> awsig_core::Result<()> {
//! let req = SigningRequest::new(
//!     "GET",
//!     "/?Param2=value2&Param1=value1",
//!     [
//!         ("X-Amz-Date", "20150830T123600Z"),
//!         ("Host", "example.amazonaws.com"),
//!     ],
//!     "",
//!     "service",
//!     "us-east-1",
//! )?;
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//!
//! let output = Signer::default().sign(&req, &cred)?;
//! assert_eq!(
//!     output.signature(),
//!     "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
//! );
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod request;
pub use request::SigningRequest;

mod options;
pub use options::{check_required_keys, Options};

mod canonical_request;
pub use canonical_request::{
    canonical_header_value, canonical_query_string, canonical_uri, canonicalize,
    canonicalize_with, CanonicalRequest,
};

mod sign_request;
pub use sign_request::{
    authorization_header, credential_scope, sign, string_to_sign, Signer, SigningOutput,
};

mod constants;
pub use constants::{ALGORITHM, UNSIGNED_PAYLOAD};
pub use awsig_core::hash::EMPTY_STRING_SHA256;

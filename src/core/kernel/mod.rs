//! Exchange-agnostic transport layer.
//!
//! - [`RestClient`] / [`ReqwestRest`]: HTTP transport, plain and signed requests
//! - [`Signer`] / [`HmacSigner`]: pluggable request authentication
//!
//! The kernel knows nothing about response envelopes or endpoints; that lives
//! in the exchange modules.
//!
//! ```rust,no_run
//! use vitex::core::kernel::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), vitex::ExchangeError> {
//! let signer = HmacSigner::new("api_key".to_string(), "api_secret".to_string())?;
//! let rest = RestClientBuilder::new(RestClientConfig::new(
//!     "https://api.vitex.net".to_string(),
//!     "vitex".to_string(),
//! ))
//! .with_signer(Arc::new(signer))
//! .build()?;
//!
//! let time = rest.get("/api/v2/time", &[]).await?;
//! # let _ = time;
//! # Ok(())
//! # }
//! ```
pub mod rest;
pub mod signer;

pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, SignedResponse};
pub use signer::{canonical_string, get_timestamp, HmacSigner, SignatureResult, SignedParams, Signer};

//! HTTP client module
//!
//! Provides the injected HTTP client used by the fetch layer.
//!
//! # Features
//!
//! - **Base URL resolution**: relative paths join the configured API root
//! - **Status classification**: non-2xx responses become `Error::HttpStatus`
//! - **Optional timeout**: none unless configured

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};

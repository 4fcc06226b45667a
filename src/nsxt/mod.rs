//! NSX-T API interaction module
//!
//! This module provides the core functionality for talking to the NSX-T
//! manager: credentials, the HTTP transport, the client with its URL helpers,
//! and the API object models.
//!
//! # Module Structure
//!
//! - [`auth`] - Basic-auth credentials and environment lookups
//! - [`client`] - Main NSX client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//! - [`model`] - API objects exchanged with the manager
//!
//! # Example
//!
//! ```ignore
//! use nsxt_provider::nsxt::client::NsxClient;
//!
//! async fn example(client: &NsxClient) -> anyhow::Result<()> {
//!     let response = client.get(&client.lb_service_url("lb-1")).await?;
//!     println!("{}", response.status);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod model;

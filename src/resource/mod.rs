//! Resource abstraction layer
//!
//! Each NSX-T resource type is a schema plus four handlers. Schemas are loaded
//! from JSON files at compile time; handlers map a [`ResourceData`] record to
//! the API object and back.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource schemas from embedded JSON
//! - [`schema`] - Validates documents against a schema, applies defaults
//! - [`data`] - The local record handlers read from and write to
//! - [`dispatch`] - Routes a record to the handlers of its resource type
//!
//! # Resource Schemas
//!
//! Schemas are defined in JSON files under `src/resources/`:
//! - `common.json` - Fields shared by several resources (revision, tags...)
//! - `grouping.json` - Grouping objects (ALG-type NSService)
//! - `loadbalancer.json` - Load balancer resources
//!
//! # Example
//!
//! ```ignore
//! use nsxt_provider::resource::{self, Mode};
//!
//! async fn apply(client: &NsxClient, config: &serde_json::Value) -> anyhow::Result<()> {
//!     let mut d = resource::load("nsxt_lb_service", config, Mode::Plan)?;
//!     resource::create(client, &mut d).await?;
//!     println!("{}", d.to_state());
//!     Ok(())
//! }
//! ```

pub mod alg_type_ns_service;
pub mod data;
pub mod dispatch;
pub mod lb_service;
mod registry;
pub mod schema;

pub use data::ResourceData;
pub use dispatch::{create, delete, import, load, read, update};
pub use registry::*;
pub use schema::Mode;

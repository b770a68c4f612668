//! Device configuration core.
//!
//! Reconciles freshly read device attributes with a previously saved
//! configuration and recommends processing functions per attribute.
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `http` | ✅ | REST client for the configuration backend |
//!
//! ## Architecture
//!
//! - **infer_type**: classifies raw values into attribute types
//! - **FunctionCatalog**: immutable processing-function set with the synthetic "None" entry
//! - **merge_attributes / build_draft**: precedence join of live readings and saved attributes
//! - **DraftStore**: edit operations over a draft
//! - **recommend**: ranked, hinted function candidates for one attribute
//! - **ConfigureSession**: owns the draft and drives the remote collaborators
//! - **gateway**: LoRa gateway registration

pub mod attribute;
pub mod catalog;
pub mod config;
pub mod device;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod inference;
pub mod merge;
pub mod recommend;
pub mod session;
pub mod source;
pub mod value;

#[cfg(feature = "http")]
pub mod http;

// Re-exports for convenience
pub use attribute::{Attribute, AttributeOption, AttributeType};
pub use catalog::{FunctionCatalog, ProcessingFunction, ValueType};
pub use config::ApiConfig;
pub use device::{DeviceKind, DeviceSummary};
pub use draft::{ConfigDraft, DraftStore};
pub use error::{ConfigError, Result, SourceError};
pub use gateway::{add_gateway, delete_gateway, list_gateways, Gateway};
pub use inference::infer_type;
pub use merge::{build_draft, merge_attributes, LiveReadings};
pub use recommend::{recommend, Hint, Ranking, Recommendation};
pub use session::{
    list_devices, read_device, Collaborators, ConfigureSession, FetchSource, LoadStatus, SendStatus,
};
pub use source::{
    CaseFormat, ConfigStore, DeviceDataSource, FunctionCatalogSource, GatewayStore, NameSuggester,
    SourceResult,
};
pub use value::AttributeValue;

#[cfg(feature = "http")]
pub use http::ApiClient;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

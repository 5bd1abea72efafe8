//! Artboards core library: domain types, export layout, configuration, errors.
//!
//! Public API surface:
//! - [`types`]: artboard descriptors, tool listing payload, export job
//! - [`layout`]: paths derived from a source file and export folder
//! - [`config`]: layered configuration loading / project config init
//! - [`paths`]: upward file search shared by config and ignore discovery
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod layout;
pub mod paths;
pub mod types;

pub use config::{ExportConfig, PartialConfig};
pub use error::ConfigError;
pub use layout::ExportLayout;
pub use types::{
    ArtboardDescriptor, ArtboardListing, ExportFormat, ExportJob, ExportScale, ListedArtboard,
    ListedPage,
};

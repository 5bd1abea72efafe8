//! # artboards-sync
//!
//! Export orchestration and anti-churn reconciliation.
//!
//! Call [`pipeline::run`] with a [`pipeline::ExportRequest`], a
//! [`DesignTool`] and a [`VersionControl`] to enumerate, export, and
//! reconcile the artboards of one design file.

pub mod enumerate;
pub mod error;
pub mod pipeline;
pub mod reconcile;
pub mod staging;
pub mod tool;
pub mod vcs;

pub use error::SyncError;
pub use pipeline::{ExportReport, ExportRequest};
pub use reconcile::ReconcileOutcome;
pub use tool::{DesignTool, Sketchtool};
pub use vcs::{Git, NoVcs, VersionControl};

//! Artboard enumeration: listing → ignore filter → deterministic order.

use std::path::Path;

use artboards_core::{ArtboardDescriptor, ArtboardListing};
use artboards_ignore::IgnoreRuleSet;

use crate::error::SyncError;
use crate::tool::DesignTool;

/// Artboards split by the ignore rules, each half in export order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub included: Vec<ArtboardDescriptor>,
    pub excluded: Vec<ArtboardDescriptor>,
}

impl Enumeration {
    /// Bare names of the included artboards; the export item list.
    pub fn names(&self) -> Vec<String> {
        self.included.iter().map(|d| d.name.clone()).collect()
    }
}

/// Stable, case-insensitive ascending sort on the bare artboard name.
pub fn sort_artboards(artboards: &mut [ArtboardDescriptor]) {
    artboards.sort_by_cached_key(|d| d.name.to_uppercase());
}

/// Split `listing` by `rules` and order both halves.
pub fn partition(listing: &ArtboardListing, rules: &IgnoreRuleSet) -> Enumeration {
    let (mut included, mut excluded): (Vec<_>, Vec<_>) = listing
        .descriptors()
        .into_iter()
        .partition(|d| !rules.is_excluded(&d.qualified_name()));
    sort_artboards(&mut included);
    sort_artboards(&mut excluded);
    Enumeration { included, excluded }
}

/// Ask `tool` for the artboards in `source` and filter them with `rules`.
pub fn enumerate(
    tool: &dyn DesignTool,
    source: &Path,
    rules: &IgnoreRuleSet,
) -> Result<Enumeration, SyncError> {
    let listing = tool.list_artboards(source)?;
    let enumeration = partition(&listing, rules);
    tracing::info!(
        "{} artboard(s) to export, {} ignored",
        enumeration.included.len(),
        enumeration.excluded.len()
    );
    Ok(enumeration)
}

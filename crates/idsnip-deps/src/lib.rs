//! # idsnip-deps
//!
//! Dependency graph engine for IDML-style packages.
//!
//! The engine answers one question in several forms: *which resources does
//! this content actually need?* It extracts style, color, font, and layer
//! references from stories and page items, closes the style sets over
//! BasedOn/NextStyle inheritance, and uses the closure to filter resource
//! catalogs. On top of that sit the selection exporter (minimal
//! self-contained sub-packages) and the document-wide orphan/missing
//! analyzer.
//!
//! All operations are synchronous, single-pass, and free of side effects on
//! their inputs except through explicitly returned or mutated outputs. A
//! [`DependencySet`] is built fresh for each pass and never carried across
//! operations.
//!
//! ## Example: Exporting a Selection
//!
//! ```no_run
//! use idsnip_deps::{export_selection, Selection};
//! use idsnip_idml::Package;
//!
//! let pkg = Package::open("layout.idml")?;
//! let selection = Selection::new().with_story("u100");
//! let bytes = export_selection(&pkg, &selection)?;
//! std::fs::write("selection.idml", bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analyze;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod resolve;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use idsnip_idml::StyleKind;

pub use analyze::{
    cleanup_orphans, create_missing_defaults, document_usage, find_missing, find_orphans,
    find_orphans_with, validate_references, CleanupOptions, CleanupResult, MissingReport,
    MissingResource, OrphanReport, RemovedResource, UsageLocation, ValidationIssue,
};
pub use error::{DepsError, Result};
pub use export::{assemble_selection, export_selection, Selection};
pub use extract::{frame_refs, story_refs, style_colors};
pub use filter::{filter_colors, filter_fonts, filter_style_group, filter_styles};
pub use resolve::{resolve_inheritance, MAX_RESOLVE_PASSES};

/// The kinds of resources tracked by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Font family
    Font,
    /// Paragraph style
    ParagraphStyle,
    /// Character style
    CharacterStyle,
    /// Object style
    ObjectStyle,
    /// Color definition
    Color,
    /// Swatch definition
    Swatch,
    /// Layer
    Layer,
}

impl ResourceKind {
    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Font => "font",
            ResourceKind::ParagraphStyle => "paragraph style",
            ResourceKind::CharacterStyle => "character style",
            ResourceKind::ObjectStyle => "object style",
            ResourceKind::Color => "color",
            ResourceKind::Swatch => "swatch",
            ResourceKind::Layer => "layer",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<StyleKind> for ResourceKind {
    fn from(kind: StyleKind) -> Self {
        match kind {
            StyleKind::Character => ResourceKind::CharacterStyle,
            StyleKind::Paragraph => ResourceKind::ParagraphStyle,
            StyleKind::Object => ResourceKind::ObjectStyle,
        }
    }
}

/// Accumulated resource references from one analysis pass
///
/// Each bucket is an ordered set of identifiers, so reports derived from a
/// dependency set are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Referenced font family names
    pub fonts: BTreeSet<String>,
    /// Referenced paragraph style identifiers
    pub paragraph_styles: BTreeSet<String>,
    /// Referenced character style identifiers
    pub character_styles: BTreeSet<String>,
    /// Referenced object style identifiers
    pub object_styles: BTreeSet<String>,
    /// Referenced color identifiers
    pub colors: BTreeSet<String>,
    /// Referenced swatch identifiers
    pub swatches: BTreeSet<String>,
    /// Referenced layer identifiers
    pub layers: BTreeSet<String>,
}

impl DependencySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// The style bucket for a kind
    pub fn styles(&self, kind: StyleKind) -> &BTreeSet<String> {
        match kind {
            StyleKind::Character => &self.character_styles,
            StyleKind::Paragraph => &self.paragraph_styles,
            StyleKind::Object => &self.object_styles,
        }
    }

    /// Mutable style bucket for a kind
    pub fn styles_mut(&mut self, kind: StyleKind) -> &mut BTreeSet<String> {
        match kind {
            StyleKind::Character => &mut self.character_styles,
            StyleKind::Paragraph => &mut self.paragraph_styles,
            StyleKind::Object => &mut self.object_styles,
        }
    }

    /// Record a color or swatch reference, routed by identifier prefix
    ///
    /// Sentinel "no reference" values are dropped.
    pub fn add_color_ref(&mut self, id: &str) {
        if idsnip_idml::ids::is_no_reference(id) {
            return;
        }
        if id.starts_with(idsnip_idml::ids::SWATCH_PREFIX) {
            self.swatches.insert(id.to_string());
        } else {
            self.colors.insert(id.to_string());
        }
    }

    /// True if no references of any kind were recorded
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
            && self.paragraph_styles.is_empty()
            && self.character_styles.is_empty()
            && self.object_styles.is_empty()
            && self.colors.is_empty()
            && self.swatches.is_empty()
            && self.layers.is_empty()
    }

    /// Total number of recorded references
    pub fn len(&self) -> usize {
        self.fonts.len()
            + self.paragraph_styles.len()
            + self.character_styles.len()
            + self.object_styles.len()
            + self.colors.len()
            + self.swatches.len()
            + self.layers.len()
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

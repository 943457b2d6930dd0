//! # idsnip-idml
//!
//! IDML package container and typed document model for idsnip.
//!
//! This crate provides functionality to:
//! - Read and write IDML packages (ZIP archives of XML parts)
//! - Parse stories, spreads, and the style/color/font resource catalogs
//! - Scaffold blank, self-contained packages
//!
//! ## Example: Reading a Package
//!
//! ```no_run
//! use idsnip_idml::Package;
//!
//! let pkg = Package::open("layout.idml")?;
//! for story in pkg.all_stories() {
//!     println!("{}: {} paragraphs", story.self_id, story.paragraphs.len());
//! }
//! # Ok::<(), idsnip_idml::IdmlError>(())
//! ```

pub mod archive;
pub mod colors;
pub mod designmap;
pub mod error;
pub mod fonts;
pub mod ids;
pub mod package;
pub mod spread;
pub mod story;
pub mod styles;
pub mod template;
pub mod writer;

mod xml;

pub use archive::{IdmlArchive, DESIGNMAP_PATH, FONTS_PATH, GRAPHIC_PATH, MIMETYPE, STYLES_PATH};
pub use colors::{ColorCatalog, ColorDefinition, ColorGroup, ColorGroupMember, ColorModel, ColorSpace};
pub use designmap::{DesignMap, PackagePart, PartKind};
pub use error::{IdmlError, Result};
pub use fonts::{FontCatalog, FontFace, FontFamily};
pub use package::Package;
pub use spread::{ItemCommon, PageItem, Spread};
pub use story::{CharacterRange, ParagraphRange, Story};
pub use styles::{StyleCatalog, StyleDefinition, StyleGroup, StyleKind};
pub use template::blank_package;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

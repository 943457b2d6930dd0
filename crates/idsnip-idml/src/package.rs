//! Typed package façade
//!
//! [`Package`] wraps an [`IdmlArchive`] and parses every part eagerly on
//! open: the designmap, all stories and spreads, and the three resource
//! catalogs. Absent resource files parse as empty catalogs so that analysis
//! can treat "definition file missing" as "zero entries defined"; a missing
//! designmap is a hard error.
//!
//! A `&Package` is safe to share across threads; concurrent mutation of one
//! package is the caller's problem to serialize.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::archive::{IdmlArchive, DESIGNMAP_PATH, FONTS_PATH, GRAPHIC_PATH, MIMETYPE, STYLES_PATH};
use crate::colors::ColorCatalog;
use crate::designmap::{DesignMap, PartKind};
use crate::error::Result;
use crate::fonts::FontCatalog;
use crate::spread::{PageItem, Spread};
use crate::story::Story;
use crate::styles::StyleCatalog;
use crate::writer;

/// A fully parsed IDML package
#[derive(Debug, Clone)]
pub struct Package {
    /// Parsed designmap.xml
    pub design_map: DesignMap,
    /// Stories keyed by self identifier
    pub stories: BTreeMap<String, Story>,
    /// Spreads keyed by self identifier
    pub spreads: BTreeMap<String, Spread>,
    /// Style definitions
    pub styles: StyleCatalog,
    /// Color and swatch definitions
    pub colors: ColorCatalog,
    /// Font definitions
    pub fonts: FontCatalog,
    /// Underlying archive, kept for files the model does not cover
    archive: IdmlArchive,
}

impl Package {
    /// Open and parse a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(IdmlArchive::open(path)?)
    }

    /// Open and parse a package from any reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_archive(IdmlArchive::from_reader(reader)?)
    }

    /// Parse a package from an already-unpacked archive
    pub fn from_archive(archive: IdmlArchive) -> Result<Self> {
        let design_map = DesignMap::parse(archive.designmap_xml()?)?;

        let mut stories = BTreeMap::new();
        for path in archive.list("Stories/") {
            if let Some(xml) = archive.get(path) {
                let story = Story::parse(xml)?;
                stories.insert(story.self_id.clone(), story);
            }
        }

        let mut spreads = BTreeMap::new();
        for path in archive.list("Spreads/") {
            if let Some(xml) = archive.get(path) {
                let spread = Spread::parse(xml)?;
                spreads.insert(spread.self_id.clone(), spread);
            }
        }

        let styles = match archive.styles_xml() {
            Some(xml) => StyleCatalog::parse(xml)?,
            None => StyleCatalog::empty(),
        };
        let colors = match archive.graphic_xml() {
            Some(xml) => ColorCatalog::parse(xml)?,
            None => ColorCatalog::empty(),
        };
        let fonts = match archive.fonts_xml() {
            Some(xml) => FontCatalog::parse(xml)?,
            None => FontCatalog::empty(),
        };

        Ok(Self {
            design_map,
            stories,
            spreads,
            styles,
            colors,
            fonts,
            archive,
        })
    }

    /// An empty package scaffold with the given document identifier
    pub fn empty(doc_id: &str) -> Self {
        let mut archive = IdmlArchive::new();
        archive.set_string("mimetype", MIMETYPE);
        Self {
            design_map: DesignMap::new(doc_id),
            stories: BTreeMap::new(),
            spreads: BTreeMap::new(),
            styles: StyleCatalog::empty(),
            colors: ColorCatalog::empty(),
            fonts: FontCatalog::empty(),
            archive,
        }
    }

    /// Look up a story by self identifier
    pub fn story(&self, id: &str) -> Option<&Story> {
        self.stories.get(id)
    }

    /// Look up a spread by self identifier
    pub fn spread(&self, id: &str) -> Option<&Spread> {
        self.spreads.get(id)
    }

    /// All stories, in identifier order
    pub fn all_stories(&self) -> impl Iterator<Item = &Story> {
        self.stories.values()
    }

    /// All spreads, in identifier order
    pub fn all_spreads(&self) -> impl Iterator<Item = &Spread> {
        self.spreads.values()
    }

    /// Find a page item by identifier across all spreads, including nested
    /// group members
    pub fn find_frame(&self, id: &str) -> Option<&PageItem> {
        self.spreads.values().find_map(|s| s.find_item(id))
    }

    /// The underlying archive
    pub fn archive(&self) -> &IdmlArchive {
        &self.archive
    }

    /// Mutable access to the underlying archive, for files the model does
    /// not cover
    pub fn archive_mut(&mut self) -> &mut IdmlArchive {
        &mut self.archive
    }

    /// Whether the source archive carried a style definitions file
    pub fn has_styles_file(&self) -> bool {
        self.archive.contains(STYLES_PATH)
    }

    /// Whether the source archive carried a color definitions file
    pub fn has_graphic_file(&self) -> bool {
        self.archive.contains(GRAPHIC_PATH)
    }

    /// Whether the source archive carried a font definitions file
    pub fn has_fonts_file(&self) -> bool {
        self.archive.contains(FONTS_PATH)
    }

    /// Serialize the package to IDML bytes
    ///
    /// The parsed model overwrites its parts in a copy of the source
    /// archive; files the model does not cover (preferences, metadata) pass
    /// through untouched.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut archive = self.archive.clone();
        archive.set_string("mimetype", MIMETYPE);
        archive.set_string(DESIGNMAP_PATH, self.rebuild_designmap().to_xml());
        archive.set_string(STYLES_PATH, writer::styles_xml(&self.styles));
        archive.set_string(GRAPHIC_PATH, writer::graphic_xml(&self.colors));
        archive.set_string(FONTS_PATH, writer::fonts_xml(&self.fonts));

        for story in self.stories.values() {
            archive.set_string(Story::path(&story.self_id), writer::story_xml(story));
        }
        for spread in self.spreads.values() {
            archive.set_string(Spread::path(&spread.self_id), writer::spread_xml(spread));
        }

        let mut buffer = Cursor::new(Vec::new());
        archive.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Write the package to a file path
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    fn rebuild_designmap(&self) -> DesignMap {
        let mut map = DesignMap::new(self.design_map.self_id.clone());
        map.dom_version = self.design_map.dom_version.clone();
        map.add_part(PartKind::Graphic, GRAPHIC_PATH);
        map.add_part(PartKind::Fonts, FONTS_PATH);
        map.add_part(PartKind::Styles, STYLES_PATH);
        if self.archive.contains("Resources/Preferences.xml") {
            map.add_part(PartKind::Preferences, "Resources/Preferences.xml");
        }
        for id in self.stories.keys() {
            map.add_part(PartKind::Story, Story::path(id));
        }
        for id in self.spreads.keys() {
            map.add_part(PartKind::Spread, Spread::path(id));
        }
        map
    }
}

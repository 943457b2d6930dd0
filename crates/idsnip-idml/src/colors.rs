//! Color and swatch definitions parsing (Resources/Graphic.xml)
//!
//! Colors and swatches are near-identical records referenced under two
//! different identifier prefixes (`Color/`, `Swatch/`). A reference to
//! either prefix must be checked against both collections. Color groups are
//! pure display constructs: each member points at a color or swatch via
//! `SwatchItemRef` and has no content of its own.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{IdmlError, Result};
use crate::xml::get_attr;

/// Color model of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorModel {
    /// Process (plate-separated) color
    #[default]
    Process,
    /// Spot color
    Spot,
    /// Registration color
    Registration,
}

impl ColorModel {
    /// Attribute value for this model
    pub fn as_str(self) -> &'static str {
        match self {
            ColorModel::Process => "Process",
            ColorModel::Spot => "Spot",
            ColorModel::Registration => "Registration",
        }
    }

    fn from_str(s: &str) -> Self {
        match s {
            "Spot" => ColorModel::Spot,
            "Registration" => ColorModel::Registration,
            _ => ColorModel::Process,
        }
    }
}

/// Color space of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Cyan, magenta, yellow, black
    #[default]
    Cmyk,
    /// Red, green, blue
    Rgb,
    /// CIE Lab
    Lab,
}

impl ColorSpace {
    /// Attribute value for this space
    pub fn as_str(self) -> &'static str {
        match self {
            ColorSpace::Cmyk => "CMYK",
            ColorSpace::Rgb => "RGB",
            ColorSpace::Lab => "LAB",
        }
    }

    fn from_str(s: &str) -> Self {
        match s {
            "RGB" => ColorSpace::Rgb,
            "LAB" => ColorSpace::Lab,
            _ => ColorSpace::Cmyk,
        }
    }
}

/// A color or swatch definition
///
/// The same record shape serves both collections; only the identifier
/// prefix differs.
#[derive(Debug, Clone)]
pub struct ColorDefinition {
    /// Self identifier (e.g. `Color/Black`, `Swatch/None`)
    pub self_id: String,
    /// Display name
    pub name: String,
    /// Color model
    pub model: ColorModel,
    /// Color space
    pub space: ColorSpace,
    /// Space-separated component values (e.g. `0 0 0 100`)
    pub color_value: String,
}

impl ColorDefinition {
    /// A default process-black CMYK definition with the given identifier
    pub fn black(self_id: impl Into<String>) -> Self {
        let self_id = self_id.into();
        let name = crate::ids::display_name(&self_id).to_string();
        Self {
            self_id,
            name,
            model: ColorModel::Process,
            space: ColorSpace::Cmyk,
            color_value: "0 0 0 100".to_string(),
        }
    }
}

/// One member of a color group
#[derive(Debug, Clone)]
pub struct ColorGroupMember {
    /// Referenced color or swatch identifier
    pub swatch_item_ref: String,
}

/// A named grouping of colors and swatches
#[derive(Debug, Clone)]
pub struct ColorGroup {
    /// Group self identifier
    pub self_id: String,
    /// Display name
    pub name: String,
    /// Member references
    pub members: Vec<ColorGroupMember>,
}

/// All color definitions of a document
#[derive(Debug, Clone, Default)]
pub struct ColorCatalog {
    /// Color definitions
    pub colors: Vec<ColorDefinition>,
    /// Swatch definitions
    pub swatches: Vec<ColorDefinition>,
    /// Color groups
    pub groups: Vec<ColorGroup>,
}

impl ColorCatalog {
    /// An empty catalog, used when Resources/Graphic.xml is absent
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a color catalog from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(xml).into_owned();
        let mut reader = Reader::from_str(&text);
        reader.config_mut().trim_text(true);

        let mut catalog = ColorCatalog::empty();
        let mut current_group: Option<ColorGroup> = None;

        loop {
            let event = reader.read_event().map_err(IdmlError::Xml)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    match e.local_name().as_ref() {
                        b"Color" => catalog.colors.push(definition_from(e)),
                        b"Swatch" => catalog.swatches.push(definition_from(e)),
                        b"ColorGroup" => {
                            let group = ColorGroup {
                                self_id: get_attr(e, b"Self").unwrap_or_default(),
                                name: get_attr(e, b"Name").unwrap_or_default(),
                                members: Vec::new(),
                            };
                            if is_empty {
                                catalog.groups.push(group);
                            } else {
                                current_group = Some(group);
                            }
                        }
                        b"ColorGroupSwatch" => {
                            if let (Some(group), Some(item_ref)) =
                                (current_group.as_mut(), get_attr(e, b"SwatchItemRef"))
                            {
                                group.members.push(ColorGroupMember {
                                    swatch_item_ref: item_ref,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => {
                    if e.local_name().as_ref() == b"ColorGroup" {
                        if let Some(group) = current_group.take() {
                            catalog.groups.push(group);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(catalog)
    }

    /// Find a definition by identifier in either collection
    ///
    /// References to `Color/X` and `Swatch/X` are cross-checked: a lookup
    /// succeeds if either collection holds the identifier.
    pub fn find(&self, id: &str) -> Option<&ColorDefinition> {
        self.colors
            .iter()
            .chain(self.swatches.iter())
            .find(|c| c.self_id == id)
    }

    /// True if a color or swatch with this identifier is defined
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

fn definition_from(e: &quick_xml::events::BytesStart) -> ColorDefinition {
    let self_id = get_attr(e, b"Self").unwrap_or_default();
    let name = get_attr(e, b"Name")
        .unwrap_or_else(|| crate::ids::display_name(&self_id).to_string());
    ColorDefinition {
        self_id,
        name,
        model: ColorModel::from_str(get_attr(e, b"Model").as_deref().unwrap_or("")),
        space: ColorSpace::from_str(get_attr(e, b"Space").as_deref().unwrap_or("")),
        color_value: get_attr(e, b"ColorValue").unwrap_or_default(),
    }
}

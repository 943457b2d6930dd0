//! Blank document scaffolding
//!
//! Every valid package carries a fixed set of scaffolding entries
//! independent of content: the sentinel "no style" definitions for each
//! style kind, the `Swatch/None` and `Color/Black` pair, and a preferences
//! stub. Both `blank_package` and the selection exporter build on these so
//! their outputs open without errors.

use crate::colors::{ColorCatalog, ColorDefinition};
use crate::ids::{COLOR_BLACK, SWATCH_NONE};
use crate::package::Package;
use crate::spread::{ItemCommon, PageItem, Spread};
use crate::story::Story;
use crate::styles::{StyleCatalog, StyleDefinition, StyleKind};

/// Archive path of the preferences stub
pub const PREFERENCES_PATH: &str = "Resources/Preferences.xml";

/// Minimal preferences part written into scaffolded packages
pub const PREFERENCES_STUB: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<idPkg:Preferences xmlns:idPkg=\"http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging\" DOMVersion=\"8.0\">\n",
    "  <ViewPreference HorizontalMeasurementUnits=\"Points\" VerticalMeasurementUnits=\"Points\"/>\n",
    "</idPkg:Preferences>\n",
);

/// Identifier of the character "no style" sentinel definition
pub const NO_CHARACTER_STYLE: &str = "CharacterStyle/$ID/[No character style]";

/// Identifier of the default paragraph style definition
pub const NORMAL_PARAGRAPH_STYLE: &str = "ParagraphStyle/$ID/NormalParagraphStyle";

/// Identifier of the object "none" sentinel definition
pub const NO_OBJECT_STYLE: &str = "ObjectStyle/$ID/[None]";

/// The style definitions every package must carry
pub fn sentinel_styles() -> StyleCatalog {
    let mut catalog = StyleCatalog::empty();
    catalog.character_styles.self_id = "u73".to_string();
    catalog.paragraph_styles.self_id = "u74".to_string();
    catalog.object_styles.self_id = "u75".to_string();
    catalog.insert(StyleDefinition::new(StyleKind::Character, NO_CHARACTER_STYLE));
    catalog.insert(StyleDefinition::new(StyleKind::Paragraph, NORMAL_PARAGRAPH_STYLE));
    catalog.insert(StyleDefinition::new(StyleKind::Object, NO_OBJECT_STYLE));
    catalog
}

/// The color definitions every package must carry
pub fn base_colors() -> ColorCatalog {
    ColorCatalog {
        colors: vec![ColorDefinition::black(COLOR_BLACK)],
        swatches: vec![ColorDefinition {
            color_value: String::new(),
            ..ColorDefinition::black(SWATCH_NONE)
        }],
        groups: Vec::new(),
    }
}

/// Scaffold a blank, self-contained package
///
/// The result has one empty story flowed through one text frame on a single
/// spread, plus all required scaffolding, and opens on its own.
pub fn blank_package(doc_id: &str) -> Package {
    let mut pkg = Package::empty(doc_id);
    pkg.archive_mut().set_string(PREFERENCES_PATH, PREFERENCES_STUB);
    pkg.styles = sentinel_styles();
    pkg.colors = base_colors();

    let story = Story::new("u100");
    let mut spread = Spread::new("u300");
    spread.items.push(PageItem::TextFrame {
        common: ItemCommon {
            self_id: "u301".to_string(),
            layer: Some("ub6".to_string()),
            applied_object_style: Some(NO_OBJECT_STYLE.to_string()),
            item_transform: None,
        },
        parent_story: Some(story.self_id.clone()),
    });
    pkg.stories.insert(story.self_id.clone(), story);
    pkg.spreads.insert(spread.self_id.clone(), spread);
    pkg
}

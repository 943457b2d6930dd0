//! Selection export
//!
//! Assembles a minimal self-contained package from a selection of stories
//! and page items. The pipeline is linear: validate the selection, extract
//! its references, close the style sets over inheritance, filter cloned
//! resource catalogs down to the closure, then merge in the scaffolding
//! every package must carry. An identifier that names nothing in the source
//! is fatal before any extraction work happens.

use idsnip_idml::ids::{COLOR_BLACK, SWATCH_NONE};
use idsnip_idml::template::{self, PREFERENCES_PATH, PREFERENCES_STUB};
use idsnip_idml::{Package, PageItem, Spread, StyleKind};

use crate::error::{DepsError, Result};
use crate::extract::{frame_refs, story_refs, style_colors};
use crate::filter::{filter_colors, filter_fonts, filter_styles};
use crate::resolve::resolve_inheritance;
use crate::DependencySet;

/// Spread identifier of the assembled output
const EXPORT_SPREAD_ID: &str = "u300";

/// The stories and page items to export
///
/// Identifiers are source self identifiers. Selecting a text frame pulls in
/// its parent story; selecting a story pulls in every frame flowing it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected story identifiers
    pub stories: Vec<String>,
    /// Selected page item identifiers
    pub frames: Vec<String>,
}

impl Selection {
    /// An empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a story by identifier
    pub fn with_story(mut self, id: impl Into<String>) -> Self {
        self.stories.push(id.into());
        self
    }

    /// Add a page item by identifier
    pub fn with_frame(mut self, id: impl Into<String>) -> Self {
        self.frames.push(id.into());
        self
    }

    /// True if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty() && self.frames.is_empty()
    }
}

/// Export a selection as IDML bytes
pub fn export_selection(pkg: &Package, selection: &Selection) -> Result<Vec<u8>> {
    Ok(assemble_selection(pkg, selection)?.to_bytes()?)
}

/// Assemble a selection into a standalone package
///
/// The output carries the selected stories, a single spread holding the
/// selected items, and resource catalogs filtered to the selection's
/// dependency closure plus the required scaffolding. An empty selection
/// yields a scaffolding-only package that still opens on its own.
pub fn assemble_selection(pkg: &Package, selection: &Selection) -> Result<Package> {
    for id in &selection.stories {
        if pkg.story(id).is_none() {
            return Err(DepsError::NotFound(format!("story {id}")));
        }
    }
    for id in &selection.frames {
        if pkg.find_frame(id).is_none() {
            return Err(DepsError::NotFound(format!("page item {id}")));
        }
    }

    let mut story_ids: Vec<String> = selection.stories.clone();
    let mut items: Vec<PageItem> = Vec::new();

    for id in &selection.frames {
        // Validated above
        if let Some(item) = pkg.find_frame(id) {
            items.push(item.clone());
        }
    }

    // Frames flowing a selected story come along with it
    for spread in pkg.all_spreads() {
        for item in &spread.items {
            if items.iter().any(|i| i.self_id() == item.self_id()) {
                continue;
            }
            let mut flows_selected = false;
            item.visit(&mut |node| {
                if let Some(parent) = node.parent_story() {
                    if selection.stories.iter().any(|s| s == parent) {
                        flows_selected = true;
                    }
                }
            });
            if flows_selected {
                items.push(item.clone());
            }
        }
    }

    // Every story flowed anywhere in an included item comes along; a group
    // pulled in for one member can hold text frames of other stories
    for item in &items {
        item.visit(&mut |node| {
            if let Some(parent) = node.parent_story() {
                if pkg.story(parent).is_some() && !story_ids.iter().any(|s| s == parent) {
                    story_ids.push(parent.to_string());
                }
            }
        });
    }

    let mut deps = DependencySet::new();
    for id in &story_ids {
        if let Some(story) = pkg.story(id) {
            story_refs(story, [], &mut deps);
        }
    }
    for item in &items {
        item.visit(&mut |node| frame_refs(node, &mut deps));
    }

    resolve_inheritance(&mut deps, &pkg.styles);
    style_colors(&pkg.styles, &mut deps);

    let mut styles = pkg.styles.clone();
    filter_styles(&mut styles, &deps);
    let mut colors = pkg.colors.clone();
    filter_colors(&mut colors, &deps);
    let mut fonts = pkg.fonts.clone();
    filter_fonts(&mut fonts, &deps.fonts);

    // Scaffolding: sentinel styles and the base color pair, whether or not
    // the source carried them
    let sentinels = template::sentinel_styles();
    for kind in [StyleKind::Character, StyleKind::Paragraph, StyleKind::Object] {
        if styles.root(kind).self_id.is_empty() {
            styles.root_mut(kind).self_id = sentinels.root(kind).self_id.clone();
        }
        for def in sentinels.styles(kind) {
            if styles.find(kind, &def.self_id).is_none() {
                styles.insert(def.clone());
            }
        }
    }
    let base = template::base_colors();
    if !colors.colors.iter().any(|c| c.self_id == COLOR_BLACK) {
        colors.colors.push(base.colors[0].clone());
    }
    if !colors.swatches.iter().any(|s| s.self_id == SWATCH_NONE) {
        colors.swatches.push(base.swatches[0].clone());
    }

    let mut out = Package::empty(&pkg.design_map.self_id);
    out.design_map.dom_version = pkg.design_map.dom_version.clone();
    out.archive_mut().set_string(PREFERENCES_PATH, PREFERENCES_STUB);
    out.styles = styles;
    out.colors = colors;
    out.fonts = fonts;

    for id in &story_ids {
        if let Some(story) = pkg.story(id) {
            out.stories.insert(id.clone(), story.clone());
        }
    }

    let mut spread = Spread::new(EXPORT_SPREAD_ID);
    spread.items = items;
    out.spreads.insert(spread.self_id.clone(), spread);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idsnip_idml::story::{CharacterRange, ParagraphRange};
    use idsnip_idml::{ColorDefinition, FontFamily, ItemCommon, Story, StyleDefinition};
    use std::io::Cursor;

    fn para(style: &str, char_style: &str, font: &str, text: &str) -> ParagraphRange {
        ParagraphRange {
            applied_style: style.to_string(),
            ranges: vec![CharacterRange {
                applied_style: char_style.to_string(),
                applied_font: Some(font.to_string()),
                content: text.to_string(),
            }],
        }
    }

    fn source_package() -> Package {
        let mut pkg = Package::empty("doc");

        let mut bold_story = Story::new("u100");
        bold_story.paragraphs.push(para(
            "ParagraphStyle/Heading",
            "CharacterStyle/Bold",
            "Minion Pro",
            "bold text",
        ));
        pkg.stories.insert(bold_story.self_id.clone(), bold_story);

        let mut italic_story = Story::new("u200");
        italic_story.paragraphs.push(para(
            "ParagraphStyle/Body",
            "CharacterStyle/Italic",
            "Courier New",
            "italic text",
        ));
        pkg.stories.insert(italic_story.self_id.clone(), italic_story);

        let mut spread = Spread::new("u900");
        for (frame, story) in [("u301", "u100"), ("u302", "u200")] {
            spread.items.push(PageItem::TextFrame {
                common: ItemCommon {
                    self_id: frame.to_string(),
                    layer: Some("ub6".to_string()),
                    applied_object_style: None,
                    item_transform: None,
                },
                parent_story: Some(story.to_string()),
            });
        }
        spread.items.push(PageItem::Oval {
            common: ItemCommon {
                self_id: "u303".to_string(),
                layer: Some("ub6".to_string()),
                applied_object_style: None,
                item_transform: None,
            },
            fill_color: Some("Color/Red".to_string()),
            stroke_color: None,
        });
        pkg.spreads.insert(spread.self_id.clone(), spread);

        for (kind, id) in [
            (StyleKind::Paragraph, "ParagraphStyle/Heading"),
            (StyleKind::Paragraph, "ParagraphStyle/Body"),
            (StyleKind::Character, "CharacterStyle/Bold"),
            (StyleKind::Character, "CharacterStyle/Italic"),
        ] {
            pkg.styles.insert(StyleDefinition::new(kind, id));
        }
        for id in ["Color/Black", "Color/Red", "Color/Unused"] {
            pkg.colors.colors.push(ColorDefinition::black(id));
        }
        pkg.colors.swatches.push(ColorDefinition::black("Swatch/None"));
        for name in ["Minion Pro", "Courier New"] {
            pkg.fonts.families.push(FontFamily::regular(name));
        }
        pkg
    }

    #[test]
    fn test_export_is_minimal() {
        // Selecting only the bold story must leave every italic-side
        // resource behind
        let pkg = source_package();
        let out = assemble_selection(&pkg, &Selection::new().with_story("u100")).unwrap();

        assert!(out.story("u100").is_some());
        assert!(out.story("u200").is_none());
        assert!(out
            .styles
            .find(StyleKind::Character, "CharacterStyle/Bold")
            .is_some());
        assert!(out
            .styles
            .find(StyleKind::Character, "CharacterStyle/Italic")
            .is_none());
        assert!(out.fonts.contains("Minion Pro"));
        assert!(!out.fonts.contains("Courier New"));
        assert!(!out.colors.contains("Color/Unused"));
    }

    #[test]
    fn test_story_selection_pulls_its_frames() {
        let pkg = source_package();
        let out = assemble_selection(&pkg, &Selection::new().with_story("u100")).unwrap();

        let spread = out.spread(EXPORT_SPREAD_ID).unwrap();
        assert_eq!(spread.items.len(), 1);
        assert_eq!(spread.items[0].self_id(), "u301");
    }

    #[test]
    fn test_frame_selection_pulls_parent_story() {
        let pkg = source_package();
        let out = assemble_selection(&pkg, &Selection::new().with_frame("u302")).unwrap();

        assert!(out.story("u200").is_some());
        assert!(out.story("u100").is_none());
        assert!(out.fonts.contains("Courier New"));
    }

    #[test]
    fn test_shape_selection_keeps_direct_color() {
        let pkg = source_package();
        let out = assemble_selection(&pkg, &Selection::new().with_frame("u303")).unwrap();

        assert!(out.colors.contains("Color/Red"));
        assert!(out.colors.contains("Color/Black"), "always retained");
        assert!(out.stories.is_empty());
    }

    #[test]
    fn test_group_pulls_every_flowed_story() {
        // A group included for one member can hold text frames flowing
        // other stories; those stories must come along too
        let mut pkg = source_package();
        let frame = |id: &str, story: &str| PageItem::TextFrame {
            common: ItemCommon {
                self_id: id.to_string(),
                layer: Some("ub6".to_string()),
                applied_object_style: None,
                item_transform: None,
            },
            parent_story: Some(story.to_string()),
        };
        if let Some(spread) = pkg.spreads.get_mut("u900") {
            spread.items.push(PageItem::Group {
                common: ItemCommon {
                    self_id: "u400".to_string(),
                    layer: Some("ub6".to_string()),
                    applied_object_style: None,
                    item_transform: None,
                },
                children: vec![frame("u401", "u100"), frame("u402", "u200")],
            });
        }

        let bytes = export_selection(&pkg, &Selection::new().with_story("u100")).unwrap();
        let out = Package::from_reader(Cursor::new(bytes)).unwrap();

        let spread = out.spread(EXPORT_SPREAD_ID).unwrap();
        assert!(spread.find_item("u402").is_some());
        assert!(out.story("u200").is_some(), "sibling frame's story is copied");
        assert!(out.fonts.contains("Courier New"));
        assert!(crate::analyze::validate_references(&out).is_empty());
    }

    #[test]
    fn test_unknown_ids_are_fatal() {
        let pkg = source_package();
        let err = assemble_selection(&pkg, &Selection::new().with_story("u999")).unwrap_err();
        assert!(matches!(err, DepsError::NotFound(_)));

        let err = assemble_selection(&pkg, &Selection::new().with_frame("u999")).unwrap_err();
        assert!(matches!(err, DepsError::NotFound(_)));
    }

    #[test]
    fn test_empty_selection_yields_openable_scaffold() {
        let pkg = source_package();
        let bytes = export_selection(&pkg, &Selection::new()).unwrap();
        let restored = Package::from_reader(Cursor::new(bytes)).unwrap();

        assert!(restored.stories.is_empty());
        assert!(restored.colors.contains("Color/Black"));
        assert!(restored.colors.contains("Swatch/None"));
        assert!(restored
            .styles
            .find(StyleKind::Paragraph, template::NORMAL_PARAGRAPH_STYLE)
            .is_some());
    }

    #[test]
    fn test_export_roundtrips_and_reexports() {
        // The exported package is itself a valid export source
        let pkg = source_package();
        let bytes = export_selection(&pkg, &Selection::new().with_story("u100")).unwrap();
        let reopened = Package::from_reader(Cursor::new(bytes)).unwrap();

        let again = assemble_selection(&reopened, &Selection::new().with_story("u100")).unwrap();
        assert!(again.story("u100").is_some());
        assert_eq!(
            reopened.story("u100").unwrap().plain_text(),
            pkg.story("u100").unwrap().plain_text()
        );
    }
}

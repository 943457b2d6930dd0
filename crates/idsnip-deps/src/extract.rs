//! Resource reference extraction
//!
//! Scans content units and page items for applied-style, color, font, and
//! layer references and records them in a [`DependencySet`]. Color
//! extraction from styles runs on the post-closure style set, never on raw
//! content: a color used only by a BasedOn ancestor is still a dependency.

use std::sync::OnceLock;

use regex::Regex;

use idsnip_idml::ids::is_no_reference;
use idsnip_idml::{PageItem, Story, StyleCatalog, StyleKind};

use crate::DependencySet;

static COLOR_ATTR_RE: OnceLock<Regex> = OnceLock::new();

/// Matches color-valued attributes in unmodeled style properties, e.g.
/// `RuleAboveColor="Color/Accent"` or `FillColor="Swatch/None"`
fn color_attr_re() -> &'static Regex {
    COLOR_ATTR_RE
        .get_or_init(|| Regex::new(r#"[A-Za-z]*Color="((?:Color|Swatch)/[^"]*)""#).unwrap())
}

/// Record the style, font, and layer references of one story
///
/// Walks every paragraph range and its character ranges, then the related
/// page items: only frames whose `ParentStory` equals this story's own
/// identifier contribute object styles and layers. Frames belonging to
/// other stories are ignored even when present in `frames`.
pub fn story_refs<'a>(
    story: &Story,
    frames: impl IntoIterator<Item = &'a PageItem>,
    deps: &mut DependencySet,
) {
    for para in &story.paragraphs {
        if !is_no_reference(&para.applied_style) {
            deps.paragraph_styles.insert(para.applied_style.clone());
        }
        for range in &para.ranges {
            if !is_no_reference(&range.applied_style) {
                deps.character_styles.insert(range.applied_style.clone());
            }
            if let Some(font) = &range.applied_font {
                if !is_no_reference(font) {
                    deps.fonts.insert(font.clone());
                }
            }
        }
    }

    for frame in frames {
        if frame.parent_story() != Some(story.self_id.as_str()) {
            continue;
        }
        record_item_style_and_layer(frame, deps);
    }
}

/// Record the object style, direct colors, and layer of one page item
///
/// Used by whole-document passes and for explicitly selected frames; does
/// not descend into groups (callers visit).
pub fn frame_refs(item: &PageItem, deps: &mut DependencySet) {
    record_item_style_and_layer(item, deps);
    let (fill, stroke) = item.direct_colors();
    if let Some(fill) = fill {
        deps.add_color_ref(fill);
    }
    if let Some(stroke) = stroke {
        deps.add_color_ref(stroke);
    }
}

fn record_item_style_and_layer(item: &PageItem, deps: &mut DependencySet) {
    let common = item.common();
    if let Some(style) = &common.applied_object_style {
        if !is_no_reference(style) {
            deps.object_styles.insert(style.clone());
        }
    }
    if let Some(layer) = &common.layer {
        if !is_no_reference(layer) {
            deps.layers.insert(layer.clone());
        }
    }
}

/// Record the color references of every used style definition
///
/// Must run after [`crate::resolve_inheritance`]: only styles already in
/// the used set of their kind contribute. Explicit fill/stroke fields are
/// read directly; unmodeled properties are scanned for color-valued
/// attributes by name pattern.
pub fn style_colors(catalog: &StyleCatalog, deps: &mut DependencySet) {
    for kind in [StyleKind::Character, StyleKind::Paragraph, StyleKind::Object] {
        let mut found: Vec<String> = Vec::new();
        for style in catalog.styles(kind) {
            if !deps.styles(kind).contains(&style.self_id) {
                continue;
            }
            if let Some(fill) = &style.fill_color {
                found.push(fill.clone());
            }
            if let Some(stroke) = &style.stroke_color {
                found.push(stroke.clone());
            }
            for capture in color_attr_re().captures_iter(&style.raw_properties) {
                found.push(capture[1].to_string());
            }
        }
        for id in found {
            deps.add_color_ref(&id);
        }
    }
}

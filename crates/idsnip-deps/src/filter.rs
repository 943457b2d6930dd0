//! Style and color tree filtering
//!
//! Pure structural transforms that prune resource catalogs down to a used
//! set. Filtering is idempotent and has no error conditions: an empty tree
//! is a valid "nothing to filter" state, not a fault.

use std::collections::BTreeSet;

use idsnip_idml::ids::{is_always_retained_color, is_system, COLOR_BLACK, SWATCH_NONE};
use idsnip_idml::{ColorCatalog, FontCatalog, StyleCatalog, StyleGroup, StyleKind};

use crate::DependencySet;

/// Filter one style group tree in place, post-order
///
/// Sub-groups are filtered first, then this level's own style list. Returns
/// true iff the group survives: at least one style or one sub-group left
/// after recursion. A sub-group's removal can itself empty a higher group.
/// System built-in definitions are always retained.
pub fn filter_style_group(group: &mut StyleGroup, used: &BTreeSet<String>) -> bool {
    group.groups.retain_mut(|sub| filter_style_group(sub, used));
    group
        .styles
        .retain(|s| used.contains(&s.self_id) || is_system(&s.self_id));
    !group.styles.is_empty() || !group.groups.is_empty()
}

/// Filter all three style trees of a catalog against a dependency set
///
/// Root groups are structural and always kept, even when emptied.
pub fn filter_styles(catalog: &mut StyleCatalog, deps: &DependencySet) {
    for kind in [StyleKind::Character, StyleKind::Paragraph, StyleKind::Object] {
        let used = deps.styles(kind).clone();
        filter_style_group(catalog.root_mut(kind), &used);
    }
}

/// Filter colors, swatches, and color groups against a dependency set
///
/// `Swatch/None` and `Color/Black` are always retained, and retaining them
/// also marks them used for the color-group pass: a group entry referencing
/// only the always-retained pair still survives. System built-in entries
/// are retained like system styles are. Groups left with no members are
/// dropped.
pub fn filter_colors(catalog: &mut ColorCatalog, deps: &DependencySet) {
    let mut used: BTreeSet<&str> = deps
        .colors
        .iter()
        .chain(deps.swatches.iter())
        .map(String::as_str)
        .collect();
    used.insert(SWATCH_NONE);
    used.insert(COLOR_BLACK);

    let keep = |id: &str| used.contains(id) || is_always_retained_color(id) || is_system(id);

    catalog.colors.retain(|c| keep(&c.self_id));
    catalog.swatches.retain(|s| keep(&s.self_id));

    for group in &mut catalog.groups {
        group.members.retain(|m| keep(&m.swatch_item_ref));
    }
    catalog.groups.retain(|g| !g.members.is_empty());
}

/// Filter font families down to the referenced family names
pub fn filter_fonts(catalog: &mut FontCatalog, used_fonts: &BTreeSet<String>) {
    catalog.families.retain(|f| used_fonts.contains(&f.name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use idsnip_idml::colors::{ColorGroup, ColorGroupMember};
    use idsnip_idml::{ColorDefinition, StyleDefinition};

    fn style(id: &str) -> StyleDefinition {
        StyleDefinition::new(StyleKind::Character, id)
    }

    fn group(id: &str, styles: Vec<StyleDefinition>, groups: Vec<StyleGroup>) -> StyleGroup {
        StyleGroup {
            self_id: id.to_string(),
            name: id.to_string(),
            styles,
            groups,
        }
    }

    #[test]
    fn test_filter_keeps_used_styles() {
        let mut root = group(
            "root",
            vec![style("CharacterStyle/Bold"), style("CharacterStyle/Italic")],
            vec![],
        );
        let used = BTreeSet::from(["CharacterStyle/Bold".to_string()]);

        assert!(filter_style_group(&mut root, &used));
        assert_eq!(root.styles.len(), 1);
        assert_eq!(root.styles[0].self_id, "CharacterStyle/Bold");
    }

    #[test]
    fn test_group_survives_through_surviving_subgroup() {
        // Outer group has no styles of its own; its sub-group's sole style
        // is used, so the outer group survives.
        let inner = group("inner", vec![style("CharacterStyle/Bold")], vec![]);
        let mut outer = group("outer", vec![], vec![inner]);
        let used = BTreeSet::from(["CharacterStyle/Bold".to_string()]);

        assert!(filter_style_group(&mut outer, &used));
        assert_eq!(outer.groups.len(), 1);
    }

    #[test]
    fn test_empty_subgroup_removal_cascades() {
        let inner = group("inner", vec![style("CharacterStyle/Unused")], vec![]);
        let mut outer = group("outer", vec![], vec![inner]);
        let used = BTreeSet::new();

        assert!(!filter_style_group(&mut outer, &used));
        assert!(outer.groups.is_empty());
    }

    #[test]
    fn test_system_styles_always_retained() {
        let mut root = group(
            "root",
            vec![
                style("CharacterStyle/$ID/[No character style]"),
                style("CharacterStyle/Unused"),
            ],
            vec![],
        );
        let used = BTreeSet::new();

        filter_style_group(&mut root, &used);
        assert_eq!(root.styles.len(), 1);
        assert!(is_system(&root.styles[0].self_id));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let inner = group(
            "inner",
            vec![style("CharacterStyle/Bold"), style("CharacterStyle/Unused")],
            vec![],
        );
        let mut root = group("root", vec![style("CharacterStyle/Italic")], vec![inner]);
        let used = BTreeSet::from(["CharacterStyle/Bold".to_string()]);

        filter_style_group(&mut root, &used);
        let after_first = format!("{root:?}");
        filter_style_group(&mut root, &used);
        assert_eq!(format!("{root:?}"), after_first);
    }

    fn color_catalog() -> ColorCatalog {
        ColorCatalog {
            colors: vec![
                ColorDefinition::black("Color/Black"),
                ColorDefinition::black("Color/Red"),
                ColorDefinition::black("Color/Unused"),
            ],
            swatches: vec![ColorDefinition::black("Swatch/None")],
            groups: vec![
                ColorGroup {
                    self_id: "ColorGroup/Brand".to_string(),
                    name: "Brand".to_string(),
                    members: vec![
                        ColorGroupMember {
                            swatch_item_ref: "Color/Red".to_string(),
                        },
                        ColorGroupMember {
                            swatch_item_ref: "Color/Unused".to_string(),
                        },
                    ],
                },
                ColorGroup {
                    self_id: "ColorGroup/Defaults".to_string(),
                    name: "Defaults".to_string(),
                    members: vec![ColorGroupMember {
                        swatch_item_ref: "Color/Black".to_string(),
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_always_retained_pair_survives_empty_used_set() {
        let mut catalog = color_catalog();
        filter_colors(&mut catalog, &DependencySet::new());

        assert!(catalog.contains("Color/Black"));
        assert!(catalog.contains("Swatch/None"));
        assert!(!catalog.contains("Color/Red"));
    }

    #[test]
    fn test_color_group_members_follow_used_set() {
        let mut deps = DependencySet::new();
        deps.colors.insert("Color/Red".to_string());

        let mut catalog = color_catalog();
        filter_colors(&mut catalog, &deps);

        let brand = &catalog.groups[0];
        assert_eq!(brand.members.len(), 1);
        assert_eq!(brand.members[0].swatch_item_ref, "Color/Red");
    }

    #[test]
    fn test_group_of_always_included_color_survives() {
        // "Defaults" references only Color/Black, which is never in the
        // used set but always retained; the group must survive.
        let mut catalog = color_catalog();
        filter_colors(&mut catalog, &DependencySet::new());

        assert!(catalog.groups.iter().any(|g| g.name == "Defaults"));
        assert!(!catalog.groups.iter().any(|g| g.name == "Brand"));
    }

    #[test]
    fn test_system_colors_always_retained() {
        let mut catalog = color_catalog();
        catalog
            .colors
            .push(ColorDefinition::black("Color/$ID/Registration"));
        filter_colors(&mut catalog, &DependencySet::new());

        assert!(catalog.contains("Color/$ID/Registration"));
        assert!(!catalog.contains("Color/Unused"));
    }

    #[test]
    fn test_empty_catalog_is_a_noop() {
        let mut catalog = ColorCatalog::empty();
        filter_colors(&mut catalog, &DependencySet::new());
        assert!(catalog.colors.is_empty());
        assert!(catalog.groups.is_empty());
    }
}

//! Document-wide usage analysis
//!
//! Orphan detection (defined but unused), missing detection (referenced but
//! undefined), cleanup, default creation, and reference validation. All of
//! these start from the same whole-document pass: extract every reference,
//! close the style sets over inheritance, then pull colors out of the used
//! styles. Orphans and missing resources are disjoint by construction, and
//! for each kind the orphans plus the used-and-defined entries partition
//! the defined set.
//!
//! System built-in entries (`$ID/`) are never orphans and never reported
//! missing; the always-retained color pair is likewise exempt from cleanup.

use serde::Serialize;

use idsnip_idml::ids::{is_always_retained_color, is_no_reference, is_system};
use idsnip_idml::{
    ColorDefinition, FontFamily, Package, Spread, Story, StyleDefinition, StyleKind,
};

use crate::extract::{frame_refs, story_refs, style_colors};
use crate::filter::{filter_colors, filter_fonts, filter_style_group};
use crate::resolve::resolve_inheritance;
use crate::{DependencySet, ResourceKind};

/// Archive path reported for references inside style definitions
const STYLES_FILE: &str = "Resources/Styles.xml";

/// Compute the full usage set of a document
///
/// Every story contributes applied styles and fonts; every page item on
/// every spread contributes its object style, layer, and direct colors.
/// The style sets are then closed over inheritance and the used styles
/// contribute their color references.
pub fn document_usage(pkg: &Package) -> DependencySet {
    let mut deps = DependencySet::new();
    for story in pkg.all_stories() {
        story_refs(story, [], &mut deps);
    }
    for spread in pkg.all_spreads() {
        spread.visit_items(&mut |item| frame_refs(item, &mut deps));
    }
    resolve_inheritance(&mut deps, &pkg.styles);
    style_colors(&pkg.styles, &mut deps);
    deps
}

/// Defined-but-unused resources, one list per kind
///
/// Layers are not reported: the model does not parse a layer catalog, so
/// there is no defined set to diff against.
// TODO: report layer orphans once designmap layer entries are modeled
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrphanReport {
    /// Unused font family names
    pub fonts: Vec<String>,
    /// Unused paragraph style identifiers
    pub paragraph_styles: Vec<String>,
    /// Unused character style identifiers
    pub character_styles: Vec<String>,
    /// Unused object style identifiers
    pub object_styles: Vec<String>,
    /// Unused color identifiers
    pub colors: Vec<String>,
    /// Unused swatch identifiers
    pub swatches: Vec<String>,
}

impl OrphanReport {
    /// True if no orphans were found
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of orphans across all kinds
    pub fn len(&self) -> usize {
        self.fonts.len()
            + self.paragraph_styles.len()
            + self.character_styles.len()
            + self.object_styles.len()
            + self.colors.len()
            + self.swatches.len()
    }

    /// Every orphan as a (kind, identifier) pair, in report order
    pub fn entries(&self) -> Vec<(ResourceKind, &str)> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.fonts.iter().map(|s| (ResourceKind::Font, s.as_str())));
        out.extend(
            self.paragraph_styles
                .iter()
                .map(|s| (ResourceKind::ParagraphStyle, s.as_str())),
        );
        out.extend(
            self.character_styles
                .iter()
                .map(|s| (ResourceKind::CharacterStyle, s.as_str())),
        );
        out.extend(
            self.object_styles
                .iter()
                .map(|s| (ResourceKind::ObjectStyle, s.as_str())),
        );
        out.extend(self.colors.iter().map(|s| (ResourceKind::Color, s.as_str())));
        out.extend(
            self.swatches
                .iter()
                .map(|s| (ResourceKind::Swatch, s.as_str())),
        );
        out
    }
}

/// A place in the package where a reference occurs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageLocation {
    /// Archive path of the referencing part
    pub file: String,
    /// Human-readable context within the part
    pub context: String,
}

/// One referenced-but-undefined resource and where it is referenced
#[derive(Debug, Clone, Serialize)]
pub struct MissingResource {
    /// Resource kind
    pub kind: ResourceKind,
    /// Referenced identifier
    pub id: String,
    /// Every place the reference occurs
    pub locations: Vec<UsageLocation>,
}

/// All referenced-but-undefined resources of a document
#[derive(Debug, Clone, Default, Serialize)]
pub struct MissingReport {
    /// Missing resources, ordered by kind then identifier
    pub missing: Vec<MissingResource>,
}

impl MissingReport {
    /// True if nothing is missing
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    /// Number of missing resources
    pub fn len(&self) -> usize {
        self.missing.len()
    }
}

/// Which resource kinds a cleanup pass removes
///
/// Defaults to all kinds with `dry_run` set, so a plain
/// `cleanup_orphans(&mut pkg, &CleanupOptions::default())` only reports.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupOptions {
    /// Remove orphaned paragraph style definitions
    pub paragraph_styles: bool,
    /// Remove orphaned character style definitions
    pub character_styles: bool,
    /// Remove orphaned object style definitions
    pub object_styles: bool,
    /// Remove orphaned colors, swatches, and emptied color groups
    pub colors: bool,
    /// Remove orphaned font families
    pub fonts: bool,
    /// Report removals without mutating the package
    pub dry_run: bool,
}

impl CleanupOptions {
    fn style_kind_enabled(&self, kind: StyleKind) -> bool {
        match kind {
            StyleKind::Paragraph => self.paragraph_styles,
            StyleKind::Character => self.character_styles,
            StyleKind::Object => self.object_styles,
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            paragraph_styles: true,
            character_styles: true,
            object_styles: true,
            colors: true,
            fonts: true,
            dry_run: true,
        }
    }
}

/// One resource removed (or slated for removal) by cleanup
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResource {
    /// Resource kind
    pub kind: ResourceKind,
    /// Removed identifier
    pub id: String,
    /// Display name of the removed definition
    pub name: String,
}

/// Outcome of a cleanup pass
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResult {
    /// Removed resources, or would-be removals under `dry_run`
    pub removed: Vec<RemovedResource>,
    /// Whether the package was left untouched
    pub dry_run: bool,
}

/// A dangling internal link found by validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Archive path of the part carrying the dangling reference
    pub file: String,
    /// What is dangling and where it points
    pub message: String,
}

/// Find every defined-but-unused resource
///
/// System built-ins and the always-retained color pair are never orphans.
/// Scans all kinds; [`find_orphans_with`] narrows the scan.
pub fn find_orphans(pkg: &Package) -> OrphanReport {
    find_orphans_with(pkg, &CleanupOptions::default())
}

/// Find defined-but-unused resources of the kinds enabled in `options`
///
/// Only the kind flags are read; `dry_run` has no effect here.
pub fn find_orphans_with(pkg: &Package, options: &CleanupOptions) -> OrphanReport {
    let usage = document_usage(pkg);
    let mut report = OrphanReport::default();

    for (kind, bucket) in [
        (StyleKind::Paragraph, &mut report.paragraph_styles),
        (StyleKind::Character, &mut report.character_styles),
        (StyleKind::Object, &mut report.object_styles),
    ] {
        if !options.style_kind_enabled(kind) {
            continue;
        }
        for def in pkg.styles.styles(kind) {
            if !is_system(&def.self_id) && !usage.styles(kind).contains(&def.self_id) {
                bucket.push(def.self_id.clone());
            }
        }
    }

    if options.colors {
        for color in &pkg.colors.colors {
            if !is_system(&color.self_id)
                && !is_always_retained_color(&color.self_id)
                && !usage.colors.contains(&color.self_id)
            {
                report.colors.push(color.self_id.clone());
            }
        }
        for swatch in &pkg.colors.swatches {
            if !is_system(&swatch.self_id)
                && !is_always_retained_color(&swatch.self_id)
                && !usage.swatches.contains(&swatch.self_id)
            {
                report.swatches.push(swatch.self_id.clone());
            }
        }
    }

    if options.fonts {
        for family in &pkg.fonts.families {
            if !usage.fonts.contains(&family.name) {
                report.fonts.push(family.name.clone());
            }
        }
    }

    report
}

/// Find every referenced-but-undefined resource, with usage locations
///
/// Layers are referenced by page items but have no parsed catalog, so they
/// are not checked.
pub fn find_missing(pkg: &Package) -> MissingReport {
    let usage = document_usage(pkg);
    let mut report = MissingReport::default();

    for (kind, bucket) in [
        (StyleKind::Paragraph, &usage.paragraph_styles),
        (StyleKind::Character, &usage.character_styles),
        (StyleKind::Object, &usage.object_styles),
    ] {
        for id in bucket {
            if is_system(id) || pkg.styles.find(kind, id).is_some() {
                continue;
            }
            report.missing.push(MissingResource {
                kind: kind.into(),
                id: id.clone(),
                locations: locate(pkg, id),
            });
        }
    }

    for (kind, bucket) in [
        (ResourceKind::Color, &usage.colors),
        (ResourceKind::Swatch, &usage.swatches),
    ] {
        for id in bucket {
            if is_system(id) || pkg.colors.contains(id) {
                continue;
            }
            report.missing.push(MissingResource {
                kind,
                id: id.clone(),
                locations: locate(pkg, id),
            });
        }
    }

    for name in &usage.fonts {
        if !pkg.fonts.contains(name) {
            report.missing.push(MissingResource {
                kind: ResourceKind::Font,
                id: name.clone(),
                locations: locate(pkg, name),
            });
        }
    }

    report
}

/// Collect every location in the package where `id` is referenced
fn locate(pkg: &Package, id: &str) -> Vec<UsageLocation> {
    let mut locations = Vec::new();

    for story in pkg.all_stories() {
        if story_references(story, id) {
            locations.push(UsageLocation {
                file: Story::path(&story.self_id),
                context: format!("story {}", story.self_id),
            });
        }
    }

    for spread in pkg.all_spreads() {
        spread.visit_items(&mut |item| {
            let common = item.common();
            let (fill, stroke) = item.direct_colors();
            let hit = common.applied_object_style.as_deref() == Some(id)
                || common.layer.as_deref() == Some(id)
                || fill == Some(id)
                || stroke == Some(id);
            if hit {
                locations.push(UsageLocation {
                    file: Spread::path(&spread.self_id),
                    context: format!("{} {}", item.kind_name(), item.self_id()),
                });
            }
        });
    }

    for kind in [StyleKind::Character, StyleKind::Paragraph, StyleKind::Object] {
        for style in pkg.styles.styles(kind) {
            let hit = style.fill_color.as_deref() == Some(id)
                || style.stroke_color.as_deref() == Some(id)
                || style.based_on.as_deref() == Some(id)
                || style.next_style.as_deref() == Some(id)
                || style.raw_properties.contains(&format!("\"{id}\""));
            if hit {
                locations.push(UsageLocation {
                    file: STYLES_FILE.to_string(),
                    context: format!("style {}", style.self_id),
                });
            }
        }
    }

    if locations.is_empty() {
        locations.push(UsageLocation {
            file: "(document)".to_string(),
            context: "(used in document)".to_string(),
        });
    }
    locations
}

fn story_references(story: &Story, id: &str) -> bool {
    story.paragraphs.iter().any(|p| {
        p.applied_style == id
            || p.ranges
                .iter()
                .any(|r| r.applied_style == id || r.applied_font.as_deref() == Some(id))
    })
}

/// Remove orphaned definitions according to `options`
///
/// Under `dry_run` the package is not touched and the result lists what a
/// real pass would remove. A second real pass over the same package removes
/// nothing.
pub fn cleanup_orphans(pkg: &mut Package, options: &CleanupOptions) -> CleanupResult {
    let usage = document_usage(pkg);
    let orphans = find_orphans_with(pkg, options);
    let mut removed = Vec::new();

    for (kind, ids) in [
        (StyleKind::Paragraph, &orphans.paragraph_styles),
        (StyleKind::Character, &orphans.character_styles),
        (StyleKind::Object, &orphans.object_styles),
    ] {
        for id in ids {
            let name = pkg
                .styles
                .find(kind, id)
                .map(|d| d.name.clone())
                .unwrap_or_default();
            removed.push(RemovedResource {
                kind: kind.into(),
                id: id.clone(),
                name,
            });
        }
    }
    if options.colors {
        for (kind, ids) in [
            (ResourceKind::Color, &orphans.colors),
            (ResourceKind::Swatch, &orphans.swatches),
        ] {
            for id in ids {
                let name = pkg
                    .colors
                    .find(id)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                removed.push(RemovedResource {
                    kind,
                    id: id.clone(),
                    name,
                });
            }
        }
    }
    if options.fonts {
        for name in &orphans.fonts {
            removed.push(RemovedResource {
                kind: ResourceKind::Font,
                id: name.clone(),
                name: name.clone(),
            });
        }
    }

    if !options.dry_run {
        for kind in [StyleKind::Paragraph, StyleKind::Character, StyleKind::Object] {
            if options.style_kind_enabled(kind) {
                let used = usage.styles(kind).clone();
                filter_style_group(pkg.styles.root_mut(kind), &used);
            }
        }
        if options.colors {
            filter_colors(&mut pkg.colors, &usage);
        }
        if options.fonts {
            filter_fonts(&mut pkg.fonts, &usage.fonts);
        }
    }

    CleanupResult {
        removed,
        dry_run: options.dry_run,
    }
}

/// Create default definitions for every missing resource, in place
///
/// Missing styles get an empty-bodied definition, missing colors and
/// swatches a process black, missing fonts a single-face placeholder
/// family. Returns the report the defaults were created from; a subsequent
/// [`find_missing`] on the same package reports nothing.
pub fn create_missing_defaults(pkg: &mut Package) -> MissingReport {
    let report = find_missing(pkg);

    for missing in &report.missing {
        match missing.kind {
            ResourceKind::ParagraphStyle => {
                pkg.styles
                    .insert(StyleDefinition::new(StyleKind::Paragraph, &missing.id));
            }
            ResourceKind::CharacterStyle => {
                pkg.styles
                    .insert(StyleDefinition::new(StyleKind::Character, &missing.id));
            }
            ResourceKind::ObjectStyle => {
                pkg.styles
                    .insert(StyleDefinition::new(StyleKind::Object, &missing.id));
            }
            ResourceKind::Color => {
                pkg.colors.colors.push(ColorDefinition::black(&missing.id));
            }
            ResourceKind::Swatch => {
                pkg.colors.swatches.push(ColorDefinition::black(&missing.id));
            }
            ResourceKind::Font => {
                pkg.fonts.families.push(FontFamily::regular(&missing.id));
            }
            ResourceKind::Layer => {}
        }
    }

    report
}

/// Check every internal link of the package for dangling targets
///
/// Covers style inheritance links, color group members, text frame story
/// references, and designmap part sources. Sentinel "no reference" values
/// are never issues.
pub fn validate_references(pkg: &Package) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for kind in [StyleKind::Character, StyleKind::Paragraph, StyleKind::Object] {
        for style in pkg.styles.styles(kind) {
            for (link, target) in [
                ("BasedOn", &style.based_on),
                ("NextStyle", &style.next_style),
            ] {
                if let Some(target) = target {
                    if !is_no_reference(target) && pkg.styles.find(kind, target).is_none() {
                        issues.push(ValidationIssue {
                            file: STYLES_FILE.to_string(),
                            message: format!(
                                "style {} has dangling {link} reference {target}",
                                style.self_id
                            ),
                        });
                    }
                }
            }
        }
    }

    for group in &pkg.colors.groups {
        for member in &group.members {
            if !pkg.colors.contains(&member.swatch_item_ref) {
                issues.push(ValidationIssue {
                    file: "Resources/Graphic.xml".to_string(),
                    message: format!(
                        "color group {} references undefined {}",
                        group.self_id, member.swatch_item_ref
                    ),
                });
            }
        }
    }

    for spread in pkg.all_spreads() {
        spread.visit_items(&mut |item| {
            if let Some(story) = item.parent_story() {
                if pkg.story(story).is_none() {
                    issues.push(ValidationIssue {
                        file: Spread::path(&spread.self_id),
                        message: format!(
                            "text frame {} references absent story {story}",
                            item.self_id()
                        ),
                    });
                }
            }
        });
    }

    for src in pkg
        .design_map
        .story_srcs()
        .chain(pkg.design_map.spread_srcs())
    {
        if !pkg.archive().contains(src) {
            issues.push(ValidationIssue {
                file: "designmap.xml".to_string(),
                message: format!("designmap references absent file {src}"),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use idsnip_idml::colors::{ColorGroup, ColorGroupMember};
    use idsnip_idml::story::{CharacterRange, ParagraphRange};
    use idsnip_idml::{ItemCommon, PageItem};
    use std::collections::BTreeSet;

    fn sample_package() -> Package {
        let mut pkg = Package::empty("d");

        let mut story = Story::new("u100");
        story.paragraphs.push(ParagraphRange {
            applied_style: "ParagraphStyle/Heading".to_string(),
            ranges: vec![CharacterRange {
                applied_style: "CharacterStyle/Bold".to_string(),
                applied_font: Some("Minion Pro".to_string()),
                content: "title".to_string(),
            }],
        });
        pkg.stories.insert(story.self_id.clone(), story);

        let mut spread = Spread::new("u300");
        spread.items.push(PageItem::TextFrame {
            common: ItemCommon {
                self_id: "u301".to_string(),
                layer: Some("ub6".to_string()),
                applied_object_style: Some("ObjectStyle/$ID/[None]".to_string()),
                item_transform: None,
            },
            parent_story: Some("u100".to_string()),
        });
        pkg.spreads.insert(spread.self_id.clone(), spread);

        let mut heading = StyleDefinition::new(StyleKind::Paragraph, "ParagraphStyle/Heading");
        heading.based_on = Some("ParagraphStyle/Base".to_string());
        heading.fill_color = Some("Color/Accent".to_string());
        pkg.styles.insert(heading);
        let mut base = StyleDefinition::new(StyleKind::Paragraph, "ParagraphStyle/Base");
        base.fill_color = Some("Color/BaseTint".to_string());
        pkg.styles.insert(base);
        pkg.styles.insert(StyleDefinition::new(
            StyleKind::Paragraph,
            "ParagraphStyle/Unused",
        ));
        pkg.styles
            .insert(StyleDefinition::new(StyleKind::Character, "CharacterStyle/Bold"));

        pkg.colors.colors.push(ColorDefinition::black("Color/Black"));
        pkg.colors.colors.push(ColorDefinition::black("Color/Accent"));
        pkg.colors
            .colors
            .push(ColorDefinition::black("Color/BaseTint"));
        pkg.colors.colors.push(ColorDefinition::black("Color/Unused"));
        pkg.colors.swatches.push(ColorDefinition::black("Swatch/None"));

        pkg.fonts.families.push(FontFamily::regular("Minion Pro"));
        pkg.fonts.families.push(FontFamily::regular("Courier New"));

        pkg
    }

    #[test]
    fn test_document_usage_closes_inheritance() {
        let pkg = sample_package();
        let usage = document_usage(&pkg);

        assert!(usage.paragraph_styles.contains("ParagraphStyle/Heading"));
        assert!(
            usage.paragraph_styles.contains("ParagraphStyle/Base"),
            "BasedOn ancestor is used"
        );
        assert!(
            usage.colors.contains("Color/BaseTint"),
            "colors of inherited styles are used"
        );
        assert!(usage.layers.contains("ub6"));
    }

    #[test]
    fn test_find_orphans() {
        let pkg = sample_package();
        let orphans = find_orphans(&pkg);

        assert_eq!(orphans.paragraph_styles, vec!["ParagraphStyle/Unused"]);
        assert_eq!(orphans.colors, vec!["Color/Unused"]);
        assert_eq!(orphans.fonts, vec!["Courier New"]);
        assert!(orphans.character_styles.is_empty());
        assert!(orphans.swatches.is_empty(), "Swatch/None is always retained");
    }

    #[test]
    fn test_style_fill_color_is_not_an_orphan() {
        // Color/Accent is referenced only through a used paragraph style
        let pkg = sample_package();
        let orphans = find_orphans(&pkg);
        assert!(!orphans.colors.contains(&"Color/Accent".to_string()));
        assert!(!orphans.colors.contains(&"Color/BaseTint".to_string()));
    }

    #[test]
    fn test_orphans_and_used_partition_defined() {
        let pkg = sample_package();
        let usage = document_usage(&pkg);
        let orphans = find_orphans(&pkg);

        let defined: BTreeSet<&str> = pkg
            .styles
            .styles(StyleKind::Paragraph)
            .iter()
            .map(|d| d.self_id.as_str())
            .collect();
        let orphaned: BTreeSet<&str> =
            orphans.paragraph_styles.iter().map(String::as_str).collect();

        for id in &defined {
            let used = usage.paragraph_styles.contains(*id);
            assert_ne!(used, orphaned.contains(id), "{id} must be exactly one");
        }
    }

    #[test]
    fn test_find_missing_with_locations() {
        let mut pkg = sample_package();
        // Drop the Bold definition; the story still applies it
        pkg.styles.character_styles.styles.clear();
        let report = find_missing(&pkg);

        let bold = report
            .missing
            .iter()
            .find(|m| m.id == "CharacterStyle/Bold")
            .expect("Bold is missing");
        assert_eq!(bold.kind, ResourceKind::CharacterStyle);
        assert_eq!(bold.locations[0].file, "Stories/Story_u100.xml");
        assert_eq!(bold.locations[0].context, "story u100");
    }

    #[test]
    fn test_orphans_and_missing_are_disjoint() {
        let mut pkg = sample_package();
        pkg.styles.character_styles.styles.clear();
        let orphan_ids: BTreeSet<(ResourceKind, String)> = find_orphans(&pkg)
            .entries()
            .into_iter()
            .map(|(k, id)| (k, id.to_string()))
            .collect();
        for missing in find_missing(&pkg).missing {
            assert!(!orphan_ids.contains(&(missing.kind, missing.id.clone())));
        }
    }

    #[test]
    fn test_cleanup_dry_run_leaves_package_untouched() {
        let mut pkg = sample_package();
        let before = pkg.styles.styles(StyleKind::Paragraph).len();
        let result = cleanup_orphans(&mut pkg, &CleanupOptions::default());

        assert!(result.dry_run);
        assert!(result.removed.iter().any(|r| r.id == "ParagraphStyle/Unused"));
        assert_eq!(pkg.styles.styles(StyleKind::Paragraph).len(), before);
    }

    #[test]
    fn test_cleanup_removes_and_is_idempotent() {
        let mut pkg = sample_package();
        let options = CleanupOptions {
            dry_run: false,
            ..CleanupOptions::default()
        };

        let first = cleanup_orphans(&mut pkg, &options);
        assert!(!first.removed.is_empty());
        assert!(pkg
            .styles
            .find(StyleKind::Paragraph, "ParagraphStyle/Unused")
            .is_none());
        assert!(!pkg.colors.contains("Color/Unused"));
        assert!(pkg.colors.contains("Color/Black"), "always retained");
        assert!(!pkg.fonts.contains("Courier New"));

        let second = cleanup_orphans(&mut pkg, &options);
        assert!(second.removed.is_empty(), "second pass removes nothing");
    }

    #[test]
    fn test_cleanup_never_removes_system_colors() {
        // A system built-in color is neither reported nor deleted, even
        // when nothing references it
        let mut pkg = sample_package();
        pkg.colors
            .colors
            .push(ColorDefinition::black("Color/$ID/Registration"));
        let options = CleanupOptions {
            dry_run: false,
            ..CleanupOptions::default()
        };

        let result = cleanup_orphans(&mut pkg, &options);
        assert!(!result
            .removed
            .iter()
            .any(|r| r.id == "Color/$ID/Registration"));
        assert!(
            pkg.colors.contains("Color/$ID/Registration"),
            "system color survives destructive cleanup"
        );
        assert!(!pkg.colors.contains("Color/Unused"));
    }

    #[test]
    fn test_find_orphans_with_kind_selection() {
        let pkg = sample_package();
        let options = CleanupOptions {
            colors: false,
            fonts: false,
            ..CleanupOptions::default()
        };
        let orphans = find_orphans_with(&pkg, &options);

        assert_eq!(orphans.paragraph_styles, vec!["ParagraphStyle/Unused"]);
        assert!(orphans.colors.is_empty());
        assert!(orphans.fonts.is_empty());
    }

    #[test]
    fn test_locate_falls_back_to_generic_location() {
        let pkg = sample_package();
        let locations = locate(&pkg, "Color/Ghost");

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].file, "(document)");
        assert_eq!(locations[0].context, "(used in document)");
    }

    #[test]
    fn test_cleanup_respects_kind_selection() {
        let mut pkg = sample_package();
        let options = CleanupOptions {
            paragraph_styles: false,
            dry_run: false,
            ..CleanupOptions::default()
        };
        cleanup_orphans(&mut pkg, &options);

        assert!(pkg
            .styles
            .find(StyleKind::Paragraph, "ParagraphStyle/Unused")
            .is_some());
        assert!(!pkg.colors.contains("Color/Unused"));
    }

    #[test]
    fn test_create_missing_defaults_resolves_everything() {
        let mut pkg = sample_package();
        pkg.styles.character_styles.styles.clear();
        pkg.fonts.families.clear();

        let report = create_missing_defaults(&mut pkg);
        assert!(!report.is_empty());
        assert!(pkg
            .styles
            .find(StyleKind::Character, "CharacterStyle/Bold")
            .is_some());
        assert!(pkg.fonts.contains("Minion Pro"));
        assert!(find_missing(&pkg).is_empty());
    }

    #[test]
    fn test_validate_dangling_based_on() {
        let mut pkg = sample_package();
        pkg.styles
            .paragraph_styles
            .styles
            .retain(|s| s.self_id != "ParagraphStyle/Base");

        let issues = validate_references(&pkg);
        assert!(issues
            .iter()
            .any(|i| i.file == STYLES_FILE && i.message.contains("ParagraphStyle/Base")));
    }

    #[test]
    fn test_validate_absent_story_and_group_member() {
        let mut pkg = sample_package();
        pkg.stories.clear();
        pkg.colors.groups.push(ColorGroup {
            self_id: "ColorGroup/Brand".to_string(),
            name: "Brand".to_string(),
            members: vec![ColorGroupMember {
                swatch_item_ref: "Color/Ghost".to_string(),
            }],
        });

        let issues = validate_references(&pkg);
        assert!(issues.iter().any(|i| i.message.contains("absent story u100")));
        assert!(issues.iter().any(|i| i.message.contains("Color/Ghost")));
    }

    #[test]
    fn test_reports_serialize_to_json() {
        let pkg = sample_package();

        let orphans = serde_json::to_value(find_orphans(&pkg)).unwrap();
        assert_eq!(orphans["paragraph_styles"][0], "ParagraphStyle/Unused");

        let mut broken = pkg.clone();
        broken.styles.character_styles.styles.clear();
        let missing = serde_json::to_string(&find_missing(&broken)).unwrap();
        assert!(missing.contains("\"kind\":\"character-style\""));
        assert!(missing.contains("\"locations\""));
    }

    #[test]
    fn test_validate_clean_package_has_no_issues() {
        let pkg = sample_package();
        assert!(validate_references(&pkg).is_empty());
    }
}

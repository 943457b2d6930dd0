//! XML emission for package parts
//!
//! Serializes the typed model back to the package's XML dialect. Output is
//! deterministic: parts are emitted in model order with stable formatting,
//! so a re-written package diffs cleanly against its source.

use crate::colors::ColorCatalog;
use crate::designmap::IDPKG_NAMESPACE;
use crate::fonts::FontCatalog;
use crate::spread::{PageItem, Spread};
use crate::story::Story;
use crate::styles::{StyleCatalog, StyleGroup, StyleKind};
use crate::xml::escape_xml;

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

fn part_open(name: &str) -> String {
    format!("{XML_DECL}<idPkg:{name} xmlns:idPkg=\"{IDPKG_NAMESPACE}\" DOMVersion=\"8.0\">\n")
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!(" {}=\"{}\"", name, escape_xml(value)));
}

fn push_opt_attr(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        push_attr(out, name, value);
    }
}

/// Serialize a story to Stories/Story_*.xml content
pub fn story_xml(story: &Story) -> String {
    let mut out = part_open("Story");
    out.push_str(&format!("  <Story Self=\"{}\">\n", escape_xml(&story.self_id)));

    for para in &story.paragraphs {
        out.push_str(&format!(
            "    <ParagraphStyleRange AppliedParagraphStyle=\"{}\">\n",
            escape_xml(&para.applied_style)
        ));
        for range in &para.ranges {
            out.push_str("      <CharacterStyleRange");
            push_attr(&mut out, "AppliedCharacterStyle", &range.applied_style);
            push_opt_attr(&mut out, "AppliedFont", range.applied_font.as_deref());
            out.push_str(">\n");
            for (i, line) in range.content.split('\n').enumerate() {
                if i > 0 {
                    out.push_str("        <Br/>\n");
                }
                out.push_str(&format!(
                    "        <Content>{}</Content>\n",
                    escape_xml(line)
                ));
            }
            out.push_str("      </CharacterStyleRange>\n");
        }
        out.push_str("    </ParagraphStyleRange>\n");
    }

    out.push_str("  </Story>\n</idPkg:Story>\n");
    out
}

/// Serialize a spread to Spreads/Spread_*.xml content
pub fn spread_xml(spread: &Spread) -> String {
    let mut out = part_open("Spread");
    out.push_str(&format!(
        "  <Spread Self=\"{}\">\n",
        escape_xml(&spread.self_id)
    ));
    for item in &spread.items {
        emit_item(&mut out, item, 2);
    }
    out.push_str("  </Spread>\n</idPkg:Spread>\n");
    out
}

fn emit_item(out: &mut String, item: &PageItem, depth: usize) {
    let indent = "  ".repeat(depth);
    let common = item.common();
    out.push_str(&format!("{indent}<{}", item.kind_name()));
    push_attr(out, "Self", &common.self_id);
    push_opt_attr(out, "ParentStory", item.parent_story());
    push_opt_attr(
        out,
        "AppliedObjectStyle",
        common.applied_object_style.as_deref(),
    );
    let (fill, stroke) = item.direct_colors();
    push_opt_attr(out, "FillColor", fill);
    push_opt_attr(out, "StrokeColor", stroke);
    push_opt_attr(out, "ItemLayer", common.layer.as_deref());
    push_opt_attr(out, "ItemTransform", common.item_transform.as_deref());

    if let PageItem::Group { children, .. } = item {
        out.push_str(">\n");
        for child in children {
            emit_item(out, child, depth + 1);
        }
        out.push_str(&format!("{indent}</Group>\n"));
    } else {
        out.push_str("/>\n");
    }
}

/// Serialize a style catalog to Resources/Styles.xml content
pub fn styles_xml(catalog: &StyleCatalog) -> String {
    let mut out = part_open("Styles");
    for kind in [StyleKind::Character, StyleKind::Paragraph, StyleKind::Object] {
        emit_group(&mut out, catalog.root(kind), kind, kind.root_element_name(), 1);
    }
    out.push_str("</idPkg:Styles>\n");
    out
}

fn emit_group(out: &mut String, group: &StyleGroup, kind: StyleKind, element: &str, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}<{element}"));
    push_attr(out, "Self", &group.self_id);
    if !group.name.is_empty() {
        push_attr(out, "Name", &group.name);
    }
    out.push_str(">\n");

    for style in &group.styles {
        out.push_str(&format!("{indent}  <{}", kind.element_name()));
        push_attr(out, "Self", &style.self_id);
        push_attr(out, "Name", &style.name);
        push_opt_attr(out, "BasedOn", style.based_on.as_deref());
        push_opt_attr(out, "NextStyle", style.next_style.as_deref());
        push_opt_attr(out, "FillColor", style.fill_color.as_deref());
        push_opt_attr(out, "StrokeColor", style.stroke_color.as_deref());
        if style.raw_properties.is_empty() {
            out.push_str("/>\n");
        } else {
            // raw_properties is verbatim XML captured at parse time
            out.push_str(&format!(
                ">\n{indent}    <Properties>{}</Properties>\n{indent}  </{}>\n",
                style.raw_properties,
                kind.element_name()
            ));
        }
    }

    for sub in &group.groups {
        emit_group(out, sub, kind, kind.group_element_name(), depth + 1);
    }

    out.push_str(&format!("{indent}</{element}>\n"));
}

/// Serialize a color catalog to Resources/Graphic.xml content
pub fn graphic_xml(catalog: &ColorCatalog) -> String {
    let mut out = part_open("Graphic");

    for color in &catalog.colors {
        out.push_str("  <Color");
        push_attr(&mut out, "Self", &color.self_id);
        push_attr(&mut out, "Name", &color.name);
        push_attr(&mut out, "Model", color.model.as_str());
        push_attr(&mut out, "Space", color.space.as_str());
        push_attr(&mut out, "ColorValue", &color.color_value);
        out.push_str("/>\n");
    }

    for swatch in &catalog.swatches {
        out.push_str("  <Swatch");
        push_attr(&mut out, "Self", &swatch.self_id);
        push_attr(&mut out, "Name", &swatch.name);
        if !swatch.color_value.is_empty() {
            push_attr(&mut out, "ColorValue", &swatch.color_value);
        }
        out.push_str("/>\n");
    }

    for group in &catalog.groups {
        out.push_str("  <ColorGroup");
        push_attr(&mut out, "Self", &group.self_id);
        push_attr(&mut out, "Name", &group.name);
        out.push_str(">\n");
        for (i, member) in group.members.iter().enumerate() {
            out.push_str("    <ColorGroupSwatch");
            push_attr(&mut out, "Self", &format!("{}cgs{}", group.self_id, i));
            push_attr(&mut out, "SwatchItemRef", &member.swatch_item_ref);
            out.push_str("/>\n");
        }
        out.push_str("  </ColorGroup>\n");
    }

    out.push_str("</idPkg:Graphic>\n");
    out
}

/// Serialize a font catalog to Resources/Fonts.xml content
pub fn fonts_xml(catalog: &FontCatalog) -> String {
    let mut out = part_open("Fonts");
    for family in &catalog.families {
        out.push_str("  <FontFamily");
        push_attr(&mut out, "Self", &family.self_id);
        push_attr(&mut out, "Name", &family.name);
        if family.faces.is_empty() {
            out.push_str("/>\n");
            continue;
        }
        out.push_str(">\n");
        for face in &family.faces {
            out.push_str("    <Font");
            push_attr(&mut out, "Self", &face.self_id);
            push_attr(&mut out, "Name", &face.name);
            push_attr(&mut out, "FontStyleName", &face.style_name);
            out.push_str("/>\n");
        }
        out.push_str("  </FontFamily>\n");
    }
    out.push_str("</idPkg:Fonts>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::ColorDefinition;
    use crate::spread::ItemCommon;
    use crate::story::{CharacterRange, ParagraphRange};
    use crate::styles::StyleDefinition;

    #[test]
    fn test_story_roundtrip() {
        let mut story = Story::new("u100");
        story.paragraphs.push(ParagraphRange {
            applied_style: "ParagraphStyle/Body".to_string(),
            ranges: vec![CharacterRange {
                applied_style: "CharacterStyle/Bold".to_string(),
                applied_font: Some("Minion Pro".to_string()),
                content: "line one\nline two".to_string(),
            }],
        });

        let xml = story_xml(&story);
        let restored = Story::parse(xml.as_bytes()).unwrap();
        assert_eq!(restored.self_id, "u100");
        assert_eq!(restored.paragraphs.len(), 1);
        assert_eq!(
            restored.paragraphs[0].ranges[0].content,
            "line one\nline two"
        );
        assert_eq!(
            restored.paragraphs[0].ranges[0].applied_font.as_deref(),
            Some("Minion Pro")
        );
    }

    #[test]
    fn test_spread_roundtrip_with_group() {
        let mut spread = Spread::new("u300");
        spread.items.push(PageItem::Group {
            common: ItemCommon {
                self_id: "u304".to_string(),
                layer: Some("ub6".to_string()),
                ..Default::default()
            },
            children: vec![PageItem::Oval {
                common: ItemCommon {
                    self_id: "u305".to_string(),
                    ..Default::default()
                },
                fill_color: Some("Color/Red".to_string()),
                stroke_color: None,
            }],
        });

        let xml = spread_xml(&spread);
        let restored = Spread::parse(xml.as_bytes()).unwrap();
        assert_eq!(restored.items.len(), 1);
        assert_eq!(restored.items[0].children().len(), 1);
        assert_eq!(
            restored.items[0].children()[0].direct_colors().0,
            Some("Color/Red")
        );
    }

    #[test]
    fn test_styles_roundtrip_preserves_raw_properties() {
        let mut catalog = StyleCatalog::empty();
        catalog.character_styles.self_id = "u73".to_string();
        catalog.paragraph_styles.self_id = "u74".to_string();
        catalog.object_styles.self_id = "u75".to_string();

        let mut heading = StyleDefinition::new(StyleKind::Paragraph, "ParagraphStyle/Heading");
        heading.based_on = Some("ParagraphStyle/Body".to_string());
        heading.raw_properties =
            r#"<ParagraphRuleAbove RuleAboveColor="Color/Accent"/>"#.to_string();
        catalog.insert(heading);

        let xml = styles_xml(&catalog);
        let restored = StyleCatalog::parse(xml.as_bytes()).unwrap();
        let heading = restored
            .find(StyleKind::Paragraph, "ParagraphStyle/Heading")
            .unwrap();
        assert_eq!(heading.based_on.as_deref(), Some("ParagraphStyle/Body"));
        assert!(heading.raw_properties.contains("RuleAboveColor=\"Color/Accent\""));
    }

    #[test]
    fn test_graphic_roundtrip() {
        let catalog = ColorCatalog {
            colors: vec![ColorDefinition::black("Color/Black")],
            swatches: vec![ColorDefinition::black("Swatch/None")],
            groups: vec![],
        };

        let xml = graphic_xml(&catalog);
        let restored = ColorCatalog::parse(xml.as_bytes()).unwrap();
        assert!(restored.contains("Color/Black"));
        assert!(restored.contains("Swatch/None"));
    }
}

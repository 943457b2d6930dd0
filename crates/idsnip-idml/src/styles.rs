//! Style definitions parsing (Resources/Styles.xml)
//!
//! A style file holds three parallel trees: character, paragraph, and object
//! styles, each rooted in a `Root*StyleGroup` element that contains style
//! definitions plus nested `*StyleGroup` sub-groups of the same kind.
//!
//! Styles inherit through `BasedOn` links; paragraph styles additionally
//! carry a `NextStyle` link. Attributes the model does not map explicitly
//! (paragraph rule colors, object style fill settings) are kept verbatim in
//! [`StyleDefinition::raw_properties`] so downstream consumers can scan them.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{IdmlError, Result};
use crate::xml::get_attr;

/// The three style kinds in a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// Character (run) style
    Character,
    /// Paragraph style
    Paragraph,
    /// Object (frame) style
    Object,
}

impl StyleKind {
    /// Element name of a definition of this kind
    pub fn element_name(self) -> &'static str {
        match self {
            StyleKind::Character => "CharacterStyle",
            StyleKind::Paragraph => "ParagraphStyle",
            StyleKind::Object => "ObjectStyle",
        }
    }

    /// Element name of a group of this kind
    pub fn group_element_name(self) -> &'static str {
        match self {
            StyleKind::Character => "CharacterStyleGroup",
            StyleKind::Paragraph => "ParagraphStyleGroup",
            StyleKind::Object => "ObjectStyleGroup",
        }
    }

    /// Element name of the root group of this kind
    pub fn root_element_name(self) -> &'static str {
        match self {
            StyleKind::Character => "RootCharacterStyleGroup",
            StyleKind::Paragraph => "RootParagraphStyleGroup",
            StyleKind::Object => "RootObjectStyleGroup",
        }
    }

    /// Identifier prefix for definitions of this kind
    pub fn id_prefix(self) -> &'static str {
        match self {
            StyleKind::Character => "CharacterStyle/",
            StyleKind::Paragraph => "ParagraphStyle/",
            StyleKind::Object => "ObjectStyle/",
        }
    }
}

/// A single style definition
#[derive(Debug, Clone)]
pub struct StyleDefinition {
    /// Self identifier (e.g. `ParagraphStyle/Body`)
    pub self_id: String,
    /// Display name
    pub name: String,
    /// Style kind
    pub kind: StyleKind,
    /// Parent style for inheritance
    pub based_on: Option<String>,
    /// Style applied to the following paragraph (paragraph styles only)
    pub next_style: Option<String>,
    /// Fill color reference
    pub fill_color: Option<String>,
    /// Stroke color reference
    pub stroke_color: Option<String>,
    /// Unmodeled `<Properties>` content, kept verbatim
    pub raw_properties: String,
}

impl StyleDefinition {
    /// Create an empty-bodied definition of the given kind
    pub fn new(kind: StyleKind, self_id: impl Into<String>) -> Self {
        let self_id = self_id.into();
        let name = crate::ids::display_name(&self_id).to_string();
        Self {
            self_id,
            name,
            kind,
            based_on: None,
            next_style: None,
            fill_color: None,
            stroke_color: None,
            raw_properties: String::new(),
        }
    }
}

/// A tree of styles and nested sub-groups of one kind
#[derive(Debug, Clone, Default)]
pub struct StyleGroup {
    /// Group self identifier
    pub self_id: String,
    /// Display name
    pub name: String,
    /// Styles directly in this group
    pub styles: Vec<StyleDefinition>,
    /// Nested sub-groups
    pub groups: Vec<StyleGroup>,
}

impl StyleGroup {
    /// Find a style by identifier, searching nested groups
    pub fn find(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles
            .iter()
            .find(|s| s.self_id == id)
            .or_else(|| self.groups.iter().find_map(|g| g.find(id)))
    }

    /// Collect references to every style in the tree, depth first
    pub fn flatten<'a>(&'a self, out: &mut Vec<&'a StyleDefinition>) {
        out.extend(self.styles.iter());
        for group in &self.groups {
            group.flatten(out);
        }
    }

    /// Total number of styles in the tree
    pub fn len(&self) -> usize {
        self.styles.len() + self.groups.iter().map(|g| g.len()).sum::<usize>()
    }

    /// True if the tree holds no styles at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The three style trees of a document
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    /// Root character style group
    pub character_styles: StyleGroup,
    /// Root paragraph style group
    pub paragraph_styles: StyleGroup,
    /// Root object style group
    pub object_styles: StyleGroup,
}

impl StyleCatalog {
    /// An empty catalog, used when Resources/Styles.xml is absent
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a style catalog from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(xml).into_owned();
        let mut reader = Reader::from_str(&text);
        reader.config_mut().trim_text(true);

        let mut catalog = StyleCatalog::empty();
        // Stack of open groups; the bottom entry is a root group.
        let mut stack: Vec<(StyleKind, StyleGroup)> = Vec::new();
        let mut current_style: Option<StyleDefinition> = None;

        loop {
            let event = reader.read_event().map_err(IdmlError::Xml)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = e.local_name();
                    match name.as_ref() {
                        b"RootCharacterStyleGroup" => {
                            stack.push((StyleKind::Character, group_from(e)));
                            if is_empty {
                                close_group(&mut catalog, &mut stack);
                            }
                        }
                        b"RootParagraphStyleGroup" => {
                            stack.push((StyleKind::Paragraph, group_from(e)));
                            if is_empty {
                                close_group(&mut catalog, &mut stack);
                            }
                        }
                        b"RootObjectStyleGroup" => {
                            stack.push((StyleKind::Object, group_from(e)));
                            if is_empty {
                                close_group(&mut catalog, &mut stack);
                            }
                        }
                        b"CharacterStyleGroup" | b"ParagraphStyleGroup" | b"ObjectStyleGroup" => {
                            if let Some(&(kind, _)) = stack.last() {
                                stack.push((kind, group_from(e)));
                                if is_empty {
                                    close_group(&mut catalog, &mut stack);
                                }
                            }
                        }
                        b"CharacterStyle" | b"ParagraphStyle" | b"ObjectStyle" => {
                            if let Some(&(kind, _)) = stack.last() {
                                let style = style_from(e, kind);
                                if is_empty {
                                    if let Some((_, group)) = stack.last_mut() {
                                        group.styles.push(style);
                                    }
                                } else {
                                    current_style = Some(style);
                                }
                            }
                        }
                        b"Properties" if !is_empty => {
                            let inner = reader.read_text(e.name()).map_err(IdmlError::Xml)?;
                            if let Some(style) = current_style.as_mut() {
                                style.raw_properties = inner.trim().to_string();
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"CharacterStyle" | b"ParagraphStyle" | b"ObjectStyle" => {
                        if let (Some(style), Some((_, group))) =
                            (current_style.take(), stack.last_mut())
                        {
                            group.styles.push(style);
                        }
                    }
                    b"RootCharacterStyleGroup"
                    | b"RootParagraphStyleGroup"
                    | b"RootObjectStyleGroup"
                    | b"CharacterStyleGroup"
                    | b"ParagraphStyleGroup"
                    | b"ObjectStyleGroup" => {
                        close_group(&mut catalog, &mut stack);
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(catalog)
    }

    /// The root group for a kind
    pub fn root(&self, kind: StyleKind) -> &StyleGroup {
        match kind {
            StyleKind::Character => &self.character_styles,
            StyleKind::Paragraph => &self.paragraph_styles,
            StyleKind::Object => &self.object_styles,
        }
    }

    /// Mutable root group for a kind
    pub fn root_mut(&mut self, kind: StyleKind) -> &mut StyleGroup {
        match kind {
            StyleKind::Character => &mut self.character_styles,
            StyleKind::Paragraph => &mut self.paragraph_styles,
            StyleKind::Object => &mut self.object_styles,
        }
    }

    /// Find a definition by identifier within one kind's tree
    pub fn find(&self, kind: StyleKind, id: &str) -> Option<&StyleDefinition> {
        self.root(kind).find(id)
    }

    /// Every definition of a kind, including nested groups
    pub fn styles(&self, kind: StyleKind) -> Vec<&StyleDefinition> {
        let mut out = Vec::new();
        self.root(kind).flatten(&mut out);
        out
    }

    /// Insert a definition at the top level of its kind's tree
    pub fn insert(&mut self, def: StyleDefinition) {
        self.root_mut(def.kind).styles.push(def);
    }
}

fn group_from(e: &quick_xml::events::BytesStart) -> StyleGroup {
    StyleGroup {
        self_id: get_attr(e, b"Self").unwrap_or_default(),
        name: get_attr(e, b"Name").unwrap_or_default(),
        styles: Vec::new(),
        groups: Vec::new(),
    }
}

fn style_from(e: &quick_xml::events::BytesStart, kind: StyleKind) -> StyleDefinition {
    let self_id = get_attr(e, b"Self").unwrap_or_default();
    let name = get_attr(e, b"Name")
        .unwrap_or_else(|| crate::ids::display_name(&self_id).to_string());
    StyleDefinition {
        self_id,
        name,
        kind,
        based_on: get_attr(e, b"BasedOn"),
        next_style: get_attr(e, b"NextStyle"),
        fill_color: get_attr(e, b"FillColor"),
        stroke_color: get_attr(e, b"StrokeColor"),
        raw_properties: String::new(),
    }
}

fn close_group(catalog: &mut StyleCatalog, stack: &mut Vec<(StyleKind, StyleGroup)>) {
    if let Some((kind, group)) = stack.pop() {
        match stack.last_mut() {
            Some((_, parent)) => parent.groups.push(group),
            None => *catalog.root_mut(kind) = group,
        }
    }
}

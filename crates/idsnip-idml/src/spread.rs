//! Spread parsing (Spreads/Spread_*.xml)
//!
//! A spread holds the placed page items: text frames, rectangles, ovals,
//! polygons, graphic lines, and groups. The kind set is closed, so page
//! items are modeled as an enum and consumers match exhaustively.
//!
//! Text frames reference their flowed text through `ParentStory`. Ovals,
//! polygons, and lines may carry direct fill/stroke color references;
//! rectangles and text frames receive color through their object style
//! only.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{IdmlError, Result};
use crate::xml::get_attr;

/// Fields shared by every page item kind
#[derive(Debug, Clone, Default)]
pub struct ItemCommon {
    /// Item self identifier
    pub self_id: String,
    /// Layer the item sits on
    pub layer: Option<String>,
    /// Applied object style reference
    pub applied_object_style: Option<String>,
    /// Placement transform, kept verbatim
    pub item_transform: Option<String>,
}

/// A placed page item, one of the six closed kinds
#[derive(Debug, Clone)]
pub enum PageItem {
    /// A frame flowing a story's text
    TextFrame {
        /// Shared fields
        common: ItemCommon,
        /// Story whose text flows through this frame
        parent_story: Option<String>,
    },
    /// A rectangle frame
    Rectangle {
        /// Shared fields
        common: ItemCommon,
    },
    /// An oval shape
    Oval {
        /// Shared fields
        common: ItemCommon,
        /// Direct fill color reference
        fill_color: Option<String>,
        /// Direct stroke color reference
        stroke_color: Option<String>,
    },
    /// A polygon shape
    Polygon {
        /// Shared fields
        common: ItemCommon,
        /// Direct fill color reference
        fill_color: Option<String>,
        /// Direct stroke color reference
        stroke_color: Option<String>,
    },
    /// A straight or curved line
    GraphicLine {
        /// Shared fields
        common: ItemCommon,
        /// Direct fill color reference
        fill_color: Option<String>,
        /// Direct stroke color reference
        stroke_color: Option<String>,
    },
    /// A group of nested page items
    Group {
        /// Shared fields
        common: ItemCommon,
        /// Contained items
        children: Vec<PageItem>,
    },
}

impl PageItem {
    /// Shared fields of any kind
    pub fn common(&self) -> &ItemCommon {
        match self {
            PageItem::TextFrame { common, .. }
            | PageItem::Rectangle { common }
            | PageItem::Oval { common, .. }
            | PageItem::Polygon { common, .. }
            | PageItem::GraphicLine { common, .. }
            | PageItem::Group { common, .. } => common,
        }
    }

    /// Self identifier
    pub fn self_id(&self) -> &str {
        &self.common().self_id
    }

    /// Element name of this kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            PageItem::TextFrame { .. } => "TextFrame",
            PageItem::Rectangle { .. } => "Rectangle",
            PageItem::Oval { .. } => "Oval",
            PageItem::Polygon { .. } => "Polygon",
            PageItem::GraphicLine { .. } => "GraphicLine",
            PageItem::Group { .. } => "Group",
        }
    }

    /// Story reference, for text frames
    pub fn parent_story(&self) -> Option<&str> {
        match self {
            PageItem::TextFrame { parent_story, .. } => parent_story.as_deref(),
            _ => None,
        }
    }

    /// Direct fill and stroke color references, for shape kinds
    pub fn direct_colors(&self) -> (Option<&str>, Option<&str>) {
        match self {
            PageItem::Oval {
                fill_color,
                stroke_color,
                ..
            }
            | PageItem::Polygon {
                fill_color,
                stroke_color,
                ..
            }
            | PageItem::GraphicLine {
                fill_color,
                stroke_color,
                ..
            } => (fill_color.as_deref(), stroke_color.as_deref()),
            _ => (None, None),
        }
    }

    /// Nested items, for groups
    pub fn children(&self) -> &[PageItem] {
        match self {
            PageItem::Group { children, .. } => children,
            _ => &[],
        }
    }

    /// Visit this item and every nested descendant
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a PageItem)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Find an item by identifier, searching nested groups
    pub fn find(&self, id: &str) -> Option<&PageItem> {
        if self.self_id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }
}

/// A parsed spread
#[derive(Debug, Clone, Default)]
pub struct Spread {
    /// Spread self identifier
    pub self_id: String,
    /// Top-level page items in document order
    pub items: Vec<PageItem>,
}

impl Spread {
    /// Create an empty spread
    pub fn new(self_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            items: Vec::new(),
        }
    }

    /// Archive path of a spread with the given identifier
    pub fn path(self_id: &str) -> String {
        format!("Spreads/Spread_{self_id}.xml")
    }

    /// Parse a spread from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(xml).into_owned();
        let mut reader = Reader::from_str(&text);
        reader.config_mut().trim_text(true);

        let mut spread = Spread::default();
        // Open groups awaiting their end tags
        let mut group_stack: Vec<(ItemCommon, Vec<PageItem>)> = Vec::new();

        loop {
            let event = reader.read_event().map_err(IdmlError::Xml)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = e.local_name();
                    match name.as_ref() {
                        b"Spread" => {
                            if let Some(id) = get_attr(e, b"Self") {
                                spread.self_id = id;
                            }
                        }
                        b"Group" => {
                            let common = common_from(e);
                            if is_empty {
                                attach(
                                    &mut spread,
                                    &mut group_stack,
                                    PageItem::Group {
                                        common,
                                        children: Vec::new(),
                                    },
                                );
                            } else {
                                group_stack.push((common, Vec::new()));
                            }
                        }
                        b"TextFrame" => {
                            let item = PageItem::TextFrame {
                                common: common_from(e),
                                parent_story: get_attr(e, b"ParentStory"),
                            };
                            attach(&mut spread, &mut group_stack, item);
                        }
                        b"Rectangle" => {
                            let item = PageItem::Rectangle {
                                common: common_from(e),
                            };
                            attach(&mut spread, &mut group_stack, item);
                        }
                        b"Oval" => {
                            let item = PageItem::Oval {
                                common: common_from(e),
                                fill_color: get_attr(e, b"FillColor"),
                                stroke_color: get_attr(e, b"StrokeColor"),
                            };
                            attach(&mut spread, &mut group_stack, item);
                        }
                        b"Polygon" => {
                            let item = PageItem::Polygon {
                                common: common_from(e),
                                fill_color: get_attr(e, b"FillColor"),
                                stroke_color: get_attr(e, b"StrokeColor"),
                            };
                            attach(&mut spread, &mut group_stack, item);
                        }
                        b"GraphicLine" => {
                            let item = PageItem::GraphicLine {
                                common: common_from(e),
                                fill_color: get_attr(e, b"FillColor"),
                                stroke_color: get_attr(e, b"StrokeColor"),
                            };
                            attach(&mut spread, &mut group_stack, item);
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => {
                    if e.local_name().as_ref() == b"Group" {
                        if let Some((common, children)) = group_stack.pop() {
                            attach(
                                &mut spread,
                                &mut group_stack,
                                PageItem::Group { common, children },
                            );
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(spread)
    }

    /// Visit every item on the spread, including nested group members
    pub fn visit_items<'a>(&'a self, f: &mut impl FnMut(&'a PageItem)) {
        for item in &self.items {
            item.visit(f);
        }
    }

    /// Find an item by identifier, searching nested groups
    pub fn find_item(&self, id: &str) -> Option<&PageItem> {
        self.items.iter().find_map(|i| i.find(id))
    }
}

fn common_from(e: &quick_xml::events::BytesStart) -> ItemCommon {
    ItemCommon {
        self_id: get_attr(e, b"Self").unwrap_or_default(),
        layer: get_attr(e, b"ItemLayer"),
        applied_object_style: get_attr(e, b"AppliedObjectStyle"),
        item_transform: get_attr(e, b"ItemTransform"),
    }
}

fn attach(spread: &mut Spread, stack: &mut Vec<(ItemCommon, Vec<PageItem>)>, item: PageItem) {
    match stack.last_mut() {
        Some((_, children)) => children.push(item),
        None => spread.items.push(item),
    }
}

//! Story parsing (Stories/Story_*.xml)
//!
//! A story is flowed text: a sequence of paragraph ranges, each carrying an
//! applied paragraph style and a sequence of character ranges, each carrying
//! an applied character style, an optional applied font, and literal text.
//! Stories are the primary source of directly-used style references.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{IdmlError, Result};
use crate::xml::get_attr;

/// A run of characters sharing one character style
#[derive(Debug, Clone, Default)]
pub struct CharacterRange {
    /// Applied character style reference
    pub applied_style: String,
    /// Applied font family name, when set directly on the range
    pub applied_font: Option<String>,
    /// Literal text content
    pub content: String,
}

/// A run of paragraphs sharing one paragraph style
#[derive(Debug, Clone, Default)]
pub struct ParagraphRange {
    /// Applied paragraph style reference
    pub applied_style: String,
    /// Character ranges within the paragraph run
    pub ranges: Vec<CharacterRange>,
}

/// A parsed story
#[derive(Debug, Clone, Default)]
pub struct Story {
    /// Story self identifier
    pub self_id: String,
    /// Paragraph ranges in document order
    pub paragraphs: Vec<ParagraphRange>,
}

impl Story {
    /// Create an empty story
    pub fn new(self_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            paragraphs: Vec::new(),
        }
    }

    /// Archive path of a story with the given identifier
    pub fn path(self_id: &str) -> String {
        format!("Stories/Story_{self_id}.xml")
    }

    /// Parse a story from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(xml).into_owned();
        let mut reader = Reader::from_str(&text);

        let mut story = Story::default();
        let mut current_para: Option<ParagraphRange> = None;
        let mut current_range: Option<CharacterRange> = None;
        let mut in_content = false;

        loop {
            let event = reader.read_event().map_err(IdmlError::Xml)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    match e.local_name().as_ref() {
                        b"Story" => {
                            if let Some(id) = get_attr(e, b"Self") {
                                story.self_id = id;
                            }
                        }
                        b"ParagraphStyleRange" => {
                            let para = ParagraphRange {
                                applied_style: get_attr(e, b"AppliedParagraphStyle")
                                    .unwrap_or_default(),
                                ranges: Vec::new(),
                            };
                            if is_empty {
                                story.paragraphs.push(para);
                            } else {
                                current_para = Some(para);
                            }
                        }
                        b"CharacterStyleRange" => {
                            let range = CharacterRange {
                                applied_style: get_attr(e, b"AppliedCharacterStyle")
                                    .unwrap_or_default(),
                                applied_font: get_attr(e, b"AppliedFont"),
                                content: String::new(),
                            };
                            if is_empty {
                                if let Some(para) = current_para.as_mut() {
                                    para.ranges.push(range);
                                }
                            } else {
                                current_range = Some(range);
                            }
                        }
                        b"AppliedFont" if !is_empty => {
                            // Font may also appear as a Properties child
                            let font = reader.read_text(e.name()).map_err(IdmlError::Xml)?;
                            if let Some(range) = current_range.as_mut() {
                                let font = font.trim();
                                if !font.is_empty() {
                                    range.applied_font = Some(font.to_string());
                                }
                            }
                        }
                        b"Content" if !is_empty => in_content = true,
                        b"Br" => {
                            if let Some(range) = current_range.as_mut() {
                                range.content.push('\n');
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(ref t) => {
                    if in_content {
                        if let (Some(range), Ok(text)) = (current_range.as_mut(), t.unescape()) {
                            range.content.push_str(&text);
                        }
                    }
                }
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"Content" => in_content = false,
                    b"CharacterStyleRange" => {
                        if let (Some(range), Some(para)) =
                            (current_range.take(), current_para.as_mut())
                        {
                            para.ranges.push(range);
                        }
                    }
                    b"ParagraphStyleRange" => {
                        if let Some(para) = current_para.take() {
                            story.paragraphs.push(para);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(story)
    }

    /// Concatenated plain text of the story
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for para in &self.paragraphs {
            for range in &para.ranges {
                out.push_str(&range.content);
            }
            out.push('\n');
        }
        out
    }
}

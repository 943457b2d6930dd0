//! Package root parsing (designmap.xml)
//!
//! The designmap is the root of an IDML package. It names the document and
//! lists every other XML part via `idPkg:*` references, in load order.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{IdmlError, Result};
use crate::xml::{escape_xml, get_attr};

/// XML namespace of the `idPkg` packaging prefix
pub const IDPKG_NAMESPACE: &str = "http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging";

/// The kind of a referenced package part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// Color and swatch definitions (Resources/Graphic.xml)
    Graphic,
    /// Font definitions (Resources/Fonts.xml)
    Fonts,
    /// Style definitions (Resources/Styles.xml)
    Styles,
    /// Document preferences (Resources/Preferences.xml)
    Preferences,
    /// A story (Stories/Story_*.xml)
    Story,
    /// A spread (Spreads/Spread_*.xml)
    Spread,
}

impl PartKind {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"Graphic" => Some(PartKind::Graphic),
            b"Fonts" => Some(PartKind::Fonts),
            b"Styles" => Some(PartKind::Styles),
            b"Preferences" => Some(PartKind::Preferences),
            b"Story" => Some(PartKind::Story),
            b"Spread" => Some(PartKind::Spread),
            _ => None,
        }
    }

    fn element_name(self) -> &'static str {
        match self {
            PartKind::Graphic => "Graphic",
            PartKind::Fonts => "Fonts",
            PartKind::Styles => "Styles",
            PartKind::Preferences => "Preferences",
            PartKind::Story => "Story",
            PartKind::Spread => "Spread",
        }
    }
}

/// A single `idPkg:*` reference in the designmap
#[derive(Debug, Clone)]
pub struct PackagePart {
    /// Part kind
    pub kind: PartKind,
    /// Archive path of the part (e.g. `Stories/Story_u100.xml`)
    pub src: String,
}

/// Parsed designmap.xml
#[derive(Debug, Clone)]
pub struct DesignMap {
    /// Document self identifier
    pub self_id: String,
    /// Format version of the document
    pub dom_version: String,
    /// Referenced parts, in document order
    pub parts: Vec<PackagePart>,
}

impl DesignMap {
    /// Create an empty designmap for a new document
    pub fn new(self_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            dom_version: "8.0".to_string(),
            parts: Vec::new(),
        }
    }

    /// Parse a designmap from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(xml);
        let mut reader = Reader::from_str(&text);
        reader.config_mut().trim_text(true);

        let mut map: Option<DesignMap> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.local_name().as_ref() {
                        b"Document" => {
                            map = Some(DesignMap {
                                self_id: get_attr(e, b"Self").unwrap_or_else(|| "d".to_string()),
                                dom_version: get_attr(e, b"DOMVersion")
                                    .unwrap_or_else(|| "8.0".to_string()),
                                parts: Vec::new(),
                            });
                        }
                        name => {
                            // idPkg:* references carry the part path in @src
                            if let (Some(map), Some(kind)) =
                                (map.as_mut(), PartKind::from_local_name(name))
                            {
                                if let Some(src) = get_attr(e, b"src") {
                                    map.parts.push(PackagePart { kind, src });
                                }
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(IdmlError::Xml(e)),
                _ => {}
            }
        }

        map.ok_or_else(|| {
            IdmlError::InvalidStructure("designmap.xml has no Document element".to_string())
        })
    }

    /// Add a part reference
    pub fn add_part(&mut self, kind: PartKind, src: impl Into<String>) {
        self.parts.push(PackagePart {
            kind,
            src: src.into(),
        });
    }

    /// Archive paths of all story parts
    pub fn story_srcs(&self) -> impl Iterator<Item = &str> {
        self.srcs_of(PartKind::Story)
    }

    /// Archive paths of all spread parts
    pub fn spread_srcs(&self) -> impl Iterator<Item = &str> {
        self.srcs_of(PartKind::Spread)
    }

    fn srcs_of(&self, kind: PartKind) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .filter(move |p| p.kind == kind)
            .map(|p| p.src.as_str())
    }

    /// Serialize back to designmap.xml
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        out.push_str(&format!(
            "<Document xmlns:idPkg=\"{}\" Self=\"{}\" DOMVersion=\"{}\">\n",
            IDPKG_NAMESPACE,
            escape_xml(&self.self_id),
            escape_xml(&self.dom_version)
        ));
        for part in &self.parts {
            out.push_str(&format!(
                "  <idPkg:{} src=\"{}\"/>\n",
                part.kind.element_name(),
                escape_xml(&part.src)
            ));
        }
        out.push_str("</Document>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_designmap() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
        <Document xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging"
                  Self="d" DOMVersion="8.0">
            <idPkg:Graphic src="Resources/Graphic.xml"/>
            <idPkg:Styles src="Resources/Styles.xml"/>
            <idPkg:Story src="Stories/Story_u100.xml"/>
            <idPkg:Story src="Stories/Story_u200.xml"/>
            <idPkg:Spread src="Spreads/Spread_u300.xml"/>
        </Document>"#;

        let map = DesignMap::parse(xml).unwrap();
        assert_eq!(map.self_id, "d");
        assert_eq!(map.parts.len(), 5);
        assert_eq!(
            map.story_srcs().collect::<Vec<_>>(),
            vec!["Stories/Story_u100.xml", "Stories/Story_u200.xml"]
        );
        assert_eq!(map.spread_srcs().count(), 1);
    }

    #[test]
    fn test_designmap_without_document_element() {
        let xml = br#"<?xml version="1.0"?><NotADocument/>"#;
        assert!(matches!(
            DesignMap::parse(xml),
            Err(IdmlError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        let mut map = DesignMap::new("d");
        map.add_part(PartKind::Styles, "Resources/Styles.xml");
        map.add_part(PartKind::Story, "Stories/Story_u100.xml");

        let xml = map.to_xml();
        let restored = DesignMap::parse(xml.as_bytes()).unwrap();
        assert_eq!(restored.self_id, "d");
        assert_eq!(restored.parts.len(), 2);
        assert_eq!(restored.story_srcs().count(), 1);
    }
}

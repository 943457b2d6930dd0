//! Font definitions parsing (Resources/Fonts.xml)
//!
//! Fonts are tracked by family name only. Faces are kept so that a filtered
//! package still carries at least one valid face per referenced family; no
//! metrics are interpreted.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{IdmlError, Result};
use crate::xml::get_attr;

/// A single font face within a family
#[derive(Debug, Clone)]
pub struct FontFace {
    /// Face self identifier
    pub self_id: String,
    /// Full face name (e.g. `Minion Pro Bold`)
    pub name: String,
    /// Style name within the family (e.g. `Regular`, `Bold`)
    pub style_name: String,
}

/// A font family and its faces
#[derive(Debug, Clone)]
pub struct FontFamily {
    /// Family self identifier
    pub self_id: String,
    /// Family name, as referenced by character ranges
    pub name: String,
    /// Member faces
    pub faces: Vec<FontFace>,
}

impl FontFamily {
    /// A placeholder family with a single regular face
    pub fn regular(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            self_id: format!("di-{}", name.to_ascii_lowercase().replace(' ', "-")),
            faces: vec![FontFace {
                self_id: format!("di-{}-r", name.to_ascii_lowercase().replace(' ', "-")),
                name: format!("{name} Regular"),
                style_name: "Regular".to_string(),
            }],
            name,
        }
    }
}

/// All font families of a document
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    /// Font families
    pub families: Vec<FontFamily>,
}

impl FontCatalog {
    /// An empty catalog, used when Resources/Fonts.xml is absent
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a font catalog from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(xml).into_owned();
        let mut reader = Reader::from_str(&text);
        reader.config_mut().trim_text(true);

        let mut catalog = FontCatalog::empty();
        let mut current: Option<FontFamily> = None;

        loop {
            let event = reader.read_event().map_err(IdmlError::Xml)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    match e.local_name().as_ref() {
                        b"FontFamily" => {
                            let family = FontFamily {
                                self_id: get_attr(e, b"Self").unwrap_or_default(),
                                name: get_attr(e, b"Name").unwrap_or_default(),
                                faces: Vec::new(),
                            };
                            if is_empty {
                                catalog.families.push(family);
                            } else {
                                current = Some(family);
                            }
                        }
                        b"Font" => {
                            if let Some(family) = current.as_mut() {
                                family.faces.push(FontFace {
                                    self_id: get_attr(e, b"Self").unwrap_or_default(),
                                    name: get_attr(e, b"Name").unwrap_or_default(),
                                    style_name: get_attr(e, b"FontStyleName")
                                        .unwrap_or_else(|| "Regular".to_string()),
                                });
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(ref e) => {
                    if e.local_name().as_ref() == b"FontFamily" {
                        if let Some(family) = current.take() {
                            catalog.families.push(family);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(catalog)
    }

    /// True if a family with this name is defined
    pub fn contains(&self, family_name: &str) -> bool {
        self.families.iter().any(|f| f.name == family_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_families() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
        <idPkg:Fonts xmlns:idPkg="http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging" DOMVersion="8.0">
            <FontFamily Self="di-minion" Name="Minion Pro">
                <Font Self="di-minion-r" Name="Minion Pro Regular" FontStyleName="Regular"/>
                <Font Self="di-minion-b" Name="Minion Pro Bold" FontStyleName="Bold"/>
            </FontFamily>
            <FontFamily Self="di-courier" Name="Courier New"/>
        </idPkg:Fonts>"#;

        let catalog = FontCatalog::parse(xml).unwrap();
        assert_eq!(catalog.families.len(), 2);
        assert_eq!(catalog.families[0].faces.len(), 2);
        assert!(catalog.contains("Minion Pro"));
        assert!(!catalog.contains("Helvetica"));
    }

    #[test]
    fn test_placeholder_family() {
        let family = FontFamily::regular("Fallback Sans");
        assert_eq!(family.name, "Fallback Sans");
        assert_eq!(family.faces.len(), 1);
        assert_eq!(family.faces[0].style_name, "Regular");
    }
}

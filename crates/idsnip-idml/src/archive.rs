//! Archive handling for IDML packages
//!
//! An IDML package is a ZIP archive of XML files: a `designmap.xml` root,
//! stories under `Stories/`, spreads under `Spreads/`, and shared resource
//! definitions under `Resources/`. The archive type is a plain
//! byte-addressable file store; parsing lives in the model modules.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::error::{IdmlError, Result};

/// MIME type stored in the package's `mimetype` entry
pub const MIMETYPE: &str = "application/vnd.adobe.indesign-idml-package";

/// Path of the package root file
pub const DESIGNMAP_PATH: &str = "designmap.xml";

/// Path of the style definitions file
pub const STYLES_PATH: &str = "Resources/Styles.xml";

/// Path of the color and swatch definitions file
pub const GRAPHIC_PATH: &str = "Resources/Graphic.xml";

/// Path of the font definitions file
pub const FONTS_PATH: &str = "Resources/Fonts.xml";

/// Represents an unpacked IDML package
#[derive(Debug, Clone, Default)]
pub struct IdmlArchive {
    /// All files in the archive, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl IdmlArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Open and unpack an IDML file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        Ok(Self { files })
    }

    /// Get a file's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get a file's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get the package root (designmap.xml)
    pub fn designmap_xml(&self) -> Result<&[u8]> {
        self.get(DESIGNMAP_PATH)
            .ok_or_else(|| IdmlError::MissingFile(DESIGNMAP_PATH.to_string()))
    }

    /// Get the style definitions (Resources/Styles.xml), if present
    pub fn styles_xml(&self) -> Option<&[u8]> {
        self.get(STYLES_PATH)
    }

    /// Get the color definitions (Resources/Graphic.xml), if present
    pub fn graphic_xml(&self) -> Option<&[u8]> {
        self.get(GRAPHIC_PATH)
    }

    /// Get the font definitions (Resources/Fonts.xml), if present
    pub fn fonts_xml(&self) -> Option<&[u8]> {
        self.get(FONTS_PATH)
    }

    /// Check if a file exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// List all files in the archive
    pub fn file_list(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    /// List all files under a path prefix, sorted
    pub fn list(&self, prefix: &str) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .files
            .keys()
            .filter(|k| k.starts_with(prefix))
            .map(|s| s.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }

    /// Set or update a file's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    /// Set a file's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Remove a file from the archive
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    /// Write the archive to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Write the archive to any writer
    ///
    /// The `mimetype` entry is written first and uncompressed, as consumer
    /// applications sniff it at a fixed offset. Remaining entries are sorted
    /// for deterministic output.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let deflated = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        if let Some(contents) = self.files.get("mimetype") {
            let stored = zip::write::SimpleFileOptions::default()
                .compression_method(CompressionMethod::Stored);
            zip.start_file("mimetype", stored)?;
            zip.write_all(contents)?;
        }

        let mut paths: Vec<&str> = self
            .files
            .keys()
            .map(|p| p.as_str())
            .filter(|p| *p != "mimetype")
            .collect();
        paths.sort_unstable();

        for path in paths {
            let contents = &self.files[path];
            zip.start_file(path, deflated)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }
}

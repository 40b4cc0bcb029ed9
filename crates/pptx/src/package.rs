//! The OPC package behind a PPTX file: its XML parts and relationships.

use crate::error::{PptxError, Result};
use crate::parser::local_name;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

/// Content of one package part.
#[derive(Debug, Clone)]
enum PartData {
    Xml(String),
    Locked,
    Unreadable(String),
}

/// A relationship from one part to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Target resolved to a package path (no leading slash).
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship type ends with the given kind, e.g. `slideLayout`.
    pub fn is(&self, kind: &str) -> bool {
        self.rel_type.rsplit('/').next() == Some(kind)
    }
}

/// The XML parts of a PPTX package, loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: HashMap<String, PartData>,
}

impl Package {
    /// Load every XML and relationships part of a PPTX archive.
    ///
    /// Media and other binary parts are not loaded. Encrypted entries are
    /// remembered as locked; reading them later yields [`PptxError::LockedPart`].
    pub fn open<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| PptxError::Zip(format!("Failed to open ZIP: {}", e)))?;

        let names: Vec<String> = archive
            .file_names()
            .filter(|name| name.ends_with(".xml") || name.ends_with(".rels"))
            .map(String::from)
            .collect();

        let mut parts = HashMap::new();
        for name in names {
            let data = match archive.by_name(&name) {
                Ok(mut file) => {
                    let mut content = String::new();
                    match file.read_to_string(&mut content) {
                        Ok(_) => PartData::Xml(content),
                        Err(e) => PartData::Unreadable(e.to_string()),
                    }
                }
                Err(ZipError::UnsupportedArchive(message)) => {
                    log::warn!("Part '{}' is locked ({})", name, message);
                    PartData::Locked
                }
                Err(e) => PartData::Unreadable(e.to_string()),
            };
            parts.insert(name, data);
        }

        log::debug!("Loaded {} XML part(s)", parts.len());
        Ok(Self { parts })
    }

    /// Build a package from already extracted parts.
    pub fn from_parts<I, K, V>(parts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            parts: parts
                .into_iter()
                .map(|(name, xml)| (name.into(), PartData::Xml(xml.into())))
                .collect(),
        }
    }

    /// Whether the package contains a part with this path.
    pub fn contains(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    /// Read an XML part.
    pub fn read(&self, path: &str) -> Result<&str> {
        match self.parts.get(path) {
            Some(PartData::Xml(content)) => Ok(content),
            Some(PartData::Locked) => Err(PptxError::LockedPart(path.to_string())),
            Some(PartData::Unreadable(message)) => Err(PptxError::UnreadablePart {
                part: path.to_string(),
                message: message.clone(),
            }),
            None => Err(PptxError::MissingPart(path.to_string())),
        }
    }

    /// Relationships of a part. A part without a relationships part has none.
    pub fn relationships(&self, part: &str) -> Result<Vec<Relationship>> {
        let rels_path = rels_path_for(part);
        if !self.contains(&rels_path) {
            return Ok(Vec::new());
        }
        let content = self.read(&rels_path)?;
        parse_relationships(content, part, &rels_path)
    }

    /// The first internal relationship of the given kind.
    pub fn related(&self, part: &str, kind: &str) -> Result<Option<String>> {
        Ok(self
            .relationships(part)?
            .into_iter()
            .find(|rel| !rel.external && rel.is(kind))
            .map(|rel| rel.target))
    }
}

/// Path of the relationships part for a part, e.g.
/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that holds it.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn parse_relationships(
    content: &str,
    source_part: &str,
    rels_path: &str,
) -> Result<Vec<Relationship>> {
    let mut relationships = Vec::new();
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();
                let mut external = false;

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Type" => rel_type = value,
                        b"Target" => target = value,
                        b"Id" => id = value,
                        b"TargetMode" => external = value == "External",
                        _ => {}
                    }
                }

                let target = if external { target } else { resolve_target(source_part, &target) };
                relationships.push(Relationship {
                    id,
                    rel_type,
                    target,
                    external,
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PptxError::Xml {
                    part: rels_path.to_string(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(relationships)
}

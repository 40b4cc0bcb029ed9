//! [`DocumentSource`] implementation over a PPTX package.

use crate::error::{PptxError, Result};
use crate::package::Package;
use crate::parser::{
    extract_slide_number, parse_shapes, parse_slide_ids, parse_text_styles, parse_theme_fonts,
    FontContext, ShapeInfo, TextStyles, ThemeFonts,
};
use fontaudit_core::{
    DocumentSource, FontName, ShapeError, ShapeHandle, ShapeKind, SlideHandle, SourceError,
};
use std::io::{Read, Seek};
use std::path::Path;
use std::rc::Rc;

const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// A PPTX file opened for font scanning.
#[derive(Debug, Clone)]
pub struct PptxSource {
    package: Rc<Package>,
}

/// A slide listed by the presentation part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideEntry {
    /// Relationship id of the slide.
    pub rel_id: String,
    /// Package path of the slide part, `None` when the relationship is missing.
    pub path: Option<String>,
}

impl PptxSource {
    /// Open a PPTX package from a reader.
    pub fn open<R: Read + Seek>(reader: R) -> Result<Self> {
        Ok(Self::from_package(Package::open(reader)?))
    }

    /// Open a PPTX file from disk.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| PptxError::Zip(format!("Failed to open {}: {}", path.display(), e)))?;
        Self::open(std::io::BufReader::new(file))
    }

    pub fn from_package(package: Package) -> Self {
        Self {
            package: Rc::new(package),
        }
    }

    /// Slides in presentation order.
    ///
    /// The order comes from the slide id list of `presentation.xml`; an id
    /// without a relationship keeps its place with no path. If that list is
    /// empty, slide relationships are ordered by their number.
    pub fn slide_entries(&self) -> Result<Vec<SlideEntry>> {
        let relationships = self.package.relationships(PRESENTATION_PART)?;
        let slide_rels: Vec<_> = relationships
            .iter()
            .filter(|rel| !rel.external && rel.is("slide"))
            .collect();

        let ids = parse_slide_ids(self.package.read(PRESENTATION_PART)?, PRESENTATION_PART)?;
        if !ids.is_empty() {
            return Ok(ids
                .into_iter()
                .map(|id| {
                    let path = slide_rels
                        .iter()
                        .find(|rel| rel.id == id)
                        .map(|rel| rel.target.clone());
                    if path.is_none() {
                        log::warn!("Slide id {} has no relationship", id);
                    }
                    SlideEntry { rel_id: id, path }
                })
                .collect());
        }

        let mut slides: Vec<(SlideEntry, Option<usize>)> = slide_rels
            .iter()
            .map(|rel| {
                let order_num =
                    extract_slide_number(&rel.id).or_else(|| extract_slide_number(&rel.target));
                let entry = SlideEntry {
                    rel_id: rel.id.clone(),
                    path: Some(rel.target.clone()),
                };
                (entry, order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.path.cmp(&b.0.path),
        });

        Ok(slides.into_iter().map(|(entry, _)| entry).collect())
    }
}

impl DocumentSource for PptxSource {
    type Slide = PptxSlide;

    fn slides(&self) -> std::result::Result<Vec<PptxSlide>, SourceError> {
        let entries = self.slide_entries().map_err(SourceError::from)?;
        Ok(entries
            .into_iter()
            .map(|entry| PptxSlide {
                package: Rc::clone(&self.package),
                entry,
            })
            .collect())
    }
}

/// The layout and master behind a slide, parsed.
#[derive(Debug, Default)]
struct Inheritance {
    layout: Vec<ShapeInfo>,
    master: Vec<ShapeInfo>,
    styles: TextStyles,
    theme: ThemeFonts,
}

/// One slide part of a PPTX package.
#[derive(Debug, Clone)]
pub struct PptxSlide {
    package: Rc<Package>,
    entry: SlideEntry,
}

impl PptxSlide {
    /// Package path of the slide part, if the presentation links one.
    pub fn path(&self) -> Option<&str> {
        self.entry.path.as_deref()
    }

    fn part_path(&self) -> Result<&str> {
        self.path().ok_or_else(|| {
            PptxError::MissingPart(format!("slide relationship {}", self.entry.rel_id))
        })
    }

    /// Parse the slide's layout, the layout's master, and the master's theme.
    ///
    /// A missing or broken theme only loses theme font resolution and is
    /// logged.
    fn load_inheritance(&self) -> Result<Inheritance> {
        let mut inheritance = Inheritance::default();
        let Some(layout) = self.package.related(self.part_path()?, "slideLayout")? else {
            return Ok(inheritance);
        };
        inheritance.layout = parse_shapes(self.package.read(&layout)?, &layout)?;

        let Some(master) = self.package.related(&layout, "slideMaster")? else {
            return Ok(inheritance);
        };
        let master_xml = self.package.read(&master)?;
        inheritance.master = parse_shapes(master_xml, &master)?;
        inheritance.styles = parse_text_styles(master_xml, &master)?;

        let theme = self
            .package
            .related(&master, "theme")
            .and_then(|theme| match theme {
                Some(theme) => parse_theme_fonts(self.package.read(&theme)?, &theme),
                None => Ok(ThemeFonts::default()),
            });
        match theme {
            Ok(theme) => inheritance.theme = theme,
            Err(e) => log::debug!("{}: no theme fonts ({})", master, e),
        }
        Ok(inheritance)
    }
}

impl SlideHandle for PptxSlide {
    type Shape = PptxShape;

    fn content_shapes(&self) -> std::result::Result<Vec<PptxShape>, SourceError> {
        let path = self.part_path()?;
        let shapes = parse_shapes(self.package.read(path)?, path)?;

        // A broken layout chain only loses inherited fonts.
        let inheritance = self.load_inheritance().unwrap_or_else(|e| {
            log::debug!("{}: no inherited formatting ({})", path, e);
            Inheritance::default()
        });
        let parents = [inheritance.layout.as_slice(), inheritance.master.as_slice()];
        let context = FontContext::new(&inheritance.theme, &inheritance.styles, &parents);

        Ok(shapes.iter().map(|shape| PptxShape::resolve(shape, &context)).collect())
    }

    /// Shapes of the slide's layout, then those of the layout's master, then
    /// the master's text styles as one shape.
    fn master_shapes(&self) -> std::result::Result<Vec<PptxShape>, SourceError> {
        let inheritance = self.load_inheritance()?;
        let theme = &inheritance.theme;
        let styles = &inheritance.styles;

        let master_parents = [inheritance.master.as_slice()];
        let layout_context = FontContext::new(theme, styles, &master_parents);
        let master_context = FontContext::new(theme, styles, &[]);

        let mut shapes: Vec<PptxShape> = inheritance
            .layout
            .iter()
            .map(|shape| PptxShape::resolve(shape, &layout_context))
            .collect();
        shapes.extend(
            inheritance
                .master
                .iter()
                .map(|shape| PptxShape::resolve(shape, &master_context)),
        );

        let style_fonts = master_context.style_fonts();
        if !style_fonts.is_empty() {
            shapes.push(PptxShape {
                kind: ShapeKind::Other,
                fonts: style_fonts.into_iter().map(FontName::from).collect(),
            });
        }
        Ok(shapes)
    }
}

/// One shape of a slide, layout, or master part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PptxShape {
    kind: ShapeKind,
    fonts: Vec<FontName>,
}

impl PptxShape {
    fn resolve(info: &ShapeInfo, context: &FontContext<'_>) -> Self {
        Self {
            kind: info.kind,
            fonts: context.fonts(info).into_iter().map(FontName::from).collect(),
        }
    }
}

impl ShapeHandle for PptxShape {
    /// The single font of the shape's text. Text that mixes fonts has no
    /// single font and yields `None`; [`PptxShape::text_font_names`] lists them.
    fn text_font_name(&self) -> std::result::Result<Option<FontName>, ShapeError> {
        match self.fonts.as_slice() {
            [font] => Ok(Some(font.clone())),
            _ => Ok(None),
        }
    }

    fn text_font_names(&self) -> std::result::Result<Vec<FontName>, ShapeError> {
        Ok(self.fonts.clone())
    }

    fn shape_kind(&self) -> Option<ShapeKind> {
        Some(self.kind)
    }
}

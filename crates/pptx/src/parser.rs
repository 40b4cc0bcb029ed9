//! XML parsing for slides, layouts, masters, themes, and the presentation part.

use crate::error::{PptxError, Result};
use fontaudit_core::ShapeKind;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Major and minor Latin fonts of a theme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeFonts {
    /// Heading font.
    pub major: Option<String>,
    /// Body font.
    pub minor: Option<String>,
}

impl ThemeFonts {
    /// Resolve a typeface that may be a theme reference such as `+mj-lt`.
    ///
    /// Returns `None` for theme references this theme cannot satisfy and for
    /// references to non-Latin theme fonts.
    pub fn resolve(&self, typeface: &str) -> Option<String> {
        match typeface {
            "+mj-lt" => self.major.clone(),
            "+mn-lt" => self.minor.clone(),
            t if t.starts_with('+') => None,
            t => Some(t.to_string()),
        }
    }
}

/// Theme font a shape style points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThemeFontRef {
    Major,
    Minor,
}

/// The placeholder slot a shape fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Placeholder type, `body` when the part leaves it out.
    pub kind: String,
    pub idx: Option<String>,
}

impl Placeholder {
    pub fn is_title(&self) -> bool {
        matches!(self.kind.as_str(), "title" | "ctrTitle")
    }

    pub fn is_body(&self) -> bool {
        matches!(self.kind.as_str(), "body" | "subTitle" | "obj")
    }

    /// Placeholders of one role share text styles across slide, layout, and master.
    fn role(&self) -> &str {
        if self.is_title() {
            "title"
        } else if self.is_body() {
            "body"
        } else {
            &self.kind
        }
    }

    /// The placeholder among `shapes` that this one inherits from: the one
    /// with the same index, else the first one with the same role.
    pub fn find_parent<'a>(&self, shapes: &'a [ShapeInfo]) -> Option<&'a ShapeInfo> {
        let placeholders = || {
            shapes
                .iter()
                .filter_map(|shape| shape.placeholder.as_ref().map(|ph| (ph, shape)))
        };
        if let Some(idx) = &self.idx {
            if let Some((_, shape)) = placeholders().find(|(ph, _)| ph.idx.as_ref() == Some(idx)) {
                return Some(shape);
            }
        }
        placeholders()
            .find(|(ph, _)| ph.role() == self.role())
            .map(|(_, shape)| shape)
    }
}

/// Default text fonts of a slide master (`p:txStyles`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyles {
    /// First typeface of the title style.
    pub title: Option<String>,
    /// First typeface of the body style.
    pub body: Option<String>,
    /// First typeface of the style for other text.
    pub other: Option<String>,
    /// Every distinct typeface of the three styles, in document order.
    pub typefaces: Vec<String>,
}

impl TextStyles {
    /// The style typeface a placeholder falls back to.
    pub fn for_placeholder(&self, placeholder: &Placeholder) -> Option<&str> {
        if placeholder.is_title() {
            self.title.as_deref()
        } else if placeholder.is_body() {
            self.body.as_deref()
        } else {
            self.other.as_deref()
        }
    }
}

/// A shape as read from slide, layout, or master XML.
///
/// Typefaces are kept as written; [`FontContext::fonts`] resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeInfo {
    pub kind: ShapeKind,
    pub placeholder: Option<Placeholder>,
    /// Whether any run carries visible text.
    pub has_text: bool,
    /// Typefaces named by text runs, in run order.
    pub run_fonts: Vec<String>,
    /// Whether some text run names no typeface.
    pub inherits_font: bool,
    /// First typeface of the shape's own list style.
    pub list_style_font: Option<String>,
    style_font: Option<ThemeFontRef>,
}

impl ShapeInfo {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            placeholder: None,
            has_text: false,
            run_fonts: Vec::new(),
            inherits_font: false,
            list_style_font: None,
            style_font: None,
        }
    }

    fn is_title(&self) -> bool {
        self.placeholder.as_ref().is_some_and(Placeholder::is_title)
    }
}

/// What a part's shapes inherit text formatting from.
#[derive(Debug, Clone, Copy)]
pub struct FontContext<'a> {
    theme: &'a ThemeFonts,
    styles: &'a TextStyles,
    /// Shapes of the layout and master behind the part, nearest first.
    parents: &'a [&'a [ShapeInfo]],
}

impl<'a> FontContext<'a> {
    pub fn new(
        theme: &'a ThemeFonts,
        styles: &'a TextStyles,
        parents: &'a [&'a [ShapeInfo]],
    ) -> Self {
        Self {
            theme,
            styles,
            parents,
        }
    }

    /// Distinct resolved fonts of a shape's text, in run order.
    pub fn fonts(&self, shape: &ShapeInfo) -> Vec<String> {
        let mut fonts: Vec<String> = Vec::new();
        if !shape.has_text {
            return fonts;
        }

        let mut push = |font: Option<String>| {
            if let Some(font) = font.filter(|f| !f.trim().is_empty()) {
                if !fonts.contains(&font) {
                    fonts.push(font);
                }
            }
        };
        for typeface in &shape.run_fonts {
            push(self.theme.resolve(typeface));
        }
        if shape.inherits_font {
            push(self.inherited_font(shape));
        }
        fonts
    }

    /// Font of runs that name none: the shape's list style, the list styles
    /// of the layout and master placeholders it fills, the master's text
    /// style for its role, the shape style, then the theme.
    fn inherited_font(&self, shape: &ShapeInfo) -> Option<String> {
        let resolve = |typeface: Option<&str>| typeface.and_then(|t| self.theme.resolve(t));

        if let Some(font) = resolve(shape.list_style_font.as_deref()) {
            return Some(font);
        }
        if let Some(placeholder) = &shape.placeholder {
            for parent in self.parents {
                let inherited = placeholder
                    .find_parent(parent)
                    .and_then(|p| resolve(p.list_style_font.as_deref()));
                if inherited.is_some() {
                    return inherited;
                }
            }
            if let Some(font) = resolve(self.styles.for_placeholder(placeholder)) {
                return Some(font);
            }
        }

        match shape.style_font {
            Some(ThemeFontRef::Major) => self.theme.major.clone(),
            Some(ThemeFontRef::Minor) => self.theme.minor.clone(),
            None if shape.is_title() => self.theme.major.clone(),
            None => self.theme.minor.clone(),
        }
    }

    /// Resolved typefaces of the master text styles.
    pub fn style_fonts(&self) -> Vec<String> {
        let mut fonts: Vec<String> = Vec::new();
        for font in self.styles.typefaces.iter().filter_map(|t| self.theme.resolve(t)) {
            if !fonts.contains(&font) {
                fonts.push(font);
            }
        }
        fonts
    }
}

/// Extract the shapes of a slide, layout, or master part.
///
/// Group shapes are not reported themselves; their children are.
pub fn parse_shapes(xml_content: &str, part: &str) -> Result<Vec<ShapeInfo>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(false);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut in_text_body = false;
    let mut in_list_style = false;
    let mut in_run = false;
    let mut in_text = false;
    let mut run_font: Option<String> = None;
    let mut run_has_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" => current_shape = Some(ShapeInfo::new(ShapeKind::GeometricShape)),
                    b"pic" => current_shape = Some(ShapeInfo::new(ShapeKind::Picture)),
                    b"cxnSp" => current_shape = Some(ShapeInfo::new(ShapeKind::Line)),
                    b"graphicFrame" => current_shape = Some(ShapeInfo::new(ShapeKind::Other)),
                    b"txBody" => in_text_body = true,
                    b"lstStyle" if in_text_body => in_list_style = true,
                    b"r" | b"fld" if in_text_body => {
                        in_run = true;
                        run_font = None;
                        run_has_text = false;
                    }
                    b"t" if in_run => in_text = true,
                    _ => read_shape_attributes(
                        e,
                        current_shape.as_mut(),
                        in_list_style,
                        in_run,
                        &mut run_font,
                    ),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let shape = current_shape.as_mut();
                read_shape_attributes(e, shape, in_list_style, in_run, &mut run_font);
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().unwrap_or_default();
                    if !text.trim().is_empty() {
                        run_has_text = true;
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" | b"pic" | b"cxnSp" | b"graphicFrame" => {
                        if let Some(shape) = current_shape.take() {
                            shapes.push(shape);
                        }
                        in_text_body = false;
                        in_list_style = false;
                        in_run = false;
                        in_text = false;
                    }
                    b"txBody" => in_text_body = false,
                    b"lstStyle" => in_list_style = false,
                    b"t" => in_text = false,
                    b"r" | b"fld" if in_run => {
                        in_run = false;
                        if run_has_text {
                            if let Some(shape) = current_shape.as_mut() {
                                shape.has_text = true;
                                match run_font.take() {
                                    Some(font) => shape.run_fonts.push(font),
                                    None => shape.inherits_font = true,
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PptxError::Xml {
                    part: part.to_string(),
                    message: format!("at position {}: {}", reader.buffer_position(), e),
                });
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Pick up the attributes that matter for fonts from a start or empty element.
fn read_shape_attributes(
    e: &BytesStart<'_>,
    shape: Option<&mut ShapeInfo>,
    in_list_style: bool,
    in_run: bool,
    run_font: &mut Option<String>,
) {
    let Some(shape) = shape else {
        return;
    };
    let name = e.name();

    match local_name(name.as_ref()) {
        b"cNvSpPr" => {
            if attribute(e, b"txBox").as_deref() == Some("1")
                && shape.kind == ShapeKind::GeometricShape
            {
                shape.kind = ShapeKind::TextBox;
            }
        }
        b"ph" => {
            shape.kind = ShapeKind::Placeholder;
            shape.placeholder = Some(Placeholder {
                kind: attribute(e, b"type").unwrap_or_else(|| "body".to_string()),
                idx: attribute(e, b"idx"),
            });
        }
        b"tbl" => shape.kind = ShapeKind::Table,
        b"fontRef" => {
            shape.style_font = match attribute(e, b"idx").as_deref() {
                Some("major") => Some(ThemeFontRef::Major),
                Some("minor") => Some(ThemeFontRef::Minor),
                _ => None,
            };
        }
        b"latin" => {
            let Some(typeface) = attribute(e, b"typeface") else {
                return;
            };
            if in_run {
                *run_font = Some(typeface);
            } else if in_list_style && shape.list_style_font.is_none() {
                shape.list_style_font = Some(typeface);
            }
        }
        _ => {}
    }
}

/// Read the text styles of a slide master part.
pub fn parse_text_styles(xml_content: &str, part: &str) -> Result<TextStyles> {
    let mut styles = TextStyles::default();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut in_tx_styles = false;
    let mut current: Option<&'static str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"txStyles" => in_tx_styles = true,
                    b"titleStyle" if in_tx_styles => current = Some("title"),
                    b"bodyStyle" if in_tx_styles => current = Some("body"),
                    b"otherStyle" if in_tx_styles => current = Some("other"),
                    b"latin" => {
                        let (Some(style), Some(typeface)) = (current, attribute(e, b"typeface"))
                        else {
                            continue;
                        };
                        let slot = match style {
                            "title" => &mut styles.title,
                            "body" => &mut styles.body,
                            _ => &mut styles.other,
                        };
                        if slot.is_none() {
                            *slot = Some(typeface.clone());
                        }
                        if !styles.typefaces.contains(&typeface) {
                            styles.typefaces.push(typeface);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"txStyles" => {
                        in_tx_styles = false;
                        current = None;
                    }
                    b"titleStyle" | b"bodyStyle" | b"otherStyle" => current = None,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PptxError::Xml {
                    part: part.to_string(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(styles)
}

/// Read the major and minor Latin fonts of a theme part.
pub fn parse_theme_fonts(xml_content: &str, part: &str) -> Result<ThemeFonts> {
    let mut fonts = ThemeFonts::default();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut in_major_font = false;
    let mut in_minor_font = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"majorFont" => in_major_font = true,
                    b"minorFont" => in_minor_font = true,
                    b"latin" if in_major_font => fonts.major = attribute(e, b"typeface"),
                    b"latin" if in_minor_font => fonts.minor = attribute(e, b"typeface"),
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"majorFont" => in_major_font = false,
                    b"minorFont" => in_minor_font = false,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PptxError::Xml {
                    part: part.to_string(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(fonts)
}

/// Relationship ids of the slides listed in `presentation.xml`, in order.
pub fn parse_slide_ids(xml_content: &str, part: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // The relationship id is the namespaced `r:id`; the plain `id` is numeric.
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| {
                        attr.key.as_ref() != b"id" && local_name(attr.key.as_ref()) == b"id"
                    })
                    .map(|attr| String::from_utf8_lossy(&attr.value).to_string());
                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PptxError::Xml {
                    part: part.to_string(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Value of an unprefixed attribute.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
pub fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
pub fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office_theme() -> ThemeFonts {
        ThemeFonts {
            major: Some("Calibri Light".to_string()),
            minor: Some("Calibri".to_string()),
        }
    }

    /// Fonts of each shape of a part with nothing to inherit from but the theme.
    fn standalone_fonts(shapes: &[ShapeInfo]) -> Vec<Vec<String>> {
        let theme = office_theme();
        let styles = TextStyles::default();
        let context = FontContext::new(&theme, &styles, &[]);
        shapes.iter().map(|shape| context.fonts(shape)).collect()
    }

    const SLIDE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
  xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr>
        </p:nvSpPr>
      <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>Welcome</a:t></a:r>
        </a:p></p:txBody>
    </p:sp>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="3" name="TextBox 2"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>
      <p:txBody><a:bodyPr/><a:lstStyle/>
        <a:p><a:r><a:rPr lang="en-US"><a:latin typeface="Wingdings2"/></a:rPr><a:t>x</a:t></a:r>
             <a:r><a:rPr lang="en-US"><a:latin typeface="+mn-lt"/></a:rPr><a:t>body</a:t></a:r>
               </a:p>
        <a:p><a:endParaRPr lang="en-US"><a:latin typeface="Papyrus"/></a:endParaRPr></a:p>
      </p:txBody>
    </p:sp>
    <p:grpSp>
      <p:nvGrpSpPr><p:cNvPr id="4" name="Group 3"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="5" name="Rectangle 4"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
        <p:txBody><a:bodyPr/><a:lstStyle><a:lvl1pPr><a:defRPr><a:latin typeface="Bahnschrift"/>
          </a:defRPr></a:lvl1pPr></a:lstStyle>
          <a:p><a:r><a:rPr lang="en-US"/><a:t>grouped</a:t></a:r></a:p></p:txBody>
      </p:sp>
    </p:grpSp>
    <p:pic>
      <p:nvPicPr><p:cNvPr id="6" name="Picture 5"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>
    </p:pic>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="7" name="Empty"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
      <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"><a:latin typeface="Papyrus"/>
        </a:rPr><a:t> </a:t></a:r></a:p></p:txBody>
    </p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

    #[test]
    fn test_parse_shapes() {
        let shapes = parse_shapes(SLIDE_XML, "ppt/slides/slide1.xml").unwrap();
        assert_eq!(shapes.len(), 5);
        let fonts = standalone_fonts(&shapes);

        assert_eq!(shapes[0].kind, ShapeKind::Placeholder);
        assert_eq!(shapes[0].placeholder.as_ref().map(|ph| ph.kind.as_str()), Some("title"));
        assert_eq!(fonts[0], vec!["Calibri Light"]);

        assert_eq!(shapes[1].kind, ShapeKind::TextBox);
        assert_eq!(shapes[1].run_fonts, vec!["Wingdings2", "+mn-lt"]);
        assert_eq!(fonts[1], vec!["Wingdings2", "Calibri"]);

        assert_eq!(fonts[2], vec!["Bahnschrift"]);

        assert_eq!(shapes[3].kind, ShapeKind::Picture);
        assert!(!shapes[3].has_text);
        assert!(fonts[3].is_empty());

        assert!(!shapes[4].has_text);
        assert!(fonts[4].is_empty());
    }

    #[test]
    fn test_style_font_reference() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
              <p:style><a:fontRef idx="major"/></p:style>
              <p:txBody><a:p><a:r><a:t>Shape text</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;
        let shapes = parse_shapes(xml, "ppt/slides/slide1.xml").unwrap();
        assert_eq!(standalone_fonts(&shapes)[0], vec!["Calibri Light"]);
    }

    #[test]
    fn test_table_fonts() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:graphicFrame><a:graphic><a:graphicData><a:tbl><a:tr><a:tc>
              <a:txBody><a:p><a:r><a:rPr><a:latin typeface="Consolas"/></a:rPr><a:t>1</a:t></a:r>
                </a:p></a:txBody>
            </a:tc></a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>
        </p:spTree></p:cSld></p:sld>"#;
        let shapes = parse_shapes(xml, "ppt/slides/slide1.xml").unwrap();
        assert_eq!(shapes[0].kind, ShapeKind::Table);
        assert_eq!(standalone_fonts(&shapes)[0], vec!["Consolas"]);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = parse_shapes("<p:sld><p:sp></p:sld>", "ppt/slides/slide1.xml");
        assert!(matches!(result, Err(PptxError::Xml { .. })));
    }

    const MASTER_XML: &str = r#"<p:sldMaster xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
        <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/>
          </p:nvPr></p:nvSpPr>
          <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr/><a:t>Master title</a:t></a:r></a:p>
            </p:txBody></p:sp>
        <p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/>
          </p:nvPr></p:nvSpPr>
          <p:txBody><a:bodyPr/><a:lstStyle><a:lvl1pPr><a:defRPr><a:latin typeface="Georgia"/>
            </a:defRPr></a:lvl1pPr></a:lstStyle>
          <a:p><a:r><a:rPr/><a:t>Master text</a:t></a:r></a:p></p:txBody></p:sp>
      </p:spTree></p:cSld>
      <p:txStyles>
        <p:titleStyle><a:lvl1pPr><a:defRPr><a:latin typeface="Bahnschrift"/></a:defRPr></a:lvl1pPr>
          </p:titleStyle>
        <p:bodyStyle><a:lvl1pPr><a:defRPr><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr>
          <a:lvl2pPr><a:defRPr><a:latin typeface="Verdana"/></a:defRPr></a:lvl2pPr></p:bodyStyle>
        <p:otherStyle><a:lvl1pPr><a:defRPr><a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr>
          </p:otherStyle>
      </p:txStyles></p:sldMaster>"#;

    #[test]
    fn test_parse_text_styles() {
        let styles = parse_text_styles(MASTER_XML, "ppt/slideMasters/slideMaster1.xml").unwrap();
        assert_eq!(styles.title.as_deref(), Some("Bahnschrift"));
        assert_eq!(styles.body.as_deref(), Some("+mn-lt"));
        assert_eq!(styles.other.as_deref(), Some("+mn-lt"));
        assert_eq!(styles.typefaces, vec!["Bahnschrift", "+mn-lt", "Verdana"]);

        // list style fonts inside shapes are not text styles
        assert!(!styles.typefaces.contains(&"Georgia".to_string()));
    }

    #[test]
    fn test_placeholder_inherits_from_layout_and_master() {
        let slide = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr/><p:nvPr>
              <p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr/><a:t>Deck</a:t></a:r></a:p>
                </p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:cNvPr id="3" name="Content"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/>
              </p:nvPr></p:nvSpPr>
              <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr/><a:t>Point</a:t></a:r></a:p>
                </p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:cNvPr id="4" name="Footer"/><p:cNvSpPr/><p:nvPr>
              <p:ph type="ftr" idx="11"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr/><a:t>Footer</a:t></a:r></a:p>
                </p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;
        let layout = r#"<p:sldLayout xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:cNvPr id="3" name="Content"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/>
              </p:nvPr></p:nvSpPr>
              <p:txBody><a:bodyPr/><a:lstStyle><a:lvl1pPr><a:defRPr><a:latin typeface="Garamond"/>
                </a:defRPr></a:lvl1pPr></a:lstStyle>
              <a:p><a:endParaRPr/></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sldLayout>"#;

        let theme = office_theme();
        let styles = parse_text_styles(MASTER_XML, "master").unwrap();
        let layout_shapes = parse_shapes(layout, "layout").unwrap();
        let master_shapes = parse_shapes(MASTER_XML, "master").unwrap();
        let parents = [layout_shapes.as_slice(), master_shapes.as_slice()];
        let context = FontContext::new(&theme, &styles, &parents);

        let fonts: Vec<Vec<String>> =
            parse_shapes(slide, "slide").unwrap().iter().map(|s| context.fonts(s)).collect();
        // title: master title style; content: layout list style by index; footer: other style
        assert_eq!(fonts, vec![vec!["Bahnschrift"], vec!["Garamond"], vec!["Calibri"]]);

        let master_context = FontContext::new(&theme, &styles, &[]);
        let master_fonts: Vec<Vec<String>> =
            master_shapes.iter().map(|s| master_context.fonts(s)).collect();
        assert_eq!(master_fonts, vec![vec!["Bahnschrift"], vec!["Georgia"]]);
        assert_eq!(master_context.style_fonts(), vec!["Bahnschrift", "Calibri", "Verdana"]);
    }

    #[test]
    fn test_placeholder_matching() {
        let parents = parse_shapes(MASTER_XML, "master").unwrap();
        let by_idx = Placeholder {
            kind: "obj".to_string(),
            idx: Some("1".to_string()),
        };
        let by_role = Placeholder {
            kind: "ctrTitle".to_string(),
            idx: None,
        };
        let unmatched = Placeholder {
            kind: "sldNum".to_string(),
            idx: Some("12".to_string()),
        };

        let body = by_idx.find_parent(&parents).unwrap();
        assert_eq!(body.list_style_font.as_deref(), Some("Georgia"));
        let title = by_role.find_parent(&parents).unwrap();
        assert!(title.placeholder.as_ref().unwrap().is_title());
        assert!(unmatched.find_parent(&parents).is_none());
    }

    #[test]
    fn test_parse_theme_fonts() {
        let xml = r#"<a:theme xmlns:a="a" name="Office Theme"><a:themeElements>
            <a:fontScheme name="Office">
            <a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/></a:majorFont>
            <a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/></a:minorFont>
        </a:fontScheme></a:themeElements></a:theme>"#;
        assert_eq!(parse_theme_fonts(xml, "ppt/theme/theme1.xml").unwrap(), office_theme());
    }

    #[test]
    fn test_theme_resolution() {
        let theme = office_theme();
        assert_eq!(theme.resolve("+mj-lt").as_deref(), Some("Calibri Light"));
        assert_eq!(theme.resolve("+mn-ea"), None);
        assert_eq!(theme.resolve("Arial").as_deref(), Some("Arial"));
        assert_eq!(ThemeFonts::default().resolve("+mn-lt"), None);
    }

    #[test]
    fn test_parse_slide_ids() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst>
            <p:sldId id="257" r:id="rId3"/><p:sldId id="256" r:id="rId2"/>
        </p:sldIdLst></p:presentation>"#;
        assert_eq!(parse_slide_ids(xml, "ppt/presentation.xml").unwrap(), vec!["rId3", "rId2"]);
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }
}

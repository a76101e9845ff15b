//! PPTX text extraction.
//!
//! Each slide becomes one page. Shapes are ordered top-to-bottom, then
//! left-to-right, and separated by a blank line so that every text box turns
//! into its own block. Paragraphs and `a:br` breaks inside a shape become
//! single newlines.

use blockcopy_core::{DocumentFormat, Error, ExtractorConfig, PageExtractor, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Extractor for PPTX (Office Open XML) files.
#[derive(Debug, Clone, Default)]
pub struct PptxExtractor {
    config: ExtractorConfig,
}

impl PptxExtractor {
    /// Create a PPTX extractor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract the text of every slide from a reader, in presentation order.
    pub fn extract_slides<R: Read + Seek>(&self, reader: R) -> Result<Vec<String>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_paths = self.slide_order(&mut archive)?;
        log::debug!("PPTX has {} slides", slide_paths.len());

        let mut pages = Vec::with_capacity(slide_paths.len());
        for (idx, path) in slide_paths.iter().enumerate() {
            match self.slide_text(&mut archive, path) {
                Ok(text) => pages.push(text),
                Err(e) if self.config.skip_unreadable_pages => {
                    log::warn!("skipping slide {} ({}): {}", idx + 1, path, e);
                    pages.push(String::new());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(pages)
    }

    /// Slide part paths in presentation order.
    ///
    /// Uses the `p:sldIdLst` of `presentation.xml` when present and falls back
    /// to the numbers in the relationship ids otherwise.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let slide_rels = parse_slide_relationships(&rels_content)?;

        let listed = match read_file_from_archive(archive, PRESENTATION_PATH) {
            Ok(content) => parse_slide_id_list(&content)?,
            Err(e) => {
                log::warn!("no usable {} ({}), ordering slides by id", PRESENTATION_PATH, e);
                Vec::new()
            }
        };

        if !listed.is_empty() {
            let by_id: HashMap<&str, &str> = slide_rels
                .iter()
                .map(|(id, target)| (id.as_str(), target.as_str()))
                .collect();
            return Ok(listed
                .iter()
                .filter_map(|rid| by_id.get(rid.as_str()).map(|t| t.to_string()))
                .collect());
        }

        let mut slides: Vec<(String, Option<usize>)> = slide_rels
            .into_iter()
            .map(|(id, target)| {
                let order = extract_slide_number(&target).or_else(|| extract_slide_number(&id));
                (target, order)
            })
            .collect();
        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Text of one slide, shapes in reading order separated by blank lines.
    fn slide_text<R: Read + Seek>(&self, archive: &mut ZipArchive<R>, slide_path: &str) -> Result<String> {
        let content = read_file_from_archive(archive, slide_path)?;
        let mut shapes = extract_shapes_from_xml(&content);

        shapes.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        Ok(shapes
            .into_iter()
            .map(|shape| shape.text)
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

impl PageExtractor for PptxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pptx
    }

    fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>> {
        self.extract_slides(Cursor::new(data))
    }
}

/// A text-bearing shape and its offset on the slide.
#[derive(Debug, Default)]
struct ShapeInfo {
    text: String,
    x: f64,
    y: f64,
}

/// Relationship id and archive path of every slide relationship.
fn parse_slide_relationships(rels_content: &str) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_str(rels_content);
    reader.trim_text(true);
    let mut slides = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Type" => rel_type = value,
                        b"Target" => target = value,
                        b"Id" => id = value,
                        _ => {}
                    }
                }

                if rel_type.ends_with("/slide") {
                    let path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    slides.push((id, path));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Relationship ids from `p:sldIdLst`, in presentation order.
fn parse_slide_id_list(presentation_content: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(presentation_content);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // The relationship id is the namespaced `r:id`, not the numeric `id`.
                let rid = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.as_ref().ends_with(b":id"))
                    .map(|attr| String::from_utf8_lossy(&attr.value).to_string());
                if let Some(rid) = rid {
                    ids.push(rid);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Shapes with non-empty text, in document order.
fn extract_shapes_from_xml(xml_content: &str) -> Vec<ShapeInfo> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut in_text_body = false;
    let mut in_run_text = false;
    let mut current_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    current_shape = Some(ShapeInfo::default());
                    current_text.clear();
                }
                b"off" => read_offset(e, current_shape.as_mut()),
                b"txBody" => in_text_body = true,
                b"p" if in_text_body => {
                    if !current_text.is_empty() {
                        current_text.push('\n');
                    }
                }
                b"br" if in_text_body => current_text.push('\n'),
                b"t" if in_text_body => in_run_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"off" => read_offset(e, current_shape.as_mut()),
                b"br" if in_text_body => current_text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_run_text {
                    match e.unescape() {
                        Ok(text) => current_text.push_str(&text),
                        Err(err) => {
                            // Keep the run as written rather than losing it.
                            log::warn!("Unresolved entity in slide text (kept raw): {}", err);
                            current_text.push_str(&String::from_utf8_lossy(e));
                        }
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    if let Some(mut shape) = current_shape.take() {
                        shape.text = current_text.trim().to_string();
                        if !shape.text.is_empty() {
                            shapes.push(shape);
                        }
                    }
                    current_text.clear();
                    in_text_body = false;
                    in_run_text = false;
                }
                b"txBody" => in_text_body = false,
                b"t" => in_run_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error (continuing): {}", e);
            }
            _ => {}
        }
    }

    shapes
}

/// Record the `x`/`y` attributes of an `a:off` element on the open shape.
fn read_offset(element: &BytesStart<'_>, shape: Option<&mut ShapeInfo>) {
    let Some(shape) = shape else {
        return;
    };
    for attr in element.attributes().flatten() {
        let Ok(value) = String::from_utf8_lossy(&attr.value).parse::<f64>() else {
            continue;
        };
        match attr.key.as_ref() {
            b"x" => shape.x = value,
            b"y" => shape.y = value,
            _ => {}
        }
    }
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    s[start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/>
</Relationships>"#;

    // Lists slide2 before slide1.
    const PRESENTATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:sldIdLst>
    <p:sldId id="257" r:id="rId3"/>
    <p:sldId id="256" r:id="rId2"/>
  </p:sldIdLst>
</p:presentation>"#;

    fn shape(x: i64, y: i64, paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            r#"<p:sp><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="10" cy="10"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>"#,
            x, y, body
        )
    }

    fn slide(shapes: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>{}</p:spTree></p:cSld>
</p:sld>"#,
            shapes.concat()
        )
    }

    fn build_pptx(files: &[(&str, String)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("ppt/slides/slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_shapes_sorted_and_separated() {
        let data = build_pptx(&[
            (PRESENTATION_RELS_PATH, RELS.to_string()),
            (PRESENTATION_PATH, PRESENTATION.to_string()),
            (
                "ppt/slides/slide1.xml",
                slide(&[
                    shape(0, 500, &["Body line one", "Body line two"]),
                    shape(0, 100, &["Title &amp; more"]),
                ]),
            ),
            ("ppt/slides/slide2.xml", slide(&[shape(0, 0, &["Cover"])])),
        ]);

        let pages = PptxExtractor::new().extract_pages(&data).unwrap();
        assert_eq!(
            pages,
            vec![
                "Cover".to_string(),
                "Title & more\n\nBody line one\nBody line two".to_string(),
            ]
        );
    }

    #[test]
    fn test_falls_back_to_relationship_order() {
        let data = build_pptx(&[
            (PRESENTATION_RELS_PATH, RELS.to_string()),
            ("ppt/slides/slide1.xml", slide(&[shape(0, 0, &["First"])])),
            ("ppt/slides/slide2.xml", slide(&[shape(0, 0, &["Second"])])),
        ]);

        let pages = PptxExtractor::new().extract_pages(&data).unwrap();
        assert_eq!(pages, vec!["First", "Second"]);
    }

    #[test]
    fn test_line_break_inside_paragraph() {
        let xml = slide(&[r#"<p:sp><p:txBody><a:p><a:r><a:t>left</a:t></a:r><a:br/><a:r><a:t>right</a:t></a:r></a:p></p:txBody></p:sp>"#.to_string()]);
        let shapes = extract_shapes_from_xml(&xml);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].text, "left\nright");
    }

    #[test]
    fn test_unknown_entity_keeps_raw_text() {
        let xml = slide(&[
            shape(0, 0, &["a &bogus; b"]),
            shape(0, 100, &["after"]),
        ]);
        let shapes = extract_shapes_from_xml(&xml);
        let texts: Vec<&str> = shapes.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a &bogus; b", "after"]);
    }

    #[test]
    fn test_missing_slide_skipped_when_configured() {
        let files = [
            (PRESENTATION_RELS_PATH, RELS.to_string()),
            ("ppt/slides/slide2.xml", slide(&[shape(0, 0, &["Kept"])])),
        ];
        let data = build_pptx(&files);

        assert!(PptxExtractor::new().extract_pages(&data).is_err());

        let lenient =
            PptxExtractor::with_config(ExtractorConfig::new().with_skip_unreadable_pages(true));
        assert_eq!(lenient.extract_pages(&data).unwrap(), vec!["", "Kept"]);
    }

    #[test]
    fn test_not_a_zip() {
        let err = PptxExtractor::new().extract_pages(b"PK\x03\x04garbage").unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }
}

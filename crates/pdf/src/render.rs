use mcqgen::{artifacts::ArtifactRenderer, ArtifactError};
use printpdf::{
    BuiltinFont, Layer, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, Pt, TextItem,
    TextMatrix, TextRenderingMode,
};
use tracing::debug;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const FONT_SIZE_PT: f32 = 11.0;
const LINE_HEIGHT_MM: f32 = 5.5;
/// Roughly what fits between the margins at 11pt Helvetica.
const MAX_LINE_CHARS: usize = 90;

/// Renders a result as an A4 PDF with one paragraph per input line.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    title: String,
}

impl PdfRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new("Generated MCQs")
    }
}

impl ArtifactRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, content: &str) -> Result<Vec<u8>, ArtifactError> {
        let mut doc = PdfDocument::new(&self.title);
        let layer_id = doc.add_layer(&Layer::new("Text"));

        let font_bytes = BuiltinFont::Helvetica.get_subset_font().bytes;
        let font = ParsedFont::from_bytes(&font_bytes, 0, &mut Vec::new())
            .ok_or_else(|| ArtifactError::Render("failed to parse built-in font".to_string()))?;
        let font_id = doc.add_font(&font);

        let lines_per_page =
            ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM).floor() as usize;

        for page_lines in layout_lines(content).chunks(lines_per_page.max(1)) {
            let mut ops = vec![Op::BeginLayer {
                layer_id: layer_id.clone(),
            }];

            for (row, line) in page_lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let y = PAGE_HEIGHT_MM - MARGIN_MM - row as f32 * LINE_HEIGHT_MM;
                ops.extend([
                    Op::SetFontSize {
                        size: Pt(FONT_SIZE_PT),
                        font: font_id.clone(),
                    },
                    Op::StartTextSection,
                    Op::SetTextMatrix {
                        matrix: TextMatrix::Translate(Mm(MARGIN_MM).into(), Mm(y).into()),
                    },
                    Op::SetTextRenderingMode {
                        mode: TextRenderingMode::Fill,
                    },
                    Op::WriteText {
                        items: vec![TextItem::Text(line.clone())],
                        font: font_id.clone(),
                    },
                    Op::EndTextSection,
                ]);
            }

            ops.push(Op::EndLayer {
                layer_id: layer_id.clone(),
            });
            doc.pages
                .push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));
        }

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!("PDF rendering produced {} warnings", warnings.len());
        }
        Ok(bytes)
    }
}

/// Splits content into the printed lines: one paragraph per input line, each
/// word-wrapped to [`MAX_LINE_CHARS`]. Blank input lines are kept as spacing.
/// Always yields at least one line so an empty result still renders a page.
pub(crate) fn layout_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in content.lines() {
        let paragraph = paragraph.trim_end();
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(wrap_paragraph(paragraph, MAX_LINE_CHARS));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_paragraph(paragraph: &str, width: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        // Words longer than a full line are hard-split.
        while word.len() > width {
            if !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            wrapped.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > width && !current.is_empty() {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

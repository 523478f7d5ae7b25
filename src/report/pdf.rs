//! Paginated document rendering.
//!
//! The PDF is serialized through a `ChunkSink`: every written chunk goes to
//! `on_data`, and `on_end` fires once the document is complete. Bytes are
//! only handed out after `on_end`, never on the strength of having started.

use std::io::{self, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use printpdf::{IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use crate::error::RenderError;
use crate::models::Commit;
use crate::report::layout::{
    DocumentLayout, PAGE_HEIGHT, PAGE_WIDTH, PlacedText, TITLE, TextMeasure,
};

const CHUNK_SIZE: usize = 16 * 1024;
const PT_TO_MM: f32 = 25.4 / 72.0;
const UNDERLINE_THICKNESS: f32 = 0.75;

/// Receives document bytes as they are produced.
pub trait ChunkSink {
    fn on_data(&mut self, chunk: &[u8]);
    fn on_end(&mut self);
}

/// Accumulates chunks and releases them once the stream has completed.
#[derive(Debug, Default)]
pub struct CollectingSink {
    buffer: Vec<u8>,
    chunks: usize,
    finished: bool,
}

impl CollectingSink {
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, RenderError> {
        if self.finished {
            Ok(self.buffer)
        } else {
            Err(RenderError::Incomplete)
        }
    }
}

impl ChunkSink for CollectingSink {
    fn on_data(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        self.chunks += 1;
    }

    fn on_end(&mut self) {
        self.finished = true;
    }
}

struct SinkWriter<'s, S> {
    sink: &'s mut S,
}

impl<S: ChunkSink> Write for SinkWriter<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !buf.is_empty() {
            self.sink.on_data(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A TrueType font read from disk and embedded into every document.
pub struct FontResource {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FontResource {
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|e| {
            tracing::error!("Font file missing: {} ({})", path.display(), e);
            RenderError::FontResourceMissing {
                path: path.display().to_string(),
            }
        })?;

        let font = Self {
            path: path.to_path_buf(),
            bytes,
        };
        font.metrics()?;
        Ok(font)
    }

    pub fn metrics(&self) -> Result<FontMetrics<'_>, RenderError> {
        let face = ttf_parser::Face::parse(&self.bytes, 0).map_err(|e| RenderError::InvalidFont {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(FontMetrics { face })
    }
}

/// Horizontal advances from the font's `hmtx` table.
pub struct FontMetrics<'a> {
    face: ttf_parser::Face<'a>,
}

impl TextMeasure for FontMetrics<'_> {
    fn width(&self, text: &str, size: f32) -> f32 {
        let units_per_em = f32::from(self.face.units_per_em());
        let fallback = self.face.units_per_em() / 2;
        let units: u32 = text
            .chars()
            .map(|c| {
                self.face
                    .glyph_index(c)
                    .and_then(|id| self.face.glyph_hor_advance(id))
                    .unwrap_or(fallback) as u32
            })
            .sum();
        units as f32 * size / units_per_em
    }
}

pub struct DocumentRenderer {
    font_path: PathBuf,
}

impl DocumentRenderer {
    pub fn new(font_path: impl Into<PathBuf>) -> Self {
        Self {
            font_path: font_path.into(),
        }
    }

    pub fn render(&self, commits: &[Commit]) -> Result<Vec<u8>, RenderError> {
        let font = FontResource::load(&self.font_path)?;
        let layout = DocumentLayout::build(commits, &font.metrics()?);

        let mut sink = CollectingSink::default();
        write_document(&layout, &font, &mut sink)?;
        tracing::debug!(
            "Document stream completed: {} lines on {} pages, {} chunks",
            layout.lines().count(),
            layout.pages.len(),
            sink.chunk_count()
        );
        sink.into_bytes()
    }
}

fn document_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Document(e.to_string())
}

fn mm(pt: f32) -> Mm {
    Mm(pt * PT_TO_MM)
}

/// Serialize `layout` into `sink`, signalling `on_end` after the last byte.
pub fn write_document<S: ChunkSink>(
    layout: &DocumentLayout,
    font: &FontResource,
    sink: &mut S,
) -> Result<(), RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(TITLE, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
    let font_ref = doc
        .add_external_font(Cursor::new(font.bytes.as_slice()))
        .map_err(document_error)?;

    for (index, lines) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        for line in lines {
            draw_line(&layer, &font_ref, line);
        }
    }

    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, SinkWriter { sink });
    doc.save(&mut writer).map_err(document_error)?;
    let writer = writer
        .into_inner()
        .map_err(|e| document_error(e.error()))?;
    writer.sink.on_end();
    Ok(())
}

fn draw_line(layer: &PdfLayerReference, font: &IndirectFontRef, line: &PlacedText) {
    layer.use_text(line.text.as_str(), line.size, mm(line.x), mm(line.y), font);

    if line.underline {
        let y = line.y - line.size * 0.15;
        layer.set_outline_thickness(UNDERLINE_THICKNESS);
        layer.add_line(Line {
            points: vec![
                (Point::new(mm(line.x), mm(y)), false),
                (Point::new(mm(line.x + line.width), mm(y)), false),
            ],
            is_closed: false,
        });
    }
}

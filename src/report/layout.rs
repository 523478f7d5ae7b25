//! Page layout for the document report.
//!
//! Positions are in PDF points with the origin at the bottom-left corner.
//! Page geometry follows US Letter with one-inch margins.

use textwrap::WordSeparator;
use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;

use crate::models::Commit;

pub const TITLE: &str = "Git Commit Report";

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 72.0;
pub const TITLE_SIZE: f32 = 18.0;
pub const BODY_SIZE: f32 = 12.0;
const LINE_SPACING: f32 = 1.2;

/// Measures rendered text width in points.
pub trait TextMeasure {
    fn width(&self, text: &str, size: f32) -> f32;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub size: f32,
    pub x: f32,
    /// Baseline
    pub y: f32,
    pub width: f32,
    pub underline: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<Vec<PlacedText>>,
}

impl DocumentLayout {
    /// Title, then one block per commit in input order: an underlined
    /// `"{n}. {author} - {date}"` heading, the message, and a blank line.
    pub fn build(commits: &[Commit], measure: &impl TextMeasure) -> Self {
        let mut cursor = Cursor::new(measure);

        cursor.centered(TITLE, TITLE_SIZE);
        cursor.blank(BODY_SIZE);

        for (index, commit) in commits.iter().enumerate() {
            let heading = format!("{}. {} - {}", index + 1, commit.author_name, commit.date);
            cursor.paragraph(&heading, BODY_SIZE, true);
            for line in commit.message.split('\n') {
                cursor.paragraph(line, BODY_SIZE, false);
            }
            cursor.blank(BODY_SIZE);
        }

        cursor.finish()
    }

    pub fn lines(&self) -> impl Iterator<Item = &PlacedText> {
        self.pages.iter().flatten()
    }
}

struct Cursor<'m, M> {
    measure: &'m M,
    pages: Vec<Vec<PlacedText>>,
    current: Vec<PlacedText>,
    /// Top of the next line
    y: f32,
}

impl<'m, M: TextMeasure> Cursor<'m, M> {
    fn new(measure: &'m M) -> Self {
        Self {
            measure,
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn advance(&mut self, size: f32) -> f32 {
        let height = size * LINE_SPACING;
        if self.y - height < MARGIN {
            self.break_page();
        }
        let baseline = self.y - size;
        self.y -= height;
        baseline
    }

    fn place(&mut self, text: String, size: f32, x: f32, underline: bool) {
        let width = self.measure.width(&text, size);
        let y = self.advance(size);
        self.current.push(PlacedText {
            text,
            size,
            x,
            y,
            width,
            underline,
        });
    }

    fn centered(&mut self, text: &str, size: f32) {
        for line in wrap(text, size, Self::content_width(), self.measure) {
            let width = self.measure.width(&line, size);
            let x = MARGIN + ((Self::content_width() - width) / 2.0).max(0.0);
            self.place(line, size, x, false);
        }
    }

    fn paragraph(&mut self, text: &str, size: f32, underline: bool) {
        let lines = wrap(text, size, Self::content_width(), self.measure);
        if lines.is_empty() {
            self.blank(size);
        }
        for line in lines {
            self.place(line, size, MARGIN, underline);
        }
    }

    /// A blank line that would cross the bottom margin becomes the page break.
    fn blank(&mut self, size: f32) {
        let height = size * LINE_SPACING;
        if self.y - height < MARGIN {
            self.break_page();
        } else {
            self.y -= height;
        }
    }

    fn finish(mut self) -> DocumentLayout {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        DocumentLayout { pages: self.pages }
    }
}

#[derive(Debug)]
struct MeasuredWord<'a> {
    word: &'a str,
    whitespace: &'a str,
    width: f64,
    whitespace_width: f64,
}

impl Fragment for MeasuredWord<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn whitespace_width(&self) -> f64 {
        self.whitespace_width
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// First-fit word wrap by measured width. Words wider than a line are
/// broken between characters so no line exceeds `max_width`.
pub fn wrap(text: &str, size: f32, max_width: f32, measure: &impl TextMeasure) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut words: Vec<MeasuredWord> = Vec::new();
    for w in WordSeparator::AsciiSpace.find_words(text) {
        let whitespace_width = measure.width(w.whitespace, size) as f64;
        let width = measure.width(w.word, size);
        if width <= max_width {
            words.push(MeasuredWord {
                word: w.word,
                whitespace: w.whitespace,
                width: width as f64,
                whitespace_width,
            });
            continue;
        }

        let pieces = split_to_width(w.word, size, max_width, measure);
        let last = pieces.len().saturating_sub(1);
        for (i, piece) in pieces.into_iter().enumerate() {
            let (whitespace, whitespace_width) = if i == last {
                (w.whitespace, whitespace_width)
            } else {
                ("", 0.0)
            };
            words.push(MeasuredWord {
                word: piece,
                whitespace,
                width: measure.width(piece, size) as f64,
                whitespace_width,
            });
        }
    }

    wrap_first_fit(&words, &[max_width as f64])
        .into_iter()
        .map(|line| {
            let mut out = String::new();
            for (i, fragment) in line.iter().enumerate() {
                out.push_str(fragment.word);
                if i + 1 < line.len() {
                    out.push_str(fragment.whitespace);
                }
            }
            out
        })
        .collect()
}

/// Greedy character runs of `word`, each at most `max_width` wide. A single
/// character wider than the line still gets a run of its own.
fn split_to_width<'a>(
    word: &'a str,
    size: f32,
    max_width: f32,
    measure: &impl TextMeasure,
) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (index, c) in word.char_indices() {
        let end = index + c.len_utf8();
        if index > start && measure.width(&word[start..end], size) > max_width {
            pieces.push(&word[start..index]);
            start = index;
        }
    }
    if start < word.len() {
        pieces.push(&word[start..]);
    }
    pieces
}

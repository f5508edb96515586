//! Text run extraction boundary.
//!
//! The outline pipeline only ever sees [`PageRuns`]. [`RunSource`] isolates
//! where those come from: [`LopdfRunSource`] walks real content streams,
//! and a plain `Vec<PageRuns>` serves callers that already have run data.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{sniff_bytes, sniff_file};
use crate::error::{Error, Result};
use crate::model::{BoundingBox, PageRuns, TextRun};

use super::options::{ErrorMode, ParseOptions};

/// Default leading when a content stream never sets `TL`.
const DEFAULT_LEADING: f32 = 12.0;

/// US Letter, used when a page has no usable MediaBox.
const LETTER: (f32, f32) = (612.0, 792.0);

/// Abstract source of page-ordered text runs for one document.
pub trait RunSource {
    /// Return every page's runs, in page order.
    fn page_runs(&self, options: &ParseOptions) -> Result<Vec<PageRuns>>;
}

impl RunSource for Vec<PageRuns> {
    fn page_runs(&self, options: &ParseOptions) -> Result<Vec<PageRuns>> {
        Ok(self
            .iter()
            .filter(|page| options.includes_page(page.index))
            .cloned()
            .collect())
    }
}

impl RunSource for [PageRuns] {
    fn page_runs(&self, options: &ParseOptions) -> Result<Vec<PageRuns>> {
        self.to_vec().page_runs(options)
    }
}

/// Concrete [`RunSource`] backed by `lopdf::Document`.
pub struct LopdfRunSource {
    doc: LopdfDocument,
}

impl LopdfRunSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_file(path)?;
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Load from a reader.
    pub fn load_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Page box as (left, bottom, width, height), following `Parent`
    /// links for inherited MediaBox entries.
    fn page_box(&self, page_id: ObjectId) -> (f32, f32, f32, f32) {
        let mut current = self.doc.get_dictionary(page_id).ok();
        // Inheritance chains are short; the bound guards against cycles.
        for _ in 0..16 {
            let Some(dict) = current else { break };
            if let Some(bbox) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| self.resolve(obj).as_array().ok())
                .and_then(|arr| media_box_from_array(arr))
            {
                return bbox;
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .and_then(|id| self.doc.get_dictionary(id))
                .ok();
        }
        (0.0, 0.0, LETTER.0, LETTER.1)
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// Whether a font dictionary describes a bold face.
    fn font_is_bold(&self, base_font: &str, font: &Dictionary) -> bool {
        if is_bold_font_name(base_font) {
            return true;
        }

        let Some(descriptor) = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|obj| self.resolve(obj).as_dict().ok())
        else {
            return false;
        };

        let heavy_weight = descriptor
            .get(b"FontWeight")
            .and_then(Object::as_float)
            .is_ok_and(|weight| weight >= 600.0);
        // Bit 19 of the descriptor flags is ForceBold.
        let force_bold = descriptor
            .get(b"Flags")
            .and_then(Object::as_i64)
            .is_ok_and(|flags| flags & (1 << 18) != 0);

        heavy_weight || force_bold
    }

    /// Extract the runs of a single page.
    fn extract_page(&self, index: u32, page_id: ObjectId) -> Result<PageRuns> {
        let (left, bottom, width, height) = self.page_box(page_id);
        let mut page = PageRuns::new(index, width, height);

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::TextExtract(format!("page {}: {}", index, e)))?;
        let styles: HashMap<Vec<u8>, FontStyle> = fonts
            .iter()
            .map(|(name, font)| {
                let base_font = font
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_default();
                let bold = self.font_is_bold(&base_font, font);
                (name.clone(), FontStyle { bold })
            })
            .collect();

        let content = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| Error::TextExtract(format!("page {}: {}", index, e)))?;
        let content = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::TextExtract(format!("page {}: {}", index, e)))?;

        let mut state = TextState::default();
        let mut ctm = Affine::default();
        let mut saved_ctm: Vec<Affine> = Vec::new();
        let mut in_text_block = false;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => saved_ctm.push(ctm),
                "Q" => {
                    if let Some(previous) = saved_ctm.pop() {
                        ctm = previous;
                    }
                }
                "cm" => {
                    if let Some(m) = Affine::from_operands(operands) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        state.font = name.clone();
                    }
                    state.font_size = operands.get(1).and_then(get_number).unwrap_or(0.0);
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    let tx = operands.first().and_then(get_number).unwrap_or(0.0);
                    let ty = operands.get(1).and_then(get_number).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.matrix.translate(tx, ty);
                }
                "Tm" => {
                    if operands.len() >= 6 {
                        let n: Vec<f32> = operands.iter().map(|o| get_number(o).unwrap_or(0.0)).collect();
                        state.matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                    }
                }
                "T*" => state.matrix.next_line(state.leading),
                "Tj" | "TJ" | "'" | "\"" if in_text_block => {
                    if op.operator == "'" || op.operator == "\"" {
                        state.matrix.next_line(state.leading);
                    }
                    let text = match op.operator.as_str() {
                        "TJ" => match operands.first() {
                            Some(Object::Array(items)) => self.decode_array(&fonts, &state.font, items),
                            _ => String::new(),
                        },
                        "\"" => self.decode_operand(&fonts, &state.font, operands.get(2)),
                        _ => self.decode_operand(&fonts, &state.font, operands.first()),
                    };
                    if text.trim().is_empty() {
                        continue;
                    }

                    let rendering = state.matrix.affine().then(&ctm);
                    let size = state.font_size * rendering.vertical_scale();
                    let (x, y) = rendering.origin();
                    let advance = estimate_advance(&text, state.font_size);
                    let x = x - left;
                    let baseline = bottom + height - y;
                    let bbox = BoundingBox::new(
                        x,
                        baseline - size * 0.8,
                        x + advance * rendering.horizontal_scale(),
                        baseline + size * 0.2,
                    );
                    let bold = styles.get(&state.font).map(|s| s.bold);

                    page.push(TextRun {
                        text,
                        font_size: (size > 0.0).then_some(size),
                        is_bold: bold,
                        bbox,
                    });
                    state.matrix.advance(advance);
                }
                _ => {}
            }
        }

        log::trace!("page {}: {} runs", index, page.runs.len());
        Ok(page)
    }

    fn decode_operand(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        operand: Option<&Object>,
    ) -> String {
        match operand {
            Some(Object::String(bytes, _)) => self.decode_bytes(fonts, font, bytes),
            _ => String::new(),
        }
    }

    /// Decode a `TJ` array. Large negative adjustments are word gaps.
    fn decode_array(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        items: &[Object],
    ) -> String {
        // 1/1000 text space units; roughly a fifth of an em.
        const SPACE_THRESHOLD: f32 = 200.0;

        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode_bytes(fonts, font, bytes));
                }
                other => {
                    let adjustment = -get_number(other).unwrap_or(0.0);
                    if adjustment > SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }

    fn decode_bytes(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        bytes: &[u8],
    ) -> String {
        fonts
            .get(font)
            .and_then(|dict| dict.get_font_encoding(&self.doc).ok())
            .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }
}

impl RunSource for LopdfRunSource {
    fn page_runs(&self, options: &ParseOptions) -> Result<Vec<PageRuns>> {
        let pages = self.doc.get_pages();
        if pages.is_empty() {
            return Err(Error::NoPages);
        }

        let mut result = Vec::with_capacity(pages.len());
        for (page_num, page_id) in pages {
            let index = page_num.saturating_sub(1);
            if !options.includes_page(index) {
                break;
            }

            match self.extract_page(index, page_id) {
                Ok(page) => result.push(page),
                Err(e) if options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping text of page {}: {}", page_num, e);
                    let (_, _, width, height) = self.page_box(page_id);
                    result.push(PageRuns::new(index, width, height));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(result)
    }
}

#[derive(Debug, Clone, Copy)]
struct FontStyle {
    bold: bool,
}

/// Graphics-independent text state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    matrix: TextMatrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            font: Vec::new(),
            font_size: 0.0,
            leading: DEFAULT_LEADING,
        }
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Start of the current line, which Td and T* are relative to.
    line_e: f32,
    line_f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
        };
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    /// Move the pen after showing text, without starting a new line.
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn affine(&self) -> Affine {
        Affine {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
            e: self.e,
            f: self.f,
        }
    }
}

/// PDF transformation matrix `[a b c d e f]`, row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl Affine {
    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands.iter().take(6).filter_map(get_number).collect();
        if n.len() < 6 {
            return None;
        }
        Some(Self {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    /// `self × other`: apply `self`, then `other`.
    fn then(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn origin(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// MediaBox array to (left, bottom, width, height).
fn media_box_from_array(arr: &[Object]) -> Option<(f32, f32, f32, f32)> {
    if arr.len() < 4 {
        return None;
    }
    let n: Vec<f32> = arr.iter().take(4).filter_map(get_number).collect();
    if n.len() < 4 {
        return None;
    }
    let (left, right) = (n[0].min(n[2]), n[0].max(n[2]));
    let (bottom, top) = (n[1].min(n[3]), n[1].max(n[3]));
    let (width, height) = (right - left, top - bottom);
    (width > 0.0 && height > 0.0).then_some((left, bottom, width, height))
}

/// Approximate horizontal advance in unscaled text space: half an em per
/// character, as no glyph widths are consulted.
fn estimate_advance(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

/// Font names that denote a heavy face.
fn is_bold_font_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    ["bold", "black", "heavy", "demi", "semibold"]
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

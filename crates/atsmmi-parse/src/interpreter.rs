//! Content stream interpreter.
//!
//! Walks the operators of a page and reports every `re` rectangle and every
//! shown string to a [`ContentHandler`]. Only the state needed for positions
//! and text decoding is tracked: the CTM stack, the text matrices, leading
//! and the current font. Glyph widths are not read, so each show operator
//! becomes a single run at the text position where it starts.

use std::collections::HashMap;

use atsmmi_core::ExtractWarning;

use crate::cmap::CMap;
use crate::error::BackendError;
use crate::handler::{ContentHandler, RectEvent, TextEvent};
use crate::lopdf_backend::{decode_stream, resolve_ref};
use crate::state::{GraphicsState, Matrix, TextState};
use crate::tokenizer::{Operand, Operator, tokenize};

/// How the bytes of a font's strings map to text.
#[derive(Debug)]
struct CachedFont {
    cmap: Option<CMap>,
    /// Bytes per character code: 2 for Type0 fonts, 1 otherwise.
    code_width: usize,
}

impl CachedFont {
    const SIMPLE: CachedFont = CachedFont {
        cmap: None,
        code_width: 1,
    };

    fn decode(&self, bytes: &[u8]) -> String {
        if let Some(cmap) = &self.cmap {
            return cmap.decode(bytes, self.code_width);
        }
        decode_text_string(bytes, self.code_width)
    }
}

/// Decode a string without a ToUnicode map: UTF-16BE when marked with a
/// byte order mark or shown with a two-byte font, Windows-1252 otherwise.
fn decode_text_string(bytes: &[u8], code_width: usize) -> String {
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        let (text, _) = encoding_rs::UTF_16BE.decode_without_bom_handling(rest);
        return text.into_owned();
    }
    if code_width == 2 {
        let (text, _) = encoding_rs::UTF_16BE.decode_without_bom_handling(bytes);
        return text.into_owned();
    }
    let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

struct Interpreter<'a> {
    doc: &'a lopdf::Document,
    resources: &'a lopdf::Dictionary,
    handler: &'a mut dyn ContentHandler,
    gstate: GraphicsState,
    tstate: TextState,
    fonts: HashMap<String, CachedFont>,
}

/// Interpret decoded content stream bytes.
///
/// Font resources are looked up in `resources`. Problems that do not stop
/// interpretation (unknown fonts, unreadable CMaps, form XObjects, bad
/// operands) are reported through [`ContentHandler::on_warning`].
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] if the stream cannot be tokenized.
pub fn interpret_content(
    doc: &lopdf::Document,
    content: &[u8],
    resources: &lopdf::Dictionary,
    handler: &mut dyn ContentHandler,
) -> Result<(), BackendError> {
    let operators = tokenize(content)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(operators = operators.len(), "interpreting content stream");

    let mut interpreter = Interpreter {
        doc,
        resources,
        handler,
        gstate: GraphicsState::default(),
        tstate: TextState::default(),
        fonts: HashMap::new(),
    };
    for (index, op) in operators.iter().enumerate() {
        interpreter.apply(index, op);
    }
    Ok(())
}

impl Interpreter<'_> {
    fn apply(&mut self, index: usize, op: &Operator) {
        match op.name.as_str() {
            "q" => self.gstate.save(&self.tstate.params),
            "Q" => match self.gstate.restore() {
                Some(params) => self.tstate.params = params,
                None => self.warn(index, "Q without matching q"),
            },
            "cm" => match op.numbers::<6>() {
                Some(m) => self.gstate.concat(Matrix(m)),
                None => self.warn(index, "cm needs six numbers"),
            },
            "re" => match op.numbers::<4>() {
                Some([x, y, w, h]) => self.rect(x, y, w, h),
                None => self.warn(index, "re needs four numbers"),
            },

            "BT" => self.tstate.begin(),
            "ET" => self.tstate.end(),
            "Tf" => {
                let name = op.operands.first().and_then(Operand::as_name);
                match (name, op.number(1)) {
                    (Some(name), Some(size)) => {
                        self.tstate.params.font_name = name.to_string();
                        self.tstate.params.font_size = size;
                        self.load_font(index, name);
                    }
                    _ => self.warn(index, "Tf needs a font name and a size"),
                }
            }
            "TL" => {
                if let Some(leading) = op.number(0) {
                    self.tstate.params.leading = leading;
                }
            }
            "Tm" => {
                if let Some(m) = op.numbers::<6>() {
                    self.tstate.set_matrix(Matrix(m));
                }
            }
            "Td" => {
                if let Some([tx, ty]) = op.numbers::<2>() {
                    self.tstate.move_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = op.numbers::<2>() {
                    self.tstate.move_line_set_leading(tx, ty);
                }
            }
            "T*" => self.tstate.next_line(),

            "Tj" | "TJ" => self.show(index, op.operands.first()),
            "'" => {
                self.tstate.next_line();
                self.show(index, op.operands.first());
            }
            "\"" => {
                self.tstate.next_line();
                self.show(index, op.operands.get(2));
            }

            "Do" => self.warn(index, "XObject content is not interpreted"),
            _ => {}
        }
    }

    fn warn(&mut self, index: usize, description: &str) {
        #[cfg(feature = "tracing")]
        tracing::debug!(operator = index, "{description}");
        self.handler
            .on_warning(ExtractWarning::at_operator(description, index));
    }

    /// The rectangle's corners are mapped through the CTM and the
    /// axis-aligned box around them is reported.
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let ctm = self.gstate.ctm();
        let corners = [
            ctm.transform_point(x, y),
            ctm.transform_point(x + w, y),
            ctm.transform_point(x, y + h),
            ctm.transform_point(x + w, y + h),
        ];
        let (mut min_x, mut min_y) = corners[0];
        let (mut max_x, mut max_y) = corners[0];
        for &(cx, cy) in &corners[1..] {
            min_x = min_x.min(cx);
            min_y = min_y.min(cy);
            max_x = max_x.max(cx);
            max_y = max_y.max(cy);
        }
        self.handler.on_rect(RectEvent {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        });
    }

    /// Report the string operand of a show operator. A `TJ` array
    /// contributes its strings concatenated; its kerning numbers are ignored.
    fn show(&mut self, index: usize, operand: Option<&Operand>) {
        let bytes: Vec<u8> = match operand {
            Some(Operand::Str(bytes)) => bytes.clone(),
            Some(Operand::Array(items)) => items
                .iter()
                .filter_map(Operand::as_bytes)
                .flatten()
                .copied()
                .collect(),
            _ => {
                self.warn(index, "text operator without a string operand");
                return;
            }
        };
        if !self.tstate.in_text_object() {
            self.warn(index, "text shown outside BT/ET");
        }

        let font_name = self.tstate.params.font_name.clone();
        let text = self
            .fonts
            .get(&font_name)
            .unwrap_or(&CachedFont::SIMPLE)
            .decode(&bytes);
        let (x, y) = self.tstate.origin_in(self.gstate.ctm());

        self.handler.on_text(TextEvent {
            x,
            y,
            text,
            font_name,
            font_size: self.tstate.params.font_size,
        });
    }

    fn load_font(&mut self, index: usize, name: &str) {
        if self.fonts.contains_key(name) {
            return;
        }
        let font = match font_dict(self.doc, self.resources, name) {
            Some(dict) => self.read_font(index, name, dict),
            None => {
                self.warn(index, &format!("font {name} not found in resources"));
                CachedFont::SIMPLE
            }
        };
        self.fonts.insert(name.to_string(), font);
    }

    fn read_font(&mut self, index: usize, name: &str, dict: &lopdf::Dictionary) -> CachedFont {
        let subtype = dict.get(b"Subtype").and_then(|o| o.as_name()).ok();
        let code_width = if subtype == Some(b"Type0".as_slice()) {
            2
        } else {
            1
        };

        let cmap = match dict.get(b"ToUnicode") {
            Ok(obj) => match read_to_unicode(self.doc, obj) {
                Ok(cmap) => Some(cmap),
                Err(e) => {
                    self.warn(index, &format!("font {name}: {e}"));
                    None
                }
            },
            Err(_) => None,
        };
        if code_width == 2 && cmap.is_none() {
            self.warn(
                index,
                &format!("composite font {name} has no usable ToUnicode map"),
            );
        }

        CachedFont { cmap, code_width }
    }
}

/// `/Resources /Font /<name>`, with references resolved.
fn font_dict<'a>(
    doc: &'a lopdf::Document,
    resources: &'a lopdf::Dictionary,
    name: &str,
) -> Option<&'a lopdf::Dictionary> {
    let fonts = resolve_ref(doc, resources.get(b"Font").ok()?).as_dict().ok()?;
    let font = resolve_ref(doc, fonts.get(name.as_bytes()).ok()?);
    font.as_dict().ok()
}

fn read_to_unicode(doc: &lopdf::Document, obj: &lopdf::Object) -> Result<CMap, BackendError> {
    let stream = resolve_ref(doc, obj)
        .as_stream()
        .map_err(|e| BackendError::Font(format!("ToUnicode is not a stream: {e}")))?;
    let data = decode_stream(stream)?;
    CMap::parse(&data)
}

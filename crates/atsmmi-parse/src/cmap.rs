//! ToUnicode CMaps.
//!
//! A ToUnicode stream is PostScript-like, so it is read with the content
//! stream tokenizer: the source codes and their UTF-16BE targets are the
//! operands of the `endbfchar` and `endbfrange` operators.

use std::collections::HashMap;

use crate::error::BackendError;
use crate::tokenizer::{Operand, tokenize};

/// Character code to Unicode mapping of a font.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CMap {
    mappings: HashMap<u32, String>,
}

impl CMap {
    /// Parse the decoded bytes of a `/ToUnicode` stream.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Font`] if the stream cannot be tokenized.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let operators = tokenize(data)
            .map_err(|e| BackendError::Font(format!("unreadable ToUnicode CMap: {e}")))?;

        let mut mappings = HashMap::new();
        for op in &operators {
            match op.name.as_str() {
                "endbfchar" => {
                    for pair in op.operands.chunks_exact(2) {
                        if let (Some(src), Some(dst)) = (pair[0].as_bytes(), pair[1].as_bytes()) {
                            mappings.insert(code_of(src), utf16be(dst));
                        }
                    }
                }
                "endbfrange" => {
                    for triple in op.operands.chunks_exact(3) {
                        insert_range(&mut mappings, &triple[0], &triple[1], &triple[2]);
                    }
                }
                _ => {}
            }
        }

        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    /// Decode a shown string, `code_width` bytes per character code.
    ///
    /// Codes without a mapping decode to U+FFFD.
    pub fn decode(&self, bytes: &[u8], code_width: usize) -> String {
        bytes
            .chunks(code_width.max(1))
            .map(|code| self.lookup(code_of(code)).unwrap_or("\u{FFFD}"))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Widest `bfrange` accepted; larger ranges are ignored.
const MAX_RANGE_SPAN: u32 = 0x10000;

/// `<lo> <hi> <dst>` maps consecutive codes to consecutive targets, and
/// `<lo> <hi> [<dst> ...]` lists one target per code.
fn insert_range(mappings: &mut HashMap<u32, String>, lo: &Operand, hi: &Operand, dst: &Operand) {
    let (Some(lo), Some(hi)) = (lo.as_bytes(), hi.as_bytes()) else {
        return;
    };
    let (lo, hi) = (code_of(lo), code_of(hi));
    if hi < lo || hi - lo >= MAX_RANGE_SPAN {
        #[cfg(feature = "tracing")]
        tracing::debug!(lo, hi, "bfrange ignored");
        return;
    }

    match dst {
        Operand::Str(start) => {
            let mut units = utf16_units(start);
            for code in lo..=hi {
                mappings.insert(code, String::from_utf16_lossy(&units));
                if let Some(last) = units.last_mut() {
                    *last = last.wrapping_add(1);
                }
            }
        }
        Operand::Array(targets) => {
            for (code, target) in (lo..=hi).zip(targets) {
                if let Some(bytes) = target.as_bytes() {
                    mappings.insert(code, utf16be(bytes));
                }
            }
        }
        _ => {}
    }
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| match *pair {
            [hi, lo] => u16::from_be_bytes([hi, lo]),
            [single] => u16::from(single),
            _ => 0,
        })
        .collect()
}

fn utf16be(bytes: &[u8]) -> String {
    String::from_utf16_lossy(&utf16_units(bytes))
}

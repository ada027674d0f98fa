//! Content stream tokenizer.
//!
//! Splits content stream bytes into [`Operator`]s carrying the operands that
//! preceded them. The same syntax covers ToUnicode CMap streams, whose
//! `beginbfchar`/`endbfchar` sections tokenize as ordinary operators.

use crate::error::BackendError;

/// An operand of a content stream operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer or real number.
    Number(f64),
    /// Name, without the leading `/`.
    Name(String),
    /// Literal `(...)` or hex `<...>` string, as raw bytes.
    Str(Vec<u8>),
    Array(Vec<Operand>),
    /// `<< /Key value ... >>`, in source order.
    Dict(Vec<(String, Operand)>),
    Bool(bool),
    Null,
}

impl Operand {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// An operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Operator keyword, e.g. `"re"` or `"Tj"`.
    pub name: String,
    pub operands: Vec<Operand>,
}

impl Operator {
    /// The `index`-th operand as a number.
    pub fn number(&self, index: usize) -> Option<f64> {
        self.operands.get(index).and_then(Operand::as_number)
    }

    /// The first `N` operands as numbers, if they all are.
    pub fn numbers<const N: usize>(&self) -> Option<[f64; N]> {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.number(i)?;
        }
        Some(out)
    }
}

/// Tokenize a content stream.
///
/// Comments are dropped. Inline images (`BI ... ID ... EI`) are skipped
/// entirely since they carry neither rectangles nor text.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] for unterminated strings, arrays or
/// dictionaries and for malformed numbers.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    let mut lexer = Lexer { input, pos: 0 };
    let mut operators = Vec::new();
    let mut stack: Vec<Operand> = Vec::new();

    while let Some(token) = lexer.next_token()? {
        match token {
            Token::Operand(operand) => stack.push(operand),
            Token::Keyword(word) => match keyword_operand(&word) {
                Some(operand) => stack.push(operand),
                None if word == "BI" => {
                    lexer.skip_inline_image()?;
                    stack.clear();
                }
                None => operators.push(Operator {
                    name: word,
                    operands: std::mem::take(&mut stack),
                }),
            },
            Token::ArrayEnd => {
                return Err(BackendError::Interpreter(
                    "unexpected ']' outside array".to_string(),
                ));
            }
            Token::DictEnd => {
                return Err(BackendError::Interpreter(
                    "unexpected '>>' outside dictionary".to_string(),
                ));
            }
        }
    }

    Ok(operators)
}

fn keyword_operand(word: &str) -> Option<Operand> {
    match word {
        "true" => Some(Operand::Bool(true)),
        "false" => Some(Operand::Bool(false)),
        "null" => Some(Operand::Null),
        _ => None,
    }
}

enum Token {
    Operand(Operand),
    Keyword(String),
    ArrayEnd,
    DictEnd,
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn malformed(what: impl Into<String>) -> BackendError {
    BackendError::Interpreter(what.into())
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_blank(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, BackendError> {
        loop {
            self.skip_blank();
            let Some(b) = self.peek() else {
                return Ok(None);
            };
            let token = match b {
                b'(' => Token::Operand(Operand::Str(self.literal_string()?)),
                b'<' if self.peek_at(1) == Some(b'<') => {
                    self.pos += 2;
                    Token::Operand(Operand::Dict(self.dict_body()?))
                }
                b'<' => Token::Operand(Operand::Str(self.hex_string()?)),
                b'>' if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    Token::DictEnd
                }
                b'[' => {
                    self.pos += 1;
                    Token::Operand(Operand::Array(self.array_body()?))
                }
                b']' => {
                    self.pos += 1;
                    Token::ArrayEnd
                }
                b'/' => Token::Operand(Operand::Name(self.name())),
                b'0'..=b'9' | b'+' | b'-' | b'.' => Token::Operand(self.number()?),
                b if is_regular(b) => Token::Keyword(self.keyword()),
                _ => {
                    // Stray delimiter such as `{`, `}` or a lone `>`.
                    self.pos += 1;
                    continue;
                }
            };
            return Ok(Some(token));
        }
    }

    /// A value inside an array or dictionary; bare keywords become names.
    fn value(&mut self, context: &str) -> Result<Token, BackendError> {
        let token = self
            .next_token()?
            .ok_or_else(|| malformed(format!("unterminated {context}")))?;
        Ok(match token {
            Token::Keyword(word) => {
                Token::Operand(keyword_operand(&word).unwrap_or(Operand::Name(word)))
            }
            other => other,
        })
    }

    fn array_body(&mut self) -> Result<Vec<Operand>, BackendError> {
        let mut items = Vec::new();
        loop {
            match self.value("array")? {
                Token::Operand(operand) => items.push(operand),
                Token::ArrayEnd => return Ok(items),
                _ => return Err(malformed("unexpected '>>' in array")),
            }
        }
    }

    fn dict_body(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        let mut entries = Vec::new();
        loop {
            let key = match self.value("dictionary")? {
                Token::DictEnd => return Ok(entries),
                Token::Operand(Operand::Name(key)) => key,
                _ => return Err(malformed("expected name key in dictionary")),
            };
            match self.value("dictionary")? {
                Token::Operand(value) => entries.push((key, value)),
                _ => return Err(malformed(format!("missing value for /{key}"))),
            }
        }
    }

    fn literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => self.escape(&mut out)?,
                _ => out.push(b),
            }
        }

        Err(malformed("unterminated literal string"))
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), BackendError> {
        let b = self
            .peek()
            .ok_or_else(|| malformed("unterminated escape in literal string"))?;
        self.pos += 1;
        match b {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            // Line continuation.
            b'\r' => {
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xFF) as u8);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut nibbles = Vec::new();
        loop {
            let b = self
                .peek()
                .ok_or_else(|| malformed("unterminated hex string"))?;
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if is_whitespace(b) {
                continue;
            }
            let nibble =
                hex_value(b).ok_or_else(|| malformed(format!("invalid hex digit {:?}", b as char)))?;
            nibbles.push(nibble);
        }
        if nibbles.len() % 2 == 1 {
            nibbles.push(0);
        }
        Ok(nibbles.chunks(2).map(|p| (p[0] << 4) | p[1]).collect())
    }

    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];

        let mut bytes = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    bytes.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            bytes.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => {}
                b'.' if !seen_dot => seen_dot = true,
                _ => break,
            }
            self.pos += 1;
        }

        let token = String::from_utf8_lossy(&self.input[start..self.pos]);
        // PDF producers write "-.5" and "5." freely; a bare sign is zero.
        let text = match token.as_ref() {
            "+" | "-" | "." | "+." | "-." => "0",
            t => t,
        };
        text.parse::<f64>()
            .map(Operand::Number)
            .map_err(|_| malformed(format!("invalid number: {token}")))
    }

    fn keyword(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Skip from after `BI` to after the matching `EI`.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        // Dictionary entries up to the `ID` keyword.
        loop {
            match self.next_token()? {
                None => return Err(malformed("inline image without ID")),
                Some(Token::Keyword(word)) if word == "ID" => break,
                Some(_) => {}
            }
        }
        // A single whitespace byte separates `ID` from the data.
        self.pos += 1;

        while self.pos + 1 < self.input.len() {
            let preceded = self.pos == 0 || is_whitespace(self.input[self.pos - 1]);
            let followed = self.peek_at(2).is_none_or(|b| !is_regular(b));
            if preceded && followed && self.peek() == Some(b'E') && self.peek_at(1) == Some(b'I') {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(malformed("inline image without EI"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(input: &[u8]) -> Operator {
        let ops = tokenize(input).unwrap();
        assert_eq!(ops.len(), 1, "expected one operator in {ops:?}");
        ops.into_iter().next().unwrap()
    }

    #[test]
    fn numbers() {
        let op = single(b"42 -7 3.25 .5 -.002 +1 5. re");
        assert_eq!(op.name, "re");
        assert_eq!(
            op.operands,
            vec![
                Operand::Number(42.0),
                Operand::Number(-7.0),
                Operand::Number(3.25),
                Operand::Number(0.5),
                Operand::Number(-0.002),
                Operand::Number(1.0),
                Operand::Number(5.0),
            ]
        );
    }

    #[test]
    fn rectangle_operands() {
        let op = single(b"56.7 600.2 200 18.5 re");
        assert_eq!(op.numbers::<4>(), Some([56.7, 600.2, 200.0, 18.5]));
        assert_eq!(op.numbers::<5>(), None);
    }

    #[test]
    fn names_with_hex_escapes() {
        let op = single(b"/F#231 9 Tf");
        assert_eq!(op.operands[0], Operand::Name("F#1".to_string()));
        assert_eq!(op.number(1), Some(9.0));
    }

    #[test]
    fn literal_strings() {
        let op = single(b"(MMI_\\(x\\) a(b)c\\n\\101) Tj");
        assert_eq!(op.operands, vec![Operand::Str(b"MMI_(x) a(b)c\nA".to_vec())]);
    }

    #[test]
    fn literal_string_line_continuation() {
        let op = single(b"(ab\\\ncd) Tj");
        assert_eq!(op.operands, vec![Operand::Str(b"abcd".to_vec())]);
    }

    #[test]
    fn hex_strings() {
        let op = single(b"<7B 31 2C> Tj");
        assert_eq!(op.operands, vec![Operand::Str(b"{1,".to_vec())]);
        let odd = single(b"<ABC> Tj");
        assert_eq!(odd.operands, vec![Operand::Str(vec![0xAB, 0xC0])]);
    }

    #[test]
    fn tj_array_with_kerning() {
        let op = single(b"[(MMI)-120(_ID)] TJ");
        assert_eq!(
            op.operands,
            vec![Operand::Array(vec![
                Operand::Str(b"MMI".to_vec()),
                Operand::Number(-120.0),
                Operand::Str(b"_ID".to_vec()),
            ])]
        );
    }

    #[test]
    fn dictionaries() {
        let op = single(b"/P <</MCID 3 /Alt (x) /Nested << /A true >>>> BDC");
        assert_eq!(
            op.operands[1],
            Operand::Dict(vec![
                ("MCID".to_string(), Operand::Number(3.0)),
                ("Alt".to_string(), Operand::Str(b"x".to_vec())),
                (
                    "Nested".to_string(),
                    Operand::Dict(vec![("A".to_string(), Operand::Bool(true))])
                ),
            ])
        );
    }

    #[test]
    fn operators_collect_their_own_operands() {
        let ops = tokenize(b"q 1 0 0 1 10 20 cm BT /F1 9 Tf 5 6 Td (x) Tj ET Q").unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["q", "cm", "BT", "Tf", "Td", "Tj", "ET", "Q"]);
        assert_eq!(ops[1].operands.len(), 6);
        assert!(ops[2].operands.is_empty());
        assert_eq!(ops[4].numbers::<2>(), Some([5.0, 6.0]));
    }

    #[test]
    fn quote_operators() {
        let ops = tokenize(b"(a) ' 1 2 (b) \"").unwrap();
        assert_eq!(ops[0].name, "'");
        assert_eq!(ops[1].name, "\"");
        assert_eq!(ops[1].operands.len(), 3);
    }

    #[test]
    fn star_operators() {
        let ops = tokenize(b"T* f* B*").unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["T*", "f*", "B*"]);
    }

    #[test]
    fn comments_are_dropped() {
        let ops = tokenize(b"% header\n0 0 m % move\n10 10 l\n").unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].name, "l");
    }

    #[test]
    fn inline_images_are_skipped() {
        let ops = tokenize(b"q BI /W 2 /H 1 /BPC 8 /CS /G ID \x00EI\xFF EI Q (t) Tj").unwrap();
        let names: Vec<&str> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["q", "Q", "Tj"]);
    }

    #[test]
    fn cmap_sections_tokenize() {
        let ops = tokenize(b"1 begincodespacerange <00> <FF> endcodespacerange\n2 beginbfchar <01> <0041> <02> <00420043> endbfchar").unwrap();
        let end = ops.iter().find(|o| o.name == "endbfchar").unwrap();
        assert_eq!(end.operands.len(), 4);
        assert_eq!(end.operands[3], Operand::Str(vec![0x00, 0x42, 0x00, 0x43]));
    }

    #[test]
    fn empty_and_blank_streams() {
        assert!(tokenize(b"").unwrap().is_empty());
        assert!(tokenize(b"  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn malformed_streams_are_errors() {
        assert!(tokenize(b"(never closed Tj").is_err());
        assert!(tokenize(b"[1 2 3").is_err());
        assert!(tokenize(b"1 2 ] re").is_err());
        assert!(tokenize(b"<<\n/A 1").is_err());
        assert!(tokenize(b"<4G> Tj").is_err());
    }
}

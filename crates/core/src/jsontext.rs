//! Rewriting JSON text while keeping the bytes of unchanged values.
//!
//! Hosts serialize builder stores with their own escaping: PHP's encoder
//! writes `/` as `\/` and non-ASCII characters as `\uXXXX`, JavaScript
//! writes both raw. [`rewrite`] walks the stored text alongside the updated
//! tree and copies every value that did not change verbatim. Changed values
//! are serialized in the [`JsonStyle`] detected from the stored text.
//!
//! # Example
//!
//! ```rust
//! use easy_language_core::jsontext::rewrite;
//! use serde_json::json;
//!
//! let stored = r#"{"title": "A", "link": "http:\/\/x.de\/"}"#;
//! let updated = json!({"title": "Grün", "link": "http://x.de/"});
//! assert_eq!(rewrite(stored, &updated).unwrap(), r#"{"title": "Grün", "link": "http:\/\/x.de\/"}"#);
//! ```

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Map, Value};
use tracing::trace;

use crate::{EasyLanguageError, Result};

/// Escaping choices of a JSON writer beyond what JSON requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonStyle {
    /// `/` is written as `\/`.
    pub escape_slashes: bool,
    /// Non-ASCII characters are written as UTF-16 `\uXXXX` escapes.
    pub escape_unicode: bool,
}

impl JsonStyle {
    /// Infer the style from existing JSON text.
    ///
    /// Unicode escaping is assumed only when the text is pure ASCII and
    /// escapes at least one non-ASCII character. Text without evidence
    /// either way is treated as raw.
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut style = Self::default();
        let mut escaped_non_ascii = false;

        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'\\' {
                i += 1;
                continue;
            }
            match bytes.get(i + 1) {
                Some(b'/') => style.escape_slashes = true,
                Some(b'u') => {
                    let code = text.get(i + 2..i + 6).and_then(|hex| u16::from_str_radix(hex, 16).ok());
                    if code.is_some_and(|code| code >= 0x80) {
                        escaped_non_ascii = true;
                    }
                }
                _ => {}
            }
            i += 2;
        }

        style.escape_unicode = escaped_non_ascii && text.is_ascii();
        style
    }
}

/// Compact output with the extra escapes of a [`JsonStyle`].
struct StyleFormatter(JsonStyle);

impl Formatter for StyleFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            let escape = (c == '/' && self.0.escape_slashes) || (!c.is_ascii() && self.0.escape_unicode);
            if !escape {
                continue;
            }

            writer.write_all(&fragment.as_bytes()[start..index])?;
            if c == '/' {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = index + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serialize `value` compactly in the given style.
pub fn to_string_styled(value: &Value, style: JsonStyle) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, StyleFormatter(style));
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| EasyLanguageError::InvalidEncoding(e.to_string()))
}

/// Serialize `updated` reusing the bytes of `stored` wherever values are equal.
///
/// When the structure differs (keys added, removed or reordered, a
/// container changing type) the whole tree is serialized in the stored
/// text's style instead.
pub fn rewrite(stored: &str, updated: &Value) -> Result<String> {
    let style = JsonStyle::detect(stored);
    let mut splicer = Splicer { text: stored, pos: 0, out: String::with_capacity(stored.len()), style };

    if splicer.value(updated).is_some() {
        splicer.whitespace();
        if splicer.pos == stored.len() {
            return Ok(splicer.out);
        }
    }

    trace!(?style, "Stored JSON structure changed, serializing whole tree");
    to_string_styled(updated, style)
}

struct Splicer<'a> {
    text: &'a str,
    pos: usize,
    out: String,
    style: JsonStyle,
}

impl<'a> Splicer<'a> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn copy(&mut self, len: usize) {
        self.out.push_str(&self.text[self.pos..self.pos + len]);
        self.pos += len;
    }

    fn whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        let len = rest.len() - rest.trim_start_matches([' ', '\t', '\n', '\r']).len();
        self.copy(len);
    }

    fn punctuation(&mut self, byte: u8) -> Option<()> {
        self.whitespace();
        (self.peek()? == byte).then(|| self.copy(1))
    }

    /// Advance over the string literal at the cursor without copying it.
    fn string_literal(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();
        if bytes.get(self.pos) != Some(&b'"') {
            return None;
        }

        let mut i = self.pos + 1;
        loop {
            match bytes.get(i)? {
                b'\\' => i += 2,
                b'"' => break,
                _ => i += 1,
            }
        }

        let literal = self.text.get(self.pos..=i)?;
        self.pos = i + 1;
        Some(literal)
    }

    /// Advance over a number, boolean or null without copying it.
    fn scalar_token(&mut self) -> Option<&'a str> {
        let rest = &self.text[self.pos..];
        let len = rest.find([',', '}', ']', ' ', '\t', '\n', '\r']).unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn value(&mut self, updated: &Value) -> Option<()> {
        self.whitespace();
        match (self.peek()?, updated) {
            (b'{', Value::Object(map)) => self.object(map),
            (b'[', Value::Array(items)) => self.array(items),
            (b'{' | b'[', _) => None,
            (b'"', _) => {
                let literal = self.string_literal()?;
                self.leaf(literal, updated)
            }
            _ => {
                let token = self.scalar_token()?;
                self.leaf(token, updated)
            }
        }
    }

    fn leaf(&mut self, original: &str, updated: &Value) -> Option<()> {
        let current: Value = serde_json::from_str(original).ok()?;
        if &current == updated {
            self.out.push_str(original);
        } else {
            self.out.push_str(&to_string_styled(updated, self.style).ok()?);
        }
        Some(())
    }

    fn object(&mut self, map: &Map<String, Value>) -> Option<()> {
        self.copy(1);
        self.whitespace();
        if self.peek()? == b'}' {
            self.copy(1);
            return map.is_empty().then_some(());
        }

        let mut keys = map.keys();
        let mut seen = 0;
        loop {
            self.whitespace();
            let literal = self.string_literal()?;
            let key: String = serde_json::from_str(literal).ok()?;
            // keys keep their stored order; anything else is a rebuilt tree
            if keys.next() != Some(&key) {
                return None;
            }
            self.out.push_str(literal);
            self.punctuation(b':')?;
            self.value(map.get(&key)?)?;
            seen += 1;

            self.whitespace();
            match self.peek()? {
                b',' => self.copy(1),
                b'}' => {
                    self.copy(1);
                    break;
                }
                _ => return None,
            }
        }

        (seen == map.len()).then_some(())
    }

    fn array(&mut self, items: &[Value]) -> Option<()> {
        self.copy(1);
        self.whitespace();
        if self.peek()? == b']' {
            self.copy(1);
            return items.is_empty().then_some(());
        }

        let mut index = 0;
        loop {
            self.value(items.get(index)?)?;
            index += 1;

            self.whitespace();
            match self.peek()? {
                b',' => self.copy(1),
                b']' => {
                    self.copy(1);
                    break;
                }
                _ => return None,
            }
        }

        (index == items.len()).then_some(())
    }
}

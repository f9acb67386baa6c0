//! OpenStep property-list parser.
//!
//! Parses the text format Xcode uses for `project.pbxproj` into [`Node`]s
//! that remember their byte spans, so callers can edit the original text
//! in place instead of re-serializing the whole document.

use crate::error::ParseError;
use crate::value::{Entry, Item, Node, Value};

/// Deepest allowed nesting of dictionaries and arrays.
const MAX_DEPTH: usize = 256;

/// Parse a complete document. Trailing content other than whitespace and
/// comments is an error.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let mut parser = Parser::new(text);
    if text.starts_with('\u{feff}') {
        parser.pos = '\u{feff}'.len_utf8();
    }
    parser.skip_trivia()?;
    let root = parser.parse_value()?;
    parser.skip_trivia()?;
    if parser.pos < parser.bytes.len() {
        return Err(parser.error("unexpected content after root value"));
    }
    Ok(root)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(self.text, self.pos, message)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), ParseError> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => Err(self.error(format!(
                "expected '{}', found '{}'",
                byte as char, b as char
            ))),
            None => Err(self.error(format!("expected '{}', found end of input", byte as char))),
        }
    }

    /// Skip whitespace, `/* */` block comments and `//` line comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b), _) if b.is_ascii_whitespace() => self.pos += 1,
                (Some(b'/'), Some(b'*')) => {
                    let start = self.pos;
                    match self.text[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += 2 + end + 2,
                        None => {
                            self.pos = start;
                            return Err(self.error("unterminated comment"));
                        }
                    }
                }
                (Some(b'/'), Some(b'/')) => match self.text[self.pos..].find('\n') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.bytes.len(),
                },
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(b'{') => self.parse_dict(),
            Some(b'(') => self.parse_array(),
            Some(b'<') => self.parse_data(),
            Some(b'"') | Some(b'\'') => self.parse_quoted(),
            Some(_) => self.parse_unquoted(),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_dict(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.enter()?;
        self.expect(b'{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b'}') {
                self.pos += 1;
                break;
            }
            let key = match self.peek() {
                Some(b'"') | Some(b'\'') => self.parse_quoted()?,
                Some(b'{') | Some(b'(') | Some(b'<') => {
                    return Err(self.error("dictionary keys must be strings"))
                }
                Some(_) => self.parse_unquoted()?,
                None => return Err(self.error("unterminated dictionary")),
            };
            self.skip_trivia()?;
            self.expect(b'=')?;
            self.skip_trivia()?;
            let value = self.parse_value()?;
            self.skip_trivia()?;
            self.expect(b';')?;

            let key_span = key.span.clone();
            let key = match key.value {
                Value::String(s) => s,
                _ => unreachable!("dictionary keys are parsed as strings"),
            };
            entries.push(Entry {
                key,
                key_span,
                value,
            });
        }
        self.depth -= 1;
        Ok(Node {
            value: Value::Dict(entries),
            span: start..self.pos,
        })
    }

    fn parse_array(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.enter()?;
        self.expect(b'(')?;
        let mut items = Vec::new();
        loop {
            let segment_start = self.pos;
            self.skip_trivia()?;
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.error("unterminated array")),
                _ => {}
            }
            let node = self.parse_value()?;
            let value_end = node.span.end;
            self.skip_trivia()?;
            let segment_end = match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.pos
                }
                Some(b')') => {
                    // Last element without a trailing comma; the closing
                    // paren's leading whitespace stays outside the segment.
                    self.pos = value_end;
                    value_end
                }
                Some(b) => {
                    return Err(self.error(format!(
                        "expected ',' or ')' in array, found '{}'",
                        b as char
                    )))
                }
                None => return Err(self.error("unterminated array")),
            };
            items.push(Item {
                node,
                segment: segment_start..segment_end,
            });
        }
        self.depth -= 1;
        Ok(Node {
            value: Value::Array(items),
            span: start..self.pos,
        })
    }

    fn parse_data(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.expect(b'<')?;
        let mut digits = Vec::new();
        loop {
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b) if b.is_ascii_hexdigit() => {
                    digits.push(b);
                    self.pos += 1;
                }
                Some(b) => {
                    return Err(self.error(format!("invalid character '{}' in data", b as char)))
                }
                None => return Err(self.error("unterminated data")),
            }
        }
        if digits.len() % 2 != 0 {
            return Err(self.error("data has an odd number of hex digits"));
        }
        let bytes = digits
            .chunks(2)
            .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
            .collect();
        Ok(Node {
            value: Value::Data(bytes),
            span: start..self.pos,
        })
    }

    fn parse_quoted(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        let quote = self.bytes[self.pos];
        self.pos += 1;
        let body_start = self.pos;
        loop {
            match self.peek() {
                Some(b'\\') => self.pos += 2,
                Some(b) if b == quote => break,
                Some(_) => self.pos += 1,
                None => {
                    self.pos = start;
                    return Err(self.error("unterminated string"));
                }
            }
        }
        let raw = &self.text[body_start..self.pos];
        self.pos += 1;
        let value = unescape(raw).map_err(|msg| ParseError::at(self.text, start, msg))?;
        Ok(Node {
            value: Value::String(value),
            span: start..self.pos,
        })
    }

    fn parse_unquoted(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            let starts_comment = b == b'/' && matches!(self.peek_at(1), Some(b'*') | Some(b'/'));
            if b.is_ascii_whitespace() || is_delimiter(b) || starts_comment {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            let found = self.text[start..].chars().next().unwrap_or(' ');
            return Err(self.error(format!("unexpected character '{}'", found)));
        }
        Ok(Node {
            value: Value::String(self.text[start..self.pos].to_string()),
            span: start..self.pos,
        })
    }
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'{' | b'}' | b'(' | b')' | b'<' | b'>' | b'=' | b';' | b',' | b'"' | b'\''
    )
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Resolve backslash escapes inside a quoted string body.
fn unescape(raw: &str) -> Result<String, String> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0c}'),
            Some('v') => out.push('\u{0b}'),
            Some('U') => {
                let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid unicode escape \\U{}", hex))?;
                let ch = char::from_u32(code)
                    .ok_or_else(|| format!("invalid unicode escape \\U{}", hex))?;
                out.push(ch);
            }
            Some(d @ '0'..='7') => {
                let mut code = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(v) => {
                            code = code * 8 + v;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            Some(other) => out.push(other),
            None => return Err("dangling escape at end of string".to_string()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(node: &Node) -> &[Entry] {
        node.as_dict().expect("dictionary")
    }

    #[test]
    fn test_parse_header_comment_and_dict() {
        let text = "// !$*UTF8*$!\n{\n\tarchiveVersion = 1;\n\tobjectVersion = 56;\n}\n";
        let root = parse(text).unwrap();
        let entries = dict(&root);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "archiveVersion");
        assert_eq!(root.get("objectVersion").unwrap().as_str(), Some("56"));
    }

    #[test]
    fn test_parse_block_comments_inside_values() {
        let text = "{ 1A2B /* gRPC-Core */ = { isa = PBXNativeTarget; name = \"gRPC-Core\"; }; }";
        let root = parse(text).unwrap();
        let target = root.get("1A2B").unwrap();
        assert_eq!(target.get("isa").unwrap().as_str(), Some("PBXNativeTarget"));
        assert_eq!(target.get("name").unwrap().as_str(), Some("gRPC-Core"));
    }

    #[test]
    fn test_array_segments_cover_trailing_comma() {
        let text = "(\n\t\"a\",\n\t\"-G\",\n)";
        let root = parse(text).unwrap();
        let items = root.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(&text[items[0].segment.clone()], "\n\t\"a\",");
        assert_eq!(&text[items[1].segment.clone()], "\n\t\"-G\",");
        assert_eq!(&text[items[1].node.span.clone()], "\"-G\"");
    }

    #[test]
    fn test_array_without_trailing_comma() {
        let text = "(a, b )";
        let root = parse(text).unwrap();
        let items = root.as_array().unwrap();
        assert_eq!(&text[items[0].segment.clone()], "a,");
        assert_eq!(&text[items[1].segment.clone()], " b");
        assert_eq!(root.span, 0..text.len());
    }

    #[test]
    fn test_empty_array_and_dict() {
        let root = parse("{ a = ( ); b = { }; }").unwrap();
        assert_eq!(root.get("a").unwrap().as_array().unwrap().len(), 0);
        assert_eq!(root.get("b").unwrap().as_dict().unwrap().len(), 0);
    }

    #[test]
    fn test_quoted_escapes() {
        let root = parse(r#"{ a = "line\nnext \"q\" \\ \U00e9"; }"#).unwrap();
        assert_eq!(
            root.get("a").unwrap().as_str(),
            Some("line\nnext \"q\" \\ \u{e9}")
        );
    }

    #[test]
    fn test_data_value() {
        let root = parse("{ d = <0fbd 7a>; }").unwrap();
        assert_eq!(
            root.get("d").unwrap().value,
            Value::Data(vec![0x0f, 0xbd, 0x7a])
        );
    }

    #[test]
    fn test_unquoted_path_with_slash() {
        let root = parse("{ path = Pods/Target/Info.plist; }").unwrap();
        assert_eq!(
            root.get("path").unwrap().as_str(),
            Some("Pods/Target/Info.plist")
        );
    }

    #[test]
    fn test_missing_semicolon_is_error() {
        let err = parse("{\n a = b\n}").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("expected ';'"));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = parse("{ a = \"open; }").unwrap_err();
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn test_trailing_garbage_is_error() {
        assert!(parse("{ } }").is_err());
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        assert!(parse("{ /* never closed }").is_err());
    }

    #[test]
    fn test_deep_nesting_is_error() {
        let text = format!("{{ objects = {}", "(".repeat(200_000));
        let err = parse(&text).unwrap_err();
        assert!(err.message.contains("nesting too deep"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_nesting_up_to_limit_parses() {
        let depth = MAX_DEPTH - 1;
        let text = format!("{{ a = {}{}; }}", "(".repeat(depth), ")".repeat(depth));
        let root = parse(&text).unwrap();
        assert!(root.get("a").unwrap().as_array().is_some());

        let text = format!("{{ a = {}{}; }}", "(".repeat(depth + 1), ")".repeat(depth + 1));
        assert!(parse(&text).is_err());
    }
}

//! Parsed property-list values with source spans.

use std::ops::Range;

/// Byte range into the document text.
pub type Span = Range<usize>;

/// A parsed value together with the span it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub value: Value,
    pub span: Span,
}

/// OpenStep property-list value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted or unquoted string, with escapes resolved.
    String(String),
    Array(Vec<Item>),
    Dict(Vec<Entry>),
    /// `<hex bytes>`
    Data(Vec<u8>),
}

/// An array element.
///
/// `segment` covers everything that belongs to this element in the source:
/// the whitespace and comments after the previous separator, the value
/// itself, and its trailing comma if present. Deleting the segment removes
/// the element cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub node: Node,
    pub segment: Span,
}

/// A dictionary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub key_span: Span,
    pub value: Node,
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Item]> {
        match &self.value {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[Entry]> {
        match &self.value {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key when this node is a dictionary.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_dict()?
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    /// Look up a dictionary entry (key and value) by key.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.as_dict()?.iter().find(|e| e.key == key)
    }

    /// String elements of an array, or `None` if this is not an array of
    /// strings.
    pub fn string_items(&self) -> Option<Vec<String>> {
        self.as_array()?
            .iter()
            .map(|item| item.node.as_str().map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(s: &str) -> Node {
        Node {
            value: Value::String(s.to_string()),
            span: 0..0,
        }
    }

    fn item(s: &str) -> Item {
        Item {
            node: string(s),
            segment: 0..0,
        }
    }

    #[test]
    fn test_string_items() {
        let list = Node {
            value: Value::Array(vec![item("$(inherited)"), item("-G")]),
            span: 0..0,
        };
        assert_eq!(
            list.string_items(),
            Some(vec!["$(inherited)".to_string(), "-G".to_string()])
        );
        assert_eq!(string("-G").string_items(), None);
    }

    #[test]
    fn test_mixed_array_has_no_string_items() {
        let nested = Item {
            node: Node {
                value: Value::Array(Vec::new()),
                span: 0..0,
            },
            segment: 0..0,
        };
        let list = Node {
            value: Value::Array(vec![item("-ObjC"), nested]),
            span: 0..0,
        };
        assert_eq!(list.string_items(), None);
    }

    #[test]
    fn test_dict_lookup() {
        let dict = Node {
            value: Value::Dict(vec![Entry {
                key: "name".to_string(),
                key_span: 0..4,
                value: string("Debug"),
            }]),
            span: 0..0,
        };
        assert_eq!(dict.get("name").and_then(Node::as_str), Some("Debug"));
        assert_eq!(dict.entry("name").map(|e| e.key_span.clone()), Some(0..4));
        assert!(dict.get("isa").is_none());
        assert!(string("x").get("name").is_none());
    }
}

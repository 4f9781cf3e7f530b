//! Line-tracking YAML loader.
//!
//! [`load_str`] builds the usual [`serde_yaml::Value`] tree, with one
//! addition: every mapping carries the reserved key [`LINE_KEY`] whose value
//! is the 1-based line on which the mapping starts. That marker is what lets
//! a finding returned by the scanning service point back at a task.
//!
//! `serde_yaml` does not expose source positions, so the tree is assembled
//! from the event stream of [`yaml_rust2`], whose events carry a [`Marker`].

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Number, Value};
use std::collections::HashMap;
use std::path::Path;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::ScanError;

/// Reserved mapping key holding the 1-based start line of the mapping.
pub const LINE_KEY: &str = "__line__";

/// Merge key (`<<: *anchor`) understood by the YAML 1.1 loaders Ansible uses.
const MERGE_KEY: &str = "<<";

/// Parses `text` and returns the first document with line markers attached.
///
/// An empty stream yields [`Value::Null`].
///
/// # Examples
///
/// ```
/// use steampunk_scanner::yaml::{load_str, LINE_KEY};
///
/// let doc = load_str("- name: hello\n  debug:\n    msg: hi\n").unwrap();
/// let task = &doc[0];
/// assert_eq!(task[LINE_KEY].as_u64(), Some(1));
/// assert_eq!(task["debug"][LINE_KEY].as_u64(), Some(3));
/// ```
pub fn load_str(text: &str) -> std::result::Result<Value, ScanError> {
    let mut builder = TreeBuilder::default();
    Parser::new_from_str(text).load(&mut builder, false)?;
    Ok(builder.root.unwrap_or(Value::Null))
}

/// Reads and parses a YAML file. See [`load_str`].
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be read, [`Error::Parse`] when it is
/// not valid YAML.
pub fn load_file(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&text).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the line marker of a mapping, if it has one.
pub fn line_of(mapping: &Mapping) -> Option<usize> {
    mapping
        .get(LINE_KEY)
        .and_then(Value::as_u64)
        .map(|line| line as usize)
}

enum Frame {
    Sequence {
        items: Vec<Value>,
        anchor: usize,
    },
    Mapping {
        entries: Mapping,
        pending_key: Option<Value>,
        anchor: usize,
        line: usize,
    },
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, Value>,
    root: Option<Value>,
}

impl TreeBuilder {
    fn push_value(&mut self, value: Value, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }

        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(value);
                }
            }
            Some(Frame::Sequence { items, .. }) => items.push(value),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                None => *pending_key = Some(value),
                Some(key) if key.as_str() == Some(MERGE_KEY) => merge_into(entries, value),
                Some(key) => {
                    entries.insert(key, value);
                }
            },
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        match ev {
            Event::SequenceStart(anchor, ..) => self.stack.push(Frame::Sequence {
                items: Vec::new(),
                anchor,
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Frame::Mapping {
                entries: Mapping::new(),
                pending_key: None,
                anchor,
                line: mark.line(),
            }),
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence { items, anchor }) => {
                    self.push_value(Value::Sequence(items), anchor)
                }
                Some(Frame::Mapping {
                    mut entries,
                    anchor,
                    line,
                    ..
                }) => {
                    entries.insert(
                        Value::String(LINE_KEY.to_string()),
                        Value::Number(Number::from(line as u64)),
                    );
                    self.push_value(Value::Mapping(entries), anchor)
                }
                None => {}
            },
            Event::Scalar(text, style, anchor, ..) => {
                let value = if style == TScalarStyle::Plain {
                    resolve_plain(text)
                } else {
                    Value::String(text)
                };
                self.push_value(value, anchor)
            }
            Event::Alias(id) => {
                let value = self.anchors.get(&id).cloned().unwrap_or(Value::Null);
                self.push_value(value, 0)
            }
            _ => {}
        }
    }
}

/// Applies a `<<` merge: keys already present win over merged ones.
fn merge_into(entries: &mut Mapping, source: Value) {
    let sources = match source {
        Value::Sequence(items) => items,
        other => vec![other],
    };
    for source in sources {
        if let Value::Mapping(map) = source {
            for (key, value) in map {
                if key.as_str() == Some(LINE_KEY) {
                    continue;
                }
                if !entries.contains_key(&key) {
                    entries.insert(key, value);
                }
            }
        }
    }
}

/// Resolves an unquoted scalar the way YAML 1.1 loaders do.
fn resolve_plain(text: String) -> Value {
    match text.as_str() {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            return Value::Bool(true)
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            return Value::Bool(false)
        }
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return Value::Number(Number::from(f64::INFINITY))
        }
        "-.inf" | "-.Inf" | "-.INF" => return Value::Number(Number::from(f64::NEG_INFINITY)),
        ".nan" | ".NaN" | ".NAN" => return Value::Number(Number::from(f64::NAN)),
        _ => {}
    }

    if let Ok(n) = text.parse::<i64>() {
        return Value::Number(Number::from(n));
    }
    if let Ok(n) = text.parse::<u64>() {
        return Value::Number(Number::from(n));
    }
    if let Some(hex) = text.strip_prefix("0x") {
        if let Ok(n) = i64::from_str_radix(hex, 16) {
            return Value::Number(Number::from(n));
        }
    }
    if let Some(oct) = text.strip_prefix("0o") {
        if let Ok(n) = i64::from_str_radix(oct, 8) {
            return Value::Number(Number::from(n));
        }
    }
    // f64::from_str also accepts "inf" and "nan", which YAML treats as strings.
    if text.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(n) = text.parse::<f64>() {
            return Value::Number(Number::from(n));
        }
    }

    Value::String(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mappings_get_start_lines() {
        let doc = load_str("---\n- name: one\n  ping:\n\n- name: two\n  copy:\n    src: a\n")
            .unwrap();
        assert_eq!(doc[0][LINE_KEY].as_u64(), Some(2));
        assert_eq!(doc[1][LINE_KEY].as_u64(), Some(5));
        assert_eq!(doc[1]["copy"][LINE_KEY].as_u64(), Some(7));
    }

    #[test]
    fn flow_mapping_line_is_brace_line() {
        let doc = load_str("\n\n- {name: x, ping: {}}\n").unwrap();
        assert_eq!(doc[0][LINE_KEY].as_u64(), Some(3));
    }

    #[test]
    fn other_values_are_untouched() {
        let doc = load_str("a: 1\nb: 'yes'\nc: yes\nd: ~\ne: [x, y]\nf: 1.5\n").unwrap();
        assert_eq!(doc["a"].as_i64(), Some(1));
        assert_eq!(doc["b"].as_str(), Some("yes"));
        assert_eq!(doc["c"].as_bool(), Some(true));
        assert!(doc["d"].is_null());
        assert_eq!(doc["e"].as_sequence().map(Vec::len), Some(2));
        assert_eq!(doc["f"].as_f64(), Some(1.5));
        assert_eq!(doc.as_mapping().map(Mapping::len), Some(7));
    }

    #[test]
    fn inf_word_stays_a_string() {
        let doc = load_str("a: inf\nb: nan\n").unwrap();
        assert_eq!(doc["a"].as_str(), Some("inf"));
        assert_eq!(doc["b"].as_str(), Some("nan"));
    }

    #[test]
    fn aliases_and_merge_keys_expand() {
        let text = "base: &base\n  state: present\n  name: pkg\nuse:\n  <<: *base\n  name: other\ncopy: *base\n";
        let doc = load_str(text).unwrap();
        assert_eq!(doc["use"]["state"].as_str(), Some("present"));
        assert_eq!(doc["use"]["name"].as_str(), Some("other"));
        assert!(doc["use"].get(MERGE_KEY).is_none());
        assert_eq!(doc["copy"]["name"].as_str(), Some("pkg"));
    }

    #[test]
    fn empty_document_is_null() {
        assert!(load_str("").unwrap().is_null());
        assert!(load_str("---\n").unwrap().is_null());
    }

    #[test]
    fn only_first_document_is_read() {
        let doc = load_str("- a: 1\n---\n- b: 2\n").unwrap();
        assert!(doc[0].get("a").is_some());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(load_str("- name: [unclosed\n").is_err());
        assert!(load_str("a: {b: 1\n").is_err());
    }

    #[test]
    fn load_file_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yml");
        std::fs::write(&path, "a: [1, 2\n").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("broken.yml"));
    }

    #[test]
    fn line_of_reads_marker() {
        let doc = load_str("x: 1\n").unwrap();
        assert_eq!(line_of(doc.as_mapping().unwrap()), Some(1));
        assert_eq!(line_of(&Mapping::new()), None);
    }
}

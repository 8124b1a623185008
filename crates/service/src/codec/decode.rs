//! Decoder for the store's JSON subset.
//!
//! This is a forgiving scanner, not a conformant JSON parser. It never fails:
//! anything it cannot make sense of degrades to an empty or partial result.
//!
//! Every scan is quote-aware, so delimiters inside string literals never split
//! or nest. Array elements are split with the same depth tracking as object
//! pairs, which is what lets lessons (an array of objects) decode.

use std::collections::BTreeMap;

use super::value::{JsonObject, JsonValue};

/// Nesting allowed below a top-level object. Deeper values are kept as raw
/// text so hostile documents cannot exhaust the stack.
pub const MAX_DEPTH: usize = 128;

/// Tracks whether the scanner is inside a quoted string literal.
#[derive(Default)]
struct QuoteState {
    in_string: bool,
    escaped: bool,
}

impl QuoteState {
    /// Feed one byte. Returns `true` when the byte is structural, i.e. outside
    /// any string literal and not the quote itself.
    fn structural(&mut self, b: u8) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if b == b'\\' {
                self.escaped = true;
            } else if b == b'"' {
                self.in_string = false;
            }
            false
        } else if b == b'"' {
            self.in_string = true;
            false
        } else {
            true
        }
    }
}

/// Decode a whole document: a bracketed array of objects.
///
/// Object boundaries are found by brace depth returning to zero. An object
/// left open at the end of the text is dropped; stray closing braces are
/// ignored.
pub fn decode_document(text: &str) -> Vec<JsonObject> {
    let mut out = Vec::new();
    let Some(body) = strip_delimiters(text.trim(), '[', ']') else {
        return out;
    };
    let body = body.trim();

    let mut quotes = QuoteState::default();
    let mut depth = 0usize;
    let mut start = None;
    for (i, b) in body.bytes().enumerate() {
        if !quotes.structural(b) {
            continue;
        }
        match b {
            b'{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        out.push(decode_object_at(&body[s..=i], 0));
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Decode one `{...}` object. Pairs without a colon are skipped; a repeated
/// key keeps its last value.
pub fn decode_object(text: &str) -> JsonObject {
    decode_object_at(text, 0)
}

fn decode_object_at(text: &str, depth: usize) -> JsonObject {
    let mut map = JsonObject::new();
    let Some(body) = strip_delimiters(text.trim(), '{', '}') else {
        return map;
    };
    for pair in split_top_level(body) {
        let Some(colon) = find_structural(pair, b':') else {
            continue;
        };
        let key = unescape(strip_quotes(pair[..colon].trim()));
        map.insert(key, decode_value_at(&pair[colon + 1..], depth + 1));
    }
    map
}

/// Classify one value: string, array, object, literal, number, or raw text.
pub fn decode_value(raw: &str) -> JsonValue {
    decode_value_at(raw, 0)
}

fn decode_value_at(raw: &str, depth: usize) -> JsonValue {
    let v = raw.trim();
    if depth > MAX_DEPTH {
        return JsonValue::String(v.to_string());
    }
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        return JsonValue::String(unescape(&v[1..v.len() - 1]));
    }
    if let Some(inner) = strip_delimiters(v, '[', ']') {
        return JsonValue::Array(split_top_level(inner).into_iter().map(|item| decode_value_at(item, depth + 1)).collect());
    }
    if v.starts_with('{') && v.ends_with('}') {
        return classify_object(decode_object_at(v, depth));
    }
    match v {
        "null" => return JsonValue::Null,
        "true" => return JsonValue::Bool(true),
        "false" => return JsonValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = v.parse::<i64>() {
        JsonValue::Integer(i)
    } else if let Ok(r) = v.parse::<f64>() {
        JsonValue::Real(r)
    } else {
        JsonValue::String(v.to_string())
    }
}

/// Undo the encoder's escapes (`\\`, `\"`, `\n`, `\r`, `\t`) in one pass.
/// Any other escape sequence is kept verbatim.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Reclassify a nested object whose every value is a string array as a
/// progress-shaped map. Empty objects stay generic.
fn classify_object(obj: JsonObject) -> JsonValue {
    if obj.is_empty() {
        return JsonValue::Object(obj);
    }
    let all_string_arrays = obj.values().all(|v| {
        v.as_array()
            .map(|items| items.iter().all(|i| i.as_str().is_some()))
            .unwrap_or(false)
    });
    if !all_string_arrays {
        return JsonValue::Object(obj);
    }
    let progress: BTreeMap<String, Vec<String>> = obj
        .into_iter()
        .map(|(k, v)| {
            let items = match v {
                JsonValue::Array(items) => items.into_iter().filter_map(|i| i.scalar_text()).collect(),
                _ => Vec::new(),
            };
            (k, items)
        })
        .collect();
    JsonValue::Progress(progress)
}

/// Split on commas that sit outside strings and at bracket/brace depth zero.
/// Pieces are trimmed; empty pieces are dropped.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut quotes = QuoteState::default();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, b) in s.bytes().enumerate() {
        if !quotes.structural(b) {
            continue;
        }
        match b {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth -= 1,
            b',' if depth == 0 => {
                pieces.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(s[start..].trim());
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn find_structural(s: &str, needle: u8) -> Option<usize> {
    let mut quotes = QuoteState::default();
    s.bytes().enumerate().find(|&(_, b)| quotes.structural(b) && b == needle).map(|(i, _)| i)
}

fn strip_delimiters(s: &str, open: char, close: char) -> Option<&str> {
    s.strip_prefix(open)?.strip_suffix(close)
}

/// Drop one leading and one trailing quote, independently.
fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_documents_degrade_to_empty() {
        assert!(decode_document("").is_empty());
        assert!(decode_document("   ").is_empty());
        assert!(decode_document("[]").is_empty());
        assert!(decode_document("{\"a\": 1}").is_empty());
        assert!(decode_document("[{\"a\": 1}").is_empty());
        assert!(decode_document("[").is_empty());
    }

    #[test]
    fn unbalanced_tail_keeps_complete_objects() {
        let docs = decode_document("[{\"a\": \"x\"}, {\"b\": \"y\"]");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("a"), Some(&JsonValue::String("x".into())));
    }

    #[test]
    fn scalars_are_classified() {
        let docs = decode_document(r#"[{"s": "hi", "i": 42, "neg": -3, "r": 2.5, "t": true, "f": false, "n": null, "raw": abc}]"#);
        let o = &docs[0];
        assert_eq!(o["s"], JsonValue::String("hi".into()));
        assert_eq!(o["i"], JsonValue::Integer(42));
        assert_eq!(o["neg"], JsonValue::Integer(-3));
        assert_eq!(o["r"], JsonValue::Real(2.5));
        assert_eq!(o["t"], JsonValue::Bool(true));
        assert_eq!(o["f"], JsonValue::Bool(false));
        assert!(o["n"].is_null());
        assert_eq!(o["raw"], JsonValue::String("abc".into()));
    }

    #[test]
    fn delimiters_inside_strings_do_not_split() {
        let docs = decode_document(r#"[{"title": "a, b: {c} [d]", "tags": ["x, y", "z"]}, {"title": "}"}]"#);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["title"], JsonValue::String("a, b: {c} [d]".into()));
        assert_eq!(
            docs[0]["tags"],
            JsonValue::Array(vec![JsonValue::String("x, y".into()), JsonValue::String("z".into())])
        );
        assert_eq!(docs[1]["title"], JsonValue::String("}".into()));
    }

    #[test]
    fn arrays_of_objects_split_by_depth() {
        let docs = decode_document(r#"[{"lessons": [{"id": "l1", "res": ["a", "b"]}, {"id": "l2", "res": []}]}]"#);
        let lessons = docs[0]["lessons"].as_array().expect("array");
        assert_eq!(lessons.len(), 2);
        let first = lessons[0].as_object().expect("object");
        assert_eq!(first["id"], JsonValue::String("l1".into()));
        assert_eq!(first["res"].as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn string_array_maps_become_progress() {
        let docs = decode_document(r#"[{"progress": {"c1": ["l1", "l2"], "c2": []}, "mixed": {"a": ["x"], "b": 1}, "empty": {}}]"#);
        let progress = docs[0]["progress"].as_progress().expect("progress");
        assert_eq!(progress["c1"], vec!["l1".to_string(), "l2".to_string()]);
        assert!(progress["c2"].is_empty());
        assert!(docs[0]["mixed"].as_object().is_some());
        assert_eq!(docs[0]["empty"], JsonValue::Object(JsonObject::new()));
    }

    #[test]
    fn unescape_is_single_pass() {
        assert_eq!(unescape(r#"a\"b"#), "a\"b");
        assert_eq!(unescape(r"line\nnext\ttab\rcr"), "line\nnext\ttab\rcr");
        // `\\n` is an escaped backslash followed by `n`, not a newline.
        assert_eq!(unescape(r"\\n"), "\\n");
        assert_eq!(unescape(r"\u0041"), "\\u0041");
        assert_eq!(unescape("end\\"), "end\\");
    }

    #[test]
    fn deep_nesting_degrades_instead_of_overflowing() {
        let depth = 100_000;
        let doc = format!("[{{\"a\": {}{}, \"b\": \"ok\"}}]", "[".repeat(depth), "]".repeat(depth));
        let docs = decode_document(&doc);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["b"], JsonValue::String("ok".into()));

        let mut levels = 0;
        let mut cur = &docs[0]["a"];
        while let Some(items) = cur.as_array() {
            levels += 1;
            match items.first() {
                Some(next) => cur = next,
                None => break,
            }
        }
        assert!(levels <= MAX_DEPTH + 1);
        assert!(matches!(cur, JsonValue::String(raw) if raw.starts_with('[')));

        let objects = format!("[{}{}]", "{\"k\": ".repeat(depth), "}".repeat(depth));
        assert_eq!(decode_document(&objects).len(), 1);
    }

    #[test]
    fn keys_are_unescaped_and_colon_splits_once() {
        let o = decode_object(r#"{"url": "http://x.io:8080/a", "q\"k": 1}"#);
        assert_eq!(o["url"], JsonValue::String("http://x.io:8080/a".into()));
        assert_eq!(o["q\"k"], JsonValue::Integer(1));
    }
}

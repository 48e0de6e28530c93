//! Value capture for step inputs and outputs
//!
//! Captured values are converted to JSON and bounded by [`CaptureLimits`].
//! A value that cannot be represented as JSON is replaced by a
//! `"<TypeName>"` marker; capture never fails the traced call.

use crate::config::CaptureLimits;
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::debug;

const MAX_DEPTH_MARKER: &str = "<max_depth_exceeded>";
const TRUNCATED_SUFFIX: &str = "...<truncated>";
const TRUNCATED_KEY: &str = "<truncated>";

/// Per-decoration switches for what a step may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePolicy {
    /// Store the call's arguments in the step
    pub capture_input: bool,
    /// Store the call's return value in the step
    pub capture_output: bool,
}

impl CapturePolicy {
    /// Capture both input and output
    pub const fn new() -> Self {
        Self {
            capture_input: true,
            capture_output: true,
        }
    }

    /// Capture nothing; timing and status are still recorded
    pub const fn redacted() -> Self {
        Self {
            capture_input: false,
            capture_output: false,
        }
    }
}

impl Default for CapturePolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Capture a value as bounded JSON
pub fn capture_value<T: Serialize + ?Sized>(value: &T, limits: &CaptureLimits) -> Value {
    match serde_json::to_value(value) {
        Ok(json) => bound_value(json, limits.max_depth, limits),
        Err(e) => {
            let type_name = short_type_name::<T>();
            debug!("Falling back to type marker for {}: {}", type_name, e);
            Value::String(format!("<{}>", type_name))
        }
    }
}

/// Capture call arguments as bounded JSON
///
/// Arguments passed as a tuple are bounded one by one, each with the full
/// depth budget, so an argument captures the same whatever its arity.
pub fn capture_args<A: Serialize + ?Sized>(args: &A, limits: &CaptureLimits) -> Value {
    if !is_tuple::<A>() {
        return capture_value(args, limits);
    }

    match serde_json::to_value(args) {
        Ok(Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| bound_value(item, limits.max_depth, limits))
                .collect(),
        ),
        Ok(other) => bound_value(other, limits.max_depth, limits),
        Err(_) => capture_value(args, limits),
    }
}

fn is_tuple<A: ?Sized>() -> bool {
    let name = std::any::type_name::<A>().trim_start_matches('&');
    let name = name.strip_prefix("mut ").unwrap_or(name);
    name.starts_with('(') && name != "()"
}

/// Apply depth, length and item bounds to an already converted value
pub fn bound_value(value: Value, depth: usize, limits: &CaptureLimits) -> Value {
    if depth == 0 {
        return Value::String(MAX_DEPTH_MARKER.to_string());
    }

    match value {
        Value::String(s) => Value::String(truncate_string(s, limits.max_string_len)),
        Value::Array(items) => {
            let total = items.len();
            let mut bounded: Vec<Value> = items
                .into_iter()
                .take(limits.max_items)
                .map(|item| bound_value(item, depth - 1, limits))
                .collect();

            if total > limits.max_items {
                bounded.push(Value::String(format!(
                    "<{} more items>",
                    total - limits.max_items
                )));
            }

            Value::Array(bounded)
        }
        Value::Object(entries) => {
            let total = entries.len();
            let mut bounded: Map<String, Value> = entries
                .into_iter()
                .take(limits.max_items)
                .map(|(key, item)| (key, bound_value(item, depth - 1, limits)))
                .collect();

            if total > limits.max_items {
                bounded.insert(
                    TRUNCATED_KEY.to_string(),
                    Value::String(format!("{} more keys", total - limits.max_items)),
                );
            }

            Value::Object(bounded)
        }
        other => other,
    }
}

fn truncate_string(s: String, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}{}", &s[..cut], TRUNCATED_SUFFIX),
        None => s,
    }
}

/// Last path segment of a type name, without generic arguments
///
/// `my_app::tools::WeatherTool` becomes `WeatherTool` and
/// `alloc::vec::Vec<u8>` becomes `Vec`. Tuples, references, slices and
/// arrays keep their punctuation with every path inside shortened, so
/// `(u8, my_app::E)` becomes `(u8, E)`.
pub fn short_type_name<T: ?Sized>() -> Cow<'static, str> {
    short_name(std::any::type_name::<T>())
}

fn short_name(full: &'static str) -> Cow<'static, str> {
    let is_path = full
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');

    if is_path {
        let base = full.split('<').next().unwrap_or(full);
        return Cow::Borrowed(base.rsplit("::").next().unwrap_or(base));
    }

    let mut short = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            push_last_segment(&mut short, &segment);
            segment.clear();
            short.push(c);
        }
    }
    push_last_segment(&mut short, &segment);

    Cow::Owned(short)
}

fn push_last_segment(out: &mut String, path: &str) {
    out.push_str(path.rsplit("::").next().unwrap_or(path));
}

/// `"<Kind>: <message>"` summary of an error value
pub fn summarize_error<E: std::fmt::Display + ?Sized>(error: &E) -> String {
    format!("{}: {}", short_type_name::<E>(), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn limits() -> CaptureLimits {
        CaptureLimits::default()
    }

    #[test]
    fn test_primitives_pass_through() {
        assert_eq!(capture_value(&"test", &limits()), json!("test"));
        assert_eq!(capture_value(&42, &limits()), json!(42));
        assert_eq!(capture_value(&3.14, &limits()), json!(3.14));
        assert_eq!(capture_value(&true, &limits()), json!(true));
        assert_eq!(capture_value(&Option::<u8>::None, &limits()), Value::Null);
    }

    #[test]
    fn test_long_string_is_truncated() {
        let long = "a".repeat(2000);
        let captured = capture_value(&long, &limits());
        let text = captured.as_str().unwrap();

        assert_eq!(text.len(), 1014);
        assert!(text.ends_with("...<truncated>"));
    }

    #[test]
    fn test_truncation_counts_chars() {
        let limits = CaptureLimits {
            max_string_len: 3,
            ..CaptureLimits::default()
        };
        assert_eq!(capture_value(&"ñandú", &limits), json!("ñan...<truncated>"));
        assert_eq!(capture_value(&"abc", &limits), json!("abc"));
    }

    #[test]
    fn test_long_list_keeps_first_items() {
        let list: Vec<u32> = (0..100).collect();
        let captured = capture_value(&list, &limits());
        let items = captured.as_array().unwrap();

        assert_eq!(items.len(), 51);
        assert_eq!(items[0], json!(0));
        assert_eq!(items[50], json!("<50 more items>"));
    }

    #[test]
    fn test_long_map_reports_dropped_keys() {
        let map: HashMap<String, String> = (0..100)
            .map(|i| (format!("key_{i}"), format!("value_{i}")))
            .collect();
        let captured = capture_value(&map, &limits());
        let entries = captured.as_object().unwrap();

        assert_eq!(entries.len(), 51);
        assert_eq!(entries["<truncated>"], json!("50 more keys"));
    }

    #[test]
    fn test_depth_limit() {
        let nested = json!({"level1": {"level2": {"level3": "deep"}}});
        let captured = capture_value(&nested, &limits());

        assert_eq!(
            captured,
            json!({"level1": {"level2": {"level3": "<max_depth_exceeded>"}}})
        );

        let zero = CaptureLimits {
            max_depth: 0,
            ..CaptureLimits::default()
        };
        assert_eq!(
            capture_value(&json!({"key": "value"}), &zero),
            json!("<max_depth_exceeded>")
        );
    }

    #[test]
    fn test_unserializable_value_falls_back_to_type_marker() {
        // Non-string map keys cannot become JSON object keys.
        let mut map: HashMap<(u8, u8), u8> = HashMap::new();
        map.insert((1, 2), 3);

        assert_eq!(capture_value(&map, &limits()), json!("<HashMap>"));
    }

    #[test]
    fn test_short_type_name() {
        struct WeatherTool;
        assert_eq!(short_type_name::<WeatherTool>(), "WeatherTool");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
        assert_eq!(short_type_name::<u32>(), "u32");
    }

    #[test]
    fn test_short_type_name_of_compound_types() {
        mod inner {
            pub struct E;
        }
        assert_eq!(short_type_name::<(u8, inner::E)>(), "(u8, E)");
        assert_eq!(short_type_name::<&str>(), "&str");
        assert_eq!(short_type_name::<[inner::E]>(), "[E]");
        assert_eq!(
            short_type_name::<(Vec<inner::E>, bool)>(),
            "(Vec<E>, bool)"
        );
    }

    #[test]
    fn test_tuple_arguments_keep_full_depth_each() {
        let nested = json!({"a": {"b": {"c": "d"}}});

        let single = capture_args(&nested, &limits());
        let pair = capture_args(&("x", &nested), &limits());

        assert_eq!(single, json!({"a": {"b": {"c": "<max_depth_exceeded>"}}}));
        assert_eq!(pair, json!(["x", single]));
    }

    #[test]
    fn test_non_tuple_arguments_are_captured_as_values() {
        let list = vec![vec![vec![vec![1]]]];
        assert_eq!(capture_args(&list, &limits()), capture_value(&list, &limits()));
        assert_eq!(capture_args(&(), &limits()), Value::Null);
    }

    #[test]
    fn test_summarize_error() {
        #[derive(Debug)]
        struct ValueError(&'static str);

        impl std::fmt::Display for ValueError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.0)
            }
        }

        assert_eq!(summarize_error(&ValueError("bad")), "ValueError: bad");
    }
}

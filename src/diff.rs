//! Structural comparison of values for equality assertions.

use serde_yaml::Value;

/// Describe every difference between `actual` and `expected`.
///
/// Each entry names the path of the differing element, e.g.
/// `book.left_page: 7 != 8`. An empty result means the values are equal.
pub fn diff_values(actual: &Value, expected: &Value) -> Vec<String> {
    let mut diffs = Vec::new();
    walk("", actual, expected, &mut diffs);
    diffs
}

fn walk(path: &str, actual: &Value, expected: &Value, diffs: &mut Vec<String>) {
    match (actual, expected) {
        (Value::Mapping(a), Value::Mapping(e)) => {
            for (key, expected_value) in e {
                let child = join(path, &render(key));
                match a.get(key) {
                    Some(actual_value) => walk(&child, actual_value, expected_value, diffs),
                    None => diffs.push(format!(
                        "{}: <missing> != {}",
                        child,
                        render(expected_value)
                    )),
                }
            }
            for (key, actual_value) in a {
                if !e.contains_key(key) {
                    let child = join(path, &render(key));
                    diffs.push(format!("{}: {} != <missing>", child, render(actual_value)));
                }
            }
        }
        (Value::Sequence(a), Value::Sequence(e)) => {
            if a.len() != e.len() {
                diffs.push(format!(
                    "{}: length {} != {}",
                    label(path),
                    a.len(),
                    e.len()
                ));
            }
            for (idx, (actual_item, expected_item)) in a.iter().zip(e).enumerate() {
                walk(&format!("{}[{}]", path, idx), actual_item, expected_item, diffs);
            }
        }
        (a, e) if a != e => {
            diffs.push(format!("{}: {} != {}", label(path), render(a), render(e)));
        }
        _ => {}
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn label(path: &str) -> &str {
    if path.is_empty() {
        "value"
    } else {
        path
    }
}

/// Compact single-line rendering of a value.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => format!(
            "[{}]",
            items.iter().map(render).collect::<Vec<_>>().join(", ")
        ),
        Value::Mapping(entries) => format!(
            "{{{}}}",
            entries
                .iter()
                .map(|(k, v)| format!("{}: {}", render(k), render(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, render(&tagged.value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_equal_values_have_no_diff() {
        let value = yaml("{title: aleph, pages: [1, 2]}");
        assert!(diff_values(&value, &value.clone()).is_empty());
    }

    #[test]
    fn test_scalar_diff() {
        assert_eq!(diff_values(&yaml("7"), &yaml("8")), vec!["value: 7 != 8"]);
    }

    #[test]
    fn test_nested_mapping_diff() {
        let actual = yaml("{book: {title: aleph, left_page: 7}}");
        let expected = yaml("{book: {title: aleph, left_page: 8, size: 90}}");
        assert_eq!(
            diff_values(&actual, &expected),
            vec!["book.left_page: 7 != 8", "book.size: <missing> != 90"]
        );
    }

    #[test]
    fn test_unexpected_key() {
        let actual = yaml("{a: 1, b: 2}");
        let expected = yaml("{a: 1}");
        assert_eq!(diff_values(&actual, &expected), vec!["b: 2 != <missing>"]);
    }

    #[test]
    fn test_sequence_diff() {
        let actual = yaml("{animals: [deer, pony]}");
        let expected = yaml("{animals: [deer, unicorn, pony]}");
        assert_eq!(
            diff_values(&actual, &expected),
            vec!["animals: length 2 != 3", "animals[1]: pony != unicorn"]
        );
    }

    #[test]
    fn test_render_flow_style() {
        assert_eq!(render(&yaml("{a: [1, true, null]}")), "{a: [1, true, null]}");
    }
}

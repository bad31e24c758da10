//! Text-List Codec
//!
//! Converts a list field (ingredients, tags, steps...) to the single
//! multi-line block a text area edits, and back. Edit-time only, never a
//! storage format.

const SEPARATOR: char = '\n';

/// Join items with a newline, no trailing separator
pub fn encode<S: AsRef<str>>(items: &[S]) -> String {
    let mut text = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            text.push(SEPARATOR);
        }
        text.push_str(item.as_ref());
    }
    text
}

/// Split a text block back into items
///
/// The last character of the input always belongs to the final item, even
/// when it is a newline: `"a\n"` decodes to `["a\n"]`, not `["a", ""]`.
/// The empty string decodes to a single empty item.
pub fn decode(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let is_last = chars.peek().is_none();
        if is_last {
            current.push(c);
            items.push(std::mem::take(&mut current));
        } else if c == SEPARATOR {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_joins_without_trailing_newline() {
        assert_eq!(encode(&["egg", "flour"]), "egg\nflour");
        assert_eq!(encode::<&str>(&[]), "");
        assert_eq!(encode(&["salt"]), "salt");
    }

    #[test]
    fn test_decode_keeps_final_segment() {
        assert_eq!(decode("egg\nflour\nsugar"), vec!["egg", "flour", "sugar"]);
        assert_eq!(decode("single"), vec!["single"]);
        assert_eq!(decode("a\n\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_decode_empty_yields_one_empty_item() {
        assert_eq!(decode(""), vec![String::new()]);
    }

    #[test]
    fn test_decode_trailing_newline_stays_in_last_item() {
        assert_eq!(decode("a\n"), vec!["a\n"]);
        assert_eq!(decode("\n"), vec!["\n"]);
        assert_eq!(decode("a\nb\n"), vec!["a", "b\n"]);
    }

    #[test]
    fn test_decode_multibyte() {
        assert_eq!(decode("crème\nbrûlée"), vec!["crème", "brûlée"]);
    }

    proptest! {
        #[test]
        fn prop_round_trip(items in prop::collection::vec("[^\n]{1,12}", 1..8)) {
            prop_assert_eq!(decode(&encode(&items)), items);
        }

        #[test]
        fn prop_singleton_encodes_to_itself(s in "[^\n]*") {
            prop_assert_eq!(encode(&[s.as_str()]), s);
        }
    }
}

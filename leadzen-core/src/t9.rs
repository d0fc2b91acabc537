//! T9 dialer search over leads.

use shared_types::Lead;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;
const MIN_INPUT_LEN: usize = 2;

pub fn letters_for_digit(digit: char) -> &'static str {
    match digit {
        '0' => " +",
        '2' => "abc",
        '3' => "def",
        '4' => "ghi",
        '5' => "jkl",
        '6' => "mno",
        '7' => "pqrs",
        '8' => "tuv",
        '9' => "wxyz",
        _ => "",
    }
}

fn digit_for_letter(letter: char) -> Option<char> {
    let digit = match letter {
        'a'..='c' => '2',
        'd'..='f' => '3',
        'g'..='i' => '4',
        'j'..='l' => '5',
        'm'..='o' => '6',
        'p'..='s' => '7',
        't'..='v' => '8',
        'w'..='z' => '9',
        _ => return None,
    };
    Some(digit)
}

/// `"John Smith"` becomes `"5646 76484"`. Punctuation is dropped.
pub fn text_to_t9(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .map(|c| digit_for_letter(c).unwrap_or(c))
        .collect()
}

/// Direct substring of the T9 sequence, or the pattern's letters appear in order
pub fn matches_t9(text: &str, pattern: &str) -> bool {
    if text.is_empty() || pattern.is_empty() {
        return false;
    }
    text_to_t9(text).contains(pattern) || fuzzy_match(text, pattern)
}

fn fuzzy_match(text: &str, pattern: &str) -> bool {
    let mut letters = text
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_lowercase);

    pattern
        .chars()
        .map(letters_for_digit)
        .filter(|keys| !keys.is_empty())
        .all(|keys| letters.any(|letter| keys.contains(letter)))
}

/// Pattern matches from the start of the text
pub fn is_prefix_match(text: &str, pattern: &str) -> bool {
    !text.is_empty() && !pattern.is_empty() && text_to_t9(text).starts_with(pattern)
}

fn phone_contains(phone: &str, input: &str) -> bool {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return false;
    }
    phone
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .contains(&digits)
}

/// Dialer suggestions: name, company or phone matches, prefix name matches first
pub fn t9_filter(leads: &[Lead], digits: &str, limit: usize) -> Vec<Lead> {
    if digits.chars().count() < MIN_INPUT_LEN {
        return vec![];
    }

    let mut matches: Vec<&Lead> = leads
        .iter()
        .filter(|lead| {
            matches_t9(&lead.name, digits)
                || lead
                    .company
                    .as_deref()
                    .is_some_and(|company| matches_t9(company, digits))
                || lead
                    .phone
                    .as_deref()
                    .is_some_and(|phone| phone_contains(phone, digits))
        })
        .collect();

    matches.sort_by(|a, b| {
        let a_prefix = is_prefix_match(&a.name, digits);
        let b_prefix = is_prefix_match(&b.name, digits);
        b_prefix.cmp(&a_prefix).then_with(|| a.name.cmp(&b.name))
    });

    matches.into_iter().take(limit).cloned().collect()
}

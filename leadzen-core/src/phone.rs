//! Phone number cleaning, normalization and caller-to-lead matching.

use regex::Regex;
use shared_types::{Lead, MatchConfidence, PhoneMatchResponse};
use std::cmp::Ordering;
use std::sync::OnceLock;
use tracing::debug;

const DEFAULT_COUNTRY_CODE: &str = "+91";

fn caller_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<([+\d\s\-().]+)>").unwrap())
}

/// Digits only. An 11-digit number with a leading `1` loses it.
pub fn clean_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// Canonical form used for matching: `+91XXXXXXXXXX` where recognisable.
pub fn normalize_phone_number(phone: &str) -> String {
    let normalized: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if normalized.starts_with(DEFAULT_COUNTRY_CODE) {
        normalized
    } else if normalized.starts_with("91") && normalized.len() == 12 {
        format!("+{}", normalized)
    } else if normalized.len() == 10 {
        format!("{}{}", DEFAULT_COUNTRY_CODE, normalized)
    } else {
        normalized
    }
}

pub fn format_phone_number(phone: &str) -> String {
    let cleaned = clean_phone_number(phone);
    match cleaned.len() {
        0 => "Unknown".to_string(),
        10 => format!("({}) {}-{}", &cleaned[..3], &cleaned[3..6], &cleaned[6..]),
        _ => cleaned,
    }
}

/// Compares the last ten cleaned digits. Empty numbers never match.
pub fn phone_numbers_equal(a: &str, b: &str) -> bool {
    let a = clean_phone_number(a);
    let b = clean_phone_number(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    last_digits(&a, 10) == last_digits(&b, 10)
}

fn last_digits(digits: &str, n: usize) -> &str {
    &digits[digits.len().saturating_sub(n)..]
}

/// Pulls the number out of caller ids such as `John Doe <+15551234567>`
pub fn extract_phone_from_caller_id(caller_id: &str) -> String {
    match caller_id_pattern().captures(caller_id) {
        Some(captures) => clean_phone_number(&captures[1]),
        None => clean_phone_number(caller_id),
    }
}

pub fn match_phone_to_leads(phone: &str, leads: &[Lead]) -> PhoneMatchResponse {
    let normalized_number = normalize_phone_number(phone);

    let matched_leads: Vec<Lead> = leads
        .iter()
        .filter(|lead| {
            lead.phone
                .as_deref()
                .filter(|p| !p.is_empty())
                .is_some_and(|p| normalize_phone_number(p) == normalized_number)
        })
        .cloned()
        .collect();

    let confidence = match matched_leads.len() {
        0 => MatchConfidence::None,
        1 => MatchConfidence::Exact,
        _ => MatchConfidence::Partial,
    };

    debug!(
        "Phone {} matched {} lead(s) ({:?})",
        normalized_number,
        matched_leads.len(),
        confidence
    );

    let best_match = select_best_match(&matched_leads).cloned();
    PhoneMatchResponse {
        phone_number: phone.to_string(),
        normalized_number,
        matched_leads,
        confidence,
        best_match,
    }
}

/// Most recently updated wins; ties go to the higher priority
pub fn select_best_match(leads: &[Lead]) -> Option<&Lead> {
    leads.iter().min_by(|a, b| match b.updated_at.cmp(&a.updated_at) {
        Ordering::Equal => b.priority.cmp(&a.priority),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::fixtures::lead;
    use shared_types::{LeadPriority, LeadStatus};

    fn lead_with_phone(id: i64, phone: &str, updated_at: i64, priority: LeadPriority) -> Lead {
        let mut lead = lead(id, &format!("Lead {}", id), LeadStatus::New);
        lead.phone = Some(phone.to_string());
        lead.updated_at = updated_at;
        lead.priority = priority;
        lead
    }

    #[test]
    fn test_clean_drops_us_country_code() {
        assert_eq!(clean_phone_number("+1 (555) 123-4567"), "5551234567");
        assert_eq!(clean_phone_number("98765 43210"), "9876543210");
        assert_eq!(clean_phone_number(""), "");
    }

    #[test]
    fn test_normalize_indian_formats() {
        assert_eq!(normalize_phone_number("+91 98765 43210"), "+919876543210");
        assert_eq!(normalize_phone_number("919876543210"), "+919876543210");
        assert_eq!(normalize_phone_number("98765-43210"), "+919876543210");
        assert_eq!(normalize_phone_number("12345"), "12345");
    }

    #[test]
    fn test_format_for_display() {
        assert_eq!(format_phone_number("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone_number("12345"), "12345");
        assert_eq!(format_phone_number("n/a"), "Unknown");
    }

    #[test]
    fn test_equality_uses_last_ten_digits() {
        assert!(phone_numbers_equal("+91 98765 43210", "9876543210"));
        assert!(!phone_numbers_equal("9876543210", "9876543211"));
        assert!(!phone_numbers_equal("", ""));
    }

    #[test]
    fn test_extract_prefers_angle_brackets() {
        assert_eq!(
            extract_phone_from_caller_id("John Doe <+15551234567>"),
            "5551234567"
        );
        assert_eq!(extract_phone_from_caller_id("555.123.4567"), "5551234567");
    }

    #[test]
    fn test_match_confidence() {
        let leads = vec![
            lead_with_phone(1, "+91 98765 43210", 10, LeadPriority::Low),
            lead_with_phone(2, "9123456789", 10, LeadPriority::Low),
        ];

        let exact = match_phone_to_leads("98765 43210", &leads);
        assert_eq!(exact.confidence, MatchConfidence::Exact);
        assert_eq!(exact.best_match.map(|l| l.id), Some(1));

        let none = match_phone_to_leads("9000000000", &leads);
        assert_eq!(none.confidence, MatchConfidence::None);
        assert!(none.best_match.is_none());
    }

    #[test]
    fn test_best_match_prefers_recent_then_priority() {
        let leads = vec![
            lead_with_phone(1, "9876543210", 10, LeadPriority::Urgent),
            lead_with_phone(2, "9876543210", 20, LeadPriority::Low),
            lead_with_phone(3, "9876543210", 20, LeadPriority::High),
        ];

        let result = match_phone_to_leads("9876543210", &leads);

        assert_eq!(result.confidence, MatchConfidence::Partial);
        assert_eq!(result.matched_leads.len(), 3);
        assert_eq!(result.best_match.map(|l| l.id), Some(3));
    }
}

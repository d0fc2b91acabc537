use regex::Regex;
use shared_types::{CreateLeadRequest, CreateNoteRequest, UpdateLeadRequest};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Field name to message. Empty means the form is valid.
pub type ValidationErrors = BTreeMap<&'static str, String>;

const MAX_VALUE: f64 = 999_999_999.0;
const MAX_NOTES: usize = 1000;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z\s'-]+$").unwrap())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\d\s\-()+]+$").unwrap())
}

pub fn validate_lead(lead: &CreateLeadRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let checks = [
        ("name", validate_name(&lead.name)),
        ("email", validate_email(lead.email.as_deref())),
        ("phone", validate_phone(&lead.phone)),
        (
            "company",
            validate_length(lead.company.as_deref(), "Company", 2, 100),
        ),
        (
            "position",
            validate_length(lead.position.as_deref(), "Position", 2, 50),
        ),
        ("value", validate_value(lead.value)),
        ("notes", validate_notes(lead.notes.as_deref())),
    ];

    for (field, result) in checks {
        if let Err(message) = result {
            errors.insert(field, message);
        }
    }
    errors
}

/// Checks only the fields an update actually sets
pub fn validate_lead_update(update: &UpdateLeadRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let checks = [
        ("name", update.name.as_deref().map(validate_name)),
        (
            "email",
            update.email.as_deref().map(|e| validate_email(Some(e))),
        ),
        ("phone", update.phone.as_deref().map(validate_phone)),
        (
            "company",
            update
                .company
                .as_deref()
                .map(|c| validate_length(Some(c), "Company", 2, 100)),
        ),
        (
            "position",
            update
                .position
                .as_deref()
                .map(|p| validate_length(Some(p), "Position", 2, 50)),
        ),
        ("value", Some(validate_value(update.value))),
        ("notes", Some(validate_notes(update.notes.as_deref()))),
    ];

    for (field, result) in checks {
        if let Some(Err(message)) = result {
            errors.insert(field, message);
        }
    }
    errors
}

pub fn validate_note(note: &CreateNoteRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Err(message) = validate_note_content(&note.content) {
        errors.insert("content", message);
    }
    errors
}

pub fn validate_note_content(content: &str) -> Result<(), String> {
    let content = content.trim();
    if content.is_empty() {
        return Err("Note cannot be empty".to_string());
    }
    check_bounds(content, "Note", 1, Some(MAX_NOTES))
}

fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if !name_pattern().is_match(name) {
        return Err("Name must be 2-50 characters and contain only letters".to_string());
    }
    check_bounds(name, "Name", 2, Some(50))
}

fn validate_email(email: Option<&str>) -> Result<(), String> {
    match email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) if !email_pattern().is_match(email) => {
            Err("Please enter a valid email address".to_string())
        }
        _ => Ok(()),
    }
}

fn validate_phone(phone: &str) -> Result<(), String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err("Phone is required".to_string());
    }
    if !phone_pattern().is_match(phone) {
        return Err("Please enter a valid phone number".to_string());
    }
    check_bounds(phone, "Phone", 10, None)
}

fn validate_length(
    value: Option<&str>,
    label: &str,
    min: usize,
    max: usize,
) -> Result<(), String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => check_bounds(value, label, min, Some(max)),
        None => Ok(()),
    }
}

fn validate_notes(notes: Option<&str>) -> Result<(), String> {
    match notes.map(str::trim) {
        Some(notes) if notes.chars().count() > MAX_NOTES => {
            Err("Notes cannot exceed 1000 characters".to_string())
        }
        _ => Ok(()),
    }
}

fn validate_value(value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err("Value must be at least 0".to_string()),
        Some(v) if v > MAX_VALUE => Err("Value cannot exceed 999999999".to_string()),
        _ => Ok(()),
    }
}

fn check_bounds(value: &str, label: &str, min: usize, max: Option<usize>) -> Result<(), String> {
    let len = value.chars().count();
    if len < min {
        return Err(format!("{} must be at least {} characters", label, min));
    }
    if let Some(max) = max {
        if len > max {
            return Err(format!("{} cannot exceed {} characters", label, max));
        }
    }
    Ok(())
}

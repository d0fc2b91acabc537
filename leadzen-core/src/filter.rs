//! Pure filtering over entity collections.
//!
//! Every list (leads, contacts, call history, notes) filters the same way: a
//! case-insensitive substring search over a fixed set of fields per entity,
//! ANDed with an exact match on the entity's category, status or direction.
//! Filtering is stable and never reorders the source collection.

use shared_types::{
    CallDirection, CallLog, Contact, ContactCategory, Lead, LeadStatus, Note, NoteTag,
};
use std::borrow::Cow;

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Lead,
    Contact,
    CallLog,
    Note,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Lead => "lead",
            EntityKind::Contact => "contact",
            EntityKind::CallLog => "call_log",
            EntityKind::Note => "note",
        }
    }
}

/// An entity that can live in a list store
pub trait ListEntity: Clone + Send + Sync + 'static {
    type Category: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> i64;

    /// The field the category selector matches against
    fn category(&self) -> Self::Category;

    /// Fields the search text is matched against
    fn searchable_fields(&self) -> Vec<Cow<'_, str>>;

    /// Timestamp used when a list is shown most-recent-first
    fn recency(&self) -> i64;

    /// Names the first missing required field, if any
    fn missing_field(&self) -> Option<&'static str>;

    /// Free-form labels, deduplicated on load. `None` for entities without them.
    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        None
    }
}

/// Category selector with an "all" sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector<C> {
    All,
    Only(C),
}

impl<C> Default for CategorySelector<C> {
    fn default() -> Self {
        CategorySelector::All
    }
}

impl<C> From<Option<C>> for CategorySelector<C> {
    fn from(value: Option<C>) -> Self {
        match value {
            Some(category) => CategorySelector::Only(category),
            None => CategorySelector::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate<C> {
    pub search: String,
    pub selector: CategorySelector<C>,
}

impl<C> Default for FilterPredicate<C> {
    fn default() -> Self {
        Self {
            search: String::new(),
            selector: CategorySelector::All,
        }
    }
}

impl<C: Copy + PartialEq> FilterPredicate<C> {
    pub fn new(search: impl Into<String>, selector: CategorySelector<C>) -> Self {
        Self {
            search: search.into(),
            selector,
        }
    }

    pub fn search(search: impl Into<String>) -> Self {
        Self::new(search, CategorySelector::All)
    }

    pub fn category(category: C) -> Self {
        Self::new(String::new(), CategorySelector::Only(category))
    }

    /// True when the predicate lets every entity through
    pub fn is_identity(&self) -> bool {
        self.search.is_empty() && matches!(self.selector, CategorySelector::All)
    }

    pub fn matches<E: ListEntity<Category = C>>(&self, entity: &E) -> bool {
        self.matches_category(entity) && matches_search(entity, &self.search.to_lowercase())
    }

    fn matches_category<E: ListEntity<Category = C>>(&self, entity: &E) -> bool {
        match self.selector {
            CategorySelector::All => true,
            CategorySelector::Only(category) => entity.category() == category,
        }
    }
}

fn matches_search<E: ListEntity>(entity: &E, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    entity
        .searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Returns the entities matching `predicate`, in their original order.
pub fn filter<E: ListEntity>(items: &[E], predicate: &FilterPredicate<E::Category>) -> Vec<E> {
    if predicate.is_identity() {
        return items.to_vec();
    }

    let needle = predicate.search.to_lowercase();
    items
        .iter()
        .filter(|entity| predicate.matches_category(*entity) && matches_search(*entity, &needle))
        .cloned()
        .collect()
}

/// Flips `is_favorite` on the contact with `id`.
pub fn toggle_favorite(mut collection: Vec<Contact>, id: i64) -> Result<Vec<Contact>, StoreError> {
    let contact = collection
        .iter_mut()
        .find(|contact| contact.id == id)
        .ok_or(StoreError::NotFound(id))?;

    contact.is_favorite = !contact.is_favorite;
    Ok(collection)
}

fn push_optional<'a>(fields: &mut Vec<Cow<'a, str>>, value: &'a Option<String>) {
    if let Some(value) = value {
        fields.push(Cow::Borrowed(value.as_str()));
    }
}

impl ListEntity for Lead {
    type Category = LeadStatus;

    const KIND: EntityKind = EntityKind::Lead;

    fn id(&self) -> i64 {
        self.id
    }

    fn category(&self) -> LeadStatus {
        self.status
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![Cow::Borrowed(self.name.as_str())];
        push_optional(&mut fields, &self.company);
        push_optional(&mut fields, &self.phone);
        push_optional(&mut fields, &self.email);
        push_optional(&mut fields, &self.notes);
        fields
    }

    fn recency(&self) -> i64 {
        self.last_contacted_at.unwrap_or(self.created_at)
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else {
            None
        }
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.tags)
    }
}

impl ListEntity for Contact {
    type Category = ContactCategory;

    const KIND: EntityKind = EntityKind::Contact;

    fn id(&self) -> i64 {
        self.id
    }

    fn category(&self) -> ContactCategory {
        self.category
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = vec![Cow::Owned(self.full_name())];
        push_optional(&mut fields, &self.company);
        push_optional(&mut fields, &self.phone);
        push_optional(&mut fields, &self.email);
        push_optional(&mut fields, &self.notes);
        fields
    }

    fn recency(&self) -> i64 {
        self.last_contacted_at.unwrap_or(self.created_at)
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            Some("name")
        } else {
            None
        }
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.tags)
    }
}

impl ListEntity for CallLog {
    type Category = CallDirection;

    const KIND: EntityKind = EntityKind::CallLog;

    fn id(&self) -> i64 {
        self.id
    }

    fn category(&self) -> CallDirection {
        self.direction
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields = Vec::with_capacity(3);
        push_optional(&mut fields, &self.contact_name);
        fields.push(Cow::Borrowed(self.phone_number.as_str()));
        push_optional(&mut fields, &self.notes);
        fields
    }

    fn recency(&self) -> i64 {
        self.started_at
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.phone_number.trim().is_empty() {
            Some("phone_number")
        } else {
            None
        }
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.tags)
    }
}

impl ListEntity for Note {
    type Category = NoteTag;

    const KIND: EntityKind = EntityKind::Note;

    fn id(&self) -> i64 {
        self.id
    }

    fn category(&self) -> NoteTag {
        self.tag
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.content.as_str())]
    }

    fn recency(&self) -> i64 {
        self.updated_at
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.content.trim().is_empty() {
            Some("content")
        } else {
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{call, contact, lead, note};
    use super::*;

    fn ids<E: ListEntity>(items: &[E]) -> Vec<i64> {
        items.iter().map(|e| e.id()).collect()
    }

    #[test]
    fn test_search_matches_first_name_case_insensitively() {
        let leads = vec![
            lead(1, "John Smith", LeadStatus::New),
            lead(2, "Jane Doe", LeadStatus::New),
        ];

        let result = filter(&leads, &FilterPredicate::search("jo"));

        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let leads = vec![
            lead(1, "John Smith", LeadStatus::New),
            lead(2, "Jane Doe", LeadStatus::New),
            lead(3, "Bojo Johnson", LeadStatus::Contacted),
        ];

        let upper = filter(&leads, &FilterPredicate::search("JOHN"));
        let lower = filter(&leads, &FilterPredicate::search("john"));

        assert_eq!(upper, lower);
        assert_eq!(ids(&upper), vec![1, 3]);
    }

    #[test]
    fn test_empty_predicate_is_identity() {
        let leads = vec![
            lead(3, "C", LeadStatus::Qualified),
            lead(1, "A", LeadStatus::New),
            lead(2, "B", LeadStatus::ClosedLost),
        ];

        assert_eq!(filter(&leads, &FilterPredicate::default()), leads);
    }

    #[test]
    fn test_result_is_order_preserving_subsequence() {
        let leads = vec![
            lead(9, "Anna", LeadStatus::New),
            lead(2, "Bob", LeadStatus::New),
            lead(7, "Hannah", LeadStatus::New),
            lead(4, "Joanna", LeadStatus::New),
        ];

        let result = filter(&leads, &FilterPredicate::search("ann"));

        assert_eq!(ids(&result), vec![9, 7, 4]);
    }

    #[test]
    fn test_category_is_exact_match() {
        let leads = vec![
            lead(1, "A", LeadStatus::New),
            lead(2, "B", LeadStatus::Contacted),
            lead(3, "C", LeadStatus::New),
        ];

        let result = filter(&leads, &FilterPredicate::category(LeadStatus::Contacted));

        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_search_and_category_are_anded() {
        let leads = vec![
            lead(1, "John", LeadStatus::New),
            lead(2, "John", LeadStatus::Qualified),
            lead(3, "Mary", LeadStatus::Qualified),
        ];

        let predicate =
            FilterPredicate::new("john", CategorySelector::Only(LeadStatus::Qualified));

        assert_eq!(ids(&filter(&leads, &predicate)), vec![2]);
    }

    #[test]
    fn test_lead_search_covers_company_phone_email_and_notes() {
        let mut acme = lead(1, "X", LeadStatus::New);
        acme.company = Some("Acme Corp".to_string());
        let mut phone = lead(2, "Y", LeadStatus::New);
        phone.phone = Some("555-0100".to_string());
        let mut email = lead(3, "Z", LeadStatus::New);
        email.email = Some("zed@example.com".to_string());
        let mut notes = lead(4, "W", LeadStatus::New);
        notes.notes = Some("Met at the ACME booth".to_string());
        let leads = vec![acme, phone, email, notes];

        assert_eq!(ids(&filter(&leads, &FilterPredicate::search("acme"))), vec![1, 4]);
        assert_eq!(ids(&filter(&leads, &FilterPredicate::search("0100"))), vec![2]);
        assert_eq!(ids(&filter(&leads, &FilterPredicate::search("EXAMPLE"))), vec![3]);
    }

    #[test]
    fn test_contact_search_spans_full_name() {
        let contacts = vec![
            contact(1, "Jane", "Doe", ContactCategory::Customer),
            contact(2, "John", "Smith", ContactCategory::Lead),
        ];

        let result = filter(&contacts, &FilterPredicate::search("e d"));

        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_call_log_direction_filter() {
        let calls = vec![
            call(1, "5550001", CallDirection::Inbound, 10),
            call(2, "5550002", CallDirection::Missed, 20),
            call(3, "5550003", CallDirection::Inbound, 30),
        ];

        let predicate = FilterPredicate::new("555", CategorySelector::Only(CallDirection::Inbound));

        assert_eq!(ids(&filter(&calls, &predicate)), vec![1, 3]);
    }

    #[test]
    fn test_note_search_and_tag() {
        let notes = vec![
            note(1, 7, "Asked for a PRICING sheet", NoteTag::FollowUp),
            note(2, 7, "Pricing discussed on call", NoteTag::CallRelated),
            note(3, 7, "Prefers mornings", NoteTag::General),
        ];

        assert_eq!(ids(&filter(&notes, &FilterPredicate::search("pricing"))), vec![1, 2]);
        assert_eq!(
            ids(&filter(&notes, &FilterPredicate::category(NoteTag::General))),
            vec![3]
        );
    }

    #[test]
    fn test_toggle_favorite_twice_is_identity() {
        let contacts = vec![
            contact(1, "Jane", "Doe", ContactCategory::Customer),
            contact(2, "John", "Smith", ContactCategory::Lead),
        ];

        let once = toggle_favorite(contacts.clone(), 2).unwrap();
        assert!(once[1].is_favorite);
        assert!(!once[0].is_favorite);

        let twice = toggle_favorite(once, 2).unwrap();
        assert_eq!(twice, contacts);
    }

    #[test]
    fn test_toggle_favorite_reports_missing_id() {
        let contacts = vec![contact(1, "Jane", "Doe", ContactCategory::Customer)];

        let err = toggle_favorite(contacts, 42).unwrap_err();

        assert_eq!(err, StoreError::NotFound(42));
    }

    #[test]
    fn test_selector_from_option() {
        assert_eq!(
            CategorySelector::from(Some(LeadStatus::New)),
            CategorySelector::Only(LeadStatus::New)
        );
        assert_eq!(
            CategorySelector::<LeadStatus>::from(None),
            CategorySelector::All
        );
    }
}

//! Client-side narrowing of a fetched contact collection.

use crate::model::Contact;

/// Filter criteria applied to the contact list.
///
/// Both criteria are optional: an empty string matches every contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the contact name.
    pub name_query: String,
    /// Exact tag the contact must carry.
    pub tag_query: String,
}

impl FilterCriteria {
    #[must_use]
    pub fn new(name_query: impl Into<String>, tag_query: impl Into<String>) -> Self {
        Self {
            name_query: name_query.into(),
            tag_query: tag_query.into(),
        }
    }

    /// Returns true if no filter criteria are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name_query.is_empty() && self.tag_query.is_empty()
    }

    /// Returns true if the contact satisfies both criteria.
    #[must_use]
    pub fn matches(&self, contact: &Contact) -> bool {
        if !self.tag_query.is_empty() && !contact.tags.contains(&self.tag_query) {
            return false;
        }
        if !self.name_query.is_empty() {
            let needle = self.name_query.to_lowercase();
            if !contact.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Keep the contacts matching `criteria`, in their original order.
#[must_use]
pub fn apply_filter(contacts: &[Contact], criteria: &FilterCriteria) -> Vec<Contact> {
    contacts
        .iter()
        .filter(|contact| criteria.matches(contact))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContactId, TagSet};

    fn make_contact(id: &str, name: &str, tags: &str) -> Contact {
        Contact {
            id: ContactId::new(id),
            name: name.to_string(),
            phone: "555".to_string(),
            address: None,
            email: None,
            tags: TagSet::decode(tags),
        }
    }

    fn names(contacts: &[Contact]) -> Vec<&str> {
        contacts.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn empty_criteria_matches_all() {
        let filter = FilterCriteria::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&make_contact("1", "Alice", "")));
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let contacts = vec![make_contact("1", "Alice", "")];
        let out = apply_filter(&contacts, &FilterCriteria::new("ALI", ""));
        assert_eq!(names(&out), vec!["Alice"]);
    }

    #[test]
    fn name_match_is_substring() {
        let contacts = vec![
            make_contact("1", "Alice", ""),
            make_contact("2", "Malik", ""),
            make_contact("3", "Bob", ""),
        ];
        let out = apply_filter(&contacts, &FilterCriteria::new("li", ""));
        assert_eq!(names(&out), vec!["Alice", "Malik"]);
    }

    #[test]
    fn name_match_folds_non_ascii() {
        let contacts = vec![make_contact("1", "ÉLODIE", "")];
        let out = apply_filter(&contacts, &FilterCriteria::new("élo", ""));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn tag_match_is_exact_not_substring() {
        let contacts = vec![make_contact("1", "Alice", "work")];
        assert!(apply_filter(&contacts, &FilterCriteria::new("", "wo")).is_empty());
        assert_eq!(
            apply_filter(&contacts, &FilterCriteria::new("", "work")).len(),
            1
        );
    }

    #[test]
    fn tag_match_requires_membership() {
        let contacts = vec![
            make_contact("1", "Alice", "friend,work"),
            make_contact("2", "Bob", "family"),
            make_contact("3", "Cara", ""),
        ];
        let out = apply_filter(&contacts, &FilterCriteria::new("", "family"));
        assert_eq!(names(&out), vec!["Bob"]);
    }

    #[test]
    fn combined_criteria_use_and_semantics() {
        let contacts = vec![
            make_contact("1", "Alice", "work"),
            make_contact("2", "Alan", "friend"),
            make_contact("3", "Bob", "work"),
        ];
        let out = apply_filter(&contacts, &FilterCriteria::new("al", "work"));
        assert_eq!(names(&out), vec!["Alice"]);
    }

    #[test]
    fn filter_preserves_input_order() {
        let contacts = vec![
            make_contact("3", "Zed", "work"),
            make_contact("1", "Amy", "work"),
            make_contact("2", "Moe", "work"),
        ];
        let out = apply_filter(&contacts, &FilterCriteria::new("", "work"));
        assert_eq!(names(&out), vec!["Zed", "Amy", "Moe"]);
    }

    #[test]
    fn empty_criteria_returns_input_unchanged() {
        let contacts = vec![make_contact("2", "Bo", "x"), make_contact("1", "Al", "")];
        assert_eq!(apply_filter(&contacts, &FilterCriteria::default()), contacts);
    }
}

//! List reconciliation: turns a filtered contact collection into the content
//! of the list container.
//!
//! The output is a plain view model. The TUI draws it with ratatui and the
//! `list` subcommand prints it; neither adds or drops information.

use crate::model::{Contact, ContactId};

/// Shown while the first fetch is in flight.
pub const LOADING_PLACEHOLDER: &str = "Loading...";
/// Shown for an empty result, whether the service has no contacts or the
/// filter matched none.
pub const EMPTY_PLACEHOLDER: &str = "No contacts yet, or no contacts match the filter";
/// Shown after a failed fetch.
pub const FAILED_PLACEHOLDER: &str = "Failed to load contacts";

/// Full content of the list container. Each render replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListContent {
    Loading,
    Failed,
    Empty,
    Rows(Vec<ContactRow>),
}

impl ListContent {
    /// The single placeholder item, if this content is not a list of rows.
    #[must_use]
    pub const fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING_PLACEHOLDER),
            Self::Failed => Some(FAILED_PLACEHOLDER),
            Self::Empty => Some(EMPTY_PLACEHOLDER),
            Self::Rows(_) => None,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[ContactRow] {
        match self {
            Self::Rows(rows) => rows,
            _ => &[],
        }
    }
}

/// Secondary information shown under the main line, only when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Address(String),
    Email(String),
    /// One chip per tag.
    Tags(Vec<String>),
}

/// Per-row action affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Carries the full contact snapshot so the edit form can be filled
    /// without another fetch.
    Edit(Box<Contact>),
    Delete(ContactId),
}

/// One rendered contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub name: String,
    pub phone: String,
    pub details: Vec<Detail>,
    pub actions: Vec<Action>,
}

impl ContactRow {
    #[must_use]
    pub fn from_contact(contact: &Contact) -> Self {
        let mut details = Vec::new();
        if let Some(address) = &contact.address {
            details.push(Detail::Address(address.clone()));
        }
        if let Some(email) = &contact.email {
            details.push(Detail::Email(email.clone()));
        }
        let chips = tag_chips(&contact.tags.encode());
        if !chips.is_empty() {
            details.push(Detail::Tags(chips));
        }

        Self {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            details,
            actions: vec![
                Action::Edit(Box::new(contact.clone())),
                Action::Delete(contact.id.clone()),
            ],
        }
    }

    /// `name (phone)`
    #[must_use]
    pub fn main_line(&self) -> String {
        format!("{} ({})", self.name, self.phone)
    }

    #[must_use]
    pub fn chips(&self) -> &[String] {
        self.details
            .iter()
            .find_map(|detail| match detail {
                Detail::Tags(chips) => Some(chips.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Contact snapshot attached to the edit affordance.
    #[must_use]
    pub fn edit_snapshot(&self) -> Option<&Contact> {
        self.actions.iter().find_map(|action| match action {
            Action::Edit(contact) => Some(contact.as_ref()),
            Action::Delete(_) => None,
        })
    }

    /// Id attached to the delete affordance.
    #[must_use]
    pub fn delete_target(&self) -> Option<&ContactId> {
        self.actions.iter().find_map(|action| match action {
            Action::Delete(id) => Some(id),
            Action::Edit(_) => None,
        })
    }
}

/// Split a stored comma-joined tag string into trimmed chip labels.
#[must_use]
pub fn tag_chips(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|chip| !chip.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the list content for an already-filtered collection.
#[must_use]
pub fn reconcile(contacts: &[Contact]) -> ListContent {
    if contacts.is_empty() {
        return ListContent::Empty;
    }
    ListContent::Rows(contacts.iter().map(ContactRow::from_contact).collect())
}

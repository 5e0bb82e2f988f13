//! Typed messages flowing through the TUI.
//!
//! Key events become [`Command`]s. The view's dispatcher turns commands into
//! [`Request`]s for the contact service, and each request comes back as
//! exactly one [`Completion`].

use rolodex_core::client::{ClientError, ContactApi};
use rolodex_core::model::{Contact, ContactFields, ContactId};
use tracing::debug;

/// User intent, independent of the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the add form.
    AddRequested,
    /// Load a contact snapshot into the edit form.
    EditRequested(Contact),
    EditSubmitted,
    EditCancelled,
    DeleteRequested(ContactId),
    DeleteConfirmed(ContactId),
    DeleteDeclined,
    /// Name query or tag selection changed.
    FilterChanged,
    Refresh,
    Quit,
}

/// Work for the contact service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Fetch,
    Create(ContactFields),
    Update(ContactId, ContactFields),
    Delete(ContactId),
}

impl Request {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Create(_) => "create",
            Self::Update(..) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Result of one [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Fetched(Result<Vec<Contact>, ClientError>),
    Created(Result<(), ClientError>),
    Updated {
        id: ContactId,
        result: Result<(), ClientError>,
    },
    Deleted(Result<(), ClientError>),
}

/// Run one request to completion against `api`. Blocks the calling thread.
pub fn execute(api: &dyn ContactApi, request: Request) -> Completion {
    debug!(request = request.label(), "executing request");
    match request {
        Request::Fetch => Completion::Fetched(api.list_contacts()),
        Request::Create(fields) => Completion::Created(api.create_contact(&fields)),
        Request::Update(id, fields) => {
            let result = api.update_contact(&id, &fields);
            Completion::Updated { id, result }
        }
        Request::Delete(id) => Completion::Deleted(api.delete_contact(&id)),
    }
}

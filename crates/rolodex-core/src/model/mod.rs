pub mod contact;
pub mod tags;

pub use contact::{Contact, ContactFields, ContactId};
pub use tags::{DEFAULT_VOCABULARY, TagCheckbox, TagChecklist, TagSet};

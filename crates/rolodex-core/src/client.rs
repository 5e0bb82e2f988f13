//! REST client for the contact service.
//!
//! [`ContactApi`] is the seam the UI talks to; [`HttpContactClient`] is the
//! `ureq` implementation. Every call is issued exactly once: no retries, no
//! timeouts beyond the transport's own, no cancellation.

use crate::error::ErrorCode;
use crate::model::{Contact, ContactFields, ContactId};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

const ADD_FAILED: &str = "add failed";
const UPDATE_FAILED: &str = "update failed";
const DELETE_FAILED: &str = "delete failed";

/// Typed failures of the contact service calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Transport failure, or a non-2xx / unreadable response to a read.
    #[error("{message}")]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// A create or update was rejected; `message` is the service's `error` field.
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// A delete was rejected.
    #[error("{message}")]
    Deletion { status: u16, message: String },
}

impl ClientError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Network {
                status: Some(code), ..
            } if *code >= 200 && *code < 300 => ErrorCode::InvalidResponse,
            Self::Network { .. } => ErrorCode::NetworkFailure,
            Self::Validation { .. } => ErrorCode::ValidationRejected,
            Self::Deletion { .. } => ErrorCode::DeletionFailed,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message, .. }
            | Self::Validation { message, .. }
            | Self::Deletion { message, .. } => message,
        }
    }

    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            Self::Validation { status, .. } | Self::Deletion { status, .. } => Some(*status),
        }
    }
}

/// Operations the UI needs from the contact service.
pub trait ContactApi: Send + Sync {
    /// `GET /contacts`
    ///
    /// # Errors
    ///
    /// [`ClientError::Network`] on transport failure, non-2xx status or an
    /// unreadable body.
    fn list_contacts(&self) -> Result<Vec<Contact>, ClientError>;

    /// `POST /contacts`
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] on non-2xx, [`ClientError::Network`] on
    /// transport failure.
    fn create_contact(&self, fields: &ContactFields) -> Result<(), ClientError>;

    /// `PUT /contacts/{id}`
    ///
    /// # Errors
    ///
    /// Same contract as [`ContactApi::create_contact`].
    fn update_contact(&self, id: &ContactId, fields: &ContactFields) -> Result<(), ClientError>;

    /// `DELETE /contacts/{id}`
    ///
    /// # Errors
    ///
    /// [`ClientError::Deletion`] on non-2xx, [`ClientError::Network`] on
    /// transport failure.
    fn delete_contact(&self, id: &ContactId) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Pull the `error` field out of a failed response body, if there is one.
fn server_message(response: ureq::Response) -> Option<String> {
    let body = response.into_string().ok()?;
    serde_json::from_str::<ErrorBody>(&body)
        .ok()?
        .error
        .filter(|message| !message.trim().is_empty())
}

fn transport_error(method: &str, url: &str, err: &ureq::Transport) -> ClientError {
    warn!(method, url, "contact service unreachable: {err}");
    ClientError::Network {
        status: None,
        message: err.to_string(),
    }
}

/// Blocking HTTP client rooted at the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpContactClient {
    agent: ureq::Agent,
    base: Url,
}

impl HttpContactClient {
    #[must_use]
    pub fn new(base: Url) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("rolodex/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent, base }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/contacts` or `{base}/contacts/{id}`, with the id escaped as a
    /// single path segment.
    fn endpoint(&self, id: Option<&ContactId>) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("contacts");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url.into()
    }

    fn write(
        &self,
        method: &str,
        url: &str,
        fields: &ContactFields,
        fallback: &str,
    ) -> Result<(), ClientError> {
        debug!(method, url, name = %fields.name, "sending contact");
        match self.agent.request(method, url).send_json(fields) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, response)) => {
                let message = server_message(response).unwrap_or_else(|| fallback.to_string());
                warn!(method, url, status, "contact rejected: {message}");
                Err(ClientError::Validation { status, message })
            }
            Err(ureq::Error::Transport(err)) => Err(transport_error(method, url, &err)),
        }
    }
}

impl ContactApi for HttpContactClient {
    fn list_contacts(&self) -> Result<Vec<Contact>, ClientError> {
        let url = self.endpoint(None);
        debug!(method = "GET", url = %url, "fetching contacts");
        match self.agent.get(&url).call() {
            Ok(response) => {
                let status = response.status();
                response
                    .into_json::<Vec<Contact>>()
                    .map_err(|err| ClientError::Network {
                        status: Some(status),
                        message: format!("invalid contact list: {err}"),
                    })
            }
            Err(ureq::Error::Status(status, response)) => {
                let message = server_message(response)
                    .unwrap_or_else(|| format!("failed to load contacts (HTTP {status})"));
                warn!(url = %url, status, "contact list failed: {message}");
                Err(ClientError::Network {
                    status: Some(status),
                    message,
                })
            }
            Err(ureq::Error::Transport(err)) => Err(transport_error("GET", &url, &err)),
        }
    }

    fn create_contact(&self, fields: &ContactFields) -> Result<(), ClientError> {
        self.write("POST", &self.endpoint(None), fields, ADD_FAILED)
    }

    fn update_contact(&self, id: &ContactId, fields: &ContactFields) -> Result<(), ClientError> {
        self.write("PUT", &self.endpoint(Some(id)), fields, UPDATE_FAILED)
    }

    fn delete_contact(&self, id: &ContactId) -> Result<(), ClientError> {
        let url = self.endpoint(Some(id));
        debug!(method = "DELETE", url = %url, "deleting contact");
        match self.agent.delete(&url).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => {
                warn!(url = %url, status, "contact delete rejected");
                Err(ClientError::Deletion {
                    status,
                    message: DELETE_FAILED.to_string(),
                })
            }
            Err(ureq::Error::Transport(err)) => Err(transport_error("DELETE", &url, &err)),
        }
    }
}

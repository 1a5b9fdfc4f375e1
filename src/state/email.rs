//! Email records.

use serde::{Deserialize, Serialize};

/// An inbox message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub from_address: String,
    pub subject: String,
    pub body: String,
    /// RFC 3339 timestamp, kept as received.
    pub received_at: String,
}

impl Email {
    /// Subject line for a reply.
    pub fn reply_subject(&self) -> String {
        format!("Re: {}", self.subject)
    }
}

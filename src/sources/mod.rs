//! Data collaborators behind the email and search tools.

mod email;
mod search;

pub use email::{EmailSource, MockInbox};
pub use search::{MockSearch, SearchBackend, SearchResult};

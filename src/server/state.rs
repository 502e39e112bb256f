//! Per-connection session state

use crate::article::Group;
use crate::storage::SharedBackend;

/// State of one client session
///
/// The backend handle is replaced when AUTHINFO succeeds; the selected group
/// is a snapshot taken by the last successful GROUP.
pub struct Session {
    /// Backend handle used for every command on this connection
    pub backend: SharedBackend,
    /// Group selected by GROUP, if any
    pub group: Option<Group>,
}

impl Session {
    /// Start a session with no group selected
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            group: None,
        }
    }

    /// Adopt the handle returned by a successful authentication
    pub fn adopt(&mut self, backend: SharedBackend) {
        self.backend = backend;
    }
}

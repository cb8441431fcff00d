//! Full-page navigation seam.
//!
//! Login ends with the host leaving the current page for the provider. The
//! session core only decides *where*; a [`Navigator`] performs the move.

use crate::AuthResult;
use parking_lot::Mutex;
use url::Url;

/// Sends the user agent to a URL.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &Url) -> AuthResult<()>;
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<Url>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent destination.
    pub fn last(&self) -> Option<Url> {
        self.visited.lock().last().cloned()
    }

    /// Every destination, oldest first.
    pub fn visited(&self) -> Vec<Url> {
        self.visited.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &Url) -> AuthResult<()> {
        self.visited.lock().push(url.clone());
        Ok(())
    }
}

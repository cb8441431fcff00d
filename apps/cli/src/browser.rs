//! Navigator that opens the system browser.

use steam_session::{AuthError, AuthResult, Navigator};
use url::Url;

pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &Url) -> AuthResult<()> {
        open::that(url.as_str()).map_err(|e| AuthError::Navigation(e.to_string()))
    }
}

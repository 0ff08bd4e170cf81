use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
use url::Origin;

use super::model::CredentialMode;

/// Cookies collected during one run, gated per request by its credential mode.
pub(super) struct CookieSession {
    jar: Jar,
    origin: Origin,
}

impl CookieSession {
    pub(super) fn new(base: &Url) -> Self {
        Self {
            jar: Jar::default(),
            origin: base.origin(),
        }
    }

    pub(super) fn allows(&self, mode: CredentialMode, url: &Url) -> bool {
        match mode {
            CredentialMode::Omit => false,
            CredentialMode::SameOrigin => url.origin() == self.origin,
            CredentialMode::Include => true,
        }
    }

    /// `Cookie` header value to attach, if the mode allows and the jar has any.
    pub(super) fn cookie_header(&self, mode: CredentialMode, url: &Url) -> Option<HeaderValue> {
        if self.allows(mode, url) {
            self.jar.cookies(url)
        } else {
            None
        }
    }

    /// Stores `Set-Cookie` headers from a response when the mode allows.
    pub(super) fn store(&self, mode: CredentialMode, url: &Url, headers: &HeaderMap) -> bool {
        if !self.allows(mode, url) || !headers.contains_key(SET_COOKIE) {
            return false;
        }
        let mut values = headers.get_all(SET_COOKIE).iter();
        self.jar.set_cookies(&mut values, url);
        true
    }
}

//! Invitation links.
//!
//! Invitations reach the wallet as plain URLs carrying the invitation in
//! their query (`https://example.com?c_i=...`), as custom-scheme deep links
//! (`didcomm://invite?c_i=...`), or as shortened URLs that redirect to the
//! actual invitation. Deep links may also wrap a shortened URL
//! (`didcomm://invite?https://bit.ly/...`), in which case the shortened URL is
//! what must be followed.
use std::borrow::Cow;

use iref::Uri;

/// Query parameters carrying an inline invitation.
const INLINE_PARAMETERS: [&str; 3] = ["c_i", "oob", "d_m"];

/// Classified invitation reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationReference<'a> {
    /// URL or deep link carrying the invitation itself.
    Inline(&'a str),

    /// Deep link whose payload is a shortened URL.
    WrappedShortUrl { deep_link: &'a str, url: &'a str },

    /// HTTP(S) URL without inline invitation, expected to redirect.
    ShortUrl(&'a str),

    /// Anything else.
    Unrecognized(&'a str),
}

impl<'a> InvitationReference<'a> {
    pub fn classify(uri: &'a str) -> Self {
        let Some(scheme) = scheme_of(uri) else {
            return Self::Unrecognized(uri);
        };

        let payload = uri.split_once('?').map(|(_, payload)| payload);

        if !is_http(scheme) {
            return match payload {
                Some(url) if is_absolute_http_url(url) => Self::WrappedShortUrl {
                    deep_link: uri,
                    url,
                },
                _ => Self::Inline(uri),
            };
        }

        if payload.is_some_and(has_inline_parameter) {
            Self::Inline(uri)
        } else if Uri::new(uri.as_bytes()).is_ok() {
            Self::ShortUrl(uri)
        } else {
            Self::Unrecognized(uri)
        }
    }

    /// The reference to hand to the invitation handler.
    pub fn normalized(&self) -> &'a str {
        match *self {
            Self::Inline(uri) | Self::ShortUrl(uri) | Self::Unrecognized(uri) => uri,
            Self::WrappedShortUrl { url, .. } => url,
        }
    }
}

/// Unwraps a deep link wrapping a shortened URL. Any other reference is
/// returned unchanged.
pub fn normalize(uri: &str) -> Cow<'_, str> {
    let reference = InvitationReference::classify(uri);
    match reference {
        InvitationReference::WrappedShortUrl { deep_link, url } => {
            tracing::trace!("unwrapped <{url}> from deep link <{deep_link}>")
        }
        InvitationReference::Unrecognized(uri) => {
            tracing::debug!("unrecognized invitation reference `{uri}`")
        }
        _ => (),
    }

    Cow::Borrowed(reference.normalized())
}

/// URI scheme, if `uri` starts with a syntactically valid one.
fn scheme_of(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(':')?;
    let mut chars = scheme.chars();

    let valid = chars.next()?.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid.then_some(scheme)
}

fn is_http(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

/// Checks that `url` is an absolute HTTP(S) URL with a host.
fn is_absolute_http_url(url: &str) -> bool {
    let Some(scheme) = scheme_of(url) else {
        return false;
    };

    if !is_http(scheme) || Uri::new(url.as_bytes()).is_err() {
        return false;
    }

    let Some(rest) = url[scheme.len() + 1..].strip_prefix("//") else {
        return false;
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    !host.is_empty() && !host.starts_with(':')
}

fn has_inline_parameter(query: &str) -> bool {
    query.split('&').any(|parameter| {
        let name = parameter.split_once('=').map_or(parameter, |(name, _)| name);
        INLINE_PARAMETERS.contains(&name)
    })
}

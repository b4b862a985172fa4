//! Chat-flavored inline markup to standard markdown.
//!
//! Two rewrites, applied in order:
//!
//! 1. `<URL|LABEL>` becomes `[LABEL](URL)`.
//! 2. `<http://...>` / `<https://...>` lose their angle brackets.
//!
//! Link forms go first so they are never mistaken for bare URLs. Nothing
//! else is touched.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static LABELED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^|>]+)\|([^>]+)>").expect("failed to compile labeled link regex")
});

static BRACKETED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(https?://[^>]+)>").expect("failed to compile bracketed URL regex")
});

/// Passes allowed before `normalize` gives up on a message.
const MAX_PASSES: usize = 8;

/// Rewrite links in `text` until no rewritable form is left.
///
/// A single pass can expose a new form when brackets are nested
/// (`<<https://a.io>|x>`), so passes repeat to a fixed point. Text that is
/// still changing after [`MAX_PASSES`] passes is returned as received, so
/// each message costs at most a fixed number of linear passes and the
/// result is stable under a second `normalize`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut current = Cow::Borrowed(text);
    for _ in 0..MAX_PASSES {
        let next = rewrite_once(&current);
        if next == current {
            return next;
        }
        current = Cow::Owned(next);
    }
    text.to_string()
}

fn rewrite_once(text: &str) -> String {
    let linked = LABELED_LINK.replace_all(text, "[${2}](${1})");
    BRACKETED_URL.replace_all(&linked, "${1}").into_owned()
}

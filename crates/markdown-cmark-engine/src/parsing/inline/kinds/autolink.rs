use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*)>",
    )
    .expect("Invalid email autolink regex")
});

static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\x00-\x20]*)>")
        .expect("Invalid URI autolink regex")
});

/// A recognised `<...>` autolink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autolink<'a> {
    /// The text between the angle brackets.
    pub text: &'a str,
    pub url: String,
    /// Bytes consumed including the brackets.
    pub len: usize,
}

impl<'a> Autolink<'a> {
    pub const OPEN: u8 = b'<';

    /// Scans an email or URI autolink at the start of `s`. Email addresses
    /// get a `mailto:` destination.
    pub fn scan(s: &'a str) -> Option<Self> {
        if let Some(caps) = EMAIL.captures(s) {
            let text = caps.get(1)?.as_str();
            return Some(Autolink {
                text,
                url: format!("mailto:{text}"),
                len: caps.get(0)?.end(),
            });
        }
        let caps = URI.captures(s)?;
        let text = caps.get(1)?.as_str();
        Some(Autolink {
            text,
            url: text.to_string(),
            len: caps.get(0)?.end(),
        })
    }
}

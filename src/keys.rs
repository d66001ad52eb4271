//! Key naming scheme for the session namespace
//!
//! Two families of keys share one namespace root:
//! - primary key `prefix + session_id`, holding the serialized record
//! - index key `root + sep + user_id + sep + session_id`, holding the
//!   primary key string so a prefix scan can find all of a user's sessions
//!
//! Session ids must not contain the separator character; enumeration relies
//! on it to tell the two families apart.

/// Derived key forms, computed once at store construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScheme {
    prefix: String,
    root: String,
    separator: char,
}

impl KeyScheme {
    /// Build a scheme from a key prefix (default `"sess:"`).
    ///
    /// If the prefix does not already end in a non-word character, a `:`
    /// separator is appended so every key decomposes unambiguously into
    /// `root + separator + suffix`.
    pub fn new(prefix: &str) -> Self {
        let mut prefix = prefix.to_string();
        let last = prefix.chars().last();
        let separator = match last {
            Some(c) if !(c.is_alphanumeric() || c == '_') => c,
            _ => {
                prefix.push(':');
                ':'
            }
        };
        let root = prefix[..prefix.len() - separator.len_utf8()].to_string();
        Self {
            prefix,
            root,
            separator,
        }
    }

    /// The full prefix, separator included.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The prefix with its trailing separator removed.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The single separator character.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Key holding the serialized record for `sid`.
    pub fn primary(&self, sid: &str) -> String {
        format!("{}{}", self.prefix, sid)
    }

    /// Index key for `(user_id, sid)`; its stored value is the primary key.
    pub fn index(&self, user_id: &str, sid: &str) -> String {
        format!("{}{}", self.user_prefix(user_id), sid)
    }

    /// Scan pattern matching every key in the namespace, primary and index.
    pub fn all_pattern(&self) -> String {
        format!("{}*", self.prefix)
    }

    /// Scan pattern matching the index keys of one user.
    pub fn user_pattern(&self, user_id: &str) -> String {
        format!("{}*", self.user_prefix(user_id))
    }

    /// The session id under a primary key, or `None` when the key belongs to
    /// another namespace or is an index key (its suffix carries the
    /// separator).
    pub fn session_id<'a>(&self, key: &'a str) -> Option<&'a str> {
        let suffix = key.strip_prefix(self.prefix.as_str())?;
        if suffix.contains(self.separator) {
            None
        } else {
            Some(suffix)
        }
    }

    /// The session id embedded in one of `user_id`'s index keys. The suffix
    /// after the user prefix is the id itself, so no read of the key's value
    /// is needed.
    pub fn index_session_id<'a>(&self, key: &'a str, user_id: &str) -> Option<&'a str> {
        key.strip_prefix(self.user_prefix(user_id).as_str())
    }

    fn user_prefix(&self, user_id: &str) -> String {
        format!(
            "{root}{sep}{user_id}{sep}",
            root = self.root,
            sep = self.separator,
            user_id = user_id
        )
    }
}

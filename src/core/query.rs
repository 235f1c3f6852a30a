use crate::utils::error::{FirehoseError, Result};
use url::form_urlencoded;

/// A parsed tabular-query URL, canonicalised against the query
/// service's JSON API conventions.
///
/// The path always ends in `.json`, query arguments are single-valued,
/// and serialization preserves argument insertion order. Built fresh
/// per fetch and discarded after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub protocol: String,
    pub host: String,
    pub path: String,
    args: Vec<(String, String)>,
}

impl Query {
    /// Split a URL into protocol, host, path and query arguments.
    ///
    /// Relative, path-only URLs are accepted (`/github/releases.json`):
    /// protocol and host come back empty and the caller decides which
    /// service instance to resolve against. A repeated query key is
    /// ambiguous and rejected; a URL without a path is rejected.
    pub fn parse(url: &str) -> Result<Self> {
        let without_fragment = match url.split_once('#') {
            Some((before, _)) => before,
            None => url,
        };

        let (protocol, rest) = match without_fragment.split_once("://") {
            Some((scheme, rest)) => (scheme.to_string(), rest),
            None => (String::new(), without_fragment),
        };

        // With a scheme present the authority runs up to the first `/`
        // or `?`; without one the whole input is path + query.
        let (host, path_and_query) = if protocol.is_empty() {
            (String::new(), rest)
        } else {
            match rest.find(|c| c == '/' || c == '?') {
                Some(idx) => (rest[..idx].to_string(), &rest[idx..]),
                None => (rest.to_string(), ""),
            }
        };

        let (raw_path, raw_query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path_and_query, ""),
        };

        if raw_path.is_empty() {
            return Err(FirehoseError::MissingPath {
                url: url.to_string(),
            });
        }

        let mut args: Vec<(String, String)> = Vec::new();
        for (key, value) in form_urlencoded::parse(raw_query.as_bytes()) {
            if args.iter().any(|(k, _)| k.as_str() == key.as_ref()) {
                return Err(FirehoseError::InvalidQuery {
                    key: key.into_owned(),
                });
            }
            args.push((key.into_owned(), value.into_owned()));
        }

        // Add .json for proper output if it's missing
        let mut path = raw_path.to_string();
        if !path.ends_with(".json") {
            path.push_str(".json");
        }

        Ok(Query {
            protocol,
            host,
            path,
            args,
        })
    }

    /// Reassemble the canonical URL string. Argument order is insertion
    /// order; values are percent-encoded.
    pub fn to_url(&self) -> String {
        let mut out = String::new();
        if !self.host.is_empty() {
            if !self.protocol.is_empty() {
                out.push_str(&self.protocol);
                out.push(':');
            }
            out.push_str("//");
            out.push_str(&self.host);
        }
        out.push_str(&self.path);
        let query = self.query_string();
        if !query.is_empty() {
            out.push('?');
            out.push_str(&query);
        }
        out
    }

    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.args {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Set the `_shape` of the response (`"array"` or `"object"`).
    pub fn set_shape(&mut self, mode: &str) {
        self.set_arg("_shape", mode);
    }

    /// Sort by `column`. Exactly one sort directive is active at a time:
    /// setting one direction removes the other.
    pub fn set_sort(&mut self, column: &str, descending: bool) {
        if descending {
            self.set_arg("_sort_desc", column);
            self.remove_arg("_sort");
        } else {
            self.set_arg("_sort", column);
            self.remove_arg("_sort_desc");
        }
    }

    /// Cap the number of rows via `_size`.
    // TODO: datasette ignores _size for canned queries; those need the
    // limit baked into the query itself.
    pub fn set_limit(&mut self, limit: usize) {
        self.set_arg("_size", &limit.to_string());
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set_arg(&mut self, key: &str, value: &str) {
        match self.args.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.args.push((key.to_string(), value.to_string())),
        }
    }

    fn remove_arg(&mut self, key: &str) {
        self.args.retain(|(k, _)| k != key);
    }
}

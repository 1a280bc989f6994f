use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::LegacyStore;
use crate::error::StoreError;

/// Cookie-era storage: a `name=value; name=value` header line saved to a file.
///
/// Names and values are URI-component encoded, values are JSON. Entries that
/// fail to decode are skipped rather than failing the whole jar.
#[derive(Debug)]
pub struct CookieJar {
    path: PathBuf,
    raw: String,
}

impl CookieJar {
    /// Load the jar at `path`. A missing or unreadable file is an empty jar.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cookie file is unreadable; ignoring it");
                String::new()
            }
        };
        Self {
            path: path.to_path_buf(),
            raw,
        }
    }

    /// Build a jar from an in-memory header string (not backed by a file
    /// until [`LegacyStore::clear`] is called).
    #[must_use]
    pub fn from_header(path: &Path, header: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            raw: header.to_string(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.raw
            .trim()
            .split(';')
            .map(str::trim)
            .filter(|cookie| !cookie.is_empty())
            .map(|cookie| cookie.split_once('=').unwrap_or((cookie, "")))
    }

    fn decode_entry(name: &str, value: &str) -> Option<(String, Value)> {
        let name = decode_uri_component(name)?;
        let value = decode_uri_component(value)?;
        match serde_json::from_str(&value) {
            Ok(parsed) => Some((name, parsed)),
            Err(err) => {
                tracing::debug!(cookie = %name, error = %err, "skipping cookie with non-JSON value");
                None
            }
        }
    }
}

impl LegacyStore for CookieJar {
    fn read(&self, name: &str) -> Option<Value> {
        self.pairs()
            .filter_map(|(k, v)| Self::decode_entry(k, v))
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.pairs()
            .filter_map(|(k, v)| Self::decode_entry(k, v))
            .collect()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.raw.clear();
        match fs::metadata(&self.path) {
            Ok(_) => fs::write(&self.path, "").map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Reverse of JavaScript's `encodeURIComponent`. `None` on a malformed escape
/// or when the decoded bytes are not UTF-8.
fn decode_uri_component(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(decode_uri_component("a%20b%7B%7D").as_deref(), Some("a b{}"));
        assert_eq!(decode_uri_component("%E2%9C%93").as_deref(), Some("\u{2713}"));
        assert_eq!(decode_uri_component("%zz"), None);
        assert_eq!(decode_uri_component("%4"), None);
    }

    #[test]
    fn reads_json_cookies() {
        let jar = CookieJar::from_header(
            Path::new("/nonexistent/cookies"),
            "version=%220.1.0%22; essentialCookiesConsent=true; todoOrder-completed=%5B2%2C1%5D",
        );
        assert_eq!(jar.read("version"), Some(json!("0.1.0")));
        assert_eq!(jar.read("essentialCookiesConsent"), Some(json!(true)));
        assert_eq!(jar.read("todoOrder-completed"), Some(json!([2, 1])));
        assert_eq!(jar.read("todoList"), None);
        assert_eq!(jar.entries().len(), 3);
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let jar = CookieJar::from_header(Path::new("/nonexistent/cookies"), "note=%22a=b%22");
        assert_eq!(jar.read("note"), Some(json!("a=b")));
    }

    #[test]
    fn undecodable_entries_are_skipped() {
        let jar = CookieJar::from_header(
            Path::new("/nonexistent/cookies"),
            "broken=%7Bnope; fine=1; bad=%zz",
        );
        assert_eq!(jar.entries(), vec![("fine".to_string(), json!(1))]);
    }

    #[test]
    fn clear_empties_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.txt");
        fs::write(&path, "version=%220.1.0%22").unwrap();

        let mut jar = CookieJar::open(&path);
        assert!(!jar.is_empty());
        jar.clear().unwrap();
        assert!(jar.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert!(CookieJar::open(&path).is_empty());
    }

    #[test]
    fn clear_without_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut jar = CookieJar::open(&dir.path().join("missing.txt"));
        assert!(jar.is_empty());
        jar.clear().unwrap();
        assert!(!dir.path().join("missing.txt").exists());
    }
}

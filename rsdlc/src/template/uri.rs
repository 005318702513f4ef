//! Relative, percent-encoded path references
//!
//! Templates store asset paths as URI references relative to the directory the template
//! lives in, so a project folder can be moved or shared as a whole. The contract:
//!
//! * [`relative_uri()`] turns an absolute path into a `/`-separated reference, relative
//!   to a base directory where possible. Each segment is percent-encoded: a space becomes
//!   `%20`, a `%` becomes `%25`, and other bytes that aren't safe in a URI path are
//!   hex-encoded the same way.
//! * [`resolve_uri()`] does the reverse against the same base directory, decoding every
//!   `%XX` sequence back to its literal character.
//!
//! Resolving a reference produced for a base directory, against that same directory,
//! yields the original path.

use std::path::{Component, Path, PathBuf};

/// Express `path` as a URI reference relative to `base_dir`
///
/// Both paths are expected to be absolute. `.` and `..` segments are removed first. If they
/// share no root (e.g. different drives), the result is an absolute reference instead.
pub fn relative_uri(base_dir: &Path, path: &Path) -> String {
    let base_dir = clean(base_dir);
    let path = clean(path);
    let base: Vec<Component> = base_dir.components().collect();
    let target: Vec<Component> = path.components().collect();

    let common = base
        .iter()
        .zip(&target)
        .take_while(|(base, target)| base == target)
        .count();

    if common == 0 {
        return absolute_uri(&path);
    }

    let parents = base[common..].iter().map(|_| "..".to_owned());
    let rest = target[common..]
        .iter()
        .map(|component| encode_segment(&component.as_os_str().to_string_lossy()));

    parents.chain(rest).collect::<Vec<_>>().join("/")
}

/// Resolve a URI reference produced by [`relative_uri()`] against `base_dir`
pub fn resolve_uri(base_dir: &Path, uri: &str) -> PathBuf {
    if is_absolute_uri(uri) {
        return PathBuf::from(decode(uri));
    }

    let mut path = clean(base_dir);
    for segment in uri.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                path.pop();
            }
            segment => path.push(decode(segment)),
        }
    }

    path
}

/// Lexically remove `.` and `..` segments from a path
///
/// A `..` at the root stays at the root; a leading `..` in a relative path is kept.
pub fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other),
        }
    }

    cleaned
}

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if is_byte_allowed(byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    encoded
}

/// Decode every `%XX` sequence in a string
///
/// Malformed sequences are kept as they are.
pub fn decode(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());

    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            if let Some(byte) = bytes
                .get(index + 1..index + 3)
                .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                decoded.push(byte);
                index += 3;
                continue;
            }
        }

        decoded.push(bytes[index]);
        index += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

/// Can a byte appear unescaped in a URI path segment?
fn is_byte_allowed(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'.' | b'_' | b'~' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+'
                | b',' | b';' | b'=' | b':' | b'@'
        )
}

fn absolute_uri(path: &Path) -> String {
    let mut uri = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                uri.push_str(&prefix.as_os_str().to_string_lossy().replace('\\', "/"))
            }
            Component::RootDir => uri.push('/'),
            other => {
                if !uri.is_empty() && !uri.ends_with('/') {
                    uri.push('/');
                }
                uri.push_str(&encode_segment(&other.as_os_str().to_string_lossy()));
            }
        }
    }

    uri
}

/// Does a reference start at a root (`/...`) or a drive (`C:/...`)?
fn is_absolute_uri(uri: &str) -> bool {
    let bytes = uri.as_bytes();
    uri.starts_with('/')
        || (bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/')
}

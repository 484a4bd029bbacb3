//! Slash-delimited path helpers shared by the adapter and the stores.

/// Splits a key after its last `/` into `(dir, leaf)`.
///
/// `"secret/foo"` gives `("secret", "foo")`, `"foo"` gives `("", "foo")`.
pub fn split_key(key: &str) -> (&str, &str) {
    match key.rfind('/') {
        Some(idx) => (&key[..idx], &key[idx + 1..]),
        None => ("", key),
    }
}

/// Joins two paths, dropping empty and `.` components.
pub fn join(base: &str, rel: &str) -> String {
    components(base)
        .chain(components(rel))
        .collect::<Vec<_>>()
        .join("/")
}

/// Parent of a cleaned path; the root's parent is the root.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

pub fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|c| !c.is_empty() && *c != ".")
}

pub fn has_parent_ref(path: &str) -> bool {
    path.split('/').any(|c| c == "..")
}

//! Object key helpers.
//!
//! Object stores have no directories; a "folder" is a key prefix and a key
//! ending in `/` is a directory marker.

/// Strip leading slashes; object keys are relative to the bucket root.
pub fn normalize_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Join a folder prefix and a file name into an object key.
///
/// For a prefix that already ends in `/` (or an empty prefix) this is plain
/// concatenation. A missing separator is inserted and repeated separators at
/// the join are collapsed.
pub fn join_key(prefix: &str, name: &str) -> String {
    let prefix = normalize_path(prefix).trim_end_matches('/');
    let name = name.trim_start_matches('/');

    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Last path segment of a key, used as the suggested download name.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// The "directory" part of a prefix: everything up to and including the
/// last `/`, or the empty string at the root.
pub fn parent_dir(prefix: &str) -> &str {
    match prefix.rfind('/') {
        Some(idx) => &prefix[..=idx],
        None => "",
    }
}

/// Whether a key is a directory marker.
pub fn is_dir_marker(key: &str) -> bool {
    key.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/data/file.txt"), "data/file.txt");
        assert_eq!(normalize_path("data/file.txt"), "data/file.txt");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_join_key_matches_concatenation_for_well_formed_prefix() {
        for prefix in ["reports/", "a/b/c/", ""] {
            assert_eq!(join_key(prefix, "q1.csv"), format!("{}q1.csv", prefix));
        }
    }

    #[test]
    fn test_join_key_normalizes_separators() {
        assert_eq!(join_key("reports", "q1.csv"), "reports/q1.csv");
        assert_eq!(join_key("reports//", "/q1.csv"), "reports/q1.csv");
        assert_eq!(join_key("/reports/", "q1.csv"), "reports/q1.csv");
        assert_eq!(join_key("/", "q1.csv"), "q1.csv");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("reports/2024/q1.csv"), "q1.csv");
        assert_eq!(file_name("q1.csv"), "q1.csv");
        assert_eq!(file_name("reports/"), "");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("reports/"), "reports/");
        assert_eq!(parent_dir("reports/q"), "reports/");
        assert_eq!(parent_dir("rep"), "");
        assert_eq!(parent_dir(""), "");
    }

    #[test]
    fn test_is_dir_marker() {
        assert!(is_dir_marker("reports/"));
        assert!(!is_dir_marker("reports/q1.csv"));
    }
}

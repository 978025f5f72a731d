//! Minimal `.env` support (KEY=VALUE lines).

use std::path::Path;

/// Parse one `.env` line into a key/value pair.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"').trim_matches('\'');
    Some((key, value))
}

/// Parse the whole file content, skipping blank lines and comments.
pub(crate) fn parse(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter_map(parse_line)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Load `path` into the process environment without overriding variables
/// that are already set. Returns how many variables were set.
pub(crate) fn load(path: &Path) -> usize {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return 0;
    };

    let mut set = 0;
    for (key, value) in parse(&contents) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            set += 1;
        }
    }
    set
}

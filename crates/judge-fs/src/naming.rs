//! Problem alias to directory name mapping

/// Convert a problem alias into a safe directory name.
///
/// ASCII letters, digits, `_`, `-` and `.` are kept; every other character
/// becomes `_`. `.` and `..` on their own are rewritten so the result can
/// never climb out of its parent directory.
pub fn sanitize_alias(alias: &str) -> String {
    let mut result: String = alias
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if result.chars().all(|c| c == '.') {
        result = result.replace('.', "_");
    }

    result
}

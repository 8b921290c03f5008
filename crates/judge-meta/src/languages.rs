//! Language-set shorthands accepted in `misc.languages`

/// Every compiled language the judge accepts for regular problems.
pub const ALL_LANGUAGES: &str =
    "c11-gcc,c11-clang,cpp11-gcc,cpp11-clang,cpp17-gcc,cpp17-clang,cs,hs,java,lua,pas,py2,py3,rb";

/// Languages accepted by Karel problems.
pub const KAREL_LANGUAGES: &str = "kj,kp";

/// Expand a `languages` value into the comma-separated list sent upstream.
///
/// `all`, `karel` and `none` are shorthands; anything else passes through.
pub fn expand_languages(value: &str) -> String {
    match value {
        "all" => ALL_LANGUAGES.to_string(),
        "karel" => KAREL_LANGUAGES.to_string(),
        "none" => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_shorthands() {
        assert!(expand_languages("all").starts_with("c11-gcc,"));
        assert_eq!(expand_languages("karel"), "kj,kp");
        assert_eq!(expand_languages("none"), "");
    }

    #[test]
    fn passes_explicit_lists_through() {
        assert_eq!(expand_languages("py3,cpp17-gcc"), "py3,cpp17-gcc");
    }
}

//! Name comparison rules for usernames and permission names.

/// Case-insensitive equality used for every uniqueness check and lookup by name.
///
/// Compares the lowercase expansion of both strings, so it is Unicode-aware
/// rather than ASCII-only.
pub fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::same_name;

    #[test]
    fn ignores_case() {
        assert!(same_name("Admin", "admin"));
        assert!(same_name("ÉLAN", "élan"));
        assert!(!same_name("admin", "admin2"));
        assert!(!same_name("admin", "admi"));
    }
}

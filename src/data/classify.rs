use super::model::RoleColumnSet;

/// Token that marks a column as a role series.
pub const ROLE_KEYWORD: &str = "PROMOTOR";

/// Pick the role columns out of a header list using [`ROLE_KEYWORD`].
pub fn classify<S: AsRef<str>>(headers: &[S]) -> RoleColumnSet {
    classify_with_keyword(headers, ROLE_KEYWORD)
}

/// A header qualifies when its uppercased form contains the uppercased
/// keyword. Order and casing of the headers are preserved.
pub fn classify_with_keyword<S: AsRef<str>>(headers: &[S], keyword: &str) -> RoleColumnSet {
    let needle = keyword.to_uppercase();
    let roles = headers
        .iter()
        .map(AsRef::as_ref)
        .filter(|h| h.to_uppercase().contains(&needle))
        .map(str::to_string)
        .collect();
    RoleColumnSet::new(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively_and_keeps_casing() {
        let headers = ["Ano", "Promotor Cível", "OUTROS", "1º PROMOTOR", "promotoria"];
        let roles = classify(&headers);
        assert_eq!(
            roles.as_slice(),
            &["Promotor Cível", "1º PROMOTOR", "promotoria"]
        );
    }

    #[test]
    fn no_match_gives_empty_set() {
        let roles = classify(&["Ano", "Servidor", "Estagiário"]);
        assert!(roles.is_empty());
    }

    #[test]
    fn custom_keyword() {
        let roles = classify_with_keyword(&["Juiz A", "juiz b", "PROMOTOR C"], "juiz");
        assert_eq!(roles.as_slice(), &["Juiz A", "juiz b"]);
    }
}

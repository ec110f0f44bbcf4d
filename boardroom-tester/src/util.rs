pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// `true` when `tokens` is empty or asks for everything.
pub fn wants_all(tokens: &[String]) -> bool {
    tokens.is_empty() || tokens.iter().any(|t| t.eq_ignore_ascii_case("all"))
}

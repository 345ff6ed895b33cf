// src/config/credential.rs
//! Credential presence check, kept pure so tests never touch the real env.

/// True when `lookup(name)` yields a non-blank value.
pub fn has_credential<F>(name: &str, lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn present_absent_and_blank() {
        let env = env_of(&[("OPENAI_API_KEY", "sk-test"), ("BLANK", "   ")]);
        let lookup = |k: &str| env.get(k).cloned();
        assert!(has_credential("OPENAI_API_KEY", lookup));
        assert!(!has_credential("BLANK", lookup));
        assert!(!has_credential("MISSING", lookup));
    }
}

//! Random tokens for the configuration round-trip check

use std::sync::OnceLock;

use rand::seq::SliceRandom;
use regex::Regex;

const TOKEN_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TOKEN_LEN: usize = 20;

/// Random string of ASCII letters.
pub fn random_string() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .filter_map(|_| TOKEN_LETTERS.choose(&mut rng).map(|b| *b as char))
        .collect()
}

/// Token for a model: the model name followed by a random string.
pub fn env_token(env_name: &str) -> String {
    format!("{}{}", env_name, random_string())
}

/// Extract the token from a sink workload message (`Token is <value>`).
pub fn parse_token_message(message: &str) -> Option<&str> {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN_RE.get_or_init(|| {
        Regex::new(r"^Token is (?P<token>.*)$").expect("token regex is valid")
    });
    re.captures(message.trim())
        .and_then(|caps| caps.name("token"))
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_env_name_when_generating_token_then_prefixed_and_unique() {
        let first = env_token("foo");
        let second = env_token("foo");

        assert!(first.starts_with("foo"));
        assert!(second.starts_with("foo"));
        assert_eq!(first.len(), "foo".len() + TOKEN_LEN);
        assert_ne!(first, second);
    }

    #[test]
    fn test_random_string_is_letters_only() {
        let s = random_string();
        assert_eq!(s.len(), TOKEN_LEN);
        assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_parse_token_message() {
        assert_eq!(parse_token_message("Token is abc"), Some("abc"));
        assert_eq!(parse_token_message("  Token is abc \n"), Some("abc"));
        assert_eq!(parse_token_message("Token is "), None);
        assert_eq!(parse_token_message("Waiting for token"), None);
        assert_eq!(parse_token_message(""), None);
    }
}

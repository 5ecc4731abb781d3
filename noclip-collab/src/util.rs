use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use regex::Regex;

lazy_static! {
    /// User ids end up in URL paths, so slashes and whitespace are not allowed.
    pub static ref USER_ID_REGEX: Regex = Regex::new(r"^[^\s/]{1,64}$").unwrap();
}

pub fn random_string(length: usize) -> String {
    let mut rng = thread_rng();

    std::iter::repeat(())
        .map(|_| rng.sample(Alphanumeric) as char)
        .take(length)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_random_string() {
        let a = random_string(43);
        let b = random_string(43);

        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_id_regex() {
        assert!(USER_ID_REGEX.is_match("alice"));
        assert!(USER_ID_REGEX.is_match("bob.smith-2"));
        assert!(USER_ID_REGEX.is_match("ünïcødé"));

        assert!(!USER_ID_REGEX.is_match(""));
        assert!(!USER_ID_REGEX.is_match("alice/bob"));
        assert!(!USER_ID_REGEX.is_match("alice bob"));
        assert!(!USER_ID_REGEX.is_match(&"a".repeat(65)));
    }
}

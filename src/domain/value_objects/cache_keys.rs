use std::fmt::Display;

/// Every key this service writes to the ephemeral store, built in one place:
///
/// - `cart:{account}:{course}`: cart entry hash
/// - `checkout:{account}:{course}`: per-course checkout snapshot hash
/// - `checkout:general:{account}`: general-coupon snapshot hash
/// - `token_{token}`: cached identity with TTL
///
/// `*_pattern` constructors produce the scan patterns matching the
/// per-course keys of one account. The literal `general` segment sits where
/// per-course keys carry the account id, so the per-course patterns can
/// never match the general key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn cart(account_id: i64, course_id: i64) -> Self {
        Self(format!("cart:{account_id}:{course_id}"))
    }

    pub fn cart_pattern(account_id: i64) -> Self {
        Self(format!("cart:{account_id}:*"))
    }

    pub fn checkout(account_id: i64, course_id: i64) -> Self {
        Self(format!("checkout:{account_id}:{course_id}"))
    }

    pub fn checkout_pattern(account_id: i64) -> Self {
        Self(format!("checkout:{account_id}:*"))
    }

    pub fn checkout_general(account_id: i64) -> Self {
        Self(format!("checkout:general:{account_id}"))
    }

    pub fn token_cache(token: &str) -> Self {
        Self(format!("token_{token}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, key: &str) -> bool {
        pattern
            .strip_suffix('*')
            .is_some_and(|prefix| key.starts_with(prefix))
    }

    #[test]
    fn emits_documented_templates() {
        assert_eq!(CacheKey::cart(5, 7).as_str(), "cart:5:7");
        assert_eq!(CacheKey::checkout(5, 7).as_str(), "checkout:5:7");
        assert_eq!(
            CacheKey::checkout_general(5).as_str(),
            "checkout:general:5"
        );
        assert_eq!(CacheKey::token_cache("abc").as_str(), "token_abc");
    }

    #[test]
    fn per_course_patterns_cover_only_their_account() {
        let pattern = CacheKey::cart_pattern(5);
        assert!(matches(pattern.as_str(), CacheKey::cart(5, 7).as_str()));
        assert!(!matches(pattern.as_str(), CacheKey::cart(6, 7).as_str()));
    }

    #[test]
    fn checkout_pattern_never_matches_the_general_key() {
        let pattern = CacheKey::checkout_pattern(5);
        assert!(matches(pattern.as_str(), CacheKey::checkout(5, 7).as_str()));
        assert!(!matches(
            pattern.as_str(),
            CacheKey::checkout_general(5).as_str()
        ));
    }
}

//! Process-local token cache.

use secrecy::SecretString;
use std::sync::RwLock;

use super::{TokenCache, TokenCacheError};

#[derive(Debug, Default)]
struct Tokens {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
}

/// Token cache that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    tokens: RwLock<Tokens>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with tokens.
    pub fn with_tokens(access_token: SecretString, refresh_token: SecretString) -> Self {
        Self {
            tokens: RwLock::new(Tokens {
                access: Some(access_token),
                refresh: Some(refresh_token),
            }),
        }
    }
}

impl TokenCache for MemoryTokenCache {
    fn access_token(&self) -> Option<SecretString> {
        self.tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .access
            .clone()
    }

    fn refresh_token(&self) -> Option<SecretString> {
        self.tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .refresh
            .clone()
    }

    fn tokens(&self) -> (Option<SecretString>, Option<SecretString>) {
        let tokens = self
            .tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        (tokens.access.clone(), tokens.refresh.clone())
    }

    fn set_access_token(&self, token: SecretString) -> Result<(), TokenCacheError> {
        self.tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .access = Some(token);
        Ok(())
    }

    fn set_refresh_token(&self, token: SecretString) -> Result<(), TokenCacheError> {
        self.tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .refresh = Some(token);
        Ok(())
    }

    fn replace_tokens(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
    ) -> Result<(), TokenCacheError> {
        *self
            .tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Tokens {
            access: Some(access_token),
            refresh: Some(refresh_token),
        };
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenCacheError> {
        *self
            .tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Tokens::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.into())
    }

    #[test]
    fn test_empty_cache_has_no_tokens() {
        let cache = MemoryTokenCache::new();
        assert!(cache.access_token().is_none());
        assert!(cache.refresh_token().is_none());
    }

    #[test]
    fn test_replace_tokens_overwrites_both() {
        let cache = MemoryTokenCache::with_tokens(secret("bearer old"), secret("old-refresh"));
        cache
            .replace_tokens(secret("bearer new"), secret("new-refresh"))
            .unwrap();

        assert_eq!(cache.access_token().unwrap().expose_secret(), "bearer new");
        assert_eq!(cache.refresh_token().unwrap().expose_secret(), "new-refresh");
    }

    #[test]
    fn test_replace_tokens_is_never_observed_half_done() {
        let cache = std::sync::Arc::new(MemoryTokenCache::with_tokens(
            secret("bearer 0"),
            secret("refresh-0"),
        ));

        let writer = {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for n in 1..=2000 {
                    let access = secret(&format!("bearer {n}"));
                    let refresh = secret(&format!("refresh-{n}"));
                    cache.replace_tokens(access, refresh).unwrap();
                }
            })
        };

        for _ in 0..2000 {
            let (access, refresh) = cache.tokens();
            let access = access.unwrap();
            let refresh = refresh.unwrap();
            let generation = access.expose_secret().trim_start_matches("bearer ");
            assert_eq!(refresh.expose_secret(), format!("refresh-{generation}"));
        }
        writer.join().unwrap();
    }

    #[test]
    fn test_clear_forgets_tokens() {
        let cache = MemoryTokenCache::with_tokens(secret("bearer a"), secret("r"));
        cache.clear().unwrap();
        assert!(cache.access_token().is_none());
        assert!(cache.refresh_token().is_none());
    }

    #[test]
    fn test_debug_does_not_leak_tokens() {
        let cache =
            MemoryTokenCache::with_tokens(secret("bearer very-secret"), secret("refresh-secret"));
        let debug = format!("{:?}", cache);
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("refresh-secret"));
    }
}

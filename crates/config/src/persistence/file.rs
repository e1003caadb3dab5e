//! JSON file backed token cache.
//!
//! Responsibilities:
//! - Load persisted tokens when the cache is opened.
//! - Write the whole token file on every change (temp file + rename).
//!
//! Invariants:
//! - A missing file is an empty cache, not an error.
//! - Parent directories are created on first write.
//! - On Unix the file is created with mode 0600.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

use super::{TokenCache, TokenCacheError};

/// On-disk representation. Only constructed transiently while saving.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

#[derive(Debug, Default)]
struct Tokens {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
}

/// Token cache persisted as JSON at a fixed path.
#[derive(Debug)]
pub struct FileTokenCache {
    path: PathBuf,
    tokens: RwLock<Tokens>,
}

impl FileTokenCache {
    /// Open the cache at `path`, loading any tokens already stored there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenCacheError> {
        let path = path.into();
        let tokens = load(&path)?;
        Ok(Self {
            path,
            tokens: RwLock::new(tokens),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, tokens: &Tokens) -> Result<(), TokenCacheError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| TokenCacheError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let file = TokenFile {
            access_token: tokens.access.as_ref().map(|t| t.expose_secret().to_string()),
            refresh_token: tokens.refresh.as_ref().map(|t| t.expose_secret().to_string()),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let temp_path = self.path.with_extension("tmp");
        write_private(&temp_path, content.as_bytes()).map_err(|source| TokenCacheError::Write {
            path: temp_path.clone(),
            source,
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|source| TokenCacheError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "Saved token cache");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Tokens)) -> Result<(), TokenCacheError> {
        let mut tokens = self
            .tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        apply(&mut tokens);
        self.save(&tokens)
    }
}

fn load(path: &Path) -> Result<Tokens, TokenCacheError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No token cache found, starting empty");
            return Ok(Tokens::default());
        }
        Err(source) => {
            return Err(TokenCacheError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(Tokens::default());
    }

    let file: TokenFile =
        serde_json::from_str(&content).map_err(|source| TokenCacheError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Tokens {
        access: file.access_token.map(|t| SecretString::new(t.into())),
        refresh: file.refresh_token.map(|t| SecretString::new(t.into())),
    })
}

#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

impl TokenCache for FileTokenCache {
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
        self.update(|tokens| tokens.access = Some(token))
    }

    fn set_refresh_token(&self, token: SecretString) -> Result<(), TokenCacheError> {
        self.update(|tokens| tokens.refresh = Some(token))
    }

    fn replace_tokens(
        &self,
        access_token: SecretString,
        refresh_token: SecretString,
    ) -> Result<(), TokenCacheError> {
        self.update(|tokens| {
            tokens.access = Some(access_token);
            tokens.refresh = Some(refresh_token);
        })
    }

    fn clear(&self) -> Result<(), TokenCacheError> {
        self.update(|tokens| *tokens = Tokens::default())
    }
}

//! File-backed OAuth token cache.
//!
//! Tokens are shared between connections (and processes) through a JSON
//! file mapping client ids to their last token. Writers take an exclusive
//! `fs2` lock on the file; readers take a shared one. Locks are released
//! when the file handle is dropped.
//!
//! # Entry format
//!
//! Each entry is sealed with AES-256-GCM under a key derived (HKDF-SHA256)
//! from the client secret, so only holders of the secret can read the
//! bearer token back. Entries are hex encoded:
//!
//! ```text
//! [1 byte version][12 bytes nonce][N bytes ciphertext][16 bytes auth tag]
//! ```
//!
//! On unix the file is created with mode `0600`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use fs2::FileExt;
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::credential::AccessToken;
use crate::{AdapterError, Result};

const ENTRY_VERSION: u8 = 1;
const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;
const KEY_INFO: &[u8] = b"paypal-adapter token cache v1";

/// Token cache stored in a single file.
#[derive(Clone, Debug)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Cache file name inside the cache directory.
    pub const FILE_NAME: &'static str = "paypal-auth.cache";

    /// Cache living in `directory`.
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            path: directory.as_ref().join(Self::FILE_NAME),
        }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the token stored for a client.
    ///
    /// A missing, unreadable or corrupt cache yields `None`, as does an
    /// entry sealed under a different secret; the caller then fetches a new
    /// token.
    pub fn load(&self, client_id: &str, client_secret: &str) -> Option<AccessToken> {
        if !self.path.exists() {
            return None;
        }

        let sealed = match self.read_entries() {
            Ok(mut entries) => entries.remove(client_id)?,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "ignoring token cache: {}", err);
                return None;
            }
        };

        match open(&sealed, client_id, client_secret) {
            Ok(token) => Some(token),
            Err(err) => {
                tracing::warn!(client_id, "ignoring cached token: {}", err);
                None
            }
        }
    }

    /// Store the token for a client, keeping other clients' entries.
    pub fn store(&self, client_id: &str, client_secret: &str, token: &AccessToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sealed = seal(token, client_id, client_secret)?;

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // Files written before the mode was enforced keep their old mode
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        FileExt::lock_exclusive(&file)?;
        Self::rewrite(&mut file, client_id, sealed)
    }

    fn rewrite(file: &mut File, client_id: &str, sealed: String) -> Result<()> {
        let mut entries = Self::parse(file).unwrap_or_default();
        entries.insert(client_id.to_string(), sealed);

        let json = serde_json::to_string_pretty(&entries)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    fn read_entries(&self) -> Result<HashMap<String, String>> {
        let mut file = File::open(&self.path)?;
        FileExt::lock_shared(&file)?;
        Self::parse(&mut file)
    }

    fn parse(file: &mut File) -> Result<HashMap<String, String>> {
        let mut json = String::new();
        file.read_to_string(&mut json)?;
        if json.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&json)?)
    }
}

fn cipher(client_id: &str, client_secret: &str) -> Result<Aes256Gcm> {
    let hk = Hkdf::<Sha256>::new(Some(client_id.as_bytes()), client_secret.as_bytes());
    let mut key = [0u8; 32];
    hk.expand(KEY_INFO, &mut key)
        .map_err(|e| AdapterError::internal(format!("token cache key derivation: {}", e)))?;
    Aes256Gcm::new_from_slice(&key)
        .map_err(|e| AdapterError::internal(format!("token cache key: {}", e)))
}

fn seal(token: &AccessToken, client_id: &str, client_secret: &str) -> Result<String> {
    let plaintext = serde_json::to_vec(token)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher(client_id, client_secret)?
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_slice())
        .map_err(|e| AdapterError::Storage(format!("failed to seal token: {}", e)))?;

    let mut sealed = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
    sealed.push(ENTRY_VERSION);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(hex::encode(sealed))
}

fn open(sealed: &str, client_id: &str, client_secret: &str) -> Result<AccessToken> {
    let bytes = hex::decode(sealed)
        .map_err(|e| AdapterError::Storage(format!("malformed cache entry: {}", e)))?;
    if bytes.len() < 1 + NONCE_SIZE + TAG_SIZE {
        return Err(AdapterError::Storage("cache entry too short".to_string()));
    }
    if bytes[0] != ENTRY_VERSION {
        return Err(AdapterError::Storage(format!(
            "unsupported cache entry version {}",
            bytes[0]
        )));
    }

    let (nonce, ciphertext) = bytes[1..].split_at(NONCE_SIZE);
    let plaintext = cipher(client_id, client_secret)?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| AdapterError::Storage("cache entry authentication failed".to_string()))?;
    Ok(serde_json::from_slice(&plaintext)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SECRET: &str = "EGnHDxD_qRPdaLdZz8iCr8N7_MzF";

    #[test]
    fn test_store_and_load() {
        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path());

        assert!(cache.load("client-a", SECRET).is_none());

        let token = AccessToken::issued_now("token-a", 32_400);
        cache.store("client-a", SECRET, &token).unwrap();

        assert_eq!(cache.load("client-a", SECRET), Some(token));
        assert!(cache.load("client-b", SECRET).is_none());
    }

    #[test]
    fn test_store_keeps_other_clients() {
        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path());

        cache
            .store("client-a", SECRET, &AccessToken::issued_now("token-a", 3_600))
            .unwrap();
        cache
            .store("client-b", "other-secret", &AccessToken::issued_now("token-b", 3_600))
            .unwrap();
        cache
            .store("client-a", SECRET, &AccessToken::issued_now("token-a2", 3_600))
            .unwrap();

        assert_eq!(cache.load("client-a", SECRET).unwrap().access_token, "token-a2");
        assert_eq!(
            cache.load("client-b", "other-secret").unwrap().access_token,
            "token-b"
        );
    }

    #[test]
    fn test_token_not_stored_in_clear() {
        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path());
        cache
            .store("client-a", SECRET, &AccessToken::issued_now("BEARER-SECRET", 3_600))
            .unwrap();

        let content = fs::read_to_string(cache.path()).unwrap();
        assert!(content.contains("client-a"));
        assert!(!content.contains("BEARER-SECRET"));
    }

    #[test]
    fn test_wrong_secret_cannot_read_entry() {
        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path());
        cache
            .store("client-a", SECRET, &AccessToken::issued_now("token-a", 3_600))
            .unwrap();

        assert!(cache.load("client-a", "rotated-secret").is_none());
        assert!(cache.load("client-a", SECRET).is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_cache_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path());
        cache
            .store("client-a", SECRET, &AccessToken::issued_now("token-a", 3_600))
            .unwrap();
        let mode = fs::metadata(cache.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);

        // An existing world-readable file is tightened on the next write
        fs::set_permissions(cache.path(), fs::Permissions::from_mode(0o644)).unwrap();
        cache
            .store("client-a", SECRET, &AccessToken::issued_now("token-a2", 3_600))
            .unwrap();
        let mode = fs::metadata(cache.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_lock_released_after_store() {
        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path());
        cache
            .store("client-a", SECRET, &AccessToken::issued_now("token-a", 3_600))
            .unwrap();

        let file = File::open(cache.path()).unwrap();
        assert!(FileExt::try_lock_exclusive(&file).is_ok());
        drop(file);

        assert!(cache.load("client-a", SECRET).is_some());
    }

    #[test]
    fn test_corrupt_cache_is_ignored_and_overwritten() {
        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path());
        fs::write(cache.path(), "{not json").unwrap();

        assert!(cache.load("client-a", SECRET).is_none());

        cache
            .store("client-a", SECRET, &AccessToken::issued_now("token-a", 3_600))
            .unwrap();
        assert_eq!(cache.load("client-a", SECRET).unwrap().access_token, "token-a");
    }

    #[test]
    fn test_tampered_entry_is_ignored() {
        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path());
        fs::write(cache.path(), r#"{"client-a":"01deadbeef"}"#).unwrap();

        assert!(cache.load("client-a", SECRET).is_none());
    }

    #[test]
    fn test_store_creates_directory() {
        let dir = tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("nested").join("cache"));
        cache
            .store("client-a", SECRET, &AccessToken::issued_now("token-a", 3_600))
            .unwrap();
        assert!(cache.path().exists());
    }
}

//! Common test utilities

use tempfile::TempDir;

use stanza_cms::crypto::SettingsCipher;
use stanza_cms::store::FileStore;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Open a file store rooted in a fresh temp directory. The directory guard
/// must outlive the store.
#[allow(dead_code)] // Test utility for integration tests
pub async fn open_test_store(dir: &TempDir) -> FileStore {
    FileStore::open(dir.path())
        .await
        .expect("Failed to open file store")
}

/// A cipher with a fixed 32-byte key, independent of the environment.
#[allow(dead_code)] // Test utility for integration tests
pub fn test_cipher() -> SettingsCipher {
    SettingsCipher::with_key([42u8; 32])
}

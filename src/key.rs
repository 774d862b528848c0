/// Secret key used for signing delivery URLs.
///
/// Wraps the account's private API key. The `Debug` implementation is
/// redacted so the key cannot leak into logs, and equality is constant-time.
///
/// # Example
///
/// ```rust
/// use imagekit_url::PrivateKey;
///
/// let key = PrivateKey::new("private_key_test");
/// assert_eq!(format!("{:?}", key), "PrivateKey");
/// ```
#[derive(Clone, Default, serde::Deserialize)]
#[serde(transparent)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Creates a new `PrivateKey` from the account's private API key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key material as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;

        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for PrivateKey {}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey").finish()
    }
}

impl From<&str> for PrivateKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PrivateKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

//! Key Transform
//!
//! Derives the key an application actually stores under:
//!
//! ```text
//! hex(crc32(namespace)) + key          secondary hash off
//! hex(md5(hex(crc32(namespace)) + key)) secondary hash on
//! ```
//!
//! Hex is lowercase without zero padding for the checksum, and always 32
//! characters for the digest.

use crate::config::KeyTransformConfig;

/// Apply the namespace prefix and, optionally, the digest pass
pub fn transform(key: &str, namespace: &str, secondary_hash: bool) -> String {
    let prefixed = format!("{:x}{}", crc32fast::hash(namespace.as_bytes()), key);
    if secondary_hash {
        format!("{:x}", md5::compute(prefixed.as_bytes()))
    } else {
        prefixed
    }
}

impl KeyTransformConfig {
    pub fn new(namespace: impl Into<String>, secondary_hash: bool) -> Self {
        Self {
            namespace: namespace.into(),
            secondary_hash,
        }
    }

    /// Transform `key` under this configuration
    pub fn apply(&self, key: &str) -> String {
        transform(key, &self.namespace, self.secondary_hash)
    }
}

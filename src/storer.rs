use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Error;

pub trait FileStorer {
    /// Returns the public URL of the stored object, or None when the backing
    /// store refused the write.
    fn put(&self, content: Bytes, name: &str) -> Result<Option<String>, Error>;
}

// Objects are named by content hash, so re-uploading the same bytes is a
// no-op rather than a duplicate.
pub(crate) fn object_key(content: &[u8], name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let digest = hex::encode(hasher.finalize());
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{}.{}", digest, ext),
        _ => digest,
    }
}

pub struct LocalStorer {
    path: String,
    public_base: String,
}

impl LocalStorer {
    pub fn new(path: &str, public_base: &str) -> Self {
        Self {
            path: path.to_owned(),
            public_base: public_base.trim_end_matches('/').to_owned(),
        }
    }
}

impl FileStorer for LocalStorer {
    fn put(&self, content: Bytes, name: &str) -> Result<Option<String>, Error> {
        let key = object_key(&content, name);
        let written = File::create(Path::new(&self.path).join(&key)).and_then(|mut f| f.write_all(&content));
        if let Err(e) = written {
            log::warn!("failed to store {}: {}", key, e);
            return Ok(None);
        }
        Ok(Some(format!("{}/{}", self.public_base, key)))
    }
}

#[cfg(test)]
mod tests {
    use super::object_key;

    #[test]
    fn key_keeps_the_extension() {
        let key = object_key(b"some image bytes", "photo.jpg");
        assert!(key.ends_with(".jpg"));
        assert_eq!(key.len(), 64 + 4);
    }

    #[test]
    fn key_without_extension_is_the_bare_digest() {
        let key = object_key(b"some image bytes", "photo");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_content_same_key() {
        assert_eq!(object_key(b"abc", "a.png"), object_key(b"abc", "b.png"));
        assert_ne!(object_key(b"abc", "a.png"), object_key(b"abd", "a.png"));
    }
}

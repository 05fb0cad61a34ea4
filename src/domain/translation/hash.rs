use sha2::{Digest, Sha256};

/// SHA-256 of `text` as lowercase hex. Stored next to a translation so a
/// changed source text can be detected later.
pub fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_tracks_placeholder_edits() {
        assert_ne!(content_hash("Hi {{user_name}}"), content_hash("Hi {{user_first_name}}"));
        assert_eq!(content_hash("same"), content_hash("same"));
    }
}

//! Shared name validation for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Validate a container name.
///
/// Container names are a single path segment: non-empty, no `/`, no `..`.
pub fn validate_container(container: &str) -> StorageResult<()> {
    if container.is_empty() || container.contains('/') || container == "." || container == ".." {
        return Err(StorageError::InvalidKey(format!(
            "Invalid container name '{}'",
            container
        )));
    }
    Ok(())
}

/// Validate an object key.
///
/// Keys must be non-empty and must not contain `..` segments or a leading `/`.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|s| s == "..") {
        return Err(StorageError::InvalidKey(format!("Invalid object key '{}'", key)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_names() {
        assert!(validate_container("mycontainer").is_ok());
        assert!(validate_container("").is_err());
        assert!(validate_container("a/b").is_err());
        assert!(validate_container("..").is_err());
    }

    #[test]
    fn test_keys() {
        assert!(validate_key("file.txt").is_ok());
        assert!(validate_key("sub/file.txt").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/../../b").is_err());
    }
}

//! Ref name validation following git-style conventions.
//!
//! Valid branch and tag names:
//! - Must be non-empty
//! - Must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - Must not contain `..`
//! - Must not start or end with `.` or `/`, or contain `//`
//! - Components between slashes must be non-empty and not start with `.`

use crate::error::{RefError, RefResult};

/// Characters that are forbidden anywhere in a ref name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a branch name, returning `Ok(())` if valid.
pub fn validate_branch_name(name: &str) -> RefResult<()> {
    let invalid = |reason: &str| RefError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(invalid(&format!("contains forbidden character {ch:?}")));
        }
    }
    if name.contains("..") {
        return Err(invalid("must not contain '..'"));
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Err(invalid("must not start or end with '.'"));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(invalid("must not start or end with '/'"));
    }
    if name.contains("//") {
        return Err(invalid("must not contain '//'"));
    }
    for component in name.split('/') {
        if component.starts_with('.') {
            return Err(invalid("components must not start with '.'"));
        }
    }
    Ok(())
}

/// Validate a tag name. Same rules as branch names.
pub fn validate_tag_name(name: &str) -> RefResult<()> {
    validate_branch_name(name)
}

//! Request path → script file resolution.
//!
//! The resolver is the only way to obtain a [`ResolvedTarget`]. Every gate
//! fails closed: anything that could point outside the confined root is
//! [`ResolveError::Forbidden`], anything that is not an existing regular file
//! is [`ResolveError::NotFound`].

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::ResolveError;

/// An executable location guaranteed to be inside the confined root and to
/// have been a regular file when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    path: PathBuf,
    relative: String,
}

impl ResolvedTarget {
    /// Absolute path of the script.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical path relative to the confined root, e.g. `vmess/add-vmess`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.relative
    }
}

/// Maps request paths onto files under a fixed script root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver confined to `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The confined root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a raw (possibly percent-encoded) URL path.
    ///
    /// # Errors
    /// Returns [`ResolveError::Forbidden`] for traversal attempts, absolute
    /// paths after the leading separator is stripped, undecodable input and
    /// NUL bytes. Returns [`ResolveError::NotFound`] if nothing exists at the
    /// joined path or if it is a directory or other non-regular file.
    pub fn resolve(&self, raw_path: &str) -> Result<ResolvedTarget, ResolveError> {
        let relative = canonicalize(raw_path)?;
        let path = self.root.join(&relative);

        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(ResolvedTarget { path, relative }),
            _ => Err(ResolveError::NotFound { path }),
        }
    }
}

/// Decode and lexically clean `raw_path` into a root-relative path.
///
/// The result never contains a `..` segment, never starts with `/` and never
/// contains empty or `.` segments. The empty string denotes the root itself.
pub(crate) fn canonicalize(raw_path: &str) -> Result<String, ResolveError> {
    let forbidden = || ResolveError::Forbidden { raw: raw_path.to_owned() };

    let decoded = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| forbidden())?;
    if decoded.contains('\0') {
        return Err(forbidden());
    }

    let stripped = decoded.strip_prefix('/').unwrap_or(&decoded);
    if stripped.starts_with('/') {
        return Err(forbidden());
    }

    let mut segments = Vec::new();
    for segment in stripped.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(forbidden()),
            s => segments.push(s),
        }
    }

    let cleaned = segments.join("/");
    if cleaned.contains("..") {
        return Err(forbidden());
    }
    Ok(cleaned)
}

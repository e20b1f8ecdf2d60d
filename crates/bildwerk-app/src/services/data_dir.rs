// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::{Path, PathBuf};

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = base_data_dir().join("bildwerk");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Return a subdirectory of `root` (e.g. "output"), creating it if needed.
pub fn subdir(root: &Path, name: &str) -> std::io::Result<PathBuf> {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn base_data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdir_is_created() {
        let root = tempfile::tempdir().unwrap();
        let out = subdir(root.path(), "output").unwrap();
        assert!(out.is_dir());
        assert_eq!(out, root.path().join("output"));
    }
}

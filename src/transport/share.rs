//! Remote files through a share path.
//!
//! A remote host's system volume is reached through a local path built from
//! a template, such as the administrative share `\\{target}\C$` or a mount
//! root like `/mnt/fleet/{target}`. A remote path such as
//! `C:\Windows\Temp\probe.xml` maps below that root with its drive prefix
//! removed.

use std::fs;
use std::path::PathBuf;

use super::RemoteFiles;
use crate::assessment::Target;
use crate::error::Result;

/// File access through a per-target share root.
#[derive(Debug, Clone)]
pub struct ShareFiles {
    root_template: String,
}

impl ShareFiles {
    /// Create share access from a root template containing `{target}`.
    pub fn new(root_template: impl Into<String>) -> Self {
        Self {
            root_template: root_template.into(),
        }
    }

    /// Local path through which `path` on `target` is reached.
    pub fn resolve(&self, target: &Target, path: &str) -> PathBuf {
        let mut resolved = PathBuf::from(self.root_template.replace("{target}", target.name()));
        for component in strip_drive(path)
            .split(['\\', '/'])
            .filter(|c| !c.is_empty())
        {
            resolved.push(component);
        }
        resolved
    }
}

impl RemoteFiles for ShareFiles {
    fn exists(&self, target: &Target, path: &str) -> bool {
        self.resolve(target, path).exists()
    }

    fn read_to_string(&self, target: &Target, path: &str) -> Result<String> {
        Ok(fs::read_to_string(self.resolve(target, path))?)
    }

    fn remove(&self, target: &Target, path: &str) -> Result<()> {
        Ok(fs::remove_file(self.resolve(target, path))?)
    }
}

/// Drop a leading `X:` drive designator.
fn strip_drive(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        &path[2..]
    } else {
        path
    }
}

// src/host/volume.rs

//! Filesystem-entry metadata: names, access checks, capacity.

use std::path::Path;

use crate::errors::HostError;

/// Capacity figures taken from one filesystem snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceUsage {
    pub total: u64,
    /// Space available to unprivileged callers.
    pub free: u64,
}

impl SpaceUsage {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }
}

/// Synchronous metadata reads against the OS view of a path.
///
/// Capacity queries are derived from [`VolumeInfo::space_usage`] so that
/// `used_space == total_capacity - free_space` holds by construction.
pub trait VolumeInfo: Send + Sync {
    fn space_usage(&self, path: &Path) -> Result<SpaceUsage, HostError>;
    fn display_name(&self, path: &Path) -> Result<String, HostError>;
    fn is_removable_media(&self, path: &Path) -> Result<bool, HostError>;
    /// True when `path` is the root of a mounted filesystem (a drive).
    fn is_drive(&self, path: &Path) -> Result<bool, HostError>;
    fn is_readable(&self, path: &Path) -> bool;
    fn is_writable(&self, path: &Path) -> bool;

    fn total_capacity(&self, path: &Path) -> Result<u64, HostError> {
        Ok(self.space_usage(path)?.total)
    }

    fn free_space(&self, path: &Path) -> Result<u64, HostError> {
        Ok(self.space_usage(path)?.free)
    }

    fn used_space(&self, path: &Path) -> Result<u64, HostError> {
        Ok(self.space_usage(path)?.used())
    }
}

/// Reads the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemVolumes;

fn io_err(path: &Path, source: std::io::Error) -> HostError {
    HostError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl VolumeInfo for SystemVolumes {
    #[cfg(unix)]
    fn space_usage(&self, path: &Path) -> Result<SpaceUsage, HostError> {
        let st = nix::sys::statvfs::statvfs(path)
            .map_err(|errno| io_err(path, std::io::Error::from(errno)))?;
        let frag = st.fragment_size() as u64;
        Ok(SpaceUsage {
            total: (st.blocks() as u64).saturating_mul(frag),
            free: (st.blocks_available() as u64).saturating_mul(frag),
        })
    }

    #[cfg(not(unix))]
    fn space_usage(&self, _path: &Path) -> Result<SpaceUsage, HostError> {
        Err(HostError::PlatformUnsupported(
            "capacity queries are only implemented on unix".to_string(),
        ))
    }

    fn display_name(&self, path: &Path) -> Result<String, HostError> {
        std::fs::symlink_metadata(path).map_err(|e| io_err(path, e))?;
        Ok(path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()))
    }

    fn is_removable_media(&self, path: &Path) -> Result<bool, HostError> {
        let meta = std::fs::metadata(path).map_err(|e| io_err(path, e))?;
        Ok(removable::device_is_removable(&meta))
    }

    #[cfg(unix)]
    fn is_drive(&self, path: &Path) -> Result<bool, HostError> {
        use std::os::unix::fs::MetadataExt;

        let path = std::fs::canonicalize(path).map_err(|e| io_err(path, e))?;
        let Some(parent) = path.parent() else {
            return Ok(true);
        };
        let meta = std::fs::metadata(&path).map_err(|e| io_err(&path, e))?;
        let up = std::fs::metadata(parent).map_err(|e| io_err(parent, e))?;
        Ok(meta.dev() != up.dev() || meta.ino() == up.ino())
    }

    #[cfg(not(unix))]
    fn is_drive(&self, path: &Path) -> Result<bool, HostError> {
        let path = std::fs::canonicalize(path).map_err(|e| io_err(path, e))?;
        Ok(path.parent().is_none())
    }

    #[cfg(unix)]
    fn is_readable(&self, path: &Path) -> bool {
        use nix::unistd::{AccessFlags, access};
        access(path, AccessFlags::R_OK).is_ok()
    }

    #[cfg(not(unix))]
    fn is_readable(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(unix)]
    fn is_writable(&self, path: &Path) -> bool {
        use nix::unistd::{AccessFlags, access};
        access(path, AccessFlags::W_OK).is_ok()
    }

    #[cfg(not(unix))]
    fn is_writable(&self, path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false)
    }
}

#[cfg(target_os = "linux")]
mod removable {
    use nix::sys::stat::{major, minor};
    use std::fs::Metadata;
    use std::os::unix::fs::MetadataExt;
    use std::path::Path;

    /// Look up the block device behind `meta` in sysfs.
    ///
    /// `/sys/dev/block/MAJ:MIN` links to the partition (or whole disk); the
    /// `removable` flag lives on the whole-disk directory.
    pub fn device_is_removable(meta: &Metadata) -> bool {
        let dev = meta.dev();
        let (maj, min) = (major(dev), minor(dev));

        let link = format!("/sys/dev/block/{maj}:{min}");
        let Ok(node) = std::fs::canonicalize(&link) else {
            return false;
        };

        flag(&node.join("removable"))
            .or_else(|| node.parent().and_then(|p| flag(&p.join("removable"))))
            .unwrap_or(false)
    }

    fn flag(path: &Path) -> Option<bool> {
        std::fs::read_to_string(path)
            .ok()
            .map(|s| s.trim() == "1")
    }
}

#[cfg(not(target_os = "linux"))]
mod removable {
    pub fn device_is_removable(_meta: &std::fs::Metadata) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_is_total_minus_free() {
        let s = SpaceUsage {
            total: 1000,
            free: 250,
        };
        assert_eq!(s.used(), 750);

        let odd = SpaceUsage { total: 1, free: 5 };
        assert_eq!(odd.used(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn filesystem_root_is_a_drive() {
        assert!(SystemVolumes.is_drive(Path::new("/")).unwrap());
        assert!(matches!(
            SystemVolumes.is_drive(Path::new("/definitely/not/here/procrun")),
            Err(HostError::Io { .. })
        ));
    }

    #[test]
    fn display_name_of_missing_path_is_an_error() {
        let err = SystemVolumes
            .display_name(Path::new("/definitely/not/here/procrun"))
            .unwrap_err();
        assert!(matches!(err, HostError::Io { .. }));
    }
}

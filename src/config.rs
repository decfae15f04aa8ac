// Introspector configuration
//
// The procfs mount root is the only setting. It is bound once into a
// `Procfs` instance and never mutated afterwards.

use std::path::{Path, PathBuf};

// ============================================================================
// Constants
// ============================================================================

/// Default mount point of the proc filesystem
pub const DEFAULT_MOUNT_POINT: &str = "/proc";

/// Directory under the mount root holding the protocol socket tables
pub const NET_DIR: &str = "net";

/// Per-process status record
pub const STATUS_FILE: &str = "status";

/// Per-process NUL separated argument vector
pub const CMDLINE_FILE: &str = "cmdline";

/// Per-process descriptor directory
pub const FD_DIR: &str = "fd";

// ============================================================================
// Configuration Structs
// ============================================================================

/// Where and how to read procfs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcfsConfig {
    /// Root of the proc filesystem (usually `/proc`)
    pub mount_point: PathBuf,
}

impl ProcfsConfig {
    pub fn new() -> Self {
        Self {
            mount_point: PathBuf::from(DEFAULT_MOUNT_POINT),
        }
    }

    /// Use a different mount root, e.g. a fixture tree in tests or a
    /// container's procfs mounted elsewhere
    pub fn with_mount_point(mut self, mount_point: impl Into<PathBuf>) -> Self {
        self.mount_point = mount_point.into();
        self
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    /// `<root>/<pid>`
    pub fn process_dir(&self, pid: u32) -> PathBuf {
        self.mount_point.join(pid.to_string())
    }

    /// `<root>/net/<table>`
    pub fn net_table(&self, table: &str) -> PathBuf {
        self.mount_point.join(NET_DIR).join(table)
    }
}

impl Default for ProcfsConfig {
    fn default() -> Self {
        Self::new()
    }
}

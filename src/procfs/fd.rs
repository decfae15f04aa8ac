// Open file descriptors from /proc/<pid>/fd
//
// Each entry is a symlink. The target is returned as-is: anonymous kernel
// objects show up as fabricated names such as "socket:[12345]" or
// "pipe:[6789]" that do not exist on any filesystem.

use super::{Process, Procfs};
use crate::config::FD_DIR;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One open descriptor of a process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Entry name in the fd directory, i.e. the descriptor number
    pub name: String,
    /// Raw symlink target
    pub target: PathBuf,
}

impl FileDescriptor {
    /// Inode digits of a "socket:[<digits>]" target, `None` for anything else
    pub fn socket_inode(&self) -> Option<&str> {
        let base = self.target.file_name()?.to_str()?;
        let digits = base.strip_prefix("socket:[")?.strip_suffix(']')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(digits)
    }
}

impl Procfs {
    /// Open descriptors of `process`, in directory listing order.
    ///
    /// Returns an empty list when the fd directory belongs to another user.
    /// Descriptors closed while the directory is being read are left out.
    pub fn fds(&self, process: Process) -> Result<Vec<FileDescriptor>> {
        let fd_dir = self.process_path(process, FD_DIR);
        classify_listing(process, &fd_dir, read_fd_dir(&fd_dir))
    }
}

fn classify_listing(
    process: Process,
    fd_dir: &Path,
    listing: io::Result<Vec<FileDescriptor>>,
) -> Result<Vec<FileDescriptor>> {
    match listing {
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            // Expected for processes owned by other users
            debug!(pid = process.pid, "Permission denied reading {}", fd_dir.display());
            Ok(Vec::new())
        }
        result => result.map_err(|e| Error::from_process_io(fd_dir, e)),
    }
}

fn read_fd_dir(fd_dir: &Path) -> io::Result<Vec<FileDescriptor>> {
    let names = fs::read_dir(fd_dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;
    resolve_fds(fd_dir, names)
}

/// Read the link behind each listed entry.
///
/// An entry that is gone by the time its link is read was closed after the
/// listing and is skipped. If the fd directory itself is gone the process
/// exited, which is reported as NotFound.
fn resolve_fds(fd_dir: &Path, names: Vec<OsString>) -> io::Result<Vec<FileDescriptor>> {
    let mut fds = Vec::with_capacity(names.len());
    let mut closed = 0;

    for name in names {
        let target = match fs::read_link(fd_dir.join(&name)) {
            Ok(target) => target,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                closed += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        fds.push(FileDescriptor {
            name: name.to_string_lossy().into_owned(),
            target,
        });
    }

    if closed > 0 {
        fs::metadata(fd_dir)?;
        debug!(dir = %fd_dir.display(), closed, "descriptors closed during listing");
    }
    Ok(fds)
}

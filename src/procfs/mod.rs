// procfs module - process table introspection via the /proc filesystem
// Read-only operations; every call re-reads the filesystem
//
// A `Procfs` binds one mount root. Processes are enumerated lazily from the
// root directory listing and may disappear at any point, so per-process
// reads report vanished processes as `Error::NotFound`.

pub mod cmdline;
pub mod fd;
pub mod signal;
pub mod status;
pub mod tree;

use crate::config::ProcfsConfig;
use crate::error::{Error, Result};
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A process, identified only by its pid.
///
/// Everything else is read on demand, so the value may already be stale
/// when it is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Process {
    pub pid: u32,
}

impl Process {
    pub fn new(pid: u32) -> Self {
        Process { pid }
    }
}

/// Introspector bound to a single procfs mount root
#[derive(Debug, Clone, Default)]
pub struct Procfs {
    config: ProcfsConfig,
}

impl Procfs {
    pub fn new(config: ProcfsConfig) -> Self {
        Procfs { config }
    }

    pub fn config(&self) -> &ProcfsConfig {
        &self.config
    }

    pub fn mount_point(&self) -> &Path {
        self.config.mount_point()
    }

    /// `<root>/<pid>/<file>`
    pub(crate) fn process_path(&self, process: Process, file: &str) -> PathBuf {
        self.config.process_dir(process.pid).join(file)
    }

    /// Lazily list the processes under the mount root.
    ///
    /// Only entries whose name is a plain decimal number are yielded, in
    /// directory listing order. Failing to open the root is an `Error::Io`.
    pub fn processes(&self) -> Result<ProcessIter> {
        let root = self.mount_point();
        let entries = fs::read_dir(root).map_err(|e| Error::io(root, e))?;
        Ok(ProcessIter {
            root: root.to_path_buf(),
            entries,
            done: false,
        })
    }

    /// Visit every process in listing order.
    ///
    /// Stops as soon as `visit` breaks or fails; the failure is returned.
    pub fn walk<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(Process) -> Result<ControlFlow<()>>,
    {
        for process in self.processes()? {
            if visit(process?)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Number of processes currently listed under the mount root
    pub fn count_processes(&self) -> Result<usize> {
        let mut count = 0;
        self.walk(|_| {
            count += 1;
            Ok(ControlFlow::Continue(()))
        })?;
        debug!(count, root = %self.mount_point().display(), "count_processes");
        Ok(count)
    }
}

/// Iterator over the processes of a mount root.
///
/// Dropping it stops the enumeration. A directory read failure is yielded
/// once and ends the iteration.
pub struct ProcessIter {
    root: PathBuf,
    entries: fs::ReadDir,
    done: bool,
}

impl Iterator for ProcessIter {
    type Item = Result<Process>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::io(&self.root, e)));
                }
            };
            if let Some(pid) = entry.file_name().to_str().and_then(parse_pid) {
                return Some(Ok(Process { pid }));
            }
        }

        self.done = true;
        None
    }
}

impl std::iter::FusedIterator for ProcessIter {}

/// Parse a directory name as a pid: ASCII digits only, fitting a u32.
///
/// Pid 0 is the idle task and never has a directory of its own.
fn parse_pid(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok().filter(|&pid| pid != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FakeProc;

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid("1"), Some(1));
        assert_eq!(parse_pid("4242"), Some(4242));
        assert_eq!(parse_pid("0"), None);
        assert_eq!(parse_pid("000"), None);
        assert_eq!(parse_pid("self"), None);
        assert_eq!(parse_pid("+12"), None);
        assert_eq!(parse_pid("-1"), None);
        assert_eq!(parse_pid("1abc"), None);
        assert_eq!(parse_pid(""), None);
        assert_eq!(parse_pid("99999999999"), None);
    }

    #[test]
    fn test_count_four_processes() {
        let fake = FakeProc::new();
        fake.process(1, "init", 0)
            .process(23, "sshd", 1)
            .process(456, "bash", 23)
            .process(7890, "vim", 456)
            .clutter();

        assert_eq!(fake.procfs().count_processes().unwrap(), 4);
    }

    #[test]
    fn test_processes_yields_only_pids() {
        let fake = FakeProc::new();
        fake.process(10, "a", 1).process(20, "b", 1).clutter();

        let mut pids: Vec<u32> = fake
            .procfs()
            .processes()
            .unwrap()
            .map(|p| p.unwrap().pid)
            .collect();
        pids.sort();
        assert_eq!(pids, vec![10, 20]);
    }

    #[test]
    fn test_walk_stops_after_first() {
        let fake = FakeProc::new();
        for pid in 1..=6 {
            fake.process(pid, "worker", 0);
        }

        let mut visited = 0;
        fake.procfs()
            .walk(|_| {
                visited += 1;
                Ok(ControlFlow::Break(()))
            })
            .unwrap();
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_walk_propagates_visit_error() {
        let fake = FakeProc::new();
        for pid in 1..=3 {
            fake.process(pid, "worker", 0);
        }

        let mut visited = 0;
        let result = fake.procfs().walk(|_| {
            visited += 1;
            Err(Error::malformed("visit", "boom"))
        });
        assert!(matches!(result, Err(Error::MalformedData { .. })));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_missing_mount_root_is_io_error() {
        let fake = FakeProc::new();
        let procfs = Procfs::new(
            ProcfsConfig::new().with_mount_point(fake.root().join("does-not-exist")),
        );
        assert!(matches!(procfs.processes(), Err(Error::Io { .. })));
        assert!(matches!(procfs.count_processes(), Err(Error::Io { .. })));
    }

    #[test]
    fn test_zero_directory_is_not_a_process() {
        let fake = FakeProc::new();
        fake.process(1, "init", 0).pid_dir(0);

        let pids: Vec<u32> = fake
            .procfs()
            .processes()
            .unwrap()
            .map(|p| p.unwrap().pid)
            .collect();
        assert_eq!(pids, vec![1]);
    }

    #[test]
    fn test_empty_root_counts_zero() {
        let fake = FakeProc::new();
        assert_eq!(fake.procfs().count_processes().unwrap(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_live_proc_contains_self() {
        let me = std::process::id();
        let found = Procfs::default()
            .processes()
            .unwrap()
            .filter_map(|p| p.ok())
            .any(|p| p.pid == me);
        assert!(found);
    }
}

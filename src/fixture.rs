// Fake procfs trees for unit tests
//
// Builds a throwaway mount root in a temporary directory with just enough of
// /proc/<pid>/{status,cmdline,fd} and /proc/net/* for the readers to work on.

use crate::config::ProcfsConfig;
use crate::procfs::Procfs;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) const TCP_HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";
pub(crate) const TCP6_HEADER: &str = "  sl  local_address                         remote_address                        st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";
pub(crate) const UDP_HEADER: &str = "   sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode ref pointer drops";

pub(crate) struct FakeProc {
    dir: TempDir,
}

impl FakeProc {
    /// Empty mount root with empty protocol tables
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp mount root");
        let fake = FakeProc { dir };
        fs::create_dir_all(fake.root().join("net")).expect("create net dir");
        fake.write_table("tcp", TCP_HEADER);
        fake.write_table("tcp6", TCP6_HEADER);
        fake.write_table("udp", UDP_HEADER);
        fake.write_table("udp6", UDP_HEADER);
        fake
    }

    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn procfs(&self) -> Procfs {
        Procfs::new(ProcfsConfig::new().with_mount_point(self.root()))
    }

    pub(crate) fn pid_dir(&self, pid: u32) -> PathBuf {
        let dir = self.root().join(pid.to_string());
        fs::create_dir_all(&dir).expect("create pid dir");
        dir
    }

    /// A process with a realistic status record and a fd directory
    pub(crate) fn process(&self, pid: u32, name: &str, ppid: u32) -> &Self {
        let status = format!(
            "Name:\t{name}\n\
             Umask:\t0022\n\
             State:\tS (sleeping)\n\
             Tgid:\t{pid}\n\
             Ngid:\t0\n\
             Pid:\t{pid}\n\
             PPid:\t{ppid}\n\
             TracerPid:\t0\n\
             Uid:\t1000\t1000\t1000\t1000\n\
             Gid:\t1000\t1000\t1000\t1000\n\
             FDSize:\t64\n\
             Threads:\t1\n\
             SigQ:\t0/62811\n\
             SigPnd:\t0000000000000000\n\
             ShdPnd:\t0000000000000000\n\
             SigBlk:\t0000000000000000\n\
             SigIgn:\t0000000000001000\n\
             SigCgt:\t0000000000014003\n\
             CapInh:\t0000000000000000\n"
        );
        self.status(pid, &status);
        fs::create_dir_all(self.pid_dir(pid).join("fd")).expect("create fd dir");
        self
    }

    pub(crate) fn status(&self, pid: u32, contents: impl AsRef<[u8]>) -> &Self {
        fs::write(self.pid_dir(pid).join("status"), contents).expect("write status");
        self
    }

    pub(crate) fn cmdline(&self, pid: u32, contents: &[u8]) -> &Self {
        fs::write(self.pid_dir(pid).join("cmdline"), contents).expect("write cmdline");
        self
    }

    pub(crate) fn fd(&self, pid: u32, fd: u32, target: &str) -> &Self {
        let fd_dir = self.pid_dir(pid).join("fd");
        fs::create_dir_all(&fd_dir).expect("create fd dir");
        symlink(target, fd_dir.join(fd.to_string())).expect("create fd symlink");
        self
    }

    pub(crate) fn net_table(&self, table: &str, header: &str, rows: &[impl AsRef<str>]) -> &Self {
        let mut contents = String::from(header);
        for row in rows {
            contents.push('\n');
            contents.push_str(row.as_ref());
        }
        self.write_table(table, &contents);
        self
    }

    fn write_table(&self, table: &str, contents: &str) {
        fs::write(self.root().join("net").join(table), format!("{}\n", contents))
            .expect("write net table");
    }

    /// Non-process entries that live next to the pid directories
    pub(crate) fn clutter(&self) -> &Self {
        fs::write(self.root().join("cpuinfo"), "processor\t: 0\n").expect("write cpuinfo");
        fs::create_dir_all(self.root().join("sys")).expect("create sys");
        fs::create_dir_all(self.root().join("1abc")).expect("create 1abc");
        self
    }
}

/// A /proc/net/tcp row listening on `port` with the given inode
pub(crate) fn tcp_row(sl: usize, addr: &str, port: u16, inode: u64) -> String {
    format!(
        "{:>4}: {}:{:04X} 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 {} 1 0000000000000000 100 0 0 10 0",
        sl, addr, port, inode
    )
}

/// Whether permission bits are enforced for the current user
pub(crate) fn permissions_enforced(locked_dir: &Path) -> bool {
    fs::read_dir(locked_dir).is_err()
}

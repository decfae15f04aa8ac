// Argument vector from /proc/<pid>/cmdline

use super::{Process, Procfs};
use crate::config::CMDLINE_FILE;
use crate::error::{Error, Result};
use std::fs;

impl Procfs {
    /// Command line arguments of `process`.
    ///
    /// Kernel threads and zombies have an empty cmdline and yield an empty
    /// vector; callers usually fall back to `ProcessStatus::name`.
    pub fn cmdline(&self, process: Process) -> Result<Vec<String>> {
        let path = self.process_path(process, CMDLINE_FILE);
        let bytes = fs::read(&path).map_err(|e| Error::from_process_io(&path, e))?;
        Ok(split_cmdline(&bytes))
    }
}

fn split_cmdline(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return Vec::new();
    }

    let mut args: Vec<String> = bytes
        .split(|b| *b == b'\0')
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect();
    if args.last().is_some_and(|arg| arg.is_empty()) {
        args.pop();
    }
    args
}

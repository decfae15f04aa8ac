// Parsing of /proc/<pid>/status

use super::signal::{decode_signal_mask, SignalSet};
use super::{Process, Procfs};
use crate::config::STATUS_FILE;
use crate::error::{Error, Result};
use std::fs;

/// Snapshot of a process's status record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStatus {
    /// Command name (`Name:`); invalid UTF-8 is replaced with U+FFFD
    pub name: String,
    /// Parent pid (`PPid:`), 0 for the init process and kernel roots
    pub ppid: u32,
    /// State code and description, e.g. `S (sleeping)`
    pub state: String,
    /// Real user id, as written by the kernel
    pub uid: String,
    /// Pending signals (`SigPnd:`)
    pub sig_pnd: SignalSet,
    /// Blocked signals (`SigBlk:`)
    pub sig_blk: SignalSet,
    /// Ignored signals (`SigIgn:`)
    pub sig_ign: SignalSet,
    /// Caught signals (`SigCgt:`)
    pub sig_cgt: SignalSet,
}

impl ProcessStatus {
    /// Single-letter state code (`S`, `R`, `Z`, ...)
    pub fn state_code(&self) -> Option<char> {
        self.state.chars().next()
    }
}

impl Procfs {
    /// Read and parse the status record of `process`.
    ///
    /// A vanished process is reported as `Error::NotFound`. Malformed
    /// numeric or mask fields fail the whole parse.
    pub fn status(&self, process: Process) -> Result<ProcessStatus> {
        let path = self.process_path(process, STATUS_FILE);
        let bytes = fs::read(&path).map_err(|e| Error::from_process_io(&path, e))?;
        // Name is copied from the task comm verbatim and need not be UTF-8
        parse_status(&String::from_utf8_lossy(&bytes))
    }
}

/// Parse the text of a status record
pub fn parse_status(contents: &str) -> Result<ProcessStatus> {
    let mut status = ProcessStatus::default();

    for line in contents.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key {
            "Name" => status.name = value.to_string(),
            "PPid" => {
                status.ppid = value
                    .parse()
                    .map_err(|e| Error::malformed("PPid", format!("'{}': {}", value, e)))?
            }
            "State" => status.state = value.to_string(),
            "Uid" => {
                status.uid = value
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| Error::malformed("Uid", "empty field"))?
                    .to_string()
            }
            "SigPnd" => status.sig_pnd = decode_signal_mask(value)?,
            "SigBlk" => status.sig_blk = decode_signal_mask(value)?,
            "SigIgn" => status.sig_ign = decode_signal_mask(value)?,
            "SigCgt" => status.sig_cgt = decode_signal_mask(value)?,
            _ => {}
        }
    }

    Ok(status)
}

// Correlation of process descriptors with socket table rows
// Joins the inode in each "socket:[<inode>]" fd link against a SocketIndex

use crate::error::Result;
use crate::net::{Socket, SocketIndex};
use crate::procfs::{Process, Procfs};
use std::ops::ControlFlow;
use tracing::debug;

/// Sockets held by one process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSockets {
    pub process: Process,
    pub sockets: Vec<Socket>,
}

impl Procfs {
    /// Sockets of `process` found in `index`, in descriptor order.
    ///
    /// Descriptors of other users' processes are unreadable, which yields an
    /// empty list rather than an error.
    pub fn process_sockets(&self, process: Process, index: &SocketIndex) -> Result<Vec<Socket>> {
        let sockets: Vec<Socket> = self
            .fds(process)?
            .iter()
            .filter_map(|fd| fd.socket_inode())
            .filter_map(|inode| index.find_str(inode))
            .cloned()
            .collect();
        Ok(sockets)
    }

    /// Every process holding at least one socket from `index`.
    ///
    /// Processes that exit during the scan are skipped; any other error
    /// aborts the whole scan.
    pub fn bound_sockets(&self, index: &SocketIndex) -> Result<Vec<ProcessSockets>> {
        let mut found = Vec::new();
        self.walk(|process| {
            match self.process_sockets(process, index) {
                Ok(sockets) if sockets.is_empty() => {}
                Ok(sockets) => found.push(ProcessSockets { process, sockets }),
                Err(e) if e.is_not_found() => {
                    debug!(pid = process.pid, "process exited during socket scan");
                }
                Err(e) => return Err(e),
            }
            Ok(ControlFlow::Continue(()))
        })?;

        debug!(
            "bound_sockets: Mapped {} sockets to {} processes",
            found.iter().map(|p| p.sockets.len()).sum::<usize>(),
            found.len()
        );
        Ok(found)
    }
}

// Process tree derivation from the PPid field of each status record
//
// Nothing is cached: every call re-enumerates the whole process table, so
// `descendants` costs one full scan per visited process.

use super::{Process, Procfs};
use crate::error::Result;
use std::ops::ControlFlow;
use tracing::debug;

impl Procfs {
    /// Direct children of `process`.
    ///
    /// Fails if any other process's status cannot be read, including one
    /// that exits during the scan.
    pub fn children(&self, process: Process) -> Result<Vec<Process>> {
        let mut children = Vec::new();
        self.walk(|candidate| {
            if candidate == process {
                return Ok(ControlFlow::Continue(()));
            }
            if self.status(candidate)?.ppid == process.pid {
                children.push(candidate);
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(children)
    }

    /// Children, grandchildren and so on, breadth first.
    ///
    /// The traversal fails as a whole if any `children` call fails.
    pub fn descendants(&self, process: Process) -> Result<Vec<Process>> {
        let mut found = vec![process];
        let mut cursor = 0;

        while cursor < found.len() {
            let children = self.children(found[cursor])?;
            found.extend(children);
            cursor += 1;
        }

        // drop the seed
        found.remove(0);
        debug!(pid = process.pid, count = found.len(), "descendants");
        Ok(found)
    }
}

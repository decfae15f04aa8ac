//! procsnap - point-in-time snapshots of the Linux process and socket tables
//!
//! Everything is read from procfs on demand: nothing is cached between calls
//! and every value returned is a snapshot that may already be stale.
//!
//! ```no_run
//! use procsnap::{Procfs, SocketIndex};
//!
//! # fn main() -> procsnap::Result<()> {
//! let procfs = Procfs::default();
//! let index = SocketIndex::new(procfs.sockets()?);
//! for entry in procfs.bound_sockets(&index)? {
//!     let status = procfs.status(entry.process)?;
//!     for socket in &entry.sockets {
//!         println!("{} {} {}", entry.process.pid, status.name, socket);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod correlate;
pub mod error;
pub mod net;
pub mod procfs;

#[cfg(test)]
mod fixture;

pub use config::{ProcfsConfig, DEFAULT_MOUNT_POINT};
pub use correlate::ProcessSockets;
pub use error::{Error, Result};
pub use net::{Protocol, Socket, SocketIndex};
pub use procfs::fd::FileDescriptor;
pub use procfs::signal::{decode_signal_mask, SignalSet};
pub use procfs::status::ProcessStatus;
pub use procfs::{Process, ProcessIter, Procfs};

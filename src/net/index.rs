// Inode-sorted socket catalogue for fd correlation
//
// Sorting and lookup both compare inodes as numbers. Comparing the decimal
// strings instead would order "10" before "9" and break the binary search
// for inodes of different lengths.

use super::Socket;

/// Sockets sorted by inode, searchable in O(log n)
#[derive(Debug, Clone, Default)]
pub struct SocketIndex {
    sockets: Vec<Socket>,
}

impl SocketIndex {
    pub fn new(mut sockets: Vec<Socket>) -> Self {
        sockets.sort_by_key(|s| s.inode);
        SocketIndex { sockets }
    }

    /// Socket owning `inode`.
    ///
    /// Inode 0 is shared by every unaccepted socket and never matches.
    pub fn find(&self, inode: u64) -> Option<&Socket> {
        if inode == 0 {
            return None;
        }
        let i = self.sockets.partition_point(|s| s.inode < inode);
        self.sockets.get(i).filter(|s| s.inode == inode)
    }

    /// Lookup by the digit string of a "socket:[<digits>]" link
    pub fn find_str(&self, inode: &str) -> Option<&Socket> {
        self.find(inode.parse().ok()?)
    }

    pub fn len(&self) -> usize {
        self.sockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }

    /// Sockets in ascending inode order
    pub fn iter(&self) -> impl Iterator<Item = &Socket> {
        self.sockets.iter()
    }
}

impl From<Vec<Socket>> for SocketIndex {
    fn from(sockets: Vec<Socket>) -> Self {
        SocketIndex::new(sockets)
    }
}

// Network socket tables from /proc/net/{tcp,tcp6,udp,udp6}
// Read-only operations, never modifies system state

pub mod index;

pub use index::SocketIndex;

use crate::error::{Error, Result};
use crate::procfs::Procfs;
use std::fmt;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::panic;
use std::thread;
use tracing::debug;

/// /proc/net/tcp format:
/// sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
/// 0: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 12345
const LOCAL_ADDR_COLUMN: usize = 1;
const INODE_COLUMN: usize = 9;

/// Protocols with a socket table under /proc/net
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Tcp,
    Tcp6,
    Udp,
    Udp6,
}

impl Protocol {
    /// Every table read by [`Procfs::sockets`], in result order
    pub const ALL: [Protocol; 4] = [Protocol::Tcp, Protocol::Tcp6, Protocol::Udp, Protocol::Udp6];

    /// Table file name, which doubles as the protocol tag
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Tcp6 => "tcp6",
            Protocol::Udp => "udp",
            Protocol::Udp6 => "udp6",
        }
    }

    pub fn is_ipv6(self) -> bool {
        matches!(self, Protocol::Tcp6 | Protocol::Udp6)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a socket table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Socket {
    pub protocol: Protocol,
    pub local_addr: IpAddr,
    /// Locally bound port
    pub port: u16,
    /// Kernel inode of the socket; 0 means no owning process yet
    pub inode: u64,
}

impl Socket {
    /// Whether a process holds this socket (inode is not the 0 sentinel)
    pub fn is_owned(&self) -> bool {
        self.inode != 0
    }
}

impl fmt::Display for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.local_addr {
            IpAddr::V4(ip) => write!(f, "{} {}:{}", self.protocol, ip, self.port),
            IpAddr::V6(ip) => write!(f, "{} [{}]:{}", self.protocol, ip, self.port),
        }
    }
}

impl Procfs {
    /// Read all four socket tables in parallel.
    ///
    /// Fail-fast: if any table cannot be read or holds a malformed row, the
    /// first error in protocol order is returned and every parsed row is
    /// discarded. On success rows come in tcp, tcp6, udp, udp6 order.
    pub fn sockets(&self) -> Result<Vec<Socket>> {
        thread::scope(|scope| {
            let tasks: Vec<_> = Protocol::ALL
                .iter()
                .map(|&protocol| scope.spawn(move || self.socket_table(protocol)))
                .collect();

            let mut sockets = Vec::new();
            for task in tasks {
                let table = task.join().unwrap_or_else(|e| panic::resume_unwind(e))?;
                sockets.extend(table);
            }
            Ok(sockets)
        })
    }

    /// Parse a single protocol table
    pub fn socket_table(&self, protocol: Protocol) -> Result<Vec<Socket>> {
        let path = self.config().net_table(protocol.as_str());
        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let sockets = parse_socket_table(&content, protocol)?;
        debug!(%protocol, count = sockets.len(), "socket_table");
        Ok(sockets)
    }
}

/// Parse a whole table: header line first, then one socket per line
pub fn parse_socket_table(content: &str, protocol: Protocol) -> Result<Vec<Socket>> {
    content
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_socket_line(line, protocol))
        .collect()
}

/// Parse a single data row
fn parse_socket_line(line: &str, protocol: Protocol) -> Result<Socket> {
    let columns: Vec<&str> = line.split_whitespace().collect();
    if columns.len() <= INODE_COLUMN {
        return Err(Error::malformed(
            format!("{} row", protocol),
            format!("expected at least {} columns in '{}'", INODE_COLUMN + 1, line.trim()),
        ));
    }

    let (local_addr, port) = parse_address(columns[LOCAL_ADDR_COLUMN], protocol)?;

    let inode = columns[INODE_COLUMN].parse::<u64>().map_err(|e| {
        Error::malformed(
            format!("{} inode", protocol),
            format!("'{}': {}", columns[INODE_COLUMN], e),
        )
    })?;

    Ok(Socket {
        protocol,
        local_addr,
        port,
        inode,
    })
}

/// Parse hex address:port format from /proc/net/*
/// Format: HEXIP:HEXPORT (e.g., "0100007F:1F90" = 127.0.0.1:8080)
fn parse_address(addr_str: &str, protocol: Protocol) -> Result<(IpAddr, u16)> {
    let malformed = |reason: String| Error::malformed(format!("{} local address", protocol), reason);

    let (hex_ip, hex_port) = addr_str
        .split_once(':')
        .ok_or_else(|| malformed(format!("missing ':' in '{}'", addr_str)))?;

    let port = u16::from_str_radix(hex_port, 16)
        .map_err(|e| malformed(format!("port '{}': {}", hex_port, e)))?;

    let ip = if protocol.is_ipv6() {
        parse_hex_ipv6(hex_ip).map(IpAddr::V6)
    } else {
        parse_hex_ipv4(hex_ip).map(IpAddr::V4)
    };
    let ip = ip.ok_or_else(|| malformed(format!("address '{}'", hex_ip)))?;

    Ok((ip, port))
}

/// The kernel prints each 32-bit word of the address in host byte order
fn parse_hex_word(hex: &str) -> Option<[u8; 4]> {
    if hex.len() != 8 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(u32::to_ne_bytes)
}

/// Example: "0100007F" = 127.0.0.1
fn parse_hex_ipv4(hex_ip: &str) -> Option<Ipv4Addr> {
    parse_hex_word(hex_ip).map(Ipv4Addr::from)
}

/// Four words, e.g. "00000000000000000000000001000000" = ::1
fn parse_hex_ipv6(hex_ip: &str) -> Option<Ipv6Addr> {
    if hex_ip.len() != 32 || !hex_ip.is_ascii() {
        return None;
    }

    let mut octets = [0u8; 16];
    for (i, chunk) in octets.chunks_exact_mut(4).enumerate() {
        chunk.copy_from_slice(&parse_hex_word(&hex_ip[i * 8..i * 8 + 8])?);
    }
    Some(Ipv6Addr::from(octets))
}

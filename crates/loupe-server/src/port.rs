//! Free-port probing behind a trait seam.

use std::io;
use std::net::{Ipv4Addr, TcpListener};

/// Opaque `findFreePort` collaborator.
pub trait PortFinder: Send + Sync {
    /// Returns a currently free port at or above `preferred`.
    fn find_free_port(&self, preferred: u16) -> io::Result<u16>;
}

/// Probes ascending ports by attempting a bind on each.
#[derive(Debug, Clone, Copy)]
pub struct ScanPortFinder {
    pub max_attempts: u16,
}

impl Default for ScanPortFinder {
    fn default() -> Self {
        Self { max_attempts: 64 }
    }
}

impl PortFinder for ScanPortFinder {
    fn find_free_port(&self, preferred: u16) -> io::Result<u16> {
        for offset in 0..self.max_attempts {
            let Some(port) = preferred.checked_add(offset) else {
                break;
            };
            if TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).is_ok() {
                return Ok(port);
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AddrInUse,
            format!(
                "no free port within {} ports of {preferred}",
                self.max_attempts
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_port_at_or_above_preferred() {
        let finder = ScanPortFinder::default();
        let port = finder.find_free_port(47211).unwrap();
        assert!(port >= 47211);
    }

    #[test]
    fn test_skips_occupied_port() {
        let finder = ScanPortFinder::default();
        let port = finder.find_free_port(47311).unwrap();
        // Keep the found port busy and probe again from the same start.
        let _busy = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).unwrap();
        let next = finder.find_free_port(port).unwrap();
        assert!(next > port);
    }
}

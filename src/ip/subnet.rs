//! IPv4 subnet handling.
//!
//! Endpoint addresses are derived from their index by placing the index in
//! the host bits of the configured subnet, so every index below the subnet
//! capacity maps to a distinct address inside it.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Errors that can occur while parsing a subnet in CIDR notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnetError {
    #[error("Subnet '{0}' is not in CIDR notation (expected a.b.c.d/prefix)")]
    MissingPrefix(String),

    #[error("Invalid subnet address '{0}'")]
    InvalidAddress(String),

    #[error("Invalid prefix length '{0}' (must be 0-32)")]
    InvalidPrefix(String),
}

/// An IPv4 network with its prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    base: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    pub fn new(address: Ipv4Addr, prefix: u8) -> Result<Self, SubnetError> {
        if prefix > 32 {
            return Err(SubnetError::InvalidPrefix(prefix.to_string()));
        }
        let base = Ipv4Addr::from(u32::from(address) & Self::mask(prefix));
        Ok(Subnet { base, prefix })
    }

    fn mask(prefix: u8) -> u32 {
        if prefix == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(prefix))
        }
    }

    /// Network base address (host bits cleared)
    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses in the subnet, `2^(32 - prefix)`
    pub fn capacity(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix))
    }

    /// Address for the endpoint at `index`.
    ///
    /// Returns `None` when the index does not fit in the host bits.
    pub fn address_for(&self, index: u64) -> Option<Ipv4Addr> {
        if index >= self.capacity() {
            return None;
        }
        Some(Ipv4Addr::from(u32::from(self.base) | index as u32))
    }

    /// Check whether an address falls inside this subnet
    pub fn contains(&self, address: Ipv4Addr) -> bool {
        u32::from(address) & Self::mask(self.prefix) == u32::from(self.base)
    }
}

impl FromStr for Subnet {
    type Err = SubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (address, prefix) = s
            .split_once('/')
            .ok_or_else(|| SubnetError::MissingPrefix(s.to_string()))?;
        let address = address
            .parse::<Ipv4Addr>()
            .map_err(|_| SubnetError::InvalidAddress(address.to_string()))?;
        let prefix = prefix
            .parse::<u8>()
            .map_err(|_| SubnetError::InvalidPrefix(prefix.to_string()))?;
        Subnet::new(address, prefix)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subnet() {
        let subnet: Subnet = "10.0.0.0/16".parse().unwrap();
        assert_eq!(subnet.base(), Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(subnet.prefix(), 16);
        assert_eq!(subnet.capacity(), 65536);
        assert_eq!(subnet.to_string(), "10.0.0.0/16");

        // Host bits are cleared from the base
        let subnet: Subnet = "192.168.7.9/24".parse().unwrap();
        assert_eq!(subnet.base(), Ipv4Addr::new(192, 168, 7, 0));
    }

    #[test]
    fn test_parse_invalid_subnets() {
        assert!(matches!("10.0.0.0".parse::<Subnet>(), Err(SubnetError::MissingPrefix(_))));
        assert!(matches!("10.0.0/8".parse::<Subnet>(), Err(SubnetError::InvalidAddress(_))));
        assert!(matches!("10.0.0.0/33".parse::<Subnet>(), Err(SubnetError::InvalidPrefix(_))));
        assert!(matches!("10.0.0.0/x".parse::<Subnet>(), Err(SubnetError::InvalidPrefix(_))));
    }

    #[test]
    fn test_address_for_index() {
        let subnet: Subnet = "10.0.0.0/16".parse().unwrap();
        assert_eq!(subnet.address_for(0), Some(Ipv4Addr::new(10, 0, 0, 0)));
        assert_eq!(subnet.address_for(1), Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(subnet.address_for(255), Some(Ipv4Addr::new(10, 0, 0, 255)));
        assert_eq!(subnet.address_for(256), Some(Ipv4Addr::new(10, 0, 1, 0)));
        assert_eq!(subnet.address_for(65535), Some(Ipv4Addr::new(10, 0, 255, 255)));
        assert_eq!(subnet.address_for(65536), None);
    }

    #[test]
    fn test_unaligned_prefix_stays_inside() {
        let subnet: Subnet = "10.0.16.0/20".parse().unwrap();
        assert_eq!(subnet.capacity(), 4096);
        for index in [0u64, 1, 255, 256, 4095] {
            let address = subnet.address_for(index).unwrap();
            assert!(subnet.contains(address), "{} outside {}", address, subnet);
        }
        assert!(!subnet.contains(Ipv4Addr::new(10, 0, 1, 0)));
    }

    #[test]
    fn test_full_and_host_prefixes() {
        let subnet: Subnet = "0.0.0.0/0".parse().unwrap();
        assert_eq!(subnet.capacity(), 1 << 32);
        let single: Subnet = "10.1.2.3/32".parse().unwrap();
        assert_eq!(single.capacity(), 1);
        assert_eq!(single.address_for(0), Some(Ipv4Addr::new(10, 1, 2, 3)));
        assert_eq!(single.address_for(1), None);
    }
}

use core::fmt;

use crate::generator::{Error, Result};

/// The fixed identity of a generating node, embedded into every
/// [`SnowflakeId`] it issues.
///
/// A node is addressed by a `(datacenter_id, machine_id)` pair where each half
/// occupies 5 bits of the ID, giving 32 datacenters of 32 machines each. Both
/// values are validated once, at construction, and never change afterwards.
///
/// # Example
///
/// ```
/// use linkflake::NodeIdentity;
///
/// let node = NodeIdentity::new(1, 1).unwrap();
/// assert_eq!(node.datacenter_id(), 1);
/// assert_eq!(node.machine_id(), 1);
///
/// assert!(NodeIdentity::new(32, 0).is_err());
/// ```
///
/// [`SnowflakeId`]: crate::id::SnowflakeId
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdentity {
    datacenter_id: u8,
    machine_id: u8,
}

impl NodeIdentity {
    /// Largest accepted datacenter ID (5 bits).
    pub const MAX_DATACENTER_ID: u8 = (1 << 5) - 1;

    /// Largest accepted machine ID (5 bits).
    pub const MAX_MACHINE_ID: u8 = (1 << 5) - 1;

    /// Creates a node identity, validating both halves.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDatacenterId`] if `datacenter_id > 31`
    /// - [`Error::InvalidMachineId`] if `machine_id > 31`
    pub const fn new(datacenter_id: u8, machine_id: u8) -> Result<Self> {
        if datacenter_id > Self::MAX_DATACENTER_ID {
            return Err(Error::InvalidDatacenterId { id: datacenter_id });
        }
        if machine_id > Self::MAX_MACHINE_ID {
            return Err(Error::InvalidMachineId { id: machine_id });
        }
        Ok(Self {
            datacenter_id,
            machine_id,
        })
    }

    /// Builds an identity from raw field values, masking each to 5 bits.
    pub(crate) const fn from_masked(datacenter_id: u64, machine_id: u64) -> Self {
        Self {
            datacenter_id: (datacenter_id & Self::MAX_DATACENTER_ID as u64) as u8,
            machine_id: (machine_id & Self::MAX_MACHINE_ID as u64) as u8,
        }
    }

    pub const fn datacenter_id(&self) -> u8 {
        self.datacenter_id
    }

    pub const fn machine_id(&self) -> u8 {
        self.machine_id
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.datacenter_id, self.machine_id)
    }
}

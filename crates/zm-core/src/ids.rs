use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier used for nodes, zones and parts.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
/// - ordering follows the 0-based index, so "lower zone" comparisons work directly
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    ///
    /// Panics on `u32::MAX`; use [`Id::try_from_index`] for untrusted input.
    pub fn from_index(index: u32) -> Self {
        Self::try_from_index(index).expect("index below u32::MAX")
    }

    /// Like [`Id::from_index`], but `None` when `index + 1` overflows.
    pub fn try_from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Create an Id from a `usize` arena slot.
    pub fn from_usize(index: usize) -> Self {
        Self::from_index(index as u32)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Recover the 0-based index as an arena slot.
    pub fn slot(self) -> usize {
        self.index() as usize
    }

    /// The id immediately after this one.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Id {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.index())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Id {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u32::deserialize(deserializer)?;
        Id::try_from_index(index).ok_or_else(|| serde::de::Error::custom("id index out of range"))
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type NodeId = Id;
pub type ZoneId = Id;
pub type PartId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.slot(), i as usize);
        }
    }

    #[test]
    fn try_from_index_rejects_overflow() {
        assert_eq!(Id::try_from_index(u32::MAX), None);
        assert_eq!(Id::try_from_index(u32::MAX - 1).map(Id::index), Some(u32::MAX - 1));
        assert_eq!(Id::try_from_index(0), Some(Id::from_index(0)));
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn ordering_follows_index() {
        let zone0 = ZoneId::from_index(0);
        let zone1 = zone0.next();
        assert!(zone0 < zone1);
        assert_eq!(zone1.index(), 1);
    }
}

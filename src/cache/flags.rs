use bitflags::bitflags;

bitflags! {
    /// Cache-level flags from the template.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CacheFlags: u32 {
        const FRAMED = 1 << 0;
        /// Reserved: no operation reads this bit today (see the crate-level
        /// "not yet implemented" surfaces).
        const INTERP_ANY = 1 << 1;
        const INTERP_SUB = 1 << 2;
    }
}

bitflags! {
    /// Flags for [`crate::Cache::consolidate`]; combinable.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ConsolidationFlags: u32 {
        const CONSOLIDATE = 1 << 0;
        const FREE_INVALID = 1 << 1;
        const FREE_OUTDATED = 1 << 2;
    }
}

/// Outcome of [`crate::Cache::sample_write`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteResult {
    Success,
    /// `t` fell outside the cache's time domain.
    Invalid,
    /// A codec (block write or meta generator) reported failure.
    Failed,
}

bitflags! {
    /// Outcome of [`crate::Cache::sample_read`]. The all-zero value ("exact")
    /// means the caller now holds fully reconstructed, fresh data.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ReadResult: u32 {
        /// Reserved: the interpolation hook is never invoked, so this bit is
        /// declared but never set by the current read protocol.
        const INTERP = 1 << 0;
        const OUTDATED = 1 << 1;
        const INVALID = 1 << 2;
    }
}

impl ReadResult {
    pub fn is_exact(self) -> bool {
        self.is_empty()
    }
}

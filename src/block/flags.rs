use bitflags::bitflags;

bitflags! {
    /// Per-block-descriptor flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BlockFlags: u32 {
        /// The block's element count may legitimately vary from write to write.
        const CONTINUOUS = 1 << 0;
        /// The host guarantees `count()` returns the same value for every
        /// sample; the engine does not enforce this.
        const CONST_COUNT = 1 << 1;
        /// Always included in the registry regardless of the selection string.
        const MANDATORY = 1 << 2;
    }
}

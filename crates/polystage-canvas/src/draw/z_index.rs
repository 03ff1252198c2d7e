/// Z-ordering key for draw items. Higher values appear on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Layer reserved for the full-viewport background.
    pub const BACKGROUND: ZIndex = ZIndex(i32::MIN);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

use crate::coords::{Rect, Transform2d};
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::Color;

/// Rectangle draw payload, in the producing container's local space.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

impl RectCmd {
    #[inline]
    pub fn new(rect: Rect, color: Color) -> Self {
        Self { rect, color }
    }
}

impl DrawList {
    /// Records a solid rectangle.
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, transform: Transform2d, rect: Rect, color: Color) {
        self.push(z, transform, DrawCmd::Rect(RectCmd::new(rect, color)));
    }
}

use crate::coords::{Transform2d, Vec2};
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::Color;

/// Circle draw payload, centered on the container origin unless `center` says otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl DrawList {
    /// Records a solid circle.
    #[inline]
    pub fn push_circle(&mut self, z: ZIndex, transform: Transform2d, center: Vec2, radius: f32, color: Color) {
        self.push(z, transform, DrawCmd::Circle(CircleCmd { center, radius, color }));
    }
}

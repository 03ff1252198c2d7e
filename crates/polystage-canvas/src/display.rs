//! Retained display tree.
//!
//! The stage holds one [`Container`] per game object. Transform lives on the
//! container and the drawable content is its single child [`Visual`], so a
//! move/rotate/scale never rebuilds geometry. The background is a separate
//! full-viewport rectangle painted behind everything and unaffected by
//! camera panning.

use std::collections::HashMap;

use crate::coords::{Rect, Transform2d, Vec2};
use crate::draw::shapes::TextCmd;
use crate::draw::{DrawList, ZIndex};
use crate::paint::Color;
use crate::text::FontId;
use crate::texture::TextureId;

/// Handle to a container attached to a [`Stage`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

/// Drawable content of a container, in the container's local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    /// Top-left anchored at the container origin.
    Rect { width: f32, height: f32, color: Color },
    /// Centered on the container origin.
    Circle { radius: f32, color: Color },
    /// Top-left anchored; `bounds` is the laid-out extent.
    Text { content: String, size: f32, color: Color, font: Option<FontId>, bounds: Vec2 },
    /// Centered on the container origin.
    Sprite { texture: TextureId, width: f32, height: f32 },
}

impl Visual {
    /// Local-space bounding box.
    pub fn bounds(&self) -> Rect {
        match self {
            Visual::Rect { width, height, .. } => Rect::new(0.0, 0.0, *width, *height),
            Visual::Circle { radius, .. } => Rect::centered(Vec2::new(radius * 2.0, radius * 2.0)),
            Visual::Text { bounds, .. } => Rect::new(0.0, 0.0, bounds.x, bounds.y),
            Visual::Sprite { width, height, .. } => Rect::centered(Vec2::new(*width, *height)),
        }
    }

    fn paint(&self, list: &mut DrawList, z: ZIndex, transform: Transform2d) {
        match self {
            Visual::Rect { width, height, color } => {
                list.push_rect(z, transform, Rect::new(0.0, 0.0, *width, *height), *color);
            }
            Visual::Circle { radius, color } => {
                list.push_circle(z, transform, Vec2::ZERO, *radius, *color);
            }
            Visual::Text { content, size, color, font, bounds } => list.push_text(
                z,
                transform,
                TextCmd {
                    text: content.clone(),
                    font: *font,
                    size: *size,
                    color: *color,
                    origin: Vec2::ZERO,
                    bounds: *bounds,
                },
            ),
            Visual::Sprite { texture, width, height } => {
                list.push_sprite(z, transform, *texture, Rect::centered(Vec2::new(*width, *height)));
            }
        }
    }
}

/// Per-object display container.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub label: String,
    pub transform: Transform2d,
    pub z_index: ZIndex,
    pub visible: bool,
    /// `None` when the content could not be built (e.g. missing texture).
    pub child: Option<Visual>,
}

impl Container {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            transform: Transform2d::IDENTITY,
            z_index: ZIndex::default(),
            visible: true,
            child: None,
        }
    }
}

/// Full-viewport filled rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Background {
    pub size: Vec2,
    pub color: Color,
}

/// Display root: containers in creation order plus the background.
#[derive(Debug, Default)]
pub struct Stage {
    containers: HashMap<NodeId, Container>,
    order: Vec<NodeId>,
    next_id: u32,
    background: Option<Background>,
    /// World-layer pan applied to every container (camera).
    pub offset: Vec2,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a container on top of the existing ones.
    pub fn add_child(&mut self, container: Container) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.containers.insert(id, container);
        self.order.push(id);
        id
    }

    /// Detaches a container, handing it back for disposal.
    pub fn remove_child(&mut self, id: NodeId) -> Option<Container> {
        let container = self.containers.remove(&id)?;
        self.order.retain(|n| *n != id);
        Some(container)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Container> {
        self.containers.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Container> {
        self.containers.get_mut(&id)
    }

    /// Containers in creation order.
    pub fn children(&self) -> impl Iterator<Item = &Container> {
        self.order.iter().filter_map(|id| self.containers.get(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Replaces (or removes) the background rectangle.
    pub fn set_background(&mut self, background: Option<Background>) {
        self.background = background;
    }

    /// Removes every container and the background.
    pub fn destroy(&mut self) {
        self.containers.clear();
        self.order.clear();
        self.background = None;
        self.offset = Vec2::ZERO;
    }

    /// Records the whole tree into `list` in paint order.
    pub fn paint(&self, list: &mut DrawList) {
        if let Some(bg) = &self.background {
            list.push_rect(
                ZIndex::BACKGROUND,
                Transform2d::IDENTITY,
                Rect::new(0.0, 0.0, bg.size.x, bg.size.y),
                bg.color,
            );
        }
        for container in self.children().filter(|c| c.visible) {
            if let Some(visual) = &container.child {
                visual.paint(list, container.z_index, container.transform.translated(self.offset));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::draw::DrawCmd;

    use super::*;

    fn rect_container(label: &str, w: f32) -> Container {
        Container {
            child: Some(Visual::Rect { width: w, height: w, color: Color::WHITE }),
            ..Container::new(label)
        }
    }

    #[test]
    fn children_keep_creation_order() {
        let mut stage = Stage::new();
        stage.add_child(rect_container("a", 1.0));
        let b = stage.add_child(rect_container("b", 2.0));
        stage.add_child(rect_container("c", 3.0));

        stage.remove_child(b);

        let labels: Vec<_> = stage.children().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c"]);
        assert!(stage.remove_child(b).is_none());
    }

    #[test]
    fn paint_puts_background_first_and_skips_empty_containers() {
        let mut stage = Stage::new();
        stage.add_child(Container::new("empty"));
        stage.add_child(rect_container("r", 10.0));
        stage.set_background(Some(Background { size: Vec2::new(800.0, 600.0), color: Color::WHITE }));

        let mut list = DrawList::new();
        stage.paint(&mut list);
        let sizes: Vec<_> = list
            .iter_in_paint_order()
            .map(|i| match &i.cmd {
                DrawCmd::Rect(r) => r.rect.size.x,
                _ => 0.0,
            })
            .collect();

        assert_eq!(sizes, vec![800.0, 10.0]);
    }

    #[test]
    fn pan_offsets_containers_not_background() {
        let mut stage = Stage::new();
        stage.add_child(Container {
            transform: Transform2d::at(Vec2::new(10.0, 10.0)),
            ..rect_container("r", 1.0)
        });
        stage.set_background(Some(Background { size: Vec2::new(1.0, 1.0), color: Color::WHITE }));
        stage.offset = Vec2::new(-5.0, -5.0);

        let mut list = DrawList::new();
        stage.paint(&mut list);

        assert_eq!(list.items()[0].transform.position, Vec2::new(0.0, 0.0));
        assert_eq!(list.items()[1].transform.position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn circle_bounds_are_centered() {
        let v = Visual::Circle { radius: 40.0, color: Color::WHITE };
        assert_eq!(v.bounds(), Rect::new(-40.0, -40.0, 80.0, 80.0));
    }
}

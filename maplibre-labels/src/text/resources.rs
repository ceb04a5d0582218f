//! Draw resources of a text layer.

use bytemuck_derive::{Pod, Zeroable};
use cgmath::{InnerSpace, Vector2, Zero};

use crate::{text::TextItem, tile::LabelKind};

/// The expensive, render-side part of a [`TextLayer`](crate::text::TextLayer).
///
/// Implementations are owned by the layer and move together with it between the worker and the
/// consumer. They should keep their allocations across [`DrawResources::clear`] calls.
pub trait DrawResources: Send + 'static {
    /// Builds the resources for `items`. Called exactly once per build, after all items have been
    /// added.
    fn prepare(&mut self, items: &[TextItem]);

    /// Drops the contents of the previous build.
    fn clear(&mut self);
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LabelVertex {
    pub position: [f32; 2],
    /// Anchor of the label this vertex belongs to
    pub origin: [f32; 2],
    pub color: [u8; 4],
}

/// CPU-side vertex and index buffers with one oriented quad per label. The quad of a line label
/// spans its segment, a caption gets a square box around its anchor. Glyphs are laid out within
/// the quads by the shader.
#[derive(Default)]
pub struct VertexBuffers {
    vertices: Vec<LabelVertex>,
    indices: Vec<u32>,
}

impl VertexBuffers {
    pub fn vertices(&self) -> &[LabelVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn push_quad(&mut self, item: &TextItem) {
        let Some(text) = &item.text else {
            return;
        };

        let half_height = text.font_size / 2.0;
        let (direction, half_length) = match item.kind {
            LabelKind::Caption => (Vector2::unit_x(), half_height),
            LabelKind::Line => {
                let along = Vector2::new(
                    item.segment.x2 - item.segment.x1,
                    item.segment.y2 - item.segment.y1,
                );
                if along.is_zero() {
                    (Vector2::unit_x(), half_height)
                } else {
                    (along.normalize(), along.magnitude() / 2.0)
                }
            }
        };
        let normal = Vector2::new(-direction.y, direction.x);

        let center = Vector2::new(item.x, item.y);
        let along = direction * half_length;
        let across = normal * half_height;

        let base = self.vertices.len() as u32;
        for corner in [
            center - along - across,
            center + along - across,
            center + along + across,
            center - along + across,
        ] {
            self.vertices.push(LabelVertex {
                position: corner.into(),
                origin: center.into(),
                color: text.color,
            });
        }
        self.indices
            .extend([0, 1, 2, 0, 2, 3].into_iter().map(|index| base + index));
    }
}

impl DrawResources for VertexBuffers {
    fn prepare(&mut self, items: &[TextItem]) {
        self.clear();
        self.vertices.reserve(items.len() * 4);
        self.indices.reserve(items.len() * 6);

        for item in items {
            self.push_quad(item);
        }
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        geometry::{LabelSegment, TileOffset},
        text::{DrawResources, TextItem, VertexBuffers},
        tile::{LabelCandidate, LabelText},
    };

    fn item(candidate: LabelCandidate) -> TextItem {
        let mut item = TextItem::default();
        item.set_from(&candidate, TileOffset::default());
        item
    }

    #[test]
    fn test_line_quad_spans_segment() {
        let text = Arc::new(LabelText::new("Ludwigstraße", 10.0, [1, 2, 3, 4]));
        let mut buffers = VertexBuffers::default();

        buffers.prepare(&[item(LabelCandidate::line(
            LabelSegment::new(0.0, 0.0, 100.0, 0.0),
            text,
        ))]);

        let positions: Vec<_> = buffers.vertices().iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[0.0, -5.0], [100.0, -5.0], [100.0, 5.0], [0.0, 5.0]]
        );
        assert!(buffers.vertices().iter().all(|v| v.origin == [50.0, 0.0]));
        assert!(buffers.vertices().iter().all(|v| v.color == [1, 2, 3, 4]));
        assert_eq!(buffers.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_prepare_replaces_previous_build() {
        let text = Arc::new(LabelText::new("Sendling", 8.0, [0, 0, 0, 255]));
        let mut buffers = VertexBuffers::default();

        let items = [
            item(LabelCandidate::caption(0.0, 0.0, text.clone())),
            item(LabelCandidate::caption(20.0, 0.0, text)),
        ];
        buffers.prepare(&items);
        buffers.prepare(&items[..1]);

        assert_eq!(buffers.vertices().len(), 4);
        assert_eq!(buffers.indices().len(), 6);
        assert_eq!(buffers.vertex_bytes().len(), 4 * 20);
    }
}

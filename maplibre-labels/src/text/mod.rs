//! Text layers and the label items they are made of.

use std::sync::Arc;

use crate::{
    geometry::{LabelSegment, TileOffset},
    tile::{LabelCandidate, LabelKind, LabelText},
};

pub mod resources;

pub use resources::{DrawResources, LabelVertex, VertexBuffers};

/// A label after it has been moved into the frame of a [`TextLayer`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextItem {
    pub kind: LabelKind,
    pub x: f32,
    pub y: f32,
    pub segment: LabelSegment,
    pub text: Option<Arc<LabelText>>,
}

impl TextItem {
    /// Overwrites every field of this item with a copy of `candidate` translated by `offset`.
    pub fn set_from(&mut self, candidate: &LabelCandidate, offset: TileOffset) -> &mut Self {
        self.kind = candidate.kind;
        self.x = candidate.x + offset.dx as f32;
        self.y = candidate.y + offset.dy as f32;
        self.segment = candidate.segment.translated(offset);
        self.text = Some(candidate.text.clone());
        self
    }

    fn reset(&mut self) {
        *self = TextItem::default();
    }
}

/// Keeps released [`TextItems`](TextItem) around so that rebuilding a layer does not allocate
/// them again.
#[derive(Default)]
pub struct TextItemPool {
    free: Vec<TextItem>,
}

impl TextItemPool {
    /// Returns an item with all fields reset.
    pub fn acquire(&mut self) -> TextItem {
        self.free.pop().unwrap_or_default()
    }

    pub fn release(&mut self, items: impl IntoIterator<Item = TextItem>) {
        self.free.extend(items.into_iter().map(|mut item| {
            // Do not keep the text of tiles alive which might have left the view.
            item.reset();
            item
        }));
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// The render-ready label layer: transformed items plus the draw resources prepared from them.
///
/// A layer is created once and then cleared and refilled for every build.
pub struct TextLayer<R> {
    items: Vec<TextItem>,
    pool: TextItemPool,
    resources: R,
    prepared: bool,
}

impl<R: DrawResources> TextLayer<R> {
    pub fn new(resources: R) -> Self {
        Self {
            items: Vec::new(),
            pool: TextItemPool::default(),
            resources,
            prepared: false,
        }
    }

    /// Returns all items to the pool and releases the contents of the draw resources. Their
    /// allocations are kept.
    pub fn clear(&mut self) {
        self.pool.release(self.items.drain(..));
        self.resources.clear();
        self.prepared = false;
    }

    pub fn acquire_item(&mut self) -> TextItem {
        self.pool.acquire()
    }

    pub fn add_text(&mut self, item: TextItem) {
        self.prepared = false;
        self.items.push(item);
    }

    /// Builds the draw resources for all items added since the last [`TextLayer::clear`].
    #[tracing::instrument(skip_all)]
    pub fn prepare(&mut self) {
        self.resources.prepare(&self.items);
        self.prepared = true;
    }

    pub fn items(&self) -> &[TextItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    pub fn pooled_items(&self) -> usize {
        self.pool.available()
    }
}

impl<R: DrawResources + Default> Default for TextLayer<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        geometry::{LabelSegment, TileOffset},
        text::{TextItem, TextItemPool, TextLayer, VertexBuffers},
        tile::{LabelCandidate, LabelKind, LabelText},
    };

    fn text() -> Arc<LabelText> {
        Arc::new(LabelText::new("Marienplatz", 12.0, [255, 255, 255, 255]))
    }

    #[test]
    fn test_set_from_translates() {
        let candidate = LabelCandidate::line(LabelSegment::new(0.0, 0.0, 10.0, 0.0), text());
        let mut item = TextItem::default();
        item.set_from(&candidate, TileOffset { dx: -512, dy: 512 });

        assert_eq!(item.kind, LabelKind::Line);
        assert_eq!((item.x, item.y), (-507.0, 512.0));
        assert_eq!(item.segment, LabelSegment::new(-512.0, 512.0, -502.0, 512.0));
        assert_eq!(item.text.as_deref(), Some(&*candidate.text));
    }

    #[test]
    fn test_pool_resets_items() {
        let mut pool = TextItemPool::default();
        let mut item = pool.acquire();
        item.set_from(
            &LabelCandidate::caption(5.0, 6.0, text()),
            TileOffset::default(),
        );

        pool.release([item]);
        assert_eq!(pool.available(), 1);

        let item = pool.acquire();
        assert_eq!(item, TextItem::default());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_clear_recycles_items() {
        let mut layer = TextLayer::new(VertexBuffers::default());
        for i in 0..3 {
            let mut item = layer.acquire_item();
            item.set_from(
                &LabelCandidate::caption(i as f32, 0.0, text()),
                TileOffset::default(),
            );
            layer.add_text(item);
        }
        layer.prepare();

        assert_eq!(layer.len(), 3);
        assert!(layer.is_prepared());
        assert_eq!(layer.resources().vertices().len(), 12);

        layer.clear();

        assert!(layer.is_empty());
        assert!(!layer.is_prepared());
        assert_eq!(layer.pooled_items(), 3);
        assert!(layer.resources().vertices().is_empty());
    }
}

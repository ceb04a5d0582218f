//! Hands finished text layers from the worker to the consumer and back.
//!
//! Layers are uniquely owned `Box<TextLayer>` handles which are moved through the [`Handoff`].
//! Neither side ever touches a layer owned by the other one.

use std::sync::{Mutex, MutexGuard};

use crate::{error::Error, text::TextLayer, view_state::ViewPose};

/// A finished layer together with the pose its content is valid for.
pub struct PublishedLayer<R> {
    pub layer: Box<TextLayer<R>>,
    pub pose: ViewPose,
}

struct Slots<R> {
    /// Published by the worker, not yet consumed.
    pending: Option<PublishedLayer<R>>,
    /// Given back by the consumer, taken by the worker when it has no work layer of its own.
    recycled: Vec<Box<TextLayer<R>>>,
}

pub struct Handoff<R> {
    slots: Mutex<Slots<R>>,
}

impl<R> Handoff<R> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                pending: None,
                recycled: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slots<R>>, Error> {
        self.slots.lock().map_err(Error::poisoned("handoff slot"))
    }

    /// Stores a finished layer. An unconsumed layer which is still pending is replaced and
    /// returned, so the caller can reuse it.
    pub fn publish(
        &self,
        layer: Box<TextLayer<R>>,
        pose: ViewPose,
    ) -> Result<Option<Box<TextLayer<R>>>, Error> {
        let displaced = self
            .lock()?
            .pending
            .replace(PublishedLayer { layer, pose });
        Ok(displaced.map(|published| published.layer))
    }

    /// Takes the pending layer out of the slot, if there is one. Never blocks on a build.
    pub fn consume_if_present(&self) -> Result<Option<PublishedLayer<R>>, Error> {
        Ok(self.lock()?.pending.take())
    }

    /// Gives a layer which is no longer displayed back to the worker. Layers which are returned
    /// while the worker still has one to build into are kept until it needs them.
    pub fn recycle(&self, layer: Box<TextLayer<R>>) -> Result<(), Error> {
        self.lock()?.recycled.push(layer);
        Ok(())
    }

    pub fn take_recycled(&self) -> Result<Option<Box<TextLayer<R>>>, Error> {
        Ok(self.lock()?.recycled.pop())
    }
}

impl<R> Default for Handoff<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use crate::{
        coords::{WorldCoords, ZoomLevel},
        handoff::Handoff,
        text::{TextLayer, VertexBuffers},
        view_state::ViewPose,
    };

    fn pose(z: u8) -> ViewPose {
        ViewPose::new(WorldCoords::default(), ZoomLevel::from(z), Deg(0.0))
    }

    fn layer() -> Box<TextLayer<VertexBuffers>> {
        Box::new(TextLayer::default())
    }

    #[test]
    fn test_consume_empty_slot() {
        let handoff = Handoff::<VertexBuffers>::new();
        assert!(handoff.consume_if_present().unwrap().is_none());
        assert!(handoff.consume_if_present().unwrap().is_none());
    }

    #[test]
    fn test_at_most_one_pending() {
        let handoff = Handoff::new();
        let first = layer();
        let second = layer();
        let first_ptr: *const _ = &*first;
        let second_ptr: *const _ = &*second;

        assert!(handoff.publish(first, pose(1)).unwrap().is_none());
        let displaced = handoff.publish(second, pose(2)).unwrap().unwrap();
        assert_eq!(&*displaced as *const _, first_ptr);

        let published = handoff.consume_if_present().unwrap().unwrap();
        assert_eq!(&*published.layer as *const _, second_ptr);
        assert_eq!(published.pose, pose(2));

        assert!(handoff.consume_if_present().unwrap().is_none());
    }

    #[test]
    fn test_recycle() {
        let handoff = Handoff::new();
        let recycled = layer();
        let recycled_ptr: *const _ = &*recycled;

        assert!(handoff.take_recycled().unwrap().is_none());
        handoff.recycle(recycled).unwrap();

        let taken = handoff.take_recycled().unwrap().unwrap();
        assert_eq!(&*taken as *const _, recycled_ptr);
        assert!(handoff.take_recycled().unwrap().is_none());
    }

    #[test]
    fn test_recycle_keeps_every_layer() {
        let handoff = Handoff::new();
        let first = layer();
        let second = layer();
        let first_ptr: *const _ = &*first;
        let second_ptr: *const _ = &*second;

        handoff.recycle(first).unwrap();
        handoff.recycle(second).unwrap();

        let last = handoff.take_recycled().unwrap().unwrap();
        let earlier = handoff.take_recycled().unwrap().unwrap();

        assert_eq!(&*last as *const _, second_ptr);
        assert_eq!(&*earlier as *const _, first_ptr);
        assert!(handoff.take_recycled().unwrap().is_none());
    }
}

//! Sparse cache of full-surface keyframe snapshots.

use image::RgbaImage;

/// Frames between keyframes.
pub const KEYFRAME_INTERVAL: usize = 16;

/// Memoized surface snapshots, one slot per `KEYFRAME_INTERVAL` frames.
///
/// Slot `k` holds the surface as it was immediately before frame
/// `k * KEYFRAME_INTERVAL` was applied. A filled slot is never replaced.
#[derive(Debug, Clone, Default)]
pub struct KeyframeCache {
    slots: Vec<Option<RgbaImage>>,
    captured: usize,
}

impl KeyframeCache {
    /// Empty cache with enough slots for `frame_count` frames.
    pub fn new(frame_count: usize) -> Self {
        Self {
            slots: vec![None; frame_count.div_ceil(KEYFRAME_INTERVAL)],
            captured: 0,
        }
    }

    /// Whether `frame` starts a keyframe slot.
    pub fn is_boundary(frame: usize) -> bool {
        frame % KEYFRAME_INTERVAL == 0
    }

    pub fn slot_for(frame: usize) -> usize {
        frame / KEYFRAME_INTERVAL
    }

    pub fn frame_for_slot(slot: usize) -> usize {
        slot * KEYFRAME_INTERVAL
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&RgbaImage> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn is_filled(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// Number of snapshots taken over the cache's lifetime.
    pub fn captured_count(&self) -> usize {
        self.captured
    }

    /// Store a snapshot for the slot starting at `frame` unless one exists.
    ///
    /// `snapshot` is only called when the slot is empty. Returns whether a
    /// snapshot was taken.
    pub fn capture_if_empty(&mut self, frame: usize, snapshot: impl FnOnce() -> RgbaImage) -> bool {
        if !Self::is_boundary(frame) {
            return false;
        }
        let Some(slot) = self.slots.get_mut(Self::slot_for(frame)) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(snapshot());
        self.captured += 1;
        true
    }

    /// Highest filled slot whose frame is at or before `target`.
    pub fn best_slot_for(&self, target: usize) -> Option<usize> {
        let last = Self::slot_for(target).min(self.slots.len().checked_sub(1)?);
        (0..=last).rev().find(|&slot| self.is_filled(slot))
    }
}

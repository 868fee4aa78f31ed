//! CarouselState: index and scroll position of an autoplay carousel

use super::types::{CarouselLayout, CarouselPhase};

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselState {
    pub total_items: usize,
    pub active_index: usize,
    /// Last offset reported by the host container.
    pub scroll_x: f32,
    pub phase: CarouselPhase,
    pub layout: CarouselLayout,
    pub leading_inset: f32,
}

impl CarouselState {
    pub fn new(total_items: usize, layout: CarouselLayout, leading_inset: f32) -> Self {
        Self {
            total_items,
            active_index: 0,
            scroll_x: 0.0,
            phase: CarouselPhase::Idle,
            layout,
            leading_inset,
        }
    }

    /// Leading edge of item `index` in content coordinates.
    pub fn item_offset(&self, index: usize) -> f32 {
        self.leading_inset + index as f32 * self.layout.stride()
    }

    /// Scroll offset that puts item `index` at the leading inset.
    pub fn scroll_target(&self, index: usize) -> f32 {
        (self.item_offset(index) - self.leading_inset).max(0.0)
    }

    /// Index of the item whose aligned position is closest to `scroll_x`.
    /// Ties go to the lower index.
    pub fn nearest_index(&self, scroll_x: f32) -> usize {
        let mut closest = 0;
        let mut closest_dist = f32::INFINITY;
        for i in 0..self.total_items {
            let dist = (self.item_offset(i) - self.leading_inset - scroll_x).abs();
            if dist < closest_dist {
                closest_dist = dist;
                closest = i;
            }
        }
        closest
    }

    /// Index after the active one, wrapping to the start.
    pub fn next_index(&self) -> usize {
        if self.total_items == 0 {
            return 0;
        }
        (self.active_index + 1) % self.total_items
    }
}

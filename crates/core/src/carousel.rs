//! Scroll state for horizontal preview strips (home page sections, packs).
//!
//! The strip scrolls either by arrow buttons, one item at a time, or by
//! dragging with the pointer held down. Both paths keep the offset within
//! `[0, max_offset]`, and a finished drag snaps to the nearest item.
//!
//! ```
//! use bookshelf_core::carousel::{Carousel, CarouselLayout};
//!
//! let mut strip = Carousel::new(12, CarouselLayout::for_viewport(1440.0));
//! strip.next();
//! assert_eq!(strip.index(), 1);
//! ```

/// Item geometry for a given viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselLayout {
    /// Width of one card in pixels.
    pub item_width: f64,
    /// Space between cards in pixels.
    pub gap: f64,
    /// Cards visible at once.
    pub visible_count: u32,
}

impl CarouselLayout {
    /// Layout for the viewport breakpoints: phones, tablets, laptops, desktops.
    #[must_use]
    pub fn for_viewport(width: f64) -> Self {
        let (item_width, gap, visible_count) = if width < 640.0 {
            (160.0, 12.0, 2)
        } else if width < 1024.0 {
            (180.0, 16.0, 3)
        } else if width < 1280.0 {
            (200.0, 20.0, 4)
        } else {
            (220.0, 24.0, 5)
        };

        Self {
            item_width,
            gap,
            visible_count,
        }
    }

    /// Distance scrolled by one button press. Never negative, even for a
    /// hand-built layout with a negative gap.
    #[must_use]
    pub fn step(&self) -> f64 {
        (self.item_width + self.gap).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    pointer_x: f64,
    offset: f64,
}

/// Scroll position of one strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    layout: CarouselLayout,
    item_count: u32,
    index: u32,
    offset: f64,
    drag: Option<DragOrigin>,
}

impl Carousel {
    /// A strip scrolled to the start.
    #[must_use]
    pub const fn new(item_count: u32, layout: CarouselLayout) -> Self {
        Self {
            layout,
            item_count,
            index: 0,
            offset: 0.0,
            drag: None,
        }
    }

    #[must_use]
    pub const fn layout(&self) -> CarouselLayout {
        self.layout
    }

    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Index of the first visible item.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Current scroll offset in pixels.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Last index that still fills the strip; 0 when everything fits.
    #[must_use]
    pub const fn max_index(&self) -> u32 {
        self.item_count.saturating_sub(self.layout.visible_count)
    }

    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (f64::from(self.max_index()) * self.layout.step()).max(0.0)
    }

    #[must_use]
    pub const fn can_prev(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub const fn can_next(&self) -> bool {
        self.index < self.max_index()
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Scroll one item forward. No-op at the end.
    pub fn next(&mut self) {
        self.go_to(self.index.saturating_add(1));
    }

    /// Scroll one item back. No-op at the start.
    pub fn prev(&mut self) {
        self.go_to(self.index.saturating_sub(1));
    }

    /// Jump to `index`, clamped to the valid range.
    pub fn go_to(&mut self, index: u32) {
        self.index = index.min(self.max_index());
        self.offset = f64::from(self.index) * self.layout.step();
    }

    /// Pointer pressed at horizontal position `x`.
    pub fn press(&mut self, x: f64) {
        self.drag = Some(DragOrigin {
            pointer_x: x,
            offset: self.offset,
        });
    }

    /// Pointer moved to `x`. Ignored unless pressed.
    ///
    /// Moving the pointer left scrolls the strip forward.
    pub fn drag_to(&mut self, x: f64) {
        if let Some(origin) = self.drag {
            let delta = x - origin.pointer_x;
            self.offset = (origin.offset - delta).clamp(0.0, self.max_offset());
        }
    }

    /// Pointer released; snap to the nearest item.
    pub fn release(&mut self) {
        if self.drag.take().is_some() {
            self.go_to(self.nearest_index());
        }
    }

    /// Replace the layout after a viewport resize, keeping the index when
    /// it is still valid.
    pub fn set_layout(&mut self, layout: CarouselLayout) {
        self.layout = layout;
        self.drag = None;
        self.go_to(self.index);
    }

    /// Replace the item count, e.g. after a section was edited.
    pub fn set_item_count(&mut self, item_count: u32) {
        self.item_count = item_count;
        self.go_to(self.index);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn nearest_index(&self) -> u32 {
        let step = self.layout.step();
        if step <= 0.0 {
            return 0;
        }
        // offset is clamped to [0, max_offset], so the quotient fits in u32
        (self.offset / step)
            .round()
            .clamp(0.0, f64::from(self.max_index())) as u32
    }
}

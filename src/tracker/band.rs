//! Viewport geometry and the detection band.
//!
//! All positions are pixels. Section boxes live in document coordinates,
//! the band lives in viewport coordinates; `Viewport::scroll_y` maps one to
//! the other.

use serde::{Deserialize, Serialize};

use crate::types::TopicId;

/// Default inset of the band from the top of the viewport.
pub const DEFAULT_TOP_INSET_PX: f64 = 100.0;

/// Default share of the viewport height cut from the bottom of the band.
pub const DEFAULT_BOTTOM_INSET_RATIO: f64 = 0.5;

/// Visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, height: f64) -> Self {
        Self {
            scroll_y: scroll_y.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn scrolled_to(self, scroll_y: f64) -> Self {
        Self::new(scroll_y, self.height)
    }
}

/// Rendered extent of one section, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBox {
    pub top: f64,
    pub height: f64,
}

impl SectionBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Resolves a topic id to its rendered section.
///
/// Returning `None` means the section is not (yet) rendered.
pub trait SectionLocator {
    fn locate(&self, id: &TopicId) -> Option<SectionBox>;
}

impl<F> SectionLocator for F
where
    F: Fn(&TopicId) -> Option<SectionBox>,
{
    fn locate(&self, id: &TopicId) -> Option<SectionBox> {
        self(id)
    }
}

/// Vertical region of the viewport in which a section counts as current.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub top_inset_px: f64,
    pub bottom_inset_ratio: f64,
}

impl Default for Band {
    fn default() -> Self {
        Self {
            top_inset_px: DEFAULT_TOP_INSET_PX,
            bottom_inset_ratio: DEFAULT_BOTTOM_INSET_RATIO,
        }
    }
}

impl Band {
    pub fn new(top_inset_px: f64, bottom_inset_ratio: f64) -> Self {
        Self {
            top_inset_px: top_inset_px.max(0.0),
            bottom_inset_ratio: bottom_inset_ratio.clamp(0.0, 1.0),
        }
    }

    /// Band bounds `(start, end)` in viewport coordinates.
    pub fn region(&self, viewport_height: f64) -> (f64, f64) {
        let start = self.top_inset_px;
        let end = viewport_height * (1.0 - self.bottom_inset_ratio);
        (start, end)
    }

    /// Whether `section` overlaps the band at the given scroll position.
    ///
    /// An empty band (start >= end) intersects nothing.
    pub fn intersects(&self, section: SectionBox, viewport: Viewport) -> bool {
        let (start, end) = self.region(viewport.height);
        if start >= end {
            return false;
        }
        let top = section.top - viewport.scroll_y;
        let bottom = section.bottom() - viewport.scroll_y;
        top < end && bottom > start
    }
}

//! Section boxes for a vertically stacked page.

use indexmap::IndexMap;

use super::TextRenderer;
use crate::config::ScrollConfig;
use crate::page::TopicPage;
use crate::tracker::{SectionBox, SectionLocator};
use crate::types::TopicId;

/// Sections laid out top to bottom, keyed by their anchor id.
#[derive(Debug, Clone, Default)]
pub struct StackedLayout {
    boxes: IndexMap<TopicId, SectionBox>,
    document_height: f64,
}

impl StackedLayout {
    /// Stack sections of the given heights starting at `start`, `gap` apart.
    pub fn from_heights(
        start: f64,
        gap: f64,
        sections: impl IntoIterator<Item = (TopicId, f64)>,
    ) -> Self {
        let mut boxes = IndexMap::new();
        let mut cursor = start;
        for (id, height) in sections {
            if !boxes.is_empty() {
                cursor += gap;
            }
            let section = SectionBox::new(cursor, height);
            cursor = section.bottom();
            boxes.insert(id, section);
        }
        Self {
            boxes,
            document_height: cursor,
        }
    }

    /// Layout of the page as the text renderer would draw it.
    pub fn for_page(page: &TopicPage, scroll: &ScrollConfig) -> Self {
        let renderer = TextRenderer::plain(scroll.text_width);
        let line = scroll.line_height_px;
        let header = renderer.header_lines(page).len() as f64 * line;

        let sections = page.sections().into_iter().map(|section| {
            let height = renderer.section_lines(&section).len() as f64 * line;
            (section.topic.id.clone(), height)
        });
        Self::from_heights(
            scroll.chrome_height_px + header,
            scroll.section_gap_px,
            sections,
        )
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll(&self, viewport_height: f64) -> f64 {
        (self.document_height - viewport_height).max(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TopicId, &SectionBox)> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl SectionLocator for StackedLayout {
    fn locate(&self, id: &TopicId) -> Option<SectionBox> {
        self.boxes.get(id).copied()
    }
}

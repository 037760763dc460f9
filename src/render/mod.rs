//! Text rendering of a topic page.
//!
//! This is the section renderer: every section it emits is anchored on the
//! topic id, and [`StackedLayout`] derives section boxes from the same line
//! counts so the tracker sees what the reader sees.

mod layout;
mod theme;

pub use layout::StackedLayout;
pub use theme::Theme;

use console::style;
use unicode_width::UnicodeWidthStr;

use crate::navigator::Chip;
use crate::page::{SectionView, TopicPage};
use crate::types::Difficulty;

/// Renders pages as lines of text, optionally coloured.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    pub width: usize,
    pub colors: bool,
}

impl TextRenderer {
    pub fn new(width: usize, colors: bool) -> Self {
        Self {
            width: width.max(20),
            colors,
        }
    }

    /// Plain renderer, used for measuring.
    pub fn plain(width: usize) -> Self {
        Self::new(width, false)
    }

    /// Everything above the first section: breadcrumbs, header, stats,
    /// search box, chips and the divider.
    pub fn header_lines(&self, page: &TopicPage) -> Vec<String> {
        let entry = page.entry();
        let mut lines = Vec::new();

        let crumbs: Vec<String> = page.breadcrumbs().into_iter().map(|c| c.label).collect();
        lines.push(self.dim(&crumbs.join(" › ")));
        lines.push(String::new());

        lines.push(self.heading(&entry.title));
        lines.push(self.dim("Interview Topics"));
        lines.extend(wrap(&entry.description, self.width));
        lines.push(String::new());

        let counts = page.counts();
        let mut stats = format!("{} Topics", counts.total);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let dot = self.difficulty("●", difficulty);
            stats.push_str(&format!(
                "  {dot} {} {}",
                counts.get(difficulty),
                difficulty.stats_label()
            ));
        }
        lines.push(stats);
        lines.push(String::new());

        let search = if page.query().is_empty() {
            self.dim(&page.search_placeholder())
        } else {
            format!("{}  [x]", page.query())
        };
        lines.push(format!("Search: {search}"));
        lines.push(String::new());

        let chips = page.chips();
        let tokens: Vec<String> = chips
            .iter()
            .map(|chip| {
                if chip.active {
                    self.active(&format!("[{}]", chip.label))
                } else {
                    self.difficulty(&format!("[{}]", chip.label), chip.difficulty)
                }
            })
            .collect();
        if !chips.is_empty() {
            lines.extend(wrap_tokens(&tokens, &chips, self.width));
            lines.push(String::new());
        }

        lines.push(self.dim(&divider("Questions & Answers", self.width)));
        lines.push(String::new());
        lines
    }

    /// One question section. The first line carries the anchor marker.
    pub fn section_lines(&self, section: &SectionView<'_>) -> Vec<String> {
        let topic = section.topic;
        let mut lines = Vec::new();

        let marker = if section.is_active { "▌" } else { " " };
        let title = format!("Q{}. {}", section.number, topic.name);
        let badge = format!("[{}]", topic.difficulty);
        let title = if section.is_active {
            self.active(&title)
        } else {
            self.bold(&title)
        };
        lines.push(format!(
            "{marker}{title}  {}  #{}",
            self.difficulty(&badge, topic.difficulty),
            self.dim(topic.id.as_str())
        ));

        for line in wrap(&topic.description, self.width.saturating_sub(2)) {
            lines.push(format!("  {line}"));
        }

        if !topic.bullet_points.is_empty() {
            lines.push(String::new());
            for point in &topic.bullet_points {
                let mut wrapped = wrap(point, self.width.saturating_sub(4)).into_iter();
                if let Some(first) = wrapped.next() {
                    lines.push(format!("  • {first}"));
                }
                for rest in wrapped {
                    lines.push(format!("    {rest}"));
                }
            }
        }

        if let Some(code) = &topic.code_example {
            lines.push(String::new());
            lines.push(format!("  ┌ {}", self.dim("Example")));
            for code_line in code.lines() {
                lines.push(format!("  │ {code_line}"));
            }
            lines.push("  └".to_string());
        }

        lines.push(String::new());
        lines
    }

    /// Full page, or the empty state when nothing matches.
    pub fn render(&self, page: &TopicPage) -> String {
        let mut lines = self.header_lines(page);
        if let Some(message) = page.empty_message() {
            lines.push(self.bold("No topics found"));
            lines.push(message);
        } else {
            for section in page.sections() {
                lines.extend(self.section_lines(&section));
            }
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn heading(&self, text: &str) -> String {
        if self.colors {
            Theme::heading(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.colors {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.colors {
            style(text).dim().to_string()
        } else {
            text.to_string()
        }
    }

    fn active(&self, text: &str) -> String {
        if self.colors {
            style(text).reverse().bold().to_string()
        } else {
            format!("{text}*")
        }
    }

    fn difficulty(&self, text: &str, difficulty: Difficulty) -> String {
        if self.colors {
            Theme::difficulty_style(difficulty)
                .apply_to(text)
                .to_string()
        } else {
            text.to_string()
        }
    }
}

/// Greedy word wrap on display columns. Words wider than `width` get a line
/// of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.width();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay out styled chip tokens in rows, measuring with the plain labels.
fn wrap_tokens(styled: &[String], chips: &[Chip], width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_len = 0usize;

    for (token, chip) in styled.iter().zip(chips) {
        // Measured without the active marker so rows do not reflow on highlight.
        let len = chip.label.width() + 2;
        if row_len > 0 && row_len + 1 + len > width {
            rows.push(std::mem::take(&mut row));
            row_len = 0;
        }
        if row_len > 0 {
            row.push(' ');
            row_len += 1;
        }
        row.push_str(token);
        row_len += len;
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

fn divider(label: &str, width: usize) -> String {
    let label_len = label.width() + 2;
    let side = width.saturating_sub(label_len) / 2;
    format!("{} {label} {}", "─".repeat(side), "─".repeat(side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRegistry;
    use crate::config::ScrollConfig;
    use crate::navigator::Activation;
    use crate::types::{Topic, TopicId};

    fn page(key: &str) -> TopicPage {
        let registry = CatalogRegistry::builtin().unwrap();
        TopicPage::open(registry.resolve(Some(key)).clone(), &ScrollConfig::default())
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a bb ccc dddd", 6), vec!["a bb", "ccc", "dddd"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }

    #[test]
    fn test_wrap_measures_wide_characters_in_columns() {
        let text = "闭包是函数 与其词法 作用域的 组合体现 在回调中 常见用法";
        let lines = wrap(text, 20);
        assert!(lines.iter().all(|line| line.width() <= 20), "{lines:?}");
        assert_eq!(
            lines,
            vec!["闭包是函数 与其词法", "作用域的 组合体现", "在回调中 常见用法"]
        );
    }

    #[test]
    fn test_divider_fits_width() {
        assert_eq!(divider("問答", 12).width(), 12);
        assert_eq!(divider("Q&A", 11).width(), 11);
    }

    #[test]
    fn test_section_lines_wrap_bullets_and_frame_code() {
        let topic = Topic::new(
            "js-closures",
            "Closures",
            "JavaScript",
            Difficulty::Medium,
            "A closure keeps its scope.",
        )
        .with_bullets(["Closures allow data encapsulation and privacy across calls"])
        .with_code("let count = 0;\nreturn () => ++count;");
        let section = SectionView {
            number: 1,
            topic: &topic,
            is_active: false,
        };

        let lines = TextRenderer::plain(30).section_lines(&section);
        assert_eq!(
            lines,
            vec![
                " Q1. Closures  [medium]  #js-closures",
                "  A closure keeps its scope.",
                "",
                "  • Closures allow data",
                "    encapsulation and privacy",
                "    across calls",
                "",
                "  ┌ Example",
                "  │ let count = 0;",
                "  │ return () => ++count;",
                "  └",
                "",
            ]
        );
    }

    #[test]
    fn test_render_plain_page() {
        let page = page("sql");
        let text = TextRenderer::plain(80).render(&page);
        assert!(text.starts_with("Topics › Databases › SQL\n"));
        assert!(text.contains("Search: Search SQL topics..."));
        assert!(text.contains("Q1. SQL Joins"));
        assert!(text.contains("#sql-joins"));
        assert!(text.contains("Questions & Answers"));
    }

    #[test]
    fn test_render_marks_active_chip_and_section() {
        let mut page = page("javascript");
        let layout = StackedLayout::for_page(&page, &ScrollConfig::default());
        page.click_chip(&TopicId::from("js-hoisting"), Activation::Click, &layout);

        let text = TextRenderer::plain(100).render(&page);
        assert!(text.contains("[Hoisting]*"));
        assert!(text.contains("▌Q2. Hoisting*"));
        assert!(!text.contains("[Event Loop]*"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut page = page("react");
        page.set_query("kubernetes");
        let text = TextRenderer::plain(80).render(&page);
        assert!(text.contains("No topics found"));
        assert!(text.contains("No results for \"kubernetes\". Try a different search term."));
        assert!(text.contains("0 Topics"));
    }
}

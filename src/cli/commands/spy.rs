//! Spy command - replay a scroll session and trace the active topic.
//!
//! The page is laid out with [`StackedLayout`], chip clicks are replayed
//! first, then the viewport walks from the top of the document to the
//! bottom. Every change of the active id is recorded with its scroll offset.

use console::style;
use serde::Serialize;
use std::time::Instant;

use crate::config::{ScrollConfig, Settings};
use crate::error::DeckResult;
use crate::io::{self, EntityType, Envelope, ExitCode, OutputFormat};
use crate::navigator::Activation;
use crate::page::TopicPage;
use crate::render::{StackedLayout, Theme};
use crate::tracker::SectionLocator;
use crate::types::TopicId;

pub struct SpyArgs<'a> {
    pub target: Option<&'a str>,
    pub query: Option<&'a str>,
    pub step: f64,
    pub clicks: &'a [String],
    pub height: Option<f64>,
    pub debounce_ms: Option<u64>,
    pub json: bool,
}

/// What moved the page before a trace step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepCause {
    /// Initial subscription after layout
    Render,
    /// Chip click, before its scroll
    Click,
    /// Viewport moved
    Scroll,
    /// Debounced candidate committed
    Flush,
}

impl StepCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Click => "click",
            Self::Scroll => "scroll",
            Self::Flush => "flush",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub cause: StepCause,
    pub scroll_y: f64,
    pub active: Option<TopicId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrollTrace {
    pub catalog: String,
    pub query: String,
    pub viewport_height: f64,
    pub document_height: f64,
    /// Detection band in viewport coordinates
    pub band: (f64, f64),
    pub sections: usize,
    pub steps: Vec<TraceStep>,
}

struct Recorder {
    steps: Vec<TraceStep>,
    last: Option<TopicId>,
}

impl Recorder {
    fn record(&mut self, cause: StepCause, page: &TopicPage, force: bool) {
        let active = page.active_id().cloned();
        if force || active != self.last {
            self.last = active.clone();
            self.steps.push(TraceStep {
                cause,
                scroll_y: page.viewport().scroll_y,
                active,
            });
        }
    }
}

/// Replay a session on `page`. Steps are recorded only when the active id
/// changes, plus one step for the initial render and one per click. The
/// session ends once the tracker's debounce window has passed.
pub fn replay<L>(
    page: &mut TopicPage,
    layout: &L,
    max_scroll: f64,
    step: f64,
    clicks: &[TopicId],
) -> Vec<TraceStep>
where
    L: SectionLocator + ?Sized,
{
    page.after_render(layout);
    let mut recorder = Recorder {
        steps: Vec::new(),
        last: None,
    };
    recorder.record(StepCause::Render, page, true);

    for id in clicks {
        let command = page.click_chip(id, Activation::Click, layout);
        recorder.record(StepCause::Click, page, true);
        if let Some(command) = command {
            page.scroll_to(command.to_y.min(max_scroll), layout);
            recorder.record(StepCause::Scroll, page, false);
        }
    }

    let step = if step > 0.0 { step } else { max_scroll.max(1.0) };
    let mut scroll_y = 0.0;
    loop {
        page.scroll_to(scroll_y, layout);
        recorder.record(StepCause::Scroll, page, false);
        page.flush();
        recorder.record(StepCause::Flush, page, false);
        if scroll_y >= max_scroll {
            break;
        }
        scroll_y = (scroll_y + step).min(max_scroll);
    }

    let settle = page.tracker().debounce_window();
    page.flush_at(Instant::now() + settle);
    recorder.record(StepCause::Flush, page, false);
    recorder.steps
}

pub fn run(args: SpyArgs<'_>, settings: &Settings) -> ExitCode {
    let format = OutputFormat::from_json_flag(args.json);
    super::finish(execute(&args, format, settings), format)
}

fn scroll_config(args: &SpyArgs<'_>, settings: &Settings) -> ScrollConfig {
    let mut scroll = settings.scroll.clone();
    if let Some(height) = args.height {
        scroll.viewport_height = height;
    }
    if let Some(debounce_ms) = args.debounce_ms {
        scroll.debounce_ms = debounce_ms;
    }
    scroll
}

fn execute(args: &SpyArgs<'_>, format: OutputFormat, settings: &Settings) -> DeckResult<ExitCode> {
    let registry = super::load_registry(settings)?;
    let entry = match args.target {
        Some(target) => registry.resolve_target(target)?,
        None => registry.default_entry(),
    };
    let scroll = scroll_config(args, settings);

    let mut page = TopicPage::open(entry.clone(), &scroll);
    if let Some(query) = args.query {
        page.set_query(query);
    }
    let layout = StackedLayout::for_page(&page, &scroll);
    let max_scroll = layout.max_scroll(scroll.viewport_height);
    let clicks: Vec<TopicId> = args.clicks.iter().map(|c| TopicId::from(c.as_str())).collect();

    let steps = replay(&mut page, &layout, max_scroll, args.step, &clicks);
    page.unmount();

    let trace = ScrollTrace {
        catalog: entry.key.clone(),
        query: page.query().to_string(),
        viewport_height: scroll.viewport_height,
        document_height: layout.document_height(),
        band: scroll.band().region(scroll.viewport_height),
        sections: layout.len(),
        steps,
    };
    crate::log_event!(
        "spy",
        "replayed",
        "{}: {} steps over {}px",
        trace.catalog,
        trace.steps.len(),
        trace.document_height
    );

    if format.is_json() {
        let count = trace.steps.len();
        let envelope = if page.is_empty() {
            Envelope::not_found(trace, page.empty_message().unwrap_or_default())
        } else {
            Envelope::success(trace).with_message(format!("{count} trace steps"))
        };
        let envelope = envelope
            .with_entity_type(EntityType::ScrollTrace)
            .with_count(count)
            .with_catalog(entry.key.clone())
            .with_query(page.query());
        return Ok(io::emit(&envelope));
    }

    print_trace(&trace, &page);
    if page.is_empty() {
        Ok(ExitCode::NotFound)
    } else {
        Ok(ExitCode::Success)
    }
}

fn print_trace(trace: &ScrollTrace, page: &TopicPage) {
    let colors = !Theme::should_disable_colors();
    let (band_start, band_end) = trace.band;
    println!(
        "{} ({} sections, document {:.0}px, viewport {:.0}px, band {:.0}..{:.0}px)",
        page.entry().title,
        trace.sections,
        trace.document_height,
        trace.viewport_height,
        band_start,
        band_end
    );
    if let Some(message) = page.empty_message() {
        println!("{message}");
        return;
    }

    for step in &trace.steps {
        let cause = format!("{:<6}", step.cause.as_str());
        let (id, name) = match &step.active {
            Some(id) => {
                let name = page
                    .filtered()
                    .find(|t| &t.id == id)
                    .map(|t| t.name.as_str())
                    .unwrap_or_default();
                (id.to_string(), name)
            }
            None => ("-".to_string(), ""),
        };
        if colors {
            println!(
                "{:>8.0}px  {}  {}  {}",
                step.scroll_y,
                style(cause).dim(),
                style(id).cyan(),
                name
            );
        } else {
            println!("{:>8.0}px  {cause}  {id}  {name}", step.scroll_y);
        }
    }
}

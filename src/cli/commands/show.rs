//! Show command - render a topic page.

use crate::config::Settings;
use crate::error::DeckResult;
use crate::io::{self, EntityType, Envelope, ExitCode, OutputFormat};
use crate::navigator::Activation;
use crate::page::{PageSnapshot, TopicPage};
use crate::render::{StackedLayout, TextRenderer, Theme};
use crate::types::TopicId;

pub struct ShowArgs<'a> {
    pub target: Option<&'a str>,
    pub query: Option<&'a str>,
    pub active: Option<&'a str>,
    pub width: Option<usize>,
    pub json: bool,
}

pub fn run(args: ShowArgs<'_>, settings: &Settings) -> ExitCode {
    let format = OutputFormat::from_json_flag(args.json);
    super::finish(execute(&args, format, settings), format)
}

fn execute(args: &ShowArgs<'_>, format: OutputFormat, settings: &Settings) -> DeckResult<ExitCode> {
    let registry = super::load_registry(settings)?;
    let entry = match args.target {
        Some(target) => registry.resolve_target(target)?,
        None => registry.default_entry(),
    };

    let mut scroll = settings.scroll.clone();
    if let Some(width) = args.width {
        scroll.text_width = width;
    }

    let mut page = TopicPage::open(entry.clone(), &scroll);
    if let Some(query) = args.query {
        page.set_query(query);
    }
    let layout = StackedLayout::for_page(&page, &scroll);
    page.after_render(&layout);

    // The whole page is printed, so the click's scroll command is not replayed.
    if let Some(active) = args.active {
        let id = TopicId::from(active);
        if page.click_chip(&id, Activation::Click, &layout).is_none() && !page.contains(&id) {
            eprintln!("Warning: no chip '{active}' on this page");
        }
    }

    // Output only reads the page, so the session ends before printing.
    page.unmount();

    if format.is_json() {
        return Ok(io::emit(&page_envelope(&page)));
    }

    let renderer = TextRenderer::new(scroll.text_width, !Theme::should_disable_colors());
    print!("{}", renderer.render(&page));

    if page.is_empty() {
        Ok(ExitCode::NotFound)
    } else {
        Ok(ExitCode::Success)
    }
}

fn page_envelope(page: &TopicPage) -> Envelope<PageSnapshot> {
    let snapshot = page.snapshot();
    let count = snapshot.sections.len();
    let envelope = match page.empty_message() {
        Some(message) => Envelope::not_found(snapshot, message),
        None => Envelope::success(snapshot).with_message(format!("{} page", page.entry().title)),
    };
    envelope
        .with_entity_type(EntityType::Page)
        .with_count(count)
        .with_catalog(page.entry().key.clone())
        .with_query(page.query())
}

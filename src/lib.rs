pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod logging;
pub mod navigator;
pub mod page;
pub mod render;
pub mod tracker;
pub mod types;

pub use catalog::{CatalogEntry, CatalogError, CatalogRegistry, RouteError, TopicRoute};
pub use config::Settings;
pub use error::{DeckError, DeckResult};
pub use navigator::{Activation, Chip, NavigationRequest};
pub use page::{PageSnapshot, ScrollCommand, TopicPage};
pub use render::{StackedLayout, TextRenderer};
pub use tracker::{Band, IntersectionEvent, ScrollSyncTracker, SectionBox, SectionLocator, Viewport};
pub use types::{Difficulty, DifficultyCounts, Topic, TopicId};

//! Topic chips and chip activation.
//!
//! The navigator is stateless: it reads the filtered view and the active id
//! and turns an activation into a [`NavigationRequest`]. Executing the
//! request (highlight now, then scroll) is up to the page.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Difficulty, Topic, TopicId};

/// One clickable token in the chip row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub id: TopicId,
    pub label: String,
    pub difficulty: Difficulty,
    pub active: bool,
}

/// How a chip was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Click,
    Tap,
    Enter,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Click => "click",
            Self::Tap => "tap",
            Self::Enter => "enter",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
}

/// Which edge of the section lines up with the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAlign {
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub target: TopicId,
    pub behavior: ScrollBehavior,
    pub align: ScrollAlign,
    pub activation: Activation,
}

/// Chips for `filtered`, with at most one marked active.
///
/// An `active` id that is not in `filtered` highlights nothing.
pub fn chips<'a>(
    filtered: impl IntoIterator<Item = &'a Topic>,
    active: Option<&TopicId>,
) -> Vec<Chip> {
    filtered
        .into_iter()
        .map(|topic| Chip {
            id: topic.id.clone(),
            label: topic.name.clone(),
            difficulty: topic.difficulty,
            active: active == Some(&topic.id),
        })
        .collect()
}

/// Turn an activation of chip `id` into a navigation request.
///
/// Returns `None` when no chip with that id is rendered.
pub fn activate<'a>(
    filtered: impl IntoIterator<Item = &'a Topic>,
    id: &TopicId,
    activation: Activation,
) -> Option<NavigationRequest> {
    let topic = filtered.into_iter().find(|t| &t.id == id)?;
    Some(NavigationRequest {
        target: topic.id.clone(),
        behavior: ScrollBehavior::Smooth,
        align: ScrollAlign::Start,
        activation,
    })
}

use serde::{Deserialize, Serialize};

/// A single to-do entry. This is exactly the persisted shape:
/// `{"id": string, "title": string, "completed": boolean}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique identifier, assigned at creation and never changed
    pub id: String,
    /// Display text, always trimmed and non-empty
    pub title: String,
    pub completed: bool,
}

impl Task {
    /// Create an open task. Callers are responsible for trimming the title.
    pub fn new(id: String, title: String) -> Self {
        Task {
            id,
            title,
            completed: false,
        }
    }
}

/// Which tasks the list view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Tab order in the UI
    pub const TABS: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "ALL",
            Filter::Active => "ACTIVE",
            Filter::Completed => "COMPLETED",
        }
    }

    /// Lowercase name, as accepted by [`Filter::parse_filter`]
    pub fn name(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    /// Parse a filter name, case-insensitively
    pub fn parse_filter(s: &str) -> Option<Filter> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Some(Filter::All),
            "active" => Some(Filter::Active),
            "completed" | "done" => Some(Filter::Completed),
            _ => None,
        }
    }

    /// Whether a task passes this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    /// Next tab, wrapping around
    pub fn next(self) -> Filter {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }

    /// Previous tab, wrapping around
    pub fn prev(self) -> Filter {
        match self {
            Filter::All => Filter::Completed,
            Filter::Active => Filter::All,
            Filter::Completed => Filter::Active,
        }
    }
}

/// Completion summary over the whole collection (ignores the active filter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    /// Rounded to the nearest integer, ties away from zero. 0 when empty.
    pub percentage: u8,
}

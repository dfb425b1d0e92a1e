//! The live document as the Inspector sees it.
//!
//! Elements are never owned: an [`ElementRef`] is a handle the document hands
//! out for a lookup and may go stale as soon as the page mutates.

use async_trait::async_trait;
use std::fmt;

/// Opaque handle to an element resolved from a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(pub u64);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Visual markers the overlay draws. Both may sit on the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    /// Persistent outline on every element with a finding.
    Flagged,
    /// Exclusive outline on the finding currently inspected.
    Selected,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Flagged => "flagged",
            Marker::Selected => "selected",
        }
    }
}

/// `scrollIntoView` arguments, as the DOM spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: &'static str,
    pub block: &'static str,
}

impl ScrollOptions {
    pub fn smooth_center() -> Self {
        Self {
            behavior: "smooth",
            block: "center",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("Invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Element {0} is no longer in the document")]
    Stale(ElementRef),

    /// The document context itself is gone or unreachable.
    #[error("Document unavailable: {0}")]
    Context(String),
}

impl DocumentError {
    /// True for failures scoped to a single selector or element.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            DocumentError::InvalidSelector { .. } | DocumentError::Stale(_)
        )
    }
}

#[async_trait]
pub trait Document: Send + Sync {
    /// Every element matching `selector`, in document order. May be empty.
    async fn query_all(&mut self, selector: &str) -> Result<Vec<ElementRef>, DocumentError>;

    async fn add_marker(&mut self, element: ElementRef, marker: Marker)
    -> Result<(), DocumentError>;

    async fn remove_marker(
        &mut self,
        element: ElementRef,
        marker: Marker,
    ) -> Result<(), DocumentError>;

    async fn set_tooltip(&mut self, element: ElementRef, text: &str) -> Result<(), DocumentError>;

    async fn scroll_into_view(
        &mut self,
        element: ElementRef,
        options: ScrollOptions,
    ) -> Result<(), DocumentError>;
}

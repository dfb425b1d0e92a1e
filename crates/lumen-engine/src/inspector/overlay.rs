use super::document::{Document, DocumentError, ElementRef, Marker, ScrollOptions};
use lumen_common::model::ElementFinding;
use tracing::debug;

/// Which element holds the selected marker. At most one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    current: Option<ElementRef>,
}

impl SelectionState {
    pub fn current(&self) -> Option<ElementRef> {
        self.current
    }
}

/// Draws flagged and selected markers on a [`Document`].
#[derive(Debug, Default)]
pub struct HighlightOverlay {
    selection: SelectionState,
}

impl HighlightOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Forget the selection. Used when the document goes away.
    pub fn reset(&mut self) {
        self.selection = SelectionState::default();
    }

    /// Flag every element matching `selector` and attach `tooltip`.
    ///
    /// Returns the number of elements marked. Unresolvable selectors and
    /// elements that vanish mid-call are skipped; only a lost document fails.
    pub async fn mark_flagged<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        selector: &str,
        tooltip: &str,
    ) -> Result<usize, DocumentError> {
        let elements = match resolve(document, selector).await? {
            Some(elements) => elements,
            None => return Ok(0),
        };

        let mut marked = 0;
        for element in elements {
            let applied = async {
                document.add_marker(element, Marker::Flagged).await?;
                document.set_tooltip(element, tooltip).await
            }
            .await;
            match applied {
                Ok(()) => marked += 1,
                Err(e) if e.is_local() => debug!("Skipping {} for {}: {}", element, selector, e),
                Err(e) => return Err(e),
            }
        }
        Ok(marked)
    }

    /// Flag the elements of one finding with its tooltip.
    pub async fn mark_finding<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        finding: &ElementFinding,
    ) -> Result<usize, DocumentError> {
        self.mark_flagged(document, &finding.selector, &finding.tooltip())
            .await
    }

    /// Move the selected marker to the first match of `selector`.
    ///
    /// Returns the newly selected element, or `None` when nothing matched, in
    /// which case the previous selection is left in place.
    pub async fn select<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        selector: &str,
    ) -> Result<Option<ElementRef>, DocumentError> {
        let target = match resolve(document, selector).await? {
            Some(elements) => match elements.first() {
                Some(first) => *first,
                None => return Ok(None),
            },
            None => return Ok(None),
        };

        // Mark first so an unselectable target leaves the old selection in place.
        match document.add_marker(target, Marker::Selected).await {
            Ok(()) => {}
            Err(e) if e.is_local() => {
                debug!("{} vanished before it could be selected", target);
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        if let Some(previous) = self.selection.current.filter(|p| *p != target) {
            match document.remove_marker(previous, Marker::Selected).await {
                Ok(()) => {}
                Err(e) if e.is_local() => debug!("Previous selection {} already gone", previous),
                Err(e) => return Err(e),
            }
        }
        self.selection.current = Some(target);

        match document
            .scroll_into_view(target, ScrollOptions::smooth_center())
            .await
        {
            Err(e) if !e.is_local() => Err(e),
            _ => Ok(Some(target)),
        }
    }
}

/// `None` for selectors the document rejects.
async fn resolve<D: Document + ?Sized>(
    document: &mut D,
    selector: &str,
) -> Result<Option<Vec<ElementRef>>, DocumentError> {
    match document.query_all(selector).await {
        Ok(elements) => {
            if elements.is_empty() {
                debug!("Selector matched nothing: {}", selector);
            }
            Ok(Some(elements))
        }
        Err(e) if e.is_local() => {
            debug!("Selector could not be resolved: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

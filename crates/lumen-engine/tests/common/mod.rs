#![allow(dead_code)]

use async_trait::async_trait;
use lumen_engine::backend::{Backend, BackendError, NavigationResult};
use lumen_engine::engine::{EngineResults, RunConfig};
use lumen_engine::inspector::{
    AccessibilityEngine, Document, DocumentError, ElementRef, EngineError, Inspector, Marker,
    ScrollOptions,
};
use lumen_engine::protocol::{DocumentSession, InspectorAction, InspectorResponse, TargetInfo};
use serde_json::json;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory document: selectors map to fixed element lists.
#[derive(Debug, Default)]
pub struct FakeDocument {
    next_ref: u64,
    selectors: HashMap<String, Vec<ElementRef>>,
    invalid: HashSet<String>,
    removed: HashSet<ElementRef>,
    detached: HashSet<ElementRef>,
    pub markers: HashMap<ElementRef, BTreeSet<Marker>>,
    pub tooltips: HashMap<ElementRef, String>,
    pub scrolls: Vec<(ElementRef, ScrollOptions)>,
    pub lost: bool,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `count` elements matched by `selector`.
    pub fn with(mut self, selector: &str, count: usize) -> Self {
        let refs = (0..count)
            .map(|_| {
                self.next_ref += 1;
                ElementRef(self.next_ref)
            })
            .collect();
        self.selectors.insert(selector.to_string(), refs);
        self
    }

    pub fn with_invalid(mut self, selector: &str) -> Self {
        self.invalid.insert(selector.to_string());
        self
    }

    pub fn elements(&self, selector: &str) -> Vec<ElementRef> {
        self.selectors.get(selector).cloned().unwrap_or_default()
    }

    pub fn remove(&mut self, element: ElementRef) {
        self.removed.insert(element);
    }

    /// Still matched by its selector, but gone by the time it is touched.
    pub fn detach(&mut self, element: ElementRef) {
        self.detached.insert(element);
    }

    pub fn has_marker(&self, element: ElementRef, marker: Marker) -> bool {
        self.markers
            .get(&element)
            .is_some_and(|set| set.contains(&marker))
    }

    pub fn with_marker(&self, marker: Marker) -> Vec<ElementRef> {
        let mut found: Vec<ElementRef> = self
            .markers
            .iter()
            .filter(|(_, set)| set.contains(&marker))
            .map(|(el, _)| *el)
            .collect();
        found.sort();
        found
    }

    fn check(&self, element: ElementRef) -> Result<(), DocumentError> {
        if self.lost {
            return Err(DocumentError::Context("Execution context was destroyed".into()));
        }
        if self.removed.contains(&element) || self.detached.contains(&element) {
            return Err(DocumentError::Stale(element));
        }
        Ok(())
    }
}

#[async_trait]
impl Document for FakeDocument {
    async fn query_all(&mut self, selector: &str) -> Result<Vec<ElementRef>, DocumentError> {
        if self.lost {
            return Err(DocumentError::Context("Execution context was destroyed".into()));
        }
        if self.invalid.contains(selector) {
            return Err(DocumentError::InvalidSelector {
                selector: selector.to_string(),
                reason: "not a valid selector".into(),
            });
        }
        Ok(self
            .elements(selector)
            .into_iter()
            .filter(|el| !self.removed.contains(el))
            .collect())
    }

    async fn add_marker(
        &mut self,
        element: ElementRef,
        marker: Marker,
    ) -> Result<(), DocumentError> {
        self.check(element)?;
        self.markers.entry(element).or_default().insert(marker);
        Ok(())
    }

    async fn remove_marker(
        &mut self,
        element: ElementRef,
        marker: Marker,
    ) -> Result<(), DocumentError> {
        self.check(element)?;
        if let Some(set) = self.markers.get_mut(&element) {
            set.remove(&marker);
        }
        Ok(())
    }

    async fn set_tooltip(&mut self, element: ElementRef, text: &str) -> Result<(), DocumentError> {
        self.check(element)?;
        self.tooltips.insert(element, text.to_string());
        Ok(())
    }

    async fn scroll_into_view(
        &mut self,
        element: ElementRef,
        options: ScrollOptions,
    ) -> Result<(), DocumentError> {
        self.check(element)?;
        self.scrolls.push((element, options));
        Ok(())
    }
}

/// Engine stub returning canned results and counting calls.
pub struct FakeEngine {
    pub results: Result<EngineResults, EngineError>,
    pub runs: Arc<AtomicUsize>,
    pub injections: Arc<AtomicUsize>,
    pub configs: Arc<Mutex<Vec<RunConfig>>>,
}

impl FakeEngine {
    pub fn returning(results: EngineResults) -> Self {
        Self {
            results: Ok(results),
            runs: Arc::default(),
            injections: Arc::default(),
            configs: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            results: Err(EngineError::Run(message.to_string())),
            ..Self::returning(EngineResults::default())
        }
    }

    /// The page goes away while the engine runs.
    pub fn losing_context(message: &str) -> Self {
        Self {
            results: Err(EngineError::Context(message.to_string())),
            ..Self::returning(EngineResults::default())
        }
    }

    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn injection_count(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessibilityEngine for FakeEngine {
    async fn inject(&mut self) -> Result<(), EngineError> {
        self.injections.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn run(&mut self, config: &RunConfig) -> Result<EngineResults, EngineError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut configs) = self.configs.lock() {
            configs.push(config.clone());
        }
        self.results.clone()
    }
}

/// Backend hosting an Inspector in-process. Every call crosses a JSON boundary.
pub struct LocalBackend {
    pub inspector: Option<Inspector<FakeEngine, FakeDocument>>,
    pub calls: Vec<String>,
    pub fail_next: Option<BackendError>,
    next_session: u64,
}

impl LocalBackend {
    pub fn new(engine: FakeEngine, document: FakeDocument) -> Self {
        Self {
            inspector: Some(Inspector::new(DocumentSession(1), engine, document)),
            calls: Vec::new(),
            fail_next: None,
            next_session: 1,
        }
    }

    pub fn without_target() -> Self {
        Self {
            inspector: None,
            calls: Vec::new(),
            fail_next: None,
            next_session: 0,
        }
    }

    pub fn inspector(&self) -> &Inspector<FakeEngine, FakeDocument> {
        self.inspector.as_ref().expect("backend has a target")
    }

    pub fn engine_runs(&self) -> usize {
        self.inspector().engine().run_count()
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let inspector = self.inspector.as_mut().ok_or(BackendError::NotReady)?;
        self.next_session += 1;
        let session = DocumentSession(self.next_session);
        inspector.teardown(session);
        Ok(NavigationResult {
            url: url.to_string(),
            title: String::new(),
            session,
        })
    }

    async fn active_target(&mut self) -> Result<Option<TargetInfo>, BackendError> {
        Ok(self.inspector.as_ref().map(|inspector| TargetInfo {
            session: inspector.session(),
            url: "https://example.test/".into(),
            title: "Example".into(),
        }))
    }

    async fn execute_inspector(
        &mut self,
        action: InspectorAction,
    ) -> Result<InspectorResponse, BackendError> {
        self.calls.push(action.name().to_string());
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        let inspector = self.inspector.as_mut().ok_or(BackendError::NoActiveTarget)?;

        let wire = serde_json::to_string(&action)?;
        let action: InspectorAction = serde_json::from_str(&wire)?;
        let response = inspector.handle(action).await;
        let wire = serde_json::to_string(&response)?;
        Ok(serde_json::from_str(&wire)?)
    }
}

/// One `color-contrast` violation with a fully described node and a bare one,
/// plus a violation of an unrelated rule.
pub fn sample_results() -> EngineResults {
    serde_json::from_value(json!({
        "violations": [
            {
                "id": "color-contrast",
                "impact": "serious",
                "description": "Ensures the contrast between foreground and background colors meets WCAG 2 AA minimum contrast ratio thresholds",
                "help": "Elements must meet minimum color contrast ratio thresholds",
                "nodes": [
                    {
                        "target": ["#lead"],
                        "html": "<p id=\"lead\">Welcome</p>",
                        "any": [{
                            "id": "color-contrast",
                            "data": {
                                "fgColor": "#999999",
                                "bgColor": "#ffffff",
                                "contrastRatio": 2.85,
                                "fontSize": "12.0pt (16px)",
                                "fontWeight": "normal",
                                "expectedContrastRatio": "4.5:1"
                            }
                        }]
                    },
                    {
                        "target": [".hero h2"],
                        "html": "<h2>Sale</h2>",
                        "any": []
                    }
                ]
            },
            {
                "id": "image-alt",
                "impact": "critical",
                "description": "Ensures <img> elements have alternate text",
                "help": "Images must have alternate text",
                "nodes": [{ "target": ["img"], "html": "<img>", "any": [] }]
            }
        ]
    }))
    .expect("valid fixture")
}

pub fn sample_document() -> FakeDocument {
    FakeDocument::new().with("#lead", 1).with(".hero h2", 2)
}

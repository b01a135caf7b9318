//! Selector matching and value reconstruction
//!
//! Sits between the path tracker and the emission sink: on every event it
//! decides whether a new match region opens, routes the event to all open
//! regions, and hands completed values to the sink in document order.

mod region;
mod selector;

use serde_json::Value;

use crate::event::ContainerKind;
use crate::sink::{Emission, EmissionSink};

pub(crate) use self::region::Region;
pub(crate) use self::selector::SelectorSet;

/// Drives open/route/close decisions for all configured selectors.
#[derive(Debug)]
pub(crate) struct FilterEngine {
    selectors: SelectorSet,
    with_path: bool,
    regions: Vec<Region>,
}

impl FilterEngine {
    pub(crate) fn new(filters: &[String], with_path: bool) -> Self {
        Self {
            selectors: SelectorSet::new(filters),
            with_path,
            regions: Vec::new(),
        }
    }

    /// A container opens at `path`: feed open regions, then open new
    /// regions for every selector equal to the path. A selector that
    /// already has an open region is ignored (reentry is not expected on
    /// well-formed input).
    pub(crate) fn on_open(&mut self, kind: ContainerKind, path: &str) {
        for region in &mut self.regions {
            region.push_frame(kind);
        }
        for idx in self.selectors.matches(path).collect::<Vec<_>>() {
            if self.region_open(idx) {
                continue;
            }
            log::trace!("selector matched container at {path:?}");
            let kept_path = self.with_path.then(|| path.to_owned());
            self.regions.push(Region::open(idx, kept_path, kind));
        }
    }

    /// An object key inside any open region becomes that region's pending
    /// key. The name arrives already key-transformed.
    pub(crate) fn on_key(&mut self, name: &str) {
        for region in &mut self.regions {
            region.record_key(name);
        }
    }

    /// A scalar: routed into open regions, and emitted immediately for any
    /// leaf selector equal to its path.
    pub(crate) fn on_scalar(&mut self, path: &str, value: &Value, sink: &mut EmissionSink) {
        for region in &mut self.regions {
            region.record_scalar(value.clone());
        }
        for idx in self.selectors.matches(path).collect::<Vec<_>>() {
            if self.region_open(idx) {
                continue;
            }
            log::trace!("leaf selector matched at {path:?}");
            sink.emit(Emission {
                path: self.with_path.then(|| path.to_owned()),
                value: value.clone(),
            });
        }
    }

    /// A container closes: every open region finalizes its innermost
    /// frame; regions whose frame stack empties complete and emit.
    pub(crate) fn on_close(&mut self, sink: &mut EmissionSink) {
        self.regions.retain_mut(|region| match region.close_frame() {
            Some(value) => {
                sink.emit(Emission {
                    path: region.path.take(),
                    value,
                });
                false
            }
            None => true,
        });
    }

    fn region_open(&self, selector: usize) -> bool {
        self.regions.iter().any(|r| r.selector == selector)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sink() -> EmissionSink {
        EmissionSink::new()
    }

    #[test]
    fn leaf_selector_emits_immediately() {
        let mut engine = FilterEngine::new(&["/total_rows".to_owned()], false);
        let mut sink = sink();
        engine.on_open(ContainerKind::Object, "");
        engine.on_key("total_rows");
        engine.on_scalar("/total_rows", &json!(2), &mut sink);
        engine.on_close(&mut sink);
        assert_eq!(sink.pop_value().expect("one emission").value, json!(2));
        assert!(sink.pop_value().is_none());
    }

    #[test]
    fn nested_selectors_keep_independent_frames() {
        let filters = ["/rows/".to_owned(), "/rows//props".to_owned()];
        let mut engine = FilterEngine::new(&filters, true);
        let mut sink = sink();

        // {"rows":[{"props":{"armed":true}}]}
        engine.on_open(ContainerKind::Object, "");
        engine.on_key("rows");
        engine.on_open(ContainerKind::Array, "/rows");
        engine.on_open(ContainerKind::Object, "/rows/");
        engine.on_key("props");
        engine.on_open(ContainerKind::Object, "/rows//props");
        engine.on_key("armed");
        engine.on_scalar("/rows//props/armed", &json!(true), &mut sink);
        engine.on_close(&mut sink); // props
        engine.on_close(&mut sink); // row element
        engine.on_close(&mut sink); // rows array? no region for /rows
        engine.on_close(&mut sink); // root

        let first = sink.pop_value().expect("props completes first");
        assert_eq!(first.path.as_deref(), Some("/rows//props"));
        assert_eq!(first.value, json!({"armed": true}));

        let second = sink.pop_value().expect("row element completes second");
        assert_eq!(second.path.as_deref(), Some("/rows/"));
        assert_eq!(second.value, json!({"props": {"armed": true}}));

        assert!(sink.pop_value().is_none());
    }
}

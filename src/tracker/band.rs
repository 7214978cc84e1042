use std::collections::BTreeMap;

/// Vertical extent of an element or viewport, in one shared coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f32,
    pub bottom: f32,
}

impl Span {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.top < other.bottom && other.top < self.bottom
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityEntry {
    pub element_id: String,
    pub is_intersecting: bool,
}

pub type VisibilityCallback = Box<dyn FnMut(&[VisibilityEntry]) + Send>;

/// Platform capability reporting when watched elements enter or leave view.
pub trait VisibilityObserver {
    fn observe(&mut self, element_id: &str);
    fn unobserve(&mut self, element_id: &str);
    fn on_visibility_change(&mut self, callback: VisibilityCallback);
}

/// Region of the viewport, as fractions of its height, that counts as "being read".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationBand {
    pub top_fraction: f32,
    pub bottom_fraction: f32,
}

impl Default for ActivationBand {
    fn default() -> Self {
        Self {
            top_fraction: 0.2,
            bottom_fraction: 0.4,
        }
    }
}

impl ActivationBand {
    pub fn within(&self, viewport: Span) -> Span {
        let height = viewport.height();
        Span::new(
            viewport.top + height * self.top_fraction,
            viewport.top + height * self.bottom_fraction,
        )
    }
}

/// [`VisibilityObserver`] driven by measured geometry. The view reports the viewport and
/// element spans after each layout pass; only changes in intersection are delivered.
pub struct BandObserver {
    band: ActivationBand,
    watched: BTreeMap<String, Option<bool>>,
    callback: Option<VisibilityCallback>,
}

impl BandObserver {
    pub fn new(band: ActivationBand) -> Self {
        Self {
            band,
            watched: BTreeMap::new(),
            callback: None,
        }
    }

    /// Elements are expected in layout order, so the last entry of a batch is the
    /// element that most recently crossed into the band when several change together.
    pub fn measure<'a, I>(&mut self, viewport: Span, elements: I)
    where
        I: IntoIterator<Item = (&'a str, Span)>,
    {
        let band = self.band.within(viewport);
        let mut changes = Vec::new();
        for (element_id, span) in elements {
            let Some(last) = self.watched.get_mut(element_id) else {
                continue;
            };
            let now = span.intersects(&band);
            if *last != Some(now) {
                *last = Some(now);
                changes.push(VisibilityEntry {
                    element_id: element_id.to_string(),
                    is_intersecting: now,
                });
            }
        }

        if changes.is_empty() {
            return;
        }
        if let Some(callback) = self.callback.as_mut() {
            callback(&changes);
        }
    }
}

impl Default for BandObserver {
    fn default() -> Self {
        Self::new(ActivationBand::default())
    }
}

impl VisibilityObserver for BandObserver {
    fn observe(&mut self, element_id: &str) {
        self.watched.insert(element_id.to_string(), None);
    }

    fn unobserve(&mut self, element_id: &str) {
        self.watched.remove(element_id);
    }

    fn on_visibility_change(&mut self, callback: VisibilityCallback) {
        self.callback = Some(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_observer() -> (BandObserver, Arc<Mutex<Vec<Vec<VisibilityEntry>>>>) {
        let batches = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&batches);
        let mut observer = BandObserver::default();
        observer.on_visibility_change(Box::new(move |entries| {
            sink.lock().expect("sink lock").push(entries.to_vec());
        }));
        (observer, batches)
    }

    #[test]
    fn band_covers_twenty_to_forty_percent() {
        let band = ActivationBand::default().within(Span::new(100.0, 1100.0));
        assert_eq!(band, Span::new(300.0, 500.0));
    }

    #[test]
    fn only_changes_are_reported() {
        let (mut observer, batches) = recording_observer();
        observer.observe("a");
        let viewport = Span::new(0.0, 1000.0);

        observer.measure(viewport, [("a", Span::new(0.0, 500.0))]);
        observer.measure(viewport, [("a", Span::new(0.0, 500.0))]);
        observer.measure(viewport, [("a", Span::new(-600.0, -100.0))]);

        let batches = batches.lock().expect("sink lock");
        assert_eq!(batches.len(), 2);
        assert!(batches[0][0].is_intersecting);
        assert!(!batches[1][0].is_intersecting);
    }

    #[test]
    fn unwatched_elements_are_ignored() {
        let (mut observer, batches) = recording_observer();
        observer.observe("a");
        observer.unobserve("a");
        observer.measure(Span::new(0.0, 1000.0), [("a", Span::new(0.0, 500.0))]);
        assert!(batches.lock().expect("sink lock").is_empty());
    }
}

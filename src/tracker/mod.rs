//! Scroll-spy: decides which section is currently being read.

pub mod band;

pub use band::{BandObserver, Span, VisibilityEntry, VisibilityObserver};

use std::collections::BTreeSet;
use std::sync::mpsc::{self, Receiver, TryRecvError};

pub struct ActivationTracker<O: VisibilityObserver> {
    observer: O,
    rx: Receiver<Vec<VisibilityEntry>>,
    watched: BTreeSet<String>,
    active: Option<String>,
}

impl<O: VisibilityObserver> ActivationTracker<O> {
    pub fn new(mut observer: O, initial: Option<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        observer.on_visibility_change(Box::new(move |entries| {
            let _ = tx.send(entries.to_vec());
        }));
        Self {
            observer,
            rx,
            watched: BTreeSet::new(),
            active: initial,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Explicit selection, e.g. from the navigation panel.
    pub fn select(&mut self, id: &str) {
        self.active = Some(id.to_string());
    }

    /// Watches exactly `ids`. Elements already watched are re-observed so their
    /// visibility is evaluated afresh after layout changes.
    pub fn sync_sections(&mut self, ids: &[String]) {
        let wanted: BTreeSet<String> = ids.iter().cloned().collect();
        for stale in self.watched.difference(&wanted) {
            self.observer.unobserve(stale);
        }
        for id in &wanted {
            self.observer.unobserve(id);
            self.observer.observe(id);
        }
        self.watched = wanted;
    }

    /// Applies pending visibility notifications. Returns the new active id if it changed.
    pub fn poll(&mut self) -> Option<String> {
        let previous = self.active.clone();
        loop {
            match self.rx.try_recv() {
                Ok(entries) => {
                    if let Some(entry) = entries
                        .iter()
                        .rev()
                        .find(|entry| entry.is_intersecting && self.watched.contains(&entry.element_id))
                    {
                        self.active = Some(entry.element_id.clone());
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if self.active != previous {
            self.active.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT_HEIGHT: f32 = 1000.0;

    fn stacked_sections() -> Vec<(&'static str, Span)> {
        vec![
            ("a", Span::new(0.0, 500.0)),
            ("b", Span::new(500.0, 1000.0)),
            ("c", Span::new(1000.0, 1500.0)),
        ]
    }

    fn tracker() -> ActivationTracker<BandObserver> {
        let mut tracker = ActivationTracker::new(BandObserver::default(), Some("a".to_string()));
        tracker.sync_sections(&["a".to_string(), "b".to_string(), "c".to_string()]);
        tracker
    }

    fn scroll_to(tracker: &mut ActivationTracker<BandObserver>, offset: f32) -> Option<String> {
        let viewport = Span::new(offset, offset + VIEWPORT_HEIGHT);
        tracker
            .observer_mut()
            .measure(viewport, stacked_sections());
        tracker.poll()
    }

    #[test]
    fn section_entering_band_becomes_active() {
        let mut tracker = tracker();
        assert_eq!(scroll_to(&mut tracker, 0.0), None);
        assert_eq!(tracker.active(), Some("a"));

        // Band is [offset + 200, offset + 400]; B's top edge (500) crosses at offset 150.
        assert_eq!(scroll_to(&mut tracker, 150.0), Some("b".to_string()));
        assert_eq!(tracker.active(), Some("b"));

        assert_eq!(scroll_to(&mut tracker, 250.0), None);
        assert_eq!(tracker.active(), Some("b"));
    }

    #[test]
    fn most_recent_intersection_wins_within_a_batch() {
        let mut tracker = tracker();
        // Jump straight to a position where the band spans B and C.
        let viewport = Span::new(750.0, 750.0 + VIEWPORT_HEIGHT);
        tracker
            .observer_mut()
            .measure(viewport, stacked_sections());
        assert_eq!(tracker.poll(), Some("c".to_string()));
    }

    #[test]
    fn explicit_selection_overrides_until_next_change() {
        let mut tracker = tracker();
        scroll_to(&mut tracker, 0.0);
        tracker.select("c");
        assert_eq!(tracker.active(), Some("c"));

        assert_eq!(scroll_to(&mut tracker, 0.0), None);
        assert_eq!(tracker.active(), Some("c"));

        assert_eq!(scroll_to(&mut tracker, 400.0), Some("b".to_string()));
    }

    #[test]
    fn resync_re_evaluates_watched_sections() {
        let mut tracker = tracker();
        scroll_to(&mut tracker, 0.0);
        tracker.select("c");

        // Layout changed (content loaded); A is re-reported and reclaims the band.
        tracker.sync_sections(&["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(scroll_to(&mut tracker, 0.0), Some("a".to_string()));
    }

    #[test]
    fn removed_sections_are_no_longer_watched() {
        let mut tracker = tracker();
        tracker.sync_sections(&["a".to_string(), "c".to_string()]);
        assert_eq!(scroll_to(&mut tracker, 400.0), None);
        assert_eq!(tracker.active(), Some("a"));
    }
}

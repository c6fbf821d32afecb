//! Read-only, possibly range-filtered windows over a session.

use time::OffsetDateTime;

use crate::event::{CanonicalSession, Event};
use crate::range::RangeSet;

/// A filtered view over a session: a sub-sequence reference, never a copy.
///
/// Renderers and the playback engine consume views exclusively; an empty
/// view is a valid input everywhere downstream.
#[derive(Debug, Clone)]
pub struct SessionView<'a> {
    session: &'a CanonicalSession,
    positions: Vec<usize>,
}

impl<'a> SessionView<'a> {
    /// The unfiltered view over every event.
    #[must_use]
    pub fn full(session: &'a CanonicalSession) -> Self {
        Self {
            session,
            positions: (0..session.events.len()).collect(),
        }
    }

    /// The view selected by a parsed range expression.
    #[must_use]
    pub fn over(session: &'a CanonicalSession, range: &RangeSet) -> Self {
        let positions = range
            .indices()
            .filter(|index| *index >= 1 && *index <= session.events.len())
            .map(|index| index - 1)
            .collect();
        Self { session, positions }
    }

    #[must_use]
    pub fn session(&self) -> &'a CanonicalSession {
        self.session
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Events in view order (source order of the selected indices).
    pub fn events(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.positions
            .iter()
            .map(move |position| &self.session.events[*position])
    }

    /// The `ordinal`-th event of the view, 1-based.
    #[must_use]
    pub fn event(&self, ordinal: usize) -> Option<&'a Event> {
        if ordinal == 0 {
            return None;
        }
        self.positions
            .get(ordinal - 1)
            .map(|position| &self.session.events[*position])
    }

    /// Earliest timestamp carried by any event in the view.
    #[must_use]
    pub fn first_timestamp(&self) -> Option<OffsetDateTime> {
        self.events().find_map(|event| event.timestamp)
    }

    /// Latest timestamp carried by any event in the view.
    #[must_use]
    pub fn last_timestamp(&self) -> Option<OffsetDateTime> {
        self.events().filter_map(|event| event.timestamp).last()
    }
}

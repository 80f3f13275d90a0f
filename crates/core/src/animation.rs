//! The per-turn line-reveal state machine.
//!
//! Each animated turn walks `Pending(0) → Revealing(k) → Complete(total)`
//! one line per tick. The counters here only ever grow and never exceed
//! the turn's total line count; scheduling the ticks that drive them is
//! the controller's job.

use std::collections::HashMap;

use crate::conversation::TurnId;

/// How reveals of different turns interact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealMode {
    /// At most one turn reveals at a time. A newly appended turn takes
    /// over the active slot and the previous turn's reveal freezes where
    /// it was.
    #[default]
    SingleActive,
    /// Every turn's reveal runs to completion independently.
    Concurrent,
}

/// Outcome of advancing a turn's reveal by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// One more line became visible and more remain.
    Revealed(usize),
    /// The turn just reached its total line count. Terminal.
    Completed(usize),
    /// The turn is untracked or already complete; nothing changed.
    Still,
}

/// Mapping from turn id to visible line count, plus the single
/// currently-animating id.
#[derive(Clone, Debug, Default)]
pub struct AnimationState {
    visible: HashMap<TurnId, usize>,
    active: Option<TurnId>,
}

impl AnimationState {
    /// Returns the visible line count of `id`, if it is tracked.
    #[inline]
    pub fn visible_lines(&self, id: TurnId) -> Option<usize> {
        self.visible.get(&id).copied()
    }

    /// Returns the currently animating turn, if any.
    #[inline]
    pub fn active(&self) -> Option<TurnId> {
        self.active
    }

    /// Returns `true` if no turn is tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub(crate) fn begin(&mut self, id: TurnId, mode: RevealMode) {
        self.visible.insert(id, 0);
        if mode == RevealMode::SingleActive {
            self.active = Some(id);
        }
    }

    pub(crate) fn advance(&mut self, id: TurnId, total: usize) -> Advance {
        let Some(count) = self.visible.get_mut(&id) else {
            return Advance::Still;
        };
        if *count >= total {
            return Advance::Still;
        }
        *count += 1;
        if *count >= total {
            if self.active == Some(id) {
                self.active = None;
            }
            Advance::Completed(*count)
        } else {
            Advance::Revealed(*count)
        }
    }

    pub(crate) fn clear(&mut self) {
        self.visible.clear();
        self.active = None;
    }
}

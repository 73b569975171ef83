//! The manage flow as an explicit state machine.
//!
//! ```text
//!   Listing ──begin_selection──▶ Selecting ──select──▶ Confirming
//!      ▲                             │                     │
//!      │◀────── cancel ──────────────┘                     │ confirm(yes)
//!      │◀────── confirm(no) / nothing to change ───────────┤
//!      │                                                   ▼
//!      └────────────────── finish(new view) ◀──────── Applying
//! ```
//!
//! Every transition is driven by one user choice. The selection produces an
//! immutable [`SelectionIntent`] holding at most one [`BatchApply`] per pack
//! type, which the caller hands to the world registry.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::confirm::Confirmation;
use crate::inventory::{CombinedView, PackFilter, PackView};
use crate::pack::PackType;
use crate::registry::{ActivationRef, BatchApply};

/// Where the manage flow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageState {
    Listing,
    Selecting,
    Confirming,
    Applying,
}

impl fmt::Display for ManageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Listing => "listing",
            Self::Selecting => "selecting",
            Self::Confirming => "confirming",
            Self::Applying => "applying",
        };
        f.write_str(name)
    }
}

/// A transition requested from the wrong state.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} while {state}")]
pub struct TransitionError {
    pub action: &'static str,
    pub state: ManageState,
}

/// The activation changes a selection asks for, one batch per type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionIntent {
    batches: BTreeMap<PackType, BatchApply>,
}

impl SelectionIntent {
    /// Per-type batches, behavior first.
    pub fn batches(&self) -> impl Iterator<Item = (PackType, &BatchApply)> {
        self.batches.iter().map(|(t, b)| (*t, b))
    }

    /// Number of packs to activate.
    pub fn activations(&self) -> usize {
        self.batches.values().map(|b| b.add.len()).sum()
    }

    /// Number of packs to deactivate.
    pub fn deactivations(&self) -> usize {
        self.batches.values().map(|b| b.remove.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.values().all(BatchApply::is_empty)
    }

    /// Diff `candidates` against the ids the user wants active.
    ///
    /// Packs outside `candidates` are never touched.
    pub fn from_selection(candidates: &[&PackView], selected_ids: &[String]) -> Self {
        let mut batches: BTreeMap<PackType, BatchApply> = BTreeMap::new();

        for view in candidates {
            let wanted = selected_ids.iter().any(|id| view.pack.matches_id(id));
            let pack_type = view.pack.pack_type;
            match (wanted, view.active) {
                (true, false) => batches
                    .entry(pack_type)
                    .or_default()
                    .add
                    .push(ActivationRef::from(&view.pack.identity)),
                (false, true) => {
                    batches
                        .entry(pack_type)
                        .or_default()
                        .remove
                        .insert(view.pack.id.clone());
                }
                _ => {}
            }
        }

        Self { batches }
    }
}

/// One run through the manage menu.
#[derive(Debug)]
pub struct ManageSession {
    state: ManageState,
    view: CombinedView,
    filter: PackFilter,
    pending: Option<SelectionIntent>,
}

impl ManageSession {
    /// Start in `Listing` over a freshly built view.
    pub fn new(view: CombinedView) -> Self {
        Self {
            state: ManageState::Listing,
            view,
            filter: PackFilter::all(),
            pending: None,
        }
    }

    pub fn state(&self) -> ManageState {
        self.state
    }

    pub fn view(&self) -> &CombinedView {
        &self.view
    }

    pub fn filter(&self) -> &PackFilter {
        &self.filter
    }

    /// The pending intent while confirming.
    pub fn pending(&self) -> Option<&SelectionIntent> {
        self.pending.as_ref()
    }

    /// Entries visible under the current filter.
    pub fn candidates(&self) -> Vec<&PackView> {
        self.view.filtered(&self.filter)
    }

    /// Change the filter. Only while listing.
    pub fn set_filter(&mut self, filter: PackFilter) -> Result<(), TransitionError> {
        self.require_state(ManageState::Listing, "change the filter")?;
        self.filter = filter;
        Ok(())
    }

    /// Listing → Selecting.
    pub fn begin_selection(&mut self) -> Result<(), TransitionError> {
        self.require_state(ManageState::Listing, "begin a selection")?;
        self.state = ManageState::Selecting;
        Ok(())
    }

    /// Selecting → Confirming with the resulting intent, or back to
    /// Listing when the selection changes nothing.
    pub fn select(
        &mut self,
        selected_ids: &[String],
    ) -> Result<Option<&SelectionIntent>, TransitionError> {
        self.require_state(ManageState::Selecting, "select packs")?;

        let intent = SelectionIntent::from_selection(&self.candidates(), selected_ids);
        if intent.is_empty() {
            self.state = ManageState::Listing;
            return Ok(None);
        }

        self.state = ManageState::Confirming;
        self.pending = Some(intent);
        Ok(self.pending.as_ref())
    }

    /// Confirming → Applying (returns the intent to apply) or → Listing.
    pub fn confirm(
        &mut self,
        answer: Confirmation,
    ) -> Result<Option<SelectionIntent>, TransitionError> {
        self.require_state(ManageState::Confirming, "confirm")?;

        let intent = self.pending.take();
        if answer.is_confirmed() {
            self.state = ManageState::Applying;
            Ok(intent)
        } else {
            self.state = ManageState::Listing;
            Ok(None)
        }
    }

    /// Applying → Listing over the view rebuilt after the write.
    pub fn finish(&mut self, view: CombinedView) -> Result<(), TransitionError> {
        self.require_state(ManageState::Applying, "finish")?;
        self.view = view;
        self.state = ManageState::Listing;
        Ok(())
    }

    /// Abandon a selection or confirmation.
    pub fn cancel(&mut self) {
        if matches!(self.state, ManageState::Selecting | ManageState::Confirming) {
            self.pending = None;
            self.state = ManageState::Listing;
        }
    }

    fn require_state(
        &self,
        state: ManageState,
        action: &'static str,
    ) -> Result<(), TransitionError> {
        if self.state == state {
            Ok(())
        } else {
            Err(TransitionError {
                action,
                state: self.state,
            })
        }
    }
}

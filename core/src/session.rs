use std::collections::HashSet;
use std::time::Duration;

use log::{debug, warn};

use crate::models::Creature;
use crate::storage::CollectionStore;
use crate::swipe::{Direction, Release, SwipeController, SwipeEvent};
use crate::{Error, Result};

/// Which card a fetch fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The card on screen
    Current,
    /// The prefetched card shown after the next commit
    Next,
}

/// What the swipe screen should show
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Loading,
    Ready,
    /// The on-screen card could not be fetched; offer a retry
    Failed(String),
}

/// The current/next card pair and the swipe gesture acting on it.
///
/// The session never performs I/O. Methods that change which cards are
/// needed return the slots to fetch; the caller runs the fetches and hands
/// results back through [`BrowseSession::fulfill`] or
/// [`BrowseSession::fail`].
#[derive(Debug)]
pub struct BrowseSession {
    current: Option<Creature>,
    next: Option<Creature>,
    swipe: SwipeController,
    pending: HashSet<Slot>,
    failure: Option<String>,
}

impl BrowseSession {
    pub fn new(swipe: SwipeController) -> Self {
        Self {
            current: None,
            next: None,
            swipe,
            pending: HashSet::new(),
            failure: None,
        }
    }

    pub fn current(&self) -> Option<&Creature> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Creature> {
        self.next.as_ref()
    }

    pub fn swipe(&self) -> &SwipeController {
        &self.swipe
    }

    pub fn swipe_mut(&mut self) -> &mut SwipeController {
        &mut self.swipe
    }

    pub fn is_pending(&self, slot: Slot) -> bool {
        self.pending.contains(&slot)
    }

    pub fn status(&self) -> SessionStatus {
        match (&self.current, &self.failure) {
            (Some(_), _) => SessionStatus::Ready,
            (None, Some(message)) => SessionStatus::Failed(message.clone()),
            (None, None) => SessionStatus::Loading,
        }
    }

    /// Ids a new fetch should avoid: everything seen plus the cards held now
    pub fn exclusions(&self, store: &CollectionStore) -> HashSet<u32> {
        let mut ids = store.seen().clone();
        ids.extend(self.current.iter().chain(self.next.iter()).map(|c| c.id));
        ids
    }

    /// Request whatever cards are missing. The prefetch waits until a card
    /// is on screen so its draw can avoid that card.
    pub fn start(&mut self) -> Vec<Slot> {
        let mut requests = Vec::new();
        if self.current.is_some() {
            self.request(Slot::Next, &mut requests);
        } else {
            self.request(Slot::Current, &mut requests);
        }
        requests
    }

    /// Clear a failed load and try again
    pub fn retry(&mut self) -> Vec<Slot> {
        self.failure = None;
        self.start()
    }

    fn request(&mut self, slot: Slot, requests: &mut Vec<Slot>) {
        let filled = match slot {
            Slot::Current => self.current.is_some(),
            Slot::Next => self.next.is_some(),
        };
        if !filled && self.pending.insert(slot) {
            requests.push(slot);
        }
    }

    /// Put `creature` on screen. A card counts as seen once it is shown.
    fn show(&mut self, creature: Creature, store: &mut CollectionStore) {
        store.mark_seen(creature.id);
        self.current = Some(creature);
        self.failure = None;
    }

    /// Store a fetched creature in `slot` and return the slots to fetch next
    pub fn fulfill(&mut self, slot: Slot, creature: Creature, store: &mut CollectionStore) -> Vec<Slot> {
        self.pending.remove(&slot);
        debug!("{:?} card is now {} ({})", slot, creature.name, creature.id);
        let mut requests = Vec::new();
        match slot {
            Slot::Current => {
                if self.next.as_ref().is_some_and(|next| next.id == creature.id) {
                    self.next = None;
                }
                self.show(creature, store);
                self.request(Slot::Next, &mut requests);
            }
            Slot::Next => {
                if self.current.as_ref().is_some_and(|current| current.id == creature.id) {
                    // Only happens once every id is excluded; the next commit
                    // fetches a replacement instead
                    debug!("prefetch drew the card on screen again, dropping it");
                } else if self.current.is_none() && !self.is_pending(Slot::Current) {
                    self.show(creature, store);
                    self.request(Slot::Next, &mut requests);
                } else {
                    self.next = Some(creature);
                }
            }
        }
        requests
    }

    /// Record that the fetch for `slot` gave up and return the slots to
    /// fetch next
    pub fn fail(&mut self, slot: Slot, error: &Error, store: &mut CollectionStore) -> Vec<Slot> {
        self.pending.remove(&slot);
        let mut requests = Vec::new();
        match slot {
            Slot::Current => match self.next.take() {
                Some(next) => {
                    warn!("could not load a card, showing the prefetched one: {}", error);
                    self.show(next, store);
                    self.request(Slot::Next, &mut requests);
                }
                None => {
                    warn!("could not load a card: {}", error);
                    self.failure = Some(error.to_string());
                }
            },
            // Fetched again when the card is actually needed
            Slot::Next => warn!("prefetch failed: {}", error),
        }
        requests
    }

    /// Grab the card. Rejected while there is no card or it is still
    /// flying out.
    pub fn begin_drag(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Err(Error::Busy("no card to swipe".to_string()));
        }
        self.swipe.begin_drag()
    }

    pub fn update_drag(&mut self, dx: f32, dy: f32) {
        self.swipe.update_drag(dx, dy);
    }

    pub fn release(&mut self) -> Result<Release> {
        self.swipe.release()
    }

    /// Keyboard commit of the current card
    pub fn fling(&mut self, direction: Direction) -> Result<()> {
        if self.current.is_none() {
            return Err(Error::Busy("no card to swipe".to_string()));
        }
        self.swipe.fling(direction)
    }

    /// Advance animations. When a fly-out lands the commit is applied and
    /// the slots to fetch are returned.
    pub fn tick(&mut self, dt: Duration, store: &mut CollectionStore) -> Vec<Slot> {
        match self.swipe.tick(dt) {
            Some(SwipeEvent::Committed(direction)) => self.complete_commit(direction, store),
            Some(SwipeEvent::Settled) | None => Vec::new(),
        }
    }

    /// Apply a finished commit: like (if right), then move the prefetched
    /// card on screen.
    pub fn complete_commit(&mut self, direction: Direction, store: &mut CollectionStore) -> Vec<Slot> {
        let mut requests = Vec::new();

        if let Some(committed) = self.current.take() {
            if direction.is_like() && store.add_liked(&committed) {
                debug!("liked {} ({})", committed.name, committed.id);
            }
        }

        match self.next.take() {
            Some(next) => {
                self.show(next, store);
                self.request(Slot::Next, &mut requests);
            }
            None => self.request(Slot::Current, &mut requests),
        }
        requests
    }
}

impl Default for BrowseSession {
    fn default() -> Self {
        Self::new(SwipeController::default())
    }
}

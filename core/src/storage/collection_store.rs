use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::KeyValueStorage;
use crate::models::{Creature, LikedCreature};
use crate::Result;

/// Name of the record holding the liked list
pub const LIKED_RECORD_KEY: &str = "likedPokemon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    Light,
    #[default]
    Dark,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }
}

/// Change notifications; subscribers pull the new state from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    LikedChanged,
    SeenChanged,
    DisplayModeChanged,
}

/// Background writer that persists liked-list snapshots in order
struct Flusher {
    queue: Option<Sender<String>>,
    worker: Option<JoinHandle<()>>,
}

impl Flusher {
    fn spawn(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (tx, rx) = mpsc::channel::<String>();
        let worker = std::thread::Builder::new()
            .name("swipedex-flush".to_string())
            .spawn(move || {
                while let Ok(mut snapshot) = rx.recv() {
                    // Only the newest queued snapshot matters
                    while let Ok(newer) = rx.try_recv() {
                        snapshot = newer;
                    }
                    match storage.save(LIKED_RECORD_KEY, &snapshot) {
                        Ok(()) => debug!("persisted liked collection ({} bytes)", snapshot.len()),
                        Err(e) => warn!("failed to persist liked collection: {}", e),
                    }
                }
            });

        match worker {
            Ok(handle) => Self {
                queue: Some(tx),
                worker: Some(handle),
            },
            Err(e) => {
                warn!("could not start flush thread, liked collection will not be saved: {}", e);
                Self {
                    queue: None,
                    worker: None,
                }
            }
        }
    }

    fn enqueue(&self, snapshot: String) {
        if let Some(queue) = &self.queue {
            if queue.send(snapshot).is_err() {
                warn!("flush thread is gone, dropping liked collection snapshot");
            }
        }
    }
}

impl Drop for Flusher {
    fn drop(&mut self) {
        // Closing the queue lets the worker drain and exit
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("flush thread panicked");
            }
        }
    }
}

/// The liked collection, the seen ids and the display mode.
///
/// Mutations apply to memory immediately. Liked-list changes are then
/// written as a full snapshot by a background thread; write failures are
/// logged and never reach the caller. Dropping the store waits for pending
/// writes.
pub struct CollectionStore {
    liked: Vec<LikedCreature>,
    seen: HashSet<u32>,
    display_mode: DisplayMode,
    subscribers: Vec<Sender<StoreEvent>>,
    flusher: Flusher,
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("liked", &self.liked.len())
            .field("seen", &self.seen.len())
            .field("display_mode", &self.display_mode)
            .finish()
    }
}

impl CollectionStore {
    /// Load the persisted liked list and start the writer.
    ///
    /// A record that no longer parses is logged and treated as empty; read
    /// errors are returned.
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let liked = match storage.load(LIKED_RECORD_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<LikedCreature>>(&raw) {
                Ok(list) => dedup_by_id(list),
                Err(e) => {
                    warn!("ignoring unreadable liked collection: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!("loaded {} liked creatures", liked.len());

        Ok(Self {
            liked,
            seen: HashSet::new(),
            display_mode: DisplayMode::default(),
            subscribers: Vec::new(),
            flusher: Flusher::spawn(storage),
        })
    }

    /// Liked creatures in the order they were liked
    pub fn liked(&self) -> &[LikedCreature] {
        &self.liked
    }

    pub fn is_liked(&self, id: u32) -> bool {
        self.liked.iter().any(|c| c.id == id)
    }

    pub fn seen(&self) -> &HashSet<u32> {
        &self.seen
    }

    pub fn is_seen(&self, id: u32) -> bool {
        self.seen.contains(&id)
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Append a creature to the liked list unless its id is already there.
    /// Returns whether it was added.
    pub fn add_liked(&mut self, creature: &Creature) -> bool {
        if self.is_liked(creature.id) {
            return false;
        }
        self.liked.push(LikedCreature::from_creature(creature));
        self.persist();
        self.notify(StoreEvent::LikedChanged);
        true
    }

    /// Record that a creature has been shown. Returns whether it was new.
    pub fn mark_seen(&mut self, id: u32) -> bool {
        let added = self.seen.insert(id);
        if added {
            self.notify(StoreEvent::SeenChanged);
        }
        added
    }

    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        self.display_mode = self.display_mode.toggled();
        self.notify(StoreEvent::DisplayModeChanged);
        self.display_mode
    }

    /// Receive a notification after every state change
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    fn persist(&self) {
        match serde_json::to_string(&self.liked) {
            Ok(snapshot) => self.flusher.enqueue(snapshot),
            Err(e) => warn!("failed to serialize liked collection: {}", e),
        }
    }
}

fn dedup_by_id(list: Vec<LikedCreature>) -> Vec<LikedCreature> {
    let mut ids = HashSet::new();
    list.into_iter().filter(|c| ids.insert(c.id)).collect()
}

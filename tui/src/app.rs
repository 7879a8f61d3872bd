use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::layout::Rect;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;
use swipedex_core::api::{ImageCache, PokeApiClient};
use swipedex_core::fetch::{random_creature, FetchPolicy};
use swipedex_core::models::Creature;
use swipedex_core::session::{BrowseSession, SessionStatus, Slot};
use swipedex_core::storage::{CollectionStore, DisplayMode, JsonFileStorage, StoreEvent};
use swipedex_core::swipe::{Direction, Release, SwipeController};

use crate::config::Config;
use crate::ui::Sprite;

/// Rows are roughly twice as tall as columns are wide
const ROW_ASPECT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intro,
    Swipe,
    Gallery,
}

struct FetchOutcome {
    slot: Slot,
    result: swipedex_core::Result<Creature>,
}

/// Application state
pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub help_open: bool,
    pub config: Config,
    pub store: CollectionStore,
    pub session: BrowseSession,
    pub status_message: Option<String>,
    pub data_dir: PathBuf,
    // Gallery
    pub gallery_scroll: usize,
    pub gallery_columns: usize,
    // Where the card was last drawn, for mouse hit-testing
    pub card_area: Option<Rect>,
    drag_anchor: Option<(u16, u16)>,
    store_events: Receiver<StoreEvent>,
    // Remote fetches
    runtime: tokio::runtime::Runtime,
    client: Arc<PokeApiClient>,
    policy: FetchPolicy,
    fetch_tx: Sender<FetchOutcome>,
    fetch_rx: Receiver<FetchOutcome>,
    images: ImageCache,
    sprites: HashMap<String, Option<Sprite>>,
    last_tick: Instant,
}

impl App {
    /// Create a new App instance backed by `data_dir`
    pub fn new(data_dir: &Path, config: Config) -> Result<Self> {
        let storage = Arc::new(JsonFileStorage::new(data_dir));
        let mut store = CollectionStore::open(storage)
            .with_context(|| format!("Failed to load liked creatures from {}", data_dir.display()))?;
        let store_events = store.subscribe();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("swipedex-fetch")
            .enable_all()
            .build()
            .context("Failed to start fetch runtime")?;

        let images = ImageCache::new();
        let client = Arc::new(PokeApiClient::new(config.api.endpoints(), images.clone())?);
        let policy = config.api.policy();
        let swipe = SwipeController::new(config.swipe.to_swipe_config(0.0));
        let (fetch_tx, fetch_rx) = mpsc::channel();

        info!(
            "opened collection at {} with {} liked creatures",
            data_dir.display(),
            store.liked().len()
        );

        Ok(Self {
            should_quit: false,
            screen: Screen::Intro,
            help_open: false,
            config,
            store,
            session: BrowseSession::new(swipe),
            status_message: None,
            data_dir: data_dir.to_path_buf(),
            gallery_scroll: 0,
            gallery_columns: 1,
            card_area: None,
            drag_anchor: None,
            store_events,
            runtime,
            client,
            policy,
            fetch_tx,
            fetch_rx,
            images,
            sprites: HashMap::new(),
            last_tick: Instant::now(),
        })
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.store.display_mode()
    }

    pub fn toggle_theme(&mut self) {
        self.store.toggle_display_mode();
    }

    pub fn open_help(&mut self) {
        self.help_open = true;
    }

    pub fn close_help(&mut self) {
        self.help_open = false;
    }

    /// Switch to the swipe screen and load whatever cards are missing
    pub fn start_browsing(&mut self) {
        self.screen = Screen::Swipe;
        let requests = self.session.start();
        self.dispatch(requests);
    }

    pub fn show_gallery(&mut self) {
        self.screen = Screen::Gallery;
        self.gallery_scroll = 0;
    }

    /// Step back one screen; quitting from the intro
    pub fn back(&mut self) {
        match self.screen {
            Screen::Intro => self.quit(),
            Screen::Swipe | Screen::Gallery => {
                self.release_drag();
                self.screen = Screen::Intro;
            }
        }
    }

    pub fn retry(&mut self) {
        if matches!(self.session.status(), SessionStatus::Failed(_)) {
            let requests = self.session.retry();
            self.dispatch(requests);
        }
    }

    pub fn like(&mut self) {
        self.fling(Direction::Right);
    }

    pub fn dislike(&mut self) {
        self.fling(Direction::Left);
    }

    fn fling(&mut self, direction: Direction) {
        if self.screen != Screen::Swipe {
            return;
        }
        if let Err(e) = self.session.fling(direction) {
            debug!("fling ignored: {}", e);
        }
    }

    /// Grab the card at a terminal cell
    pub fn begin_drag_at(&mut self, column: u16, row: u16) {
        if self.screen != Screen::Swipe {
            return;
        }
        match self.session.begin_drag() {
            Ok(()) => self.drag_anchor = Some((column, row)),
            Err(e) => debug!("gesture rejected: {}", e),
        }
    }

    pub fn drag_to(&mut self, column: u16, row: u16) {
        if let Some((anchor_col, anchor_row)) = self.drag_anchor {
            let dx = column as f32 - anchor_col as f32;
            let dy = (row as f32 - anchor_row as f32) * ROW_ASPECT;
            self.session.update_drag(dx, dy);
        }
    }

    pub fn release_drag(&mut self) {
        if self.drag_anchor.take().is_none() {
            return;
        }
        match self.session.release() {
            Ok(Release::Commit(direction)) => debug!("released past threshold: {:?}", direction),
            Ok(Release::Reset) => debug!("released inside threshold, springing back"),
            Err(e) => debug!("release ignored: {}", e),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Keep the swipe threshold proportional to the visible width
    pub fn set_swipe_width(&mut self, columns: u16) {
        self.session.swipe_mut().set_width(columns as f32);
    }

    pub fn gallery_scroll_up(&mut self) {
        self.gallery_scroll = self.gallery_scroll.saturating_sub(1);
    }

    pub fn gallery_scroll_down(&mut self) {
        let rows = self.gallery_rows();
        if self.gallery_scroll + 1 < rows {
            self.gallery_scroll += 1;
        }
    }

    pub fn gallery_rows(&self) -> usize {
        let columns = self.gallery_columns.max(1);
        self.store.liked().len().div_ceil(columns)
    }

    /// Decoded artwork for a creature, once its image has arrived
    pub fn sprite_for(&self, creature: &Creature) -> Option<&Sprite> {
        self.sprites.get(&creature.image_url).and_then(|s| s.as_ref())
    }

    /// Per-frame work: apply fetch results, advance animations, react to
    /// store changes
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;

        self.drain_fetches();
        let requests = self.session.tick(dt, &mut self.store);
        self.dispatch(requests);
        self.drain_store_events();
        self.decode_sprites();
    }

    fn dispatch(&self, slots: Vec<Slot>) {
        for slot in slots {
            let exclude = self.session.exclusions(&self.store);
            let client = Arc::clone(&self.client);
            let policy = self.policy;
            let tx = self.fetch_tx.clone();
            debug!("fetching {:?} card, avoiding {} ids", slot, exclude.len());

            self.runtime.spawn(async move {
                let mut rng = StdRng::from_entropy();
                let result = random_creature(client.as_ref(), &exclude, &policy, &mut rng).await;
                // The app may have shut down in the meantime
                let _ = tx.send(FetchOutcome { slot, result });
            });
        }
    }

    fn drain_fetches(&mut self) {
        let outcomes: Vec<FetchOutcome> = self.fetch_rx.try_iter().collect();
        for outcome in outcomes {
            let requests = match outcome.result {
                Ok(creature) => self.session.fulfill(outcome.slot, creature, &mut self.store),
                Err(e) => self.session.fail(outcome.slot, &e, &mut self.store),
            };
            self.dispatch(requests);
        }
    }

    fn drain_store_events(&mut self) {
        let events: Vec<StoreEvent> = self.store_events.try_iter().collect();
        for event in events {
            match event {
                StoreEvent::LikedChanged => {
                    if let Some(liked) = self.store.liked().last() {
                        self.status_message = Some(format!("Liked {}", liked.name));
                    }
                }
                StoreEvent::DisplayModeChanged => {
                    let label = match self.store.display_mode() {
                        DisplayMode::Light => "Light mode",
                        DisplayMode::Dark => "Dark mode",
                    };
                    self.status_message = Some(label.to_string());
                }
                StoreEvent::SeenChanged => {}
            }
        }
    }

    fn decode_sprites(&mut self) {
        let held: Vec<String> = self
            .session
            .current()
            .into_iter()
            .chain(self.session.next())
            .map(|c| c.image_url.clone())
            .collect();

        for url in &held {
            if self.sprites.contains_key(url) {
                continue;
            }
            if let Some(bytes) = self.images.get(url) {
                let sprite = match Sprite::decode(&bytes) {
                    Ok(sprite) => Some(sprite),
                    Err(e) => {
                        warn!("could not decode artwork {}: {}", url, e);
                        None
                    }
                };
                self.sprites.insert(url.clone(), sprite);
            }
        }
        self.sprites.retain(|url, _| held.contains(url));
    }
}

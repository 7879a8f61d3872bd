use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

/// Artwork kept by default; older entries are evicted first
pub const DEFAULT_IMAGE_CAPACITY: usize = 32;

#[derive(Debug, Default)]
struct Entries {
    bytes: HashMap<String, Arc<Vec<u8>>>,
    order: VecDeque<String>,
}

/// Shared store of downloaded artwork, keyed by image URL.
///
/// Cloning is cheap; all clones see the same entries. Holds at most
/// `capacity` images, evicting in insertion order.
#[derive(Debug, Clone)]
pub struct ImageCache {
    entries: Arc<RwLock<Entries>>,
    capacity: usize,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_IMAGE_CAPACITY)
    }
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        let url = url.into();
        if entries.bytes.insert(url.clone(), Arc::new(bytes)).is_none() {
            entries.order.push_back(url);
        }
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.bytes.remove(&oldest);
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<Arc<Vec<u8>>> {
        self.entries.read().ok()?.bytes.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.bytes.contains_key(url))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.bytes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! In-memory video storage.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::videos::model::{NewVideo, Video, VideoUpdate};

struct StoreInner {
    videos: Vec<Video>,
    next_id: u64,
}

impl StoreInner {
    fn empty() -> Self {
        Self {
            videos: Vec::new(),
            next_id: 1,
        }
    }
}

/// An ordered list of videos plus the id counter, shared between handlers.
///
/// Cloning is cheap; clones see the same data.
#[derive(Clone)]
pub struct VideoStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl VideoStore {
    /// Create an empty store whose first id will be 1.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner::empty())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Every mutation leaves the list consistent, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All videos in insertion order.
    pub fn list(&self) -> Vec<Video> {
        self.lock().videos.clone()
    }

    /// Look up a video by id.
    pub fn get(&self, id: u64) -> Option<Video> {
        self.lock().videos.iter().find(|v| v.id == id).cloned()
    }

    /// Store a new video stamped with the current time.
    pub fn insert(&self, new: NewVideo) -> Video {
        self.insert_at(new, Utc::now())
    }

    /// Store a new video stamped with `now`.
    pub fn insert_at(&self, new: NewVideo, now: DateTime<Utc>) -> Video {
        let mut inner = self.lock();
        let video = Video {
            id: inner.next_id,
            title: new.title,
            author: new.author,
            can_be_downloaded: true,
            min_age_restriction: None,
            created_at: now,
            publication_date: now,
            available_resolutions: new.available_resolutions,
        };
        inner.next_id += 1;
        inner.videos.push(video.clone());
        video
    }

    /// Apply `update` to the video with `id`. Returns `false` if it does not exist.
    pub fn update(&self, id: u64, update: VideoUpdate) -> bool {
        let mut inner = self.lock();
        match inner.videos.iter_mut().find(|v| v.id == id) {
            Some(video) => {
                update.apply(video);
                true
            }
            None => false,
        }
    }

    /// Remove the video with `id`. Returns `false` if it does not exist.
    pub fn remove(&self, id: u64) -> bool {
        let mut inner = self.lock();
        match inner.videos.iter().position(|v| v.id == id) {
            Some(index) => {
                inner.videos.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every video and restart ids at 1.
    pub fn clear(&self) {
        *self.lock() = StoreInner::empty();
    }

    pub fn len(&self) -> usize {
        self.lock().videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VideoStore {
    fn default() -> Self {
        Self::new()
    }
}

//! The post store: an ordered, newest-first collection mirrored into a
//! key/value slot.
//!
//! Every mutation rewrites the whole `posts` slot. A missing, unreadable or
//! unparseable slot is treated as absent and the collection falls back to the
//! built-in welcome post; loading never fails.

use std::num::NonZeroU32;
use std::sync::Arc;

use chrono_tz::Tz;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::application::clock::Clock;
use crate::application::repos::{KeyValueStore, POSTS_SLOT, StorageError};
use crate::domain::posts::{
    DEFAULT_CHARS_PER_MINUTE, Post, PostDraft, format_display_date, format_read_time,
    read_time_minutes, welcome_post,
};
use crate::util::timezone::localized_date;

/// Number of posts featured on the home page.
pub const HOME_FEATURED_LIMIT: usize = 3;

pub const DEFAULT_AUTHOR: &str = "Người dùng";
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1499750310107-5fef28a66643?q=80&w=1000";

/// Values the store fills in when a draft leaves them out.
#[derive(Debug, Clone)]
pub struct PostDefaults {
    pub author: String,
    pub image_url: String,
    pub chars_per_minute: NonZeroU32,
    pub timezone: Tz,
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            chars_per_minute: NonZeroU32::new(DEFAULT_CHARS_PER_MINUTE)
                .unwrap_or(NonZeroU32::MIN),
            timezone: chrono_tz::Asia::Ho_Chi_Minh,
        }
    }
}

pub struct PostStore {
    posts: Vec<Post>,
    seeded: bool,
    last_issued_id: u64,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    defaults: PostDefaults,
}

impl PostStore {
    /// Read the persisted collection, seeding it when nothing usable is stored.
    pub fn load(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        defaults: PostDefaults,
    ) -> Self {
        let (posts, seeded) = match read_persisted(storage.as_ref()) {
            Some(posts) => (posts, false),
            None => {
                let today = format_display_date(localized_date(clock.now(), defaults.timezone));
                (vec![welcome_post(today)], true)
            }
        };

        let last_issued_id = posts
            .iter()
            .filter_map(|post| post.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        debug!(count = posts.len(), seeded, "post store loaded");

        Self {
            posts,
            seeded,
            last_issued_id,
            storage,
            clock,
            defaults,
        }
    }

    /// Current collection, newest first.
    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    /// The newest `limit` posts.
    pub fn latest(&self, limit: usize) -> &[Post] {
        &self.posts[..limit.min(self.posts.len())]
    }

    pub fn find(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Whether the collection came from the built-in seed rather than storage.
    pub fn seeded(&self) -> bool {
        self.seeded
    }

    pub fn defaults(&self) -> &PostDefaults {
        &self.defaults
    }

    /// Complete `draft`, prepend it and persist the whole collection.
    ///
    /// The new post stays in memory even when the write fails; the storage
    /// error is returned so the caller can report that it was not saved.
    pub fn create(&mut self, draft: PostDraft) -> Result<Post, StorageError> {
        let now = self.clock.now();
        let id = self.next_id(now);
        let date = format_display_date(localized_date(now, self.defaults.timezone));
        let read_time = format_read_time(read_time_minutes(
            &draft.content,
            self.defaults.chars_per_minute,
        ));

        let PostDraft {
            title,
            excerpt,
            content,
            category,
            author,
            image_url,
        } = draft;

        let post = Post {
            id,
            title,
            excerpt,
            content,
            category,
            author: non_blank(author).unwrap_or_else(|| self.defaults.author.clone()),
            date,
            image_url: non_blank(image_url).unwrap_or_else(|| self.defaults.image_url.clone()),
            read_time,
        };

        self.posts.insert(0, post.clone());
        self.seeded = false;
        info!(
            post_id = %post.id,
            category = post.category.id(),
            total = self.posts.len(),
            "post created"
        );

        self.persist()?;
        Ok(post)
    }

    /// Overwrite the `posts` slot with the full in-memory collection.
    pub fn persist(&self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.posts).map_err(|source| StorageError::Encode {
            slot: POSTS_SLOT,
            source,
        })?;
        self.storage.set(POSTS_SLOT, &encoded).inspect_err(|err| {
            warn!(slot = POSTS_SLOT, error = %err, "failed to persist posts");
        })
    }

    /// Millisecond timestamp id, bumped past the last issued one so that two
    /// creations inside the same tick never collide.
    ///
    /// Once the numeric space is exhausted (a loaded id of `u64::MAX`), ids
    /// continue as `{max}-{n}` with the first `n` not already in use.
    fn next_id(&mut self, now: OffsetDateTime) -> String {
        let millis = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(0);
        if millis > self.last_issued_id {
            self.last_issued_id = millis;
            return millis.to_string();
        }
        if let Some(bumped) = self.last_issued_id.checked_add(1) {
            self.last_issued_id = bumped;
            return bumped.to_string();
        }

        let mut suffix: u64 = 1;
        loop {
            let candidate = format!("{}-{suffix}", self.last_issued_id);
            if self.find(&candidate).is_none() {
                warn!(post_id = %candidate, "numeric post ids exhausted; using suffixed id");
                return candidate;
            }
            suffix += 1;
        }
    }
}

fn read_persisted(storage: &dyn KeyValueStore) -> Option<Vec<Post>> {
    match storage.get(POSTS_SLOT) {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<Post>>(&raw) {
            Ok(posts) => Some(posts),
            Err(err) => {
                warn!(slot = POSTS_SLOT, error = %err, "persisted posts are unparseable; using seed");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            warn!(slot = POSTS_SLOT, error = %err, "failed to read persisted posts; using seed");
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::application::clock::FixedClock;
    use crate::application::filter::visible_posts;
    use crate::domain::categories::{Category, CategoryFilter};
    use crate::domain::posts::{WELCOME_POST_ID, WELCOME_POST_TITLE};
    use crate::infra::storage::MemoryStore;

    const NOW: OffsetDateTime = datetime!(2026-10-19 03:00 UTC);

    fn store_with(storage: Arc<MemoryStore>) -> PostStore {
        PostStore::load(storage, Arc::new(FixedClock(NOW)), PostDefaults::default())
    }

    fn draft(title: &str, category: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            excerpt: "e".to_string(),
            content: "c".to_string(),
            category: category.parse().expect("known category"),
            ..PostDraft::default()
        }
    }

    #[test]
    fn seeds_welcome_post_when_storage_is_empty() {
        let storage = Arc::new(MemoryStore::new());
        let store = store_with(storage.clone());

        assert!(store.seeded());
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, WELCOME_POST_ID);
        assert_eq!(store.list()[0].title, WELCOME_POST_TITLE);
        assert_eq!(store.list()[0].date, "19 thg 10, 2026");
        assert!(storage.get(POSTS_SLOT).expect("get").is_none());
    }

    #[test]
    fn malformed_storage_falls_back_to_seed() {
        for raw in ["not json at all", "null", "{\"id\":1}", "[{\"title\":3}]"] {
            let storage = Arc::new(MemoryStore::new());
            storage.set(POSTS_SLOT, raw).expect("set");
            let store = store_with(storage);
            assert!(store.seeded(), "input {raw:?}");
            assert_eq!(store.list().len(), 1);
            assert_eq!(store.list()[0].id, WELCOME_POST_ID);
        }
    }

    #[test]
    fn create_prepends_and_persists_full_collection() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = store_with(storage.clone());

        let created = store.create(draft("Hi", "Thiết kế")).expect("create");

        assert_eq!(store.list().len(), 2);
        assert_eq!(store.list()[0], created);
        assert_eq!(store.list()[1].title, WELCOME_POST_TITLE);
        assert_eq!(created.category, Category::Design);
        assert_eq!(created.author, DEFAULT_AUTHOR);
        assert_eq!(created.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(created.read_time, "1 phút đọc");
        assert_eq!(created.date, "19 thg 10, 2026");
        assert_eq!(created.id, (NOW.unix_timestamp() * 1000).to_string());

        let raw = storage.get(POSTS_SLOT).expect("get").expect("persisted");
        let persisted: Vec<Post> = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(persisted, store.list());

        let visible = visible_posts(store.list(), "hi", &"Tất cả".parse::<CategoryFilter>().unwrap());
        assert_eq!(visible, vec![&created]);
    }

    #[test]
    fn ids_are_unique_within_one_tick() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let first = store.create(draft("one", "food")).expect("create");
        let second = store.create(draft("two", "food")).expect("create");
        let third = store.create(draft("three", "food")).expect("create");

        assert_ne!(first.id, second.id);
        assert_ne!(second.id, third.id);
        let first_id: u64 = first.id.parse().expect("numeric id");
        let third_id: u64 = third.id.parse().expect("numeric id");
        assert_eq!(third_id, first_id + 2);
    }

    #[test]
    fn ids_stay_ahead_of_loaded_posts() {
        let storage = Arc::new(MemoryStore::new());
        let mut earlier = store_with(storage.clone());
        let existing = earlier.create(draft("first", "travel")).expect("create");

        let rewound = datetime!(2020-01-01 00:00 UTC);
        let mut reloaded =
            PostStore::load(storage, Arc::new(FixedClock(rewound)), PostDefaults::default());
        let created = reloaded.create(draft("second", "travel")).expect("create");

        assert!(!reloaded.seeded());
        assert_eq!(reloaded.list().len(), 3);
        assert!(created.id.parse::<u64>().unwrap() > existing.id.parse::<u64>().unwrap());
    }

    #[test]
    fn ids_past_the_numeric_maximum_stay_unique() {
        let storage = Arc::new(MemoryStore::new());
        let mut loaded = welcome_post("01 thg 1, 2025".to_string());
        loaded.id = u64::MAX.to_string();
        storage
            .set(POSTS_SLOT, &serde_json::to_string(&vec![loaded]).expect("json"))
            .expect("set");

        let mut store = store_with(storage);
        let first = store.create(draft("one", "food")).expect("create");
        let second = store.create(draft("two", "food")).expect("create");

        assert_eq!(first.id, format!("{}-1", u64::MAX));
        assert_eq!(second.id, format!("{}-2", u64::MAX));
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn read_time_scales_with_content_length() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let mut long = draft("long", "technology");
        long.content = "x".repeat(2_401);
        let created = store.create(long).expect("create");
        assert_eq!(created.read_time, "4 phút đọc");
    }

    #[test]
    fn explicit_author_and_image_are_kept() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        let mut custom = draft("custom", "lifestyle");
        custom.author = Some("Lan".to_string());
        custom.image_url = Some("data:image/png;base64,AAAA".to_string());
        let created = store.create(custom).expect("create");
        assert_eq!(created.author, "Lan");
        assert_eq!(created.image_url, "data:image/png;base64,AAAA");
    }

    #[test]
    fn latest_is_clamped_to_collection_size() {
        let mut store = store_with(Arc::new(MemoryStore::new()));
        assert_eq!(store.latest(HOME_FEATURED_LIMIT).len(), 1);
        for title in ["a", "b", "c"] {
            store.create(draft(title, "food")).expect("create");
        }
        let titles: Vec<&str> = store
            .latest(HOME_FEATURED_LIMIT)
            .iter()
            .map(|post| post.title.as_str())
            .collect();
        assert_eq!(titles, ["c", "b", "a"]);
    }

    #[test]
    fn find_returns_none_for_unknown_ids() {
        let store = store_with(Arc::new(MemoryStore::new()));
        assert!(store.find(WELCOME_POST_ID).is_some());
        assert!(store.find("missing").is_none());
    }
}

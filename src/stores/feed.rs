// ABOUTME: Keyed change feeds that stores publish to after every write
// ABOUTME: Watch-channel subscriptions with explicit unsubscribe for live views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Change feeds
//!
//! A [`ChangeFeed`] holds one `watch` channel per key (a profile, a diary day). Stores
//! publish the new value after each write; subscribers always see the latest value
//! and never a backlog. A channel without subscribers is dropped on the next publish
//! and re-seeded from the store on the next subscribe.
//!
//! Writers hold [`ChangeFeed::lock`] for their key from the write until the publish,
//! and subscribers hold it while reading the seed value. Publishes for one key
//! therefore happen in write order and the last published value is the stored one.

use crate::errors::{AppError, AppResult};
use dashmap::DashMap;
use std::hash::{BuildHasher, Hash, RandomState};
use tokio::sync::{watch, Mutex, MutexGuard};

/// Number of lock stripes keys are hashed onto
const WRITE_STRIPES: u64 = 16;

/// Live view of one keyed value
#[derive(Debug)]
pub struct Subscription<V> {
    receiver: watch::Receiver<V>,
}

impl<V: Clone> Subscription<V> {
    /// Wrap a receiver
    #[must_use]
    pub const fn new(receiver: watch::Receiver<V>) -> Self {
        Self { receiver }
    }

    /// Latest value
    #[must_use]
    pub fn current(&self) -> V {
        self.receiver.borrow().clone()
    }

    /// True if a value was published since the last `changed()`
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next published value
    ///
    /// # Errors
    ///
    /// Returns an error if the publishing side was dropped
    pub async fn changed(&mut self) -> AppResult<V> {
        self.receiver
            .changed()
            .await
            .map_err(|_| AppError::internal("Change feed closed"))?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Stop receiving updates
    pub fn unsubscribe(self) {
        drop(self.receiver);
    }
}

/// Keyed observer registry
#[derive(Debug)]
pub struct ChangeFeed<K, V>
where
    K: Eq + Hash,
{
    channels: DashMap<K, watch::Sender<V>>,
    write_locks: Box<[Mutex<()>]>,
    hasher: RandomState,
}

impl<K, V> Default for ChangeFeed<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            channels: DashMap::new(),
            write_locks: (0..WRITE_STRIPES).map(|_| Mutex::new(())).collect(),
            hasher: RandomState::new(),
        }
    }
}

impl<K, V> ChangeFeed<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Empty feed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordering lock for `key`
    ///
    /// Hold it across write, snapshot, and [`publish`](Self::publish), and across the
    /// read that seeds [`subscribe`](Self::subscribe). Never hold two at once.
    pub async fn lock(&self, key: &K) -> MutexGuard<'_, ()> {
        let stripe = usize::try_from(self.hasher.hash_one(key) % WRITE_STRIPES).unwrap_or(0);
        self.write_locks[stripe].lock().await
    }

    /// Subscribe to `key`, seeding the channel with `current` if nobody watches it yet
    ///
    /// `current` must be read under [`lock`](Self::lock) for the same key.
    pub fn subscribe(&self, key: K, current: V) -> Subscription<V> {
        let sender = self
            .channels
            .entry(key)
            .or_insert_with(|| watch::channel(current.clone()).0);
        if sender.receiver_count() == 0 {
            sender.send_replace(current);
        }
        Subscription::new(sender.subscribe())
    }

    /// Publish a new value for `key`, read under [`lock`](Self::lock)
    pub fn publish(&self, key: &K, value: V) {
        if self
            .channels
            .remove_if(key, |_, sender| sender.receiver_count() == 0)
            .is_some()
        {
            return;
        }
        if let Some(sender) = self.channels.get(key) {
            sender.send_replace(value);
        }
    }

    /// Number of live subscriptions on `key`
    #[must_use]
    pub fn subscriber_count(&self, key: &K) -> usize {
        self.channels
            .get(key)
            .map_or(0, |sender| sender.receiver_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_subscriber_sees_latest_value() {
        let feed: ChangeFeed<String, u32> = ChangeFeed::new();
        let mut sub = feed.subscribe("day".to_owned(), 1);
        assert_eq!(sub.current(), 1);

        feed.publish(&"day".to_owned(), 2);
        feed.publish(&"day".to_owned(), 3);
        assert_eq!(sub.changed().await.unwrap(), 3);
    }

    #[test]
    fn test_unsubscribed_channel_is_dropped() {
        let feed: ChangeFeed<&'static str, u32> = ChangeFeed::new();
        let sub = feed.subscribe("k", 1);
        assert_eq!(feed.subscriber_count(&"k"), 1);
        sub.unsubscribe();

        feed.publish(&"k", 2);
        assert_eq!(feed.subscriber_count(&"k"), 0);

        let fresh = feed.subscribe("k", 7);
        assert_eq!(fresh.current(), 7);
    }

    #[test]
    fn test_idle_channel_is_reseeded() {
        let feed: ChangeFeed<&'static str, u32> = ChangeFeed::new();
        feed.subscribe("k", 1).unsubscribe();

        let fresh = feed.subscribe("k", 5);
        assert_eq!(fresh.current(), 5);
        assert!(!fresh.has_changed());
    }

    #[tokio::test]
    async fn test_lock_serializes_same_key() {
        let feed: ChangeFeed<&'static str, u32> = ChangeFeed::new();
        let guard = feed.lock(&"k").await;
        assert!(timeout(Duration::from_millis(20), feed.lock(&"k"))
            .await
            .is_err());
        drop(guard);
        let _again = feed.lock(&"k").await;
    }
}

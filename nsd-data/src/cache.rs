use chrono::NaiveDateTime;
use log::debug;
use nsd_core::{
    observation::HourlyObservation,
    provider::{Location, WeatherSeriesProvider},
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifies one provider request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    name: String,
    latitude: u64,
    longitude: u64,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl CacheKey {
    fn new(location: &Location, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        CacheKey {
            name: location.name.clone(),
            latitude: location.latitude.to_bits(),
            longitude: location.longitude.to_bits(),
            start,
            end,
        }
    }
}

/// Memoizes another provider by (location, start, end).
///
/// Failed requests are not cached. The wrapper is `Sync`, so one cache can
/// be shared between threads estimating different seasons.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    entries: Mutex<HashMap<CacheKey, Vec<HourlyObservation>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<P: WeatherSeriesProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        CachedProvider {
            inner,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached requests.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Entries are only ever inserted whole, so a map left behind by a
    /// panicking thread is still consistent.
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Vec<HourlyObservation>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: WeatherSeriesProvider> WeatherSeriesProvider for CachedProvider<P> {
    fn hourly_observations(
        &self,
        location: &Location,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> anyhow::Result<Vec<HourlyObservation>> {
        let key = CacheKey::new(location, start, end);
        if let Some(cached) = self.entries().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss for {} {} to {}", location.name, start, end);
        let observations = self.inner.hourly_observations(location, start, end)?;
        self.entries().insert(key, observations.clone());
        Ok(observations)
    }
}

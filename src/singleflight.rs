//! Collapses concurrent calls for the same key into one execution.
//!
//! The first caller for a key starts the work as a [`Shared`] future and
//! registers it; callers arriving while it runs await a clone of it. Every
//! waiter polls the same future, so dropping any one of them (including the
//! first) leaves the rest running. Once the work completes, the next caller
//! starts a fresh execution.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{BoxFuture, FutureExt, Shared};

struct Call<T, E> {
    id: u64,
    future: Shared<BoxFuture<'static, Result<T, E>>>,
}

pub struct Group<K, T, E> {
    calls: parking_lot::Mutex<HashMap<K, Call<T, E>>>,
    next_id: AtomicU64,
}

impl<K, T, E> Default for Group<K, T, E> {
    fn default() -> Self {
        Self {
            calls: parking_lot::Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<K, T, E> std::fmt::Debug for Group<K, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group").finish_non_exhaustive()
    }
}

impl<K, T, E> Group<K, T, E>
where
    K: Hash + Eq + Clone,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` unless a call for `key` is already in flight, in which case
    /// its result is awaited instead. `f` is not invoked at all when joining.
    pub async fn run<F, Fut>(&self, key: K, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (id, future) = {
            let mut calls = self.calls.lock();
            match calls.get(&key) {
                Some(call) if call.future.peek().is_none() => {
                    log::trace!("action=singleflight-join id={}", call.id);
                    (call.id, call.future.clone())
                }
                _ => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    log::trace!("action=singleflight-start id={}", id);
                    let future = f().boxed().shared();
                    calls.insert(
                        key.clone(),
                        Call {
                            id,
                            future: future.clone(),
                        },
                    );
                    (id, future)
                }
            }
        };

        let result = future.await;

        let mut calls = self.calls.lock();
        if calls.get(&key).map_or(false, |call| call.id == id) {
            calls.remove(&key);
        }

        result
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.calls.lock().len()
    }
}

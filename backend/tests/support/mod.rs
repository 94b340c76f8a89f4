#![allow(dead_code)]

use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;

use subway_backend::db::repositories::LocalRepository;
use subway_backend::db::services;
use subway_backend::models::{LineId, Station};
use subway_backend::services::LineLocks;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Drive a future to completion on a fresh runtime (for sync tests that
/// need scoped env vars).
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
        .block_on(future)
}

/// Create a line named `name` and add `sections` to it in order.
pub async fn seeded_line(
    repo: &LocalRepository,
    locks: &LineLocks,
    name: &str,
    sections: &[(&str, &str, u32)],
) -> LineId {
    let line = services::create_line(repo, name, "green")
        .await
        .expect("create line");
    for (source, target, distance) in sections {
        services::register_section(
            repo,
            locks,
            line.id,
            Station::from(*source),
            Station::from(*target),
            *distance,
        )
        .await
        .expect("register section");
    }
    line.id
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

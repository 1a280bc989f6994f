#![no_main]

use libfuzzer_sys::fuzz_target;
use listo_core::storage::{CookieJar, KeyValueStore, MemoryStore};
use listo_core::{Migrator, TodoList, VERSION};
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(header) = std::str::from_utf8(data) else {
        return;
    };

    // Not backed by a real file; clearing writes to a path that never exists.
    let jar = CookieJar::from_header(Path::new("/nonexistent/listo-fuzz/cookies.txt"), header);
    let mut migrator = Migrator::new(MemoryStore::new(), jar);
    let _ = migrator.migrate();
    let (store, _) = migrator.into_inner();

    assert_eq!(store.get("version"), Some(serde_json::json!(VERSION)));
    // Whatever was migrated must load as a list without panicking.
    let _ = TodoList::load(store).items().len();
});

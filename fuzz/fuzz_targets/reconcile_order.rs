#![no_main]

use libfuzzer_sys::fuzz_target;
use listo_core::ordering::{lookup_index, reconcile, reorder};

fuzz_target!(|data: &[u8]| {
    let Some((split, rest)) = data.split_first() else {
        return;
    };
    let at = usize::from(*split).min(rest.len());
    let (stored, live) = rest.split_at(at);
    let stored: Vec<u64> = stored.iter().map(|b| u64::from(*b)).collect();
    let mut live: Vec<u64> = live.iter().map(|b| u64::from(*b)).collect();
    live.sort_unstable();
    live.dedup();

    let mut ordering = reconcile(&stored, &live);
    assert_eq!(ordering.len(), live.len());
    assert_eq!(reconcile(&ordering, &live), ordering);

    if let (Some(&first), Some(&last)) = (ordering.first(), ordering.last()) {
        reorder(&mut ordering, last, first);
        assert_eq!(lookup_index(&ordering, last), Some(0));
    }
});

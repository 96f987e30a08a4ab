#![no_main]
use kairos_libs::{IntervalStore, WeightedInterval};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;

fuzz_target!(|data: Vec<WeightedInterval<u8, u8>>| {
    let store = match IntervalStore::from_intervals(&data) {
        Ok(store) => store,
        Err(_) => {
            assert!(
                data.iter().any(|interval| !interval.is_valid()),
                "Only malformed intervals are rejected"
            );
            return;
        }
    };

    let boundaries = store.boundaries();
    assert!(
        boundaries.windows(2).all(|pair| pair[0] < pair[1]),
        "Boundaries are strictly increasing"
    );

    for (index, pair) in boundaries.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        let expected: BTreeSet<u8> = data
            .iter()
            .filter(|interval| interval.overlaps(start, end))
            .map(|interval| interval.tag)
            .collect();

        assert_eq!(
            store.covering_tags(start, end),
            expected,
            "Covering tags of [{}, {})",
            start,
            end
        );
        assert_eq!(store.segment(index), Some(&expected));
        assert!(
            data.iter()
                .filter(|interval| expected.contains(&interval.tag))
                .any(|interval| interval.covers(start, end)),
            "Some interval of a covering tag spans the whole segment"
        );
    }
});

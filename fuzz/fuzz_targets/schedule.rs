#![no_main]
use kairos_libs::{Query, Scheduler, WeightedInterval};
use libfuzzer_sys::fuzz_target;

fn covered(intervals: &[WeightedInterval<u8, u8>], tag: u8, start: u8, end: u8) -> bool {
    (start..end).all(|minute| {
        intervals
            .iter()
            .any(|interval| interval.tag == tag && interval.covers(minute, minute + 1))
    })
}

fuzz_target!(|data: (Vec<WeightedInterval<u8, u8>>, Query<u8>)| {
    // searching for windows with wrong participants
    #[cfg(feature = "log")]
    let _ = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(std::io::stdout())
        .apply();

    let (intervals, query) = data;
    let scheduler = match Scheduler::new(&intervals) {
        Ok(scheduler) => scheduler,
        Err(_) => return,
    };

    let windows = match scheduler.query(&query) {
        Ok(windows) => windows,
        Err(_) => {
            assert_eq!(query.duration, 0, "Only empty durations are rejected");
            return;
        }
    };

    if let Some(limit) = query.limit() {
        assert!(windows.len() <= limit, "Limit exceeded");
    }

    for (a, b) in windows.iter().zip(windows.iter().skip(1)) {
        assert!(
            a.participants.len() >= b.participants.len(),
            "Windows are not ranked: {:?} before {:?}",
            a,
            b
        );
    }

    for window in windows.iter() {
        assert!(window.length() >= query.duration, "Window too short: {:?}", window);

        for interval in intervals.iter() {
            assert_eq!(
                covered(&intervals, interval.tag, window.start, window.end),
                window.participants.contains(&interval.tag),
                "Participant {} in window {:?}",
                interval.tag,
                window
            );
        }
    }
});

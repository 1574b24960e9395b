//! Integration tests for the timer family on real clocks.

use std::thread;
use std::time::Duration;

use utilkit_timing::{
    ImmutableTimer, Microseconds, Milliseconds, MonotonicClock, Nanoseconds, ResettableTimer,
    StatsTimer, SystemClock, UtcClock,
};

#[test]
fn immutable_elapsed_is_non_decreasing() {
    let timer = ImmutableTimer::<MonotonicClock, Nanoseconds>::new();
    let mut previous = timer.elapsed();
    for _ in 0..1_000 {
        let current = timer.elapsed();
        assert!(current >= previous);
        previous = current;
    }
}

#[test]
fn reset_brings_elapsed_back_near_zero() {
    let mut timer = ResettableTimer::<MonotonicClock, Microseconds>::new();
    thread::sleep(Duration::from_millis(20));
    let before = timer.elapsed();
    assert!(before.count() >= 20_000);

    timer.reset();
    let after = timer.elapsed();
    assert!(after < before);
    assert!(after.count() < 10_000, "reset left {after} on the clock");
}

#[test]
fn wall_clocks_measure_sleeps() {
    let system = ImmutableTimer::<SystemClock, Milliseconds>::new();
    let utc = ImmutableTimer::<UtcClock, Milliseconds>::new();
    thread::sleep(Duration::from_millis(15));
    assert!(system.elapsed_ms() >= 10);
    assert!(utc.elapsed_ms() >= 10);
}

#[test]
fn timers_can_be_read_from_several_threads() {
    let timer = ImmutableTimer::<MonotonicClock, Microseconds>::new();
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let first = timer.elapsed();
                let second = timer.elapsed();
                assert!(second >= first);
            });
        }
    });
}

#[test]
fn stats_timer_on_monotonic_clock() {
    let mut stats = StatsTimer::<4>::new();
    for _ in 0..2 {
        stats.start();
        thread::sleep(Duration::from_millis(5));
        assert!(stats.stop().is_some());
    }
    assert_eq!(stats.samples().len(), 2);
    assert!(stats.average() >= Duration::from_millis(5));
}

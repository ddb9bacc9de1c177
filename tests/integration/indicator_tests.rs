//! Indicator driver: per-channel blink workers against a recording bank.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alertnode::app::ports::OutputBank;
use alertnode::drivers::indicator::{IndicatorDriver, SELF_TEST_FLASH};
use alertnode::error::IndicatorError;
use alertnode::pins;

use crate::mock_hw::{MockBank, fast_config, wait_until};

const SETTLE: Duration = Duration::from_secs(2);

fn driver() -> (IndicatorDriver, Arc<MockBank>) {
    let bank = MockBank::new();
    let shared: Arc<dyn OutputBank> = bank.clone();
    (IndicatorDriver::new(shared, &fast_config()), bank)
}

#[test]
fn start_blinks_until_stopped_and_leaves_output_low() {
    let (leds, bank) = driver();
    leds.start("D1").unwrap();
    assert!(leds.is_running("D1"));
    assert!(wait_until(SETTLE, || bank.has_toggled(pins::LED_D1_GPIO)));

    leds.stop("D1").unwrap();
    assert!(!leds.is_running("D1"));
    assert!(!bank.level(pins::LED_D1_GPIO));

    let n = bank.write_count(pins::LED_D1_GPIO);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(bank.write_count(pins::LED_D1_GPIO), n, "no writes after stop");
}

#[test]
fn unknown_channel_is_rejected_without_side_effects() {
    let (leds, bank) = driver();
    assert_eq!(leds.start("D9"), Err(IndicatorError::UnknownChannel));
    assert_eq!(leds.stop("D9"), Err(IndicatorError::UnknownChannel));
    assert!(leds.active_channels().is_empty());
    for ch in leds.channels() {
        assert_eq!(bank.write_count(ch.pin), 0);
    }
}

#[test]
fn stopping_an_idle_channel_is_a_no_op() {
    let (leds, bank) = driver();
    assert_eq!(leds.stop("D2"), Ok(()));
    assert_eq!(bank.write_count(pins::LED_D2_GPIO), 0);
}

#[test]
fn restart_leaves_exactly_one_writer() {
    let (leds, bank) = driver();
    for _ in 0..10 {
        leds.start("D1").unwrap();
    }
    let after_last_start = Instant::now();
    assert!(wait_until(SETTLE, || {
        bank.writers_since(pins::LED_D1_GPIO, after_last_start).len() == 1
            && bank.write_count(pins::LED_D1_GPIO) > 20
    }));
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(bank.writers_since(pins::LED_D1_GPIO, after_last_start).len(), 1);
    assert_eq!(leds.active_channels().len(), 1);
}

#[test]
fn channels_run_independently() {
    let (leds, bank) = driver();
    leds.start("D1").unwrap();
    leds.start("D2").unwrap();
    assert!(wait_until(SETTLE, || bank.has_toggled(pins::LED_D2_GPIO)));

    leds.stop("D1").unwrap();
    assert!(leds.is_running("D2"));
    assert!(!leds.is_running("D1"));

    let d1 = bank.write_count(pins::LED_D1_GPIO);
    let d2 = bank.write_count(pins::LED_D2_GPIO);
    assert!(wait_until(SETTLE, || bank.write_count(pins::LED_D2_GPIO) > d2 + 4));
    assert_eq!(bank.write_count(pins::LED_D1_GPIO), d1);
}

#[test]
fn stop_all_is_idempotent_and_forces_every_output_low() {
    let (leds, bank) = driver();
    for name in ["D1", "D2", "D3", "D4"] {
        leds.start(name).unwrap();
    }
    assert_eq!(leds.active_channels().len(), 4);

    leds.stop_all();
    assert!(leds.active_channels().is_empty());
    for ch in leds.channels() {
        assert!(!bank.level(ch.pin), "{} left high", ch.name);
    }

    leds.stop_all();
    assert!(leds.active_channels().is_empty());
}

#[test]
fn stop_all_on_an_idle_driver_still_drives_outputs_low() {
    let (leds, bank) = driver();
    leds.stop_all();
    for ch in leds.channels() {
        let w = bank.writes_for(ch.pin);
        assert_eq!(w.len(), 1);
        assert!(!w[0].high);
    }
}

#[test]
fn write_failure_ends_the_cycle() {
    let (leds, bank) = driver();
    bank.fail(pins::LED_D3_GPIO);
    leds.start("D3").unwrap();
    assert!(wait_until(SETTLE, || !leds.is_running("D3")));
    // Restarting after the failure is allowed.
    assert!(leds.start("D3").is_ok());
}

#[test]
fn stuck_worker_does_not_block_a_restart() {
    let mut cfg = fast_config();
    cfg.worker_stop_timeout_ms = 200;
    let bank = MockBank::new();
    let shared: Arc<dyn OutputBank> = bank.clone();
    let leds = IndicatorDriver::new(shared, &cfg);

    bank.stall_next_high(pins::LED_D1_GPIO, Duration::from_secs(2));
    leds.start("D1").unwrap();
    std::thread::sleep(Duration::from_millis(20));

    let t0 = Instant::now();
    leds.start("D1").unwrap();
    let took = t0.elapsed();
    assert!(took >= Duration::from_millis(200), "gave up early: {took:?}");
    assert!(took < Duration::from_millis(900), "waited on the stuck worker: {took:?}");

    assert!(leds.is_running("D1"));
    let restarted = Instant::now();
    assert!(wait_until(SETTLE, || {
        bank.writes_for(pins::LED_D1_GPIO).iter().filter(|w| w.at >= restarted).count() > 4
    }));
}

#[test]
fn double_start_then_stop_goes_quiet() {
    let (leds, bank) = driver();
    leds.start("D2").unwrap();
    leds.start("D2").unwrap();
    assert!(wait_until(SETTLE, || bank.has_toggled(pins::LED_D2_GPIO)));

    leds.stop("D2").unwrap();
    assert!(!leds.is_running("D2"));
    assert!(!bank.level(pins::LED_D2_GPIO));
    let n = bank.write_count(pins::LED_D2_GPIO);
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(bank.write_count(pins::LED_D2_GPIO), n, "a retired worker kept writing");
}

#[test]
fn self_test_flashes_each_channel_once_in_order() {
    let (leds, bank) = driver();
    leds.self_test();

    let mut firsts = Vec::new();
    for ch in leds.channels() {
        let w = bank.writes_for(ch.pin);
        assert_eq!(w.iter().map(|w| w.high).collect::<Vec<_>>(), [true, false], "{}", ch.name);
        assert!(w[1].at - w[0].at >= SELF_TEST_FLASH);
        firsts.push(w[0].at);
    }
    assert!(firsts.windows(2).all(|p| p[0] <= p[1]));
    assert!(leds.active_channels().is_empty());
}

#[test]
fn self_test_survives_a_failing_output() {
    let (leds, bank) = driver();
    bank.fail(pins::LED_D2_GPIO);
    leds.self_test();
    assert_eq!(bank.write_count(pins::LED_D2_GPIO), 0);
    assert_eq!(bank.write_count(pins::LED_D3_GPIO), 2);
}

#[test]
fn dropping_the_driver_stops_workers() {
    let (leds, bank) = driver();
    leds.start("D4").unwrap();
    assert!(wait_until(SETTLE, || bank.has_toggled(pins::LED_D4_GPIO)));
    drop(leds);

    assert!(!bank.level(pins::LED_D4_GPIO));
    let n = bank.write_count(pins::LED_D4_GPIO);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(bank.write_count(pins::LED_D4_GPIO), n);
}

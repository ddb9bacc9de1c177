//! Radio messages and button presses hitting the service from different
//! threads at once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use alertnode::alert::classify;
use alertnode::app::ack::AckTrigger;
use alertnode::app::screens;

use crate::mock_hw::{Frame, MockRadio, RecordingSink, Rig, fast_config};

const MESSAGES: [&str; 4] = [
    "FIRE DETAILS: Barn fire on Route 9 crews responding|x ||LED:D1:BLINK",
    "FLOOD on Main",
    "HAZMAT DETAILS: Tanker leak at rail yard, shelter in place| ||LED:D3:ON",
    "MEDICAL help",
];

#[test]
fn last_render_matches_final_state() {
    let rig = Rig::new();
    let service = &rig.service;
    let ack = AckTrigger::new(&fast_config());

    thread::scope(|s| {
        s.spawn(|| {
            let mut sink = RecordingSink::default();
            for i in 0..40 {
                service.on_message(MESSAGES[i % MESSAGES.len()], &mut sink);
            }
        });
        s.spawn(|| {
            let mut sink = RecordingSink::default();
            let mut radio = MockRadio::default();
            for _ in 0..40 {
                ack.handle_press(service, &mut radio, &mut sink);
                service.redisplay();
            }
        });
    });

    // Settle on the current state, then check nothing stale got the last word.
    service.redisplay();
    let state = service.snapshot();
    assert!(state.active);
    let content = service.display().content();
    assert_eq!(content.line1, state.category.title());
    assert_eq!(rig.display.max_in_flight(), 1);
}

#[test]
fn snapshots_are_never_torn() {
    let rig = Rig::new();
    let service = &rig.service;
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            let mut sink = RecordingSink::default();
            for i in 0..60 {
                let msg = if i % 7 == 6 { "ALL CLEAR" } else { MESSAGES[i % MESSAGES.len()] };
                service.on_message(msg, &mut sink);
            }
            done.store(true, Ordering::SeqCst);
        });
        s.spawn(|| {
            while !done.load(Ordering::SeqCst) {
                let snap = service.snapshot();
                if snap.active {
                    assert_eq!(classify(&snap.raw_text).category, snap.category);
                } else {
                    assert!(snap.raw_text.is_empty());
                }
            }
        });
    });
}

#[test]
fn all_clear_racing_ack_ends_cleared_and_dark() {
    let mut rig = Rig::new();
    rig.service.on_message("FIRE ||LED:D1:BLINK", &mut rig.sink);
    rig.service.on_message("FLOOD ||LED:D2:BLINK", &mut rig.sink);
    let service = &rig.service;
    let ack = AckTrigger::new(&fast_config());

    thread::scope(|s| {
        s.spawn(|| {
            let mut sink = RecordingSink::default();
            service.on_message("ALL CLEAR", &mut sink);
        });
        s.spawn(|| {
            let mut sink = RecordingSink::default();
            let mut radio = MockRadio::default();
            for _ in 0..10 {
                ack.handle_press(service, &mut radio, &mut sink);
            }
        });
    });

    assert!(!service.snapshot().active);
    assert!(service.indicators().active_channels().is_empty());
    service.redisplay();
    let (l1, l2) = screens::READY;
    assert_eq!(rig.display.last(), Some(Frame::Render(l1.into(), l2.into())));
}

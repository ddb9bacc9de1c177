//! Acknowledge button: debounce, outbound text, confirmation timing.

use std::time::{Duration, Instant};

use alertnode::app::ack::AckTrigger;
use alertnode::app::deferred::{DeferredRedisplay, FollowUp};
use alertnode::app::events::AppEvent;
use alertnode::app::screens;

use crate::mock_hw::{Frame, MockRadio, Rig, fast_config};

fn render(pair: (&str, &str)) -> Frame {
    Frame::Render(pair.0.to_owned(), pair.1.to_owned())
}

#[test]
fn status_check_when_idle() {
    let mut rig = Rig::new();
    let ack = AckTrigger::new(&fast_config());
    let mut radio = MockRadio::default();

    let follow_up = ack.handle_press(&rig.service, &mut radio, &mut rig.sink);
    assert_eq!(follow_up, FollowUp::RedisplayAfter(Duration::from_secs(2)));

    assert_eq!(
        radio.sent,
        [("Status check from LRR Receiver: Everything OK here!".to_owned(), 0)]
    );
    assert_eq!(rig.display.last(), Some(render(screens::SENDING_ACK)));
    assert_eq!(
        rig.sink.events,
        [AppEvent::AckSent {
            text: "Status check from LRR Receiver: Everything OK here!".into(),
            alert_active: false,
        }]
    );
}

#[test]
fn acknowledgment_when_alert_active_leaves_state_alone() {
    let mut rig = Rig::new();
    rig.service.on_message("FIRE on Elm St ||LED:D1:BLINK", &mut rig.sink);
    let before = rig.service.snapshot();

    let ack = AckTrigger::new(&fast_config());
    let mut radio = MockRadio::default();
    ack.handle_press(&rig.service, &mut radio, &mut rig.sink);

    let (text, channel) = &radio.sent[0];
    assert_eq!(text, "ACK from LRR Receiver: Last alert received and acknowledged");
    assert_eq!(*channel, 0);
    assert_eq!(rig.service.snapshot(), before);
    assert!(rig.service.indicators().is_running("D1"));
}

#[test]
fn configured_name_and_channel_are_used() {
    let mut cfg = fast_config();
    cfg.node_name = "Hilltop".try_into().unwrap();
    cfg.channel_index = 2;
    let mut rig = Rig::with_config(&cfg);
    let ack = AckTrigger::new(&cfg);
    let mut radio = MockRadio::default();

    ack.handle_press(&rig.service, &mut radio, &mut rig.sink);
    assert_eq!(radio.sent[0].0, "Status check from Hilltop: Everything OK here!");
    assert_eq!(radio.sent[0].1, 2);
}

#[test]
fn send_failure_still_schedules_the_redisplay() {
    let mut rig = Rig::new();
    let ack = AckTrigger::new(&fast_config());
    let mut radio = MockRadio {
        fail: true,
        ..MockRadio::default()
    };

    let follow_up = ack.handle_press(&rig.service, &mut radio, &mut rig.sink);
    assert!(matches!(follow_up, FollowUp::RedisplayAfter(_)));
    assert!(radio.sent.is_empty());
    assert_eq!(rig.sink.events, [AppEvent::AckFailed]);
}

#[test]
fn poll_debounces_button_bounce() {
    let mut rig = Rig::new();
    let mut ack = AckTrigger::new(&fast_config());
    let mut radio = MockRadio::default();

    // Press, bounce within the window, release, press again after it.
    let samples = [
        (false, 0),
        (true, 10),
        (false, 20),
        (true, 30),
        (false, 100),
        (true, 400),
        (true, 420),
    ];
    let mut presses = 0;
    for (pressed, t) in samples {
        let f = ack.poll(pressed, t, &rig.service, &mut radio, &mut rig.sink);
        if f != FollowUp::None {
            presses += 1;
        }
    }
    assert_eq!(presses, 2);
    assert_eq!(radio.sent.len(), 2);
}

#[test]
fn confirmation_returns_to_alert_screen() {
    let mut rig = Rig::new();
    let ack = AckTrigger::new(&fast_config());
    let mut radio = MockRadio::default();
    let mut redisplay = DeferredRedisplay::new();
    let t0 = Instant::now();

    rig.service.on_message("MEDICAL at 5th", &mut rig.sink);
    redisplay.apply(ack.handle_press(&rig.service, &mut radio, &mut rig.sink), t0);
    assert_eq!(rig.display.last(), Some(render(screens::SENDING_ACK)));

    assert!(!redisplay.take_due(t0 + Duration::from_secs(1)));
    assert!(redisplay.take_due(t0 + Duration::from_secs(2)));
    rig.service.redisplay();
    assert_eq!(
        rig.display.last(),
        Some(Frame::Render("MEDICAL!".into(), "MEDICAL at 5th".into()))
    );
}

#[test]
fn confirmation_returns_to_ready_when_idle() {
    let mut rig = Rig::new();
    let ack = AckTrigger::new(&fast_config());
    let mut radio = MockRadio::default();

    ack.handle_press(&rig.service, &mut radio, &mut rig.sink);
    rig.service.redisplay();
    assert_eq!(rig.display.last(), Some(render(screens::READY)));
}

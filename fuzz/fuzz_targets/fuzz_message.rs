//! Fuzz target: inbound message grammar
//!
//! Feeds arbitrary text through `classify` and `parse_device_command` and
//! checks the outputs stay within what the display and indicator driver
//! can accept.
//!
//! cargo fuzz run fuzz_message

#![no_main]

use alertnode::alert::{classify, parse_device_command};
use alertnode::drivers::display::{LCD_COLS, Marquee};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let c = classify(text);
    assert!(text.contains(c.body), "body must borrow from the message");
    assert!(c.category.title().len() <= LCD_COLS);

    if let Some(cmd) = parse_device_command(text) {
        assert!(!cmd.target_channel.is_empty());
        assert!(!cmd.target_channel.chars().any(|ch| ch.is_ascii_lowercase()));
    }

    let m = Marquee::new(c.category.title(), c.body, 4);
    for t in 0..m.cycle_len().min(64) {
        let (a, b) = m.frame(t);
        assert_eq!(a.chars().count(), LCD_COLS);
        assert_eq!(b.chars().count(), LCD_COLS);
    }
});

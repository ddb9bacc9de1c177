//! Fuzz target: `LineAssembler::feed` + `parse_line`
//!
//! Arbitrary bytes from the radio UART, split at an arbitrary point, must
//! never panic and must never produce a packet over the text capacity.
//!
//! cargo fuzz run fuzz_serial_lines

#![no_main]

use alertnode::adapters::radio::{LineAssembler, parse_line};
use alertnode::events::{MAX_TEXT_LEN, Payload};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (a, b) = rest.split_at(usize::from(split).min(rest.len()));

    let mut asm = LineAssembler::new();
    let mut check = |line: &str| {
        if let Some(packet) = parse_line(line) {
            if let Payload::Text(text) = packet.payload {
                assert!(text.len() <= MAX_TEXT_LEN);
                assert!(!text.is_empty());
            }
        }
    };
    asm.feed(a, &mut check);
    asm.feed(b, &mut check);
});

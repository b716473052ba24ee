//! Property test for the scanner's core invariant: repeated
//! `scan_next` calls until `is_complete()` produce a disjoint, ordered
//! cover of every published content frame, in order, exactly once.

use log_scanner::test_support::{publish_tail, write_frame_header};
use log_scanner::{FrameDescriptor, LogBuffer, LogScanner, StateBuffer};
use proptest::prelude::*;

const ALIGNMENT: u32 = 32;
const HEADER: i32 = 32;

fn align_up(value: u32) -> u32 {
    (value + ALIGNMENT - 1) / ALIGNMENT * ALIGNMENT
}

proptest! {
    #[test]
    fn scan_next_covers_every_frame_exactly_once_in_order(
        lengths in prop::collection::vec(1u32..4000, 1..40),
        limit_factor in 1u32..8,
    ) {
        let aligned_lengths: Vec<u32> = lengths.iter().map(|&l| align_up(l)).collect();
        let total: u32 = aligned_lengths.iter().sum::<u32>() + ALIGNMENT;

        let mut log = LogBuffer::create_anonymous(total).unwrap();
        let mut state = StateBuffer::create_anonymous(0).unwrap();

        let mut offset = 0u32;
        let mut expected = Vec::new();
        for (&len, &aligned) in lengths.iter().zip(aligned_lengths.iter()) {
            write_frame_header(&mut log, offset, 4, len as i32, 1);
            expected.push((offset, aligned));
            offset += aligned;
        }
        publish_tail(&mut state, offset);

        let descriptor = FrameDescriptor::new(HEADER, ALIGNMENT);
        let mut scanner = LogScanner::new(log, state, descriptor).unwrap();

        // Limit is at least the largest single frame so forward
        // progress is always possible; scaled by limit_factor to
        // exercise both single-frame and large-batch paths.
        let max_aligned = *aligned_lengths.iter().max().unwrap();
        let limit = max_aligned * limit_factor;

        let mut delivered = Vec::new();
        let mut stalls = 0;
        while !scanner.is_complete() {
            let mut batch = None;
            let count = scanner.scan_next(limit, |o, l| batch = Some((o, l)));
            if count == 0 {
                stalls += 1;
                prop_assert!(stalls < 10_000, "scan_next made no progress for too long");
                if scanner.offset() >= total { break; }
                continue;
            }
            delivered.push(batch.unwrap());
        }

        // Reconstruct the cover from delivered (offset, length) ranges:
        // every published frame must appear exactly once, in order,
        // with no overlap and no gap other than aligned-away padding.
        let mut cursor = 0u32;
        let mut expected_iter = expected.iter();
        for &(off, len) in &delivered {
            prop_assert!(off >= cursor);
            let mut remaining = len;
            let mut pos = off;
            while remaining > 0 {
                let (exp_off, exp_len) = *expected_iter.next().expect("ran out of expected frames");
                prop_assert_eq!(pos, exp_off);
                prop_assert!(remaining >= exp_len);
                pos += exp_len;
                remaining -= exp_len;
            }
            cursor = pos;
        }
        prop_assert!(expected_iter.next().is_none(), "not every frame was covered");
    }
}

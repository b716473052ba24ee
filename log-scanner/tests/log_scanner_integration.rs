//! Black-box tests driving a [`LogScanner`] against a producer thread,
//! exercising the spin-wait path and strict append ordering end to end.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log_scanner::test_support::{publish_tail, raw_log_ptr, raw_state_ptr, tail_offset, write_frame_header};
use log_scanner::{FrameDescriptor, LogBuffer, LogScanner, StateBuffer};

#[test]
fn scanner_delivers_already_published_frames_in_order() {
    let mut log = LogBuffer::create_anonymous(4096).unwrap();
    let mut state = StateBuffer::create_anonymous(0).unwrap();
    let descriptor = FrameDescriptor::new(32, 32);

    write_frame_header(&mut log, 0, 4, 96, 1);
    write_frame_header(&mut log, 96, 4, 160, 1);
    publish_tail(&mut state, 256);

    let mut scanner = LogScanner::new(log, state, descriptor).unwrap();

    let mut first_batch = None;
    let count = scanner.scan_next(4096, |offset, length| first_batch = Some((offset, length)));
    assert_eq!(count, 2);
    assert_eq!(first_batch, Some((0, 256)));
    assert_eq!(scanner.offset(), 256);
}

#[test]
fn concurrent_producer_unblocks_a_spinning_scanner() {
    let mut log = LogBuffer::create_anonymous(4096).unwrap();
    let mut state = StateBuffer::create_anonymous(0).unwrap();
    let descriptor = FrameDescriptor::new(32, 32);

    // Reach into the raw mappings to share them between the producer
    // thread and the scanner, mirroring two processes mapping the same
    // shared-memory file.
    let log_ptr = raw_log_ptr(&mut log) as usize;
    let state_ptr = raw_state_ptr(&mut state) as usize;
    let log_len = log.capacity() as usize;
    let tail_offset = tail_offset(&state) as usize;

    let mut scanner = LogScanner::new(log, state, descriptor).unwrap();
    let published = Arc::new(AtomicBool::new(false));
    let published_clone = Arc::clone(&published);

    let producer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));

        // Safety: the scanner thread only reads through its owned
        // buffers and this thread is the sole writer, matching the
        // single-producer/single-reader contract under test.
        unsafe {
            let log_slice = std::slice::from_raw_parts_mut(log_ptr as *mut u8, log_len);
            let type_ptr = log_slice.as_mut_ptr().add(4);
            std::ptr::copy_nonoverlapping(1u16.to_le_bytes().as_ptr(), type_ptr, 2);
            std::sync::atomic::fence(Ordering::Release);
            let length_ptr = log_slice.as_mut_ptr() as *mut std::sync::atomic::AtomicI32;
            (*length_ptr).store(64, Ordering::Release);

            let tail_ptr = (state_ptr + tail_offset) as *mut std::sync::atomic::AtomicU32;
            (*tail_ptr).store(64, Ordering::Release);
        }
        published_clone.store(true, Ordering::Release);
    });

    let mut delivered = None;
    while delivered.is_none() {
        scanner.scan_next(4096, |offset, length| delivered = Some((offset, length)));
        if delivered.is_none() {
            thread::yield_now();
        }
    }

    producer.join().unwrap();
    assert!(published.load(Ordering::Acquire));
    assert_eq!(delivered, Some((0, 64)));
}

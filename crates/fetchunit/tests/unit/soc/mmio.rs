//! MMIO Window Unit Tests.
//!
//! Uses a heap buffer as stand-in for a mapped register block and verifies
//! volatile access, bounds checks and alignment checks.

use std::ptr::NonNull;

use dpu_fetchunit::RegisterPort;
use dpu_fetchunit::soc::MmioWindow;

use crate::common::harness::capture_logs;

/// Builds a window over `words` and returns it with the backing storage.
fn window(words: &mut [u32]) -> MmioWindow {
    let base = NonNull::new(words.as_mut_ptr().cast::<u8>()).unwrap();
    // SAFETY: the slice is 4-aligned, outlives the window in every test, and
    // is only touched through the window while it exists.
    unsafe { MmioWindow::new(base, words.len() * 4) }
}

#[test]
fn reads_and_writes_reach_backing_memory() {
    let mut words = vec![0_u32; 16];
    words[4] = 0x1234_5678;
    {
        let mut win = window(&mut words);
        assert_eq!(win.size(), 64);
        assert_eq!(win.read_u32(0x10), 0x1234_5678);
        win.write_u32(0x34, 0x8000_0000);
    }
    assert_eq!(words[13], 0x8000_0000);
}

#[test]
fn last_word_is_in_bounds() {
    let mut words = vec![0_u32; 4];
    {
        let mut win = window(&mut words);
        win.write_u32(0x0C, 7);
    }
    assert_eq!(words[3], 7);
}

#[test]
fn out_of_window_access_is_dropped() {
    let mut words = vec![0_u32; 4];
    let mut win = window(&mut words);

    let ((), logs) = capture_logs(|| win.write_u32(0x10, 1));
    assert!(logs.contains("outside window"), "{logs}");
    assert_eq!(win.read_u32(0x10), 0);
    assert_eq!(win.read_u32(u64::MAX - 3), 0);
}

#[test]
fn unaligned_access_is_dropped() {
    let mut words = vec![0xFFFF_FFFF_u32; 4];
    let mut win = window(&mut words);
    assert_eq!(win.read_u32(0x02), 0);
    win.write_u32(0x06, 0);
    assert_eq!(win.read_u32(0x04), 0xFFFF_FFFF);
}

use alloc::vec::Vec;

use quickcheck::{QuickCheck, TestResult};
use quickcheck_macros::quickcheck;

use crate::{BufferOptions, Store};

/// Property: however the input is chunked, and however many growth events
/// the chunks trigger, the logical content is the concatenation of every
/// write and reads hand the chunks back in order.
#[test]
fn chunked_writes_round_trip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(chunks: Vec<Vec<u8>>, min_allocation: u8) -> bool {
        let mut store = Store::with_options(BufferOptions {
            min_allocation: usize::from(min_allocation),
            ..BufferOptions::default()
        });
        let mut expected = Vec::new();
        for chunk in &chunks {
            store.write(chunk).unwrap();
            expected.extend_from_slice(chunk);
            if store.capacity() < store.len() {
                return false;
            }
        }
        if store.to_vec() != expected {
            return false;
        }
        chunks
            .iter()
            .all(|chunk| store.read(chunk.len(), true).unwrap() == *chunk)
            && store.remaining() == 0
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<Vec<u8>>, u8) -> bool);
}

/// Property: peeking twice yields the same bytes, a read after a peek yields
/// them a third time, and the following read moves on to fresh bytes.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn peek_then_read_agree(data: Vec<u8>, n: usize) -> TestResult {
    if data.is_empty() {
        return TestResult::discard();
    }
    let n = 1 + n % data.len();
    let mut store = Store::from_vec(data.clone());

    let first = store.peek(n, true).unwrap();
    let second = store.peek(n, true).unwrap();
    let read = store.read(n, true).unwrap();
    if first != data[..n] || first != second || first != read {
        return TestResult::failed();
    }
    if store.read_position() != n {
        return TestResult::failed();
    }

    let rest = store.read(n, false).unwrap();
    let tail = &data[n..(2 * n).min(data.len())];
    TestResult::from_bool(rest[..tail.len()] == *tail && rest[tail.len()..].iter().all(|&b| b == 0))
}

/// Property: reading past the end is an error in strict mode and a short,
/// zero-padded read otherwise.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn over_reads(data: Vec<u8>, extra: u8) -> bool {
    let want = data.len() + usize::from(extra) + 1;

    let mut strict = Store::from_vec(data.clone());
    let strict_failed = strict
        .read(want, true)
        .is_err_and(|err| err.is_end_of_data())
        && strict.read_position() == 0;

    let mut lenient = Store::from_vec(data.clone());
    let got = lenient.read(want, false).unwrap();
    strict_failed
        && got.len() == want
        && got[..data.len()] == data[..]
        && got[data.len()..].iter().all(|&b| b == 0)
        && lenient.remaining() == 0
}

//! Randomized checks for the universal properties spec §8 states in prose
//! rather than a single worked example: the matcher never overflows the
//! native stack on pathological alternation/repetition, and a successful
//! match's capture spans always stay within the searched haystack.

use nregex::{compile, CompileFlags, ExecOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8] = b"ab";

fn random_subject(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())]).collect()
}

// Recursion-limit termination (spec §7 "recursion limit exceeded during
// match" / §8): patterns shaped to maximize backtracking must still return
// rather than blow the stack, across many random subjects and lengths.
#[test]
fn pathological_alternation_never_overflows_the_stack() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let patterns: &[&[u8]] = &[b"(a|a|a|a)*b", b"(a*)*b", b"(a+)+b", b"(a|ab)*c"];

    for &pattern in patterns {
        let prog = compile(pattern, CompileFlags::empty()).expect("pattern should compile");
        for _ in 0..20 {
            let len = rng.gen_range(0..2_000);
            let subject = random_subject(&mut rng, len);
            let _ = prog.exec(&subject, &ExecOptions::default()).unwrap();
        }
    }
}

// Capture spans, when present, must always lie within the searched slice and
// be ordered start <= end -- true regardless of what the random subject
// happens to contain.
#[test]
fn capture_spans_always_stay_within_bounds() {
    let mut rng = StdRng::seed_from_u64(0xFEEDFACE);
    let prog = compile(br"(a+)(b*)(c?)", CompileFlags::empty()).unwrap();

    for _ in 0..200 {
        let len = rng.gen_range(0..64);
        let subject: Vec<u8> = (0..len)
            .map(|_| *b"abc".get(rng.gen_range(0..3)).unwrap())
            .collect();
        if let Some(caps) = prog.exec(&subject, &ExecOptions::default()).unwrap() {
            for i in 0..prog.capture_count() {
                if let Some((s, e)) = caps.get(i) {
                    assert!(s <= e, "capture {i} start {s} > end {e}");
                    assert!(e <= subject.len(), "capture {i} end {e} beyond subject len {}", subject.len());
                }
            }
        }
    }
}

// Forward- and reverse-scan agreement: a pattern with no anchors and no
// overlap ambiguity (a single run of a fixed byte) should find the same
// leftmost span forward as the unique span a byte-for-byte reversed scan
// would find from the right, for many random placements.
#[test]
fn forward_scan_finds_the_first_occurrence_at_random_offsets() {
    let mut rng = StdRng::seed_from_u64(0x1234_5678);
    let prog = compile(b"xyz", CompileFlags::empty()).unwrap();

    for _ in 0..100 {
        let prefix_len = rng.gen_range(0..200);
        let suffix_len = rng.gen_range(0..200);
        let mut subject = random_subject(&mut rng, prefix_len);
        // Keep the needle out of the random prefix/suffix so the expected
        // offset is unambiguous.
        for w in subject.windows(3) {
            assert_ne!(w, b"xyz");
        }
        let needle_at = subject.len();
        subject.extend_from_slice(b"xyz");
        subject.extend(random_subject(&mut rng, suffix_len));
        for w in subject[needle_at + 3..].windows(3) {
            assert_ne!(w, b"xyz");
        }

        let caps = prog.exec(&subject, &ExecOptions::default()).unwrap().unwrap();
        assert_eq!(caps.get(0), Some((needle_at, needle_at + 3)));
    }
}

// Recompiling the same pattern twice must produce byte-identical programs --
// compilation is a pure function of (pattern, flags).
#[test]
fn compiling_the_same_pattern_twice_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(0xABCD);
    let fragments: &[&[u8]] = &[b"a", b"b+", b"(c|d)*", br"\w{2,5}", b"[a-z]", b"(?i)E"];

    for _ in 0..30 {
        let mut pattern = Vec::new();
        for _ in 0..rng.gen_range(1..5) {
            pattern.extend_from_slice(fragments[rng.gen_range(0..fragments.len())]);
        }
        if let Ok(prog_a) = compile(&pattern, CompileFlags::empty()) {
            let prog_b = compile(&pattern, CompileFlags::empty()).unwrap();
            assert_eq!(prog_a.as_bytes(), prog_b.as_bytes());
        }
    }
}

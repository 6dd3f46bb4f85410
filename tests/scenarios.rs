//! Black-box scenarios against the public API: pattern syntax, capture
//! semantics, look-around extents, and substitution, matching the concrete
//! examples in the engine's own behavioral contract one for one.

use nregex::{compile, CompileFlags, ExecOptions};

fn exec(pattern: &str, subject: &[u8]) -> Option<(Vec<Option<(usize, usize)>>, usize, usize)> {
    let prog = compile(pattern.as_bytes(), CompileFlags::empty()).expect("pattern should compile");
    let caps = prog.exec(subject, &ExecOptions::default()).expect("exec should not error")?;
    let spans = (0..prog.capture_count()).map(|i| caps.get(i)).collect();
    Some((spans, caps.top_branch(), caps.extent_backward()))
}

#[test]
fn repeated_capturing_group_reports_its_last_iteration() {
    let (spans, top_branch, _) = exec("a(b|c)+d", b"abccbd").unwrap();
    assert_eq!(spans[0], Some((0, 6)));
    assert_eq!(spans[1], Some((4, 5)), "group 1 should hold the LAST iteration, 'b'");
    assert_eq!(top_branch, 0);
}

#[test]
fn case_insensitive_prefix_region() {
    let (spans, ..) = exec("(?i)Hello", b"HeLLo, world").unwrap();
    assert_eq!(spans[0], Some((0, 5)));
}

#[test]
fn greedy_counted_repetition_takes_the_max() {
    let (spans, ..) = exec(r"\d{2,4}", b"a12345").unwrap();
    assert_eq!(spans[0], Some((1, 5)));
}

#[test]
fn lazy_counted_repetition_takes_the_min() {
    let (spans, ..) = exec(r"\d{2,4}?", b"a12345").unwrap();
    assert_eq!(spans[0], Some((1, 3)));
}

#[test]
fn lookbehind_match_and_backward_extent() {
    let (spans, _, extent_bw) = exec("(?<=foo)bar", b"foobar").unwrap();
    assert_eq!(spans[0], Some((3, 6)));
    assert_eq!(extent_bw, 0);
}

#[test]
fn negative_lookahead_rejects_the_excluded_start() {
    let (spans, ..) = exec(r"(?!foo)\w+", b"foobar").unwrap();
    assert_eq!(spans[0].unwrap().0, 1);
}

#[test]
fn back_reference_requires_equal_repetition() {
    let (spans, ..) = exec(r"(a+)\1", b"aaaa").unwrap();
    assert_eq!(spans[0], Some((0, 4)));
    assert_eq!(spans[1], Some((0, 2)));
}

#[test]
fn anchors_match_empty_subject_given_newline_context() {
    let prog = compile(b"^$", CompileFlags::empty()).unwrap();
    let opts = ExecOptions {
        prev_char: Some(b'\n'),
        succ_char: Some(b'\n'),
        ..Default::default()
    };
    let caps = prog.exec(b"", &opts).unwrap().unwrap();
    assert_eq!(caps.get(0), Some((0, 0)));
}

#[test]
fn substitution_upper_case_prefix_on_a_group() {
    let prog = compile(b"(hello)", CompileFlags::empty()).unwrap();
    let hay = b"hello";
    let caps = prog.exec(hay, &ExecOptions::default()).unwrap().unwrap();
    let mut dst = Vec::new();
    assert!(prog.substitute(b"\\U\\1", hay, &caps, &mut dst));
    assert_eq!(dst, b"HELLO");
}

#[test]
fn substitution_ampersand_round_trips_the_whole_match() {
    let prog = compile(b"a(b|c)+d", CompileFlags::empty()).unwrap();
    let hay = b"abccbd";
    let caps = prog.exec(hay, &ExecOptions::default()).unwrap().unwrap();
    let mut dst = Vec::new();
    assert!(prog.substitute(b"&", hay, &caps, &mut dst));
    assert_eq!(dst, hay);
}

#[test]
fn nested_quantifier_is_a_compile_error() {
    assert!(compile(b"a**", CompileFlags::empty()).is_err());
}

#[test]
fn character_class_ranges_and_negation() {
    let (spans, ..) = exec(r"[a-c]+", b"xxabcxx").unwrap();
    assert_eq!(spans[0], Some((2, 5)));
    let (spans, ..) = exec(r"[^a-c]+", b"abcxyzabc").unwrap();
    assert_eq!(spans[0], Some((3, 6)));
}

#[test]
fn word_boundaries_delimit_on_default_punctuation() {
    let (spans, ..) = exec("<foo>", b"a foo b").unwrap();
    assert_eq!(spans[0], Some((2, 5)));
    assert_eq!(exec("<foo>", b"afoob"), None);
}

#[test]
fn non_capturing_group_does_not_consume_a_paren_slot() {
    let prog = compile(b"(?:ab)(cd)", CompileFlags::empty()).unwrap();
    assert_eq!(prog.capture_count(), 2);
}

#[test]
fn comment_group_is_invisible_to_matching() {
    let (spans, ..) = exec(r"a(?#this is a comment)b", b"ab").unwrap();
    assert_eq!(spans[0], Some((0, 2)));
}

#[test]
fn reverse_scan_finds_the_rightmost_start() {
    let prog = compile(b"a+", CompileFlags::empty()).unwrap();
    let hay = b"aa_aaa_a";
    let opts = ExecOptions {
        reverse: true,
        ..Default::default()
    };
    let caps = prog.exec(hay, &opts).unwrap().unwrap();
    assert_eq!(caps.get(0), Some((7, 8)));
}

#[test]
fn lookahead_extent_tracks_speculative_reads_past_the_match() {
    let prog = compile(b"a(?=bcd)", CompileFlags::empty()).unwrap();
    let hay = b"abcd";
    let caps = prog.exec(hay, &ExecOptions::default()).unwrap().unwrap();
    assert_eq!(caps.get(0), Some((0, 1)));
    assert_eq!(caps.extent_forward(), Some(4));
}

#[test]
fn numeric_escapes_decode_octal_and_hex() {
    assert_eq!(exec(r"\x41", b"A").unwrap().0[0], Some((0, 1)));
    assert_eq!(exec(r"\0101", b"A").unwrap().0[0], Some((0, 1)));
}

#[test]
fn from_bytes_rejects_a_buffer_without_the_magic_byte() {
    let err = nregex::Program::from_bytes(vec![0, 0, 0]).unwrap_err();
    assert_eq!(err, nregex::Error::Corrupted);
}

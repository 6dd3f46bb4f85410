// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A byte-oriented bytecode regular expression engine tuned for editor-style
//! incremental matching.
//!
//! A pattern compiles once into a compact [`Program`]: a linear stream of
//! 3-byte-minimum nodes, each carrying an opcode and a 16-bit `NEXT` offset.
//! Executing a program against a subject walks that node stream with a
//! recursive backtracking matcher -- lazy and greedy quantifiers, counted
//! `{m,n}` repetition via a per-execution counter array, fixed-length-range
//! look-behind, unbounded look-ahead, and `\1`..`\9` back-references are all
//! supported. Matching is byte-oriented: one byte is one character, and `\d
//! \l \s \w` and friends classify bytes with fixed ASCII predicates rather
//! than locale or Unicode tables.
//!
//! ```
//! use nregex::{compile, CompileFlags, ExecOptions};
//!
//! let prog = compile(b"(a+)(b+)", CompileFlags::empty()).unwrap();
//! let haystack = b"xxaaabbyy";
//! let caps = prog.exec(haystack, &ExecOptions::default()).unwrap().unwrap();
//! assert_eq!(caps.slice(haystack, 0), Some(&b"aaabb"[..]));
//! assert_eq!(caps.slice(haystack, 1), Some(&b"aaa"[..]));
//! assert_eq!(caps.slice(haystack, 2), Some(&b"bb"[..]));
//! ```
//!
//! Every execution is self-contained: the counter array, capture tables and
//! extent pointers all live in per-call state, so a single compiled
//! [`Program`] may be shared (e.g. behind an `Rc`/`Arc`) and run
//! concurrently from multiple threads. The only process-wide state is the
//! default word-delimiter table installed by [`set_default_word_delimiters`],
//! matching the original engine's `SetREDefaultWordDelimiters`.

mod bytecode;
mod captures;
mod charclass;
mod error;
mod flags;
mod matcher;
mod opcode;
mod parser;
mod program;
mod substitute;

pub use captures::Captures;
pub use charclass::set_default_word_delimiters;
pub use error::Error;
pub use flags::CompileFlags;
pub use matcher::ExecOptions;
pub use opcode::NSUBEXP;
pub use parser::compile;
pub use program::Program;

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(pattern: &str) -> Program {
        compile(pattern.as_bytes(), CompileFlags::empty()).expect("should compile")
    }

    fn find(pattern: &str, subject: &str) -> Option<(usize, usize)> {
        let prog = ok(pattern);
        let hay = subject.as_bytes();
        prog.exec(hay, &ExecOptions::default())
            .unwrap()
            .and_then(|c| c.get(0))
    }

    // Bytecode stability across recompilation (spec testable property #1).
    #[test]
    fn recompiling_from_bytes_round_trips() {
        let prog = ok(r"a(b|c)+d\1");
        let rebuilt = Program::from_bytes(prog.as_bytes().to_vec()).unwrap();
        assert_eq!(prog.as_bytes(), rebuilt.as_bytes());
        assert_eq!(prog.capture_count(), rebuilt.capture_count());
    }

    #[test]
    fn leftmost_match_forward_rightmost_start_reverse() {
        let prog = ok("a");
        let hay = b"xaxaxa";
        let fwd = prog.exec(hay, &ExecOptions::default()).unwrap().unwrap();
        assert_eq!(fwd.get(0), Some((1, 2)));

        let rev_opts = ExecOptions {
            reverse: true,
            ..Default::default()
        };
        let rev = prog.exec(hay, &rev_opts).unwrap().unwrap();
        assert_eq!(rev.get(0), Some((5, 6)));
    }

    #[test]
    fn match_start_hint_is_honored_by_every_match() {
        let prog = ok("foo");
        assert_eq!(prog.match_start(), Some(b'f'));
        let caps = prog.exec(b"  foo  ", &ExecOptions::default()).unwrap().unwrap();
        assert_eq!(&b"  foo  "[caps.start(0).unwrap()..caps.start(0).unwrap() + 1], b"f");
    }

    #[test]
    fn anchor_flag_restricts_matches_to_line_starts() {
        let prog = ok("^foo");
        assert!(prog.is_anchored());
        assert_eq!(find("^foo", "xxx\nfoo"), Some((4, 7)));
        assert_eq!(find("^foo", "xxxfoo"), None);
    }

    #[test]
    fn substitute_ampersand_is_verbatim_whole_match() {
        let prog = ok("a(b|c)+d");
        let hay = b"abccbd";
        let caps = prog.exec(hay, &ExecOptions::default()).unwrap().unwrap();
        let mut dst = Vec::new();
        assert!(prog.substitute(b"&", hay, &caps, &mut dst));
        assert_eq!(dst, hay);
    }

    #[test]
    fn case_insensitive_region_matches_upper_and_lower() {
        assert_eq!(find("(?i)Hello", "HeLLo, world"), Some((0, 5)));
    }

    #[test]
    fn greedy_and_lazy_counted_repetition() {
        assert_eq!(find(r"\d{2,4}", "a12345"), Some((1, 5)));
        assert_eq!(find(r"\d{2,4}?", "a12345"), Some((1, 3)));
    }

    #[test]
    fn lookbehind_extent_reaches_start_of_subject() {
        let prog = ok("(?<=foo)bar");
        let hay = b"foobar";
        let caps = prog.exec(hay, &ExecOptions::default()).unwrap().unwrap();
        assert_eq!(caps.get(0), Some((3, 6)));
        assert_eq!(caps.extent_backward(), 0);
    }

    #[test]
    fn negative_lookahead_skips_the_excluded_start() {
        assert_eq!(find(r"(?!foo)\w+", "foobar"), Some((1, 6)));
    }

    #[test]
    fn back_reference_matches_prior_capture() {
        let prog = ok(r"(a+)\1");
        let hay = b"aaaa";
        let caps = prog.exec(hay, &ExecOptions::default()).unwrap().unwrap();
        assert_eq!(caps.get(0), Some((0, 4)));
        assert_eq!(caps.slice(hay, 1), Some(&b"aa"[..]));
    }

    #[test]
    fn empty_pattern_matches_empty_subject_with_newline_context() {
        let prog = ok("^$");
        let opts = ExecOptions {
            prev_char: Some(b'\n'),
            succ_char: Some(b'\n'),
            ..Default::default()
        };
        let caps = prog.exec(b"", &opts).unwrap().unwrap();
        assert_eq!(caps.get(0), Some((0, 0)));
    }

    #[test]
    fn top_branch_reports_which_alternative_matched() {
        let prog = ok("a(b|c)+d");
        let hay = b"abccbd";
        let caps = prog.exec(hay, &ExecOptions::default()).unwrap().unwrap();
        assert_eq!(caps.top_branch(), 0);
    }

    #[test]
    fn recursion_limit_terminates_pathological_alternation_without_overflow() {
        let prog = ok("(a|a|a|a)*");
        let hay = vec![b'a'; 10_000];
        // Must terminate either with a match or a reported no-match; the
        // property under test is "does not stack-overflow", which a panic
        // or hang would reveal.
        let _ = prog.exec(&hay, &ExecOptions::default()).unwrap();
    }
}

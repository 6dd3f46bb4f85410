// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `SubstituteRE`: expand a replacement template against a successful
//! match's captures, honoring `&`, `\1`..`\9`, the literal/numeric escape
//! tables and the `\u \U \l \L` case-conversion prefixes.
//!
//! Mirrors the original engine's quirk: a case-conversion prefix only has an
//! effect when the very next thing it precedes is a group reference (`&` or
//! `\1`..`\9`). Stuck in front of an ordinary literal character it is simply
//! consumed -- the marker letter is discarded and the following character is
//! copied through unchanged, because `adjustcase` is only ever called on the
//! group-reference branch in the original `SubstituteRE`.

use crate::captures::Captures;
use crate::charclass;

/// Applies `chgcase` (`u`/`U`/`l`/`L`) to `buf` in place. Lowercase markers
/// (`u`, `l`) touch only the first byte; uppercase markers (`U`, `L`) touch
/// every byte.
fn adjust_case(buf: &mut [u8], chgcase: u8) {
    let len = if chgcase.is_ascii_lowercase() {
        buf.len().min(1)
    } else {
        buf.len()
    };
    match chgcase {
        b'u' | b'U' => {
            for b in &mut buf[..len] {
                *b = b.to_ascii_uppercase();
            }
        }
        b'l' | b'L' => {
            for b in &mut buf[..len] {
                *b = b.to_ascii_lowercase();
            }
        }
        _ => unreachable!("adjust_case called with a non-case-conversion marker"),
    }
}

/// Expands `template` against `caps` (whose spans index into `haystack`),
/// appending the result to `dst`. Stops appending ordinary literal bytes
/// once `dst` would reach `max_len - 1` (reserving a byte for a trailing
/// NUL the way the original fixed-size-buffer API does, even though this
/// port's `dst` is a growable `Vec`); a group reference that would overflow
/// is truncated to what still fits rather than dropped outright.
///
/// Returns `false` (with `dst` still filled with whatever was produced) if
/// truncation occurred or a participating group's matched text contained a
/// `\0` byte (`DamagedMatchString` in the original's diagnostics).
pub fn substitute(
    template: &[u8],
    haystack: &[u8],
    caps: &Captures,
    dst: &mut Vec<u8>,
    max_len: usize,
) -> bool {
    let mut any_warnings = false;
    let mut i = 0usize;

    while i < template.len() {
        let mut c = template[i];
        i += 1;
        let mut chgcase: Option<u8> = None;
        let mut paren_no: Option<usize> = None;

        if c == b'\\' && i < template.len() && matches!(template[i], b'u' | b'U' | b'l' | b'L') {
            chgcase = Some(template[i]);
            i += 1;
            match template.get(i) {
                None => break,
                Some(&next) => {
                    c = next;
                    i += 1;
                }
            }
        }

        if c == b'&' {
            paren_no = Some(0);
        } else if c == b'\\' {
            match template.get(i) {
                Some(&d) if d.is_ascii_digit() && d != b'0' => {
                    paren_no = Some((d - b'0') as usize);
                    i += 1;
                }
                Some(&marker) => {
                    if let Some(v) = charclass::literal_escape(marker) {
                        c = v;
                        i += 1;
                    } else if let Some((v, consumed)) =
                        charclass::numeric_escape(marker, &template[i + 1..])
                    {
                        if v != 0 {
                            c = v;
                            i += 1 + consumed;
                        } else {
                            // `\000`-style zero escape: treated as a literal
                            // string, i.e. fall through to the catch-all
                            // below and consume just the one byte after `\`.
                            c = template[i];
                            i += 1;
                        }
                    } else {
                        // Any other escape is allowed through verbatim in a
                        // substitution template (unlike `compile`, which
                        // would reject it) -- matches the original's
                        // intentionally inconsistent leniency here.
                        c = marker;
                        i += 1;
                    }
                }
                None => {
                    // Trailing backslash: a literal backslash.
                    c = b'\\';
                }
            }
        }

        match paren_no {
            None => {
                if dst.len() + 1 >= max_len {
                    any_warnings = true;
                    break;
                }
                dst.push(c);
            }
            Some(p) => {
                if let Some((s, e)) = caps.get(p) {
                    let mut len = e - s;
                    if dst.len() + len >= max_len {
                        any_warnings = true;
                        len = max_len.saturating_sub(dst.len() + 1);
                    }
                    let slice = &haystack[s..s + len];
                    let start = dst.len();
                    dst.extend_from_slice(slice);
                    if let Some(cc) = chgcase {
                        adjust_case(&mut dst[start..], cc);
                    }
                    if slice.contains(&0) {
                        any_warnings = true;
                    }
                }
            }
        }
    }

    !any_warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::CompileFlags;
    use crate::{compile, ExecOptions};

    fn run(pattern: &str, subject: &str) -> (crate::program::Program, Captures, Vec<u8>) {
        let prog = compile(pattern.as_bytes(), CompileFlags::empty()).unwrap();
        let haystack = subject.as_bytes().to_vec();
        let caps = prog
            .exec(&haystack, &ExecOptions::default())
            .unwrap()
            .unwrap();
        (prog, caps, haystack)
    }

    #[test]
    fn ampersand_yields_whole_match_verbatim() {
        let (_prog, caps, haystack) = run("a(b|c)+d", "abccbd");
        let mut dst = Vec::new();
        let ok = substitute(b"&", &haystack, &caps, &mut dst, usize::MAX);
        assert!(ok);
        assert_eq!(dst, b"abccbd");
    }

    #[test]
    fn group_reference_expands_captured_span() {
        let (_prog, caps, haystack) = run("(a+)(b+)", "aaabb");
        let mut dst = Vec::new();
        assert!(substitute(b"\\2-\\1", &haystack, &caps, &mut dst, usize::MAX));
        assert_eq!(dst, b"bb-aaa");
    }

    #[test]
    fn upper_case_prefix_uppercases_whole_group() {
        let (_prog, caps, haystack) = run("(hello)", "hello");
        let mut dst = Vec::new();
        assert!(substitute(b"\\U\\1", &haystack, &caps, &mut dst, usize::MAX));
        assert_eq!(dst, b"HELLO");
    }

    #[test]
    fn lower_single_char_prefix_only_touches_first_byte() {
        let (_prog, caps, haystack) = run("(HELLO)", "HELLO");
        let mut dst = Vec::new();
        assert!(substitute(b"\\l\\1", &haystack, &caps, &mut dst, usize::MAX));
        assert_eq!(dst, b"hELLO");
    }

    #[test]
    fn case_prefix_before_literal_text_is_a_no_op() {
        let (_prog, caps, haystack) = run("a", "a");
        let mut dst = Vec::new();
        assert!(substitute(b"\\Uhello", &haystack, &caps, &mut dst, usize::MAX));
        assert_eq!(dst, b"hello");
    }

    #[test]
    fn non_participating_group_contributes_nothing() {
        let (_prog, caps, haystack) = run("(a)|(b)", "b");
        let mut dst = Vec::new();
        assert!(substitute(b"[\\1][\\2]", &haystack, &caps, &mut dst, usize::MAX));
        assert_eq!(dst, b"[][b]");
    }

    #[test]
    fn truncation_is_reported_but_result_is_still_produced() {
        let (_prog, caps, haystack) = run("a", "a");
        let mut dst = Vec::new();
        let ok = substitute(b"abcdef", &haystack, &caps, &mut dst, 4);
        assert!(!ok);
        assert_eq!(dst, b"abc");
    }

    #[test]
    fn literal_escapes_in_template_decode() {
        let (_prog, caps, haystack) = run("a", "a");
        let mut dst = Vec::new();
        assert!(substitute(b"x\\ty", &haystack, &caps, &mut dst, usize::MAX));
        assert_eq!(dst, b"x\ty");
    }

    #[test]
    fn trailing_backslash_is_literal() {
        let (_prog, caps, haystack) = run("a", "a");
        let mut dst = Vec::new();
        assert!(substitute(b"ab\\", &haystack, &caps, &mut dst, usize::MAX));
        assert_eq!(dst, b"ab\\");
    }
}

// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The recursive backtracking matcher and the scanning driver that walks
//! candidate start positions across a haystack.
//!
//! Mirrors the original engine's `match`/`greedy`/`ExecRE`/`attempt` quartet.
//! Backtracking restores only the input cursor; capture and counter writes
//! are never unwound, since a later success always overwrites them before
//! they're reported and an abandoned branch's writes are simply never read.

use crate::bytecode::{next_ptr, operand, read_cstr, read_index, read_range_operand, read_test_count};
use crate::captures::Captures;
use crate::charclass::{self, make_delimiter_table};
use crate::opcode::{Opcode, NODE_SIZE};
use crate::program::Program;

/// Matching gives up rather than blow the native call stack on a pathological
/// pattern (e.g. `(a|a|a|a)*` against a long run of `a`s). Matches the
/// original engine's `MAX_RECURSION_DEPTH` default.
const RECURSION_LIMIT: u32 = 10_000;

/// Per-`exec` caller-supplied context: what lies logically outside the slice
/// being searched, and how the search should be conducted.
#[derive(Clone, Copy, Debug)]
pub struct ExecOptions<'a> {
    /// Extra delimiter bytes for `\y`/`\Y`/word-boundary checks, beyond the
    /// always-delimiters. `None` uses the process-wide default table.
    pub delimiters: Option<&'a [u8]>,
    /// The byte that logically precedes `haystack[0]`, if any (affects `^`
    /// and `\<`/`\y` at the very start of a partial buffer).
    pub prev_char: Option<u8>,
    /// The byte that logically follows the end of the searched range.
    pub succ_char: Option<u8>,
    /// Lower bound a look-behind may read back to. Defaults to 0.
    pub look_behind_to: usize,
    /// Logical end of the searched range, if shorter than `haystack.len()`.
    pub logical_end: Option<usize>,
    /// Scan right-to-left for the rightmost match instead of the leftmost.
    pub reverse: bool,
}

impl Default for ExecOptions<'_> {
    fn default() -> Self {
        ExecOptions {
            delimiters: None,
            prev_char: None,
            succ_char: None,
            look_behind_to: 0,
            logical_end: None,
            reverse: false,
        }
    }
}

/// Runs `prog` against `haystack`, returning the first match found by the
/// scan order `opts.reverse` selects.
pub fn exec(
    prog: &Program,
    haystack: &[u8],
    opts: &ExecOptions<'_>,
) -> Result<Option<Captures>, crate::error::Error> {
    if prog.as_bytes().first().copied() != Some(crate::opcode::MAGIC) {
        log::warn!("corrupted program");
        return Err(crate::error::Error::Corrupted);
    }

    let delims = make_delimiter_table(opts.delimiters);
    let logical_end = opts.logical_end.unwrap_or(haystack.len());

    let mut m = Matcher {
        buf: prog.as_bytes(),
        input: haystack,
        delims,
        look_behind_to: opts.look_behind_to,
        logical_end: Some(logical_end),
        prev_is_bol: opts.prev_char == Some(b'\n'),
        succ_is_eol: opts.succ_char.map_or(true, |c| c == b'\n'),
        prev_is_delim: opts.prev_char.map_or(true, |c| delims[c as usize]),
        succ_is_delim: opts.succ_char.map_or(true, |c| delims[c as usize]),
        back_ref_start: [0; 10],
        back_ref_end: [0; 10],
        cap_start: vec![None; prog.capture_count()],
        cap_end: vec![None; prog.capture_count()],
        counters: vec![0; prog.num_braces()],
        pos: 0,
        recursion_count: 0,
        recursion_limit_exceeded: false,
        extent_fw: None,
        extent_bw: 0,
        top_branch: 0,
    };

    // `Back_Ref_Start`/`Back_Ref_End` are seeded once per whole scan (not
    // per attempt) so that `\1` referring to a group that the winning
    // attempt never entered matches an empty string at the scan's start,
    // rather than reading stale data from a previous candidate.
    for i in 1..10 {
        m.back_ref_start[i] = 0;
        m.back_ref_end[i] = 0;
    }

    let node_start = prog.node_start();
    let starts = candidate_starts(prog, haystack, logical_end, opts);

    for start in starts {
        if m.recursion_limit_exceeded {
            break;
        }
        if m.attempt(node_start, start) {
            return Ok(Some(m.into_captures()));
        }
    }

    Ok(None)
}

/// Enumerates candidate match-start offsets in scan order, applying the
/// `anchored`/`match_start` optimizations the compiler already dug out of
/// the program (avoids trying every offset when the pattern can only ever
/// match right after a newline, or only where a known leading byte sits).
fn candidate_starts(
    prog: &Program,
    haystack: &[u8],
    logical_end: usize,
    opts: &ExecOptions<'_>,
) -> Vec<usize> {
    let mut v: Vec<usize> = if prog.anchored {
        let mut starts = vec![0usize];
        for (i, &b) in haystack.iter().enumerate().take(logical_end) {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        starts
    } else if let Some(byte) = prog.match_start {
        let mut starts = Vec::new();
        let mut from = 0usize;
        while from <= logical_end {
            match memchr::memchr(byte, &haystack[from..logical_end.min(haystack.len())]) {
                Some(i) => {
                    starts.push(from + i);
                    from = from + i + 1;
                }
                None => break,
            }
        }
        starts
    } else {
        (0..=logical_end).collect()
    };

    if opts.reverse {
        v.sort_unstable();
        v.reverse();
    }
    v
}

struct Matcher<'p, 'i> {
    buf: &'p [u8],
    input: &'i [u8],
    delims: [bool; 256],

    look_behind_to: usize,
    logical_end: Option<usize>,

    // Fixed for the whole scan (supplied by the caller).
    prev_is_bol: bool,
    succ_is_eol: bool,
    prev_is_delim: bool,
    succ_is_delim: bool,

    // Live backreference spans (`\1`..`\9`): written unconditionally on every
    // OPEN/CLOSE, even inside a branch later abandoned by backtracking.
    // Persist across attempts within one `exec` call.
    back_ref_start: [usize; 10],
    back_ref_end: [usize; 10],
    recursion_limit_exceeded: bool,

    // Reset at the start of every attempt.
    cap_start: Vec<Option<usize>>,
    cap_end: Vec<Option<usize>>,
    counters: Vec<u32>,
    pos: usize,
    recursion_count: u32,
    extent_fw: Option<usize>,
    extent_bw: usize,
    top_branch: usize,
}

impl<'p, 'i> Matcher<'p, 'i> {
    fn into_captures(self) -> Captures {
        Captures {
            start: self.cap_start,
            end: self.cap_end,
            top_branch: self.top_branch,
            extent_fw: self.extent_fw,
            extent_bw: self.extent_bw,
        }
    }

    fn at_end(&self, pos: usize) -> bool {
        pos >= self.input.len() || self.logical_end.map_or(false, |e| pos >= e)
    }

    fn byte(&self, pos: usize) -> u8 {
        self.input[pos]
    }

    fn touch_fw(&mut self, pos: usize) {
        if self.extent_fw.map_or(true, |f| pos > f) {
            self.extent_fw = Some(pos);
        }
    }

    fn touch_bw(&mut self, pos: usize) {
        if pos < self.extent_bw {
            self.extent_bw = pos;
        }
    }

    fn is_bol(&self, pos: usize) -> bool {
        if pos == 0 {
            self.prev_is_bol
        } else {
            pos <= self.input.len() && self.input[pos - 1] == b'\n'
        }
    }

    fn is_eol(&self, pos: usize) -> bool {
        if pos < self.input.len() && self.input[pos] == b'\n' {
            return true;
        }
        self.at_end(pos) && self.succ_is_eol
    }

    fn cur_is_delim(&self, pos: usize) -> bool {
        if self.at_end(pos) {
            self.succ_is_delim
        } else {
            self.delims[self.byte(pos) as usize]
        }
    }

    fn prev_is_delim_at(&self, pos: usize) -> bool {
        if pos == 0 {
            self.prev_is_delim
        } else {
            self.delims[self.byte(pos - 1) as usize]
        }
    }

    /// Resets the per-attempt fields and tries a match starting at `start`.
    /// On success, capture/extent fields are left populated for
    /// `into_captures`.
    fn attempt(&mut self, node_start: usize, start: usize) -> bool {
        self.recursion_count = 0;
        self.pos = start;
        self.extent_fw = None;
        self.extent_bw = start;
        self.top_branch = 0;
        for slot in self.cap_start.iter_mut() {
            *slot = None;
        }
        for slot in self.cap_end.iter_mut() {
            *slot = None;
        }

        if self.match_node(node_start) {
            self.cap_start[0] = Some(start);
            self.cap_end[0] = Some(self.pos);
            true
        } else {
            false
        }
    }

    /// Recursion-counted entry point: every genuine recursive descent into
    /// the matcher (as opposed to looping over a straight-line node chain)
    /// goes through here, mirroring the original's per-call depth counter.
    fn match_node(&mut self, start: usize) -> bool {
        self.recursion_count += 1;
        if self.recursion_count > RECURSION_LIMIT {
            if !self.recursion_limit_exceeded {
                log::warn!("recursion limit exceeded during match");
            }
            self.recursion_limit_exceeded = true;
            self.recursion_count -= 1;
            return false;
        }
        let result = self.match_loop(start);
        self.recursion_count -= 1;
        result
    }

    /// Walks a straight-line node chain, recursing only at genuine decision
    /// points (`BRANCH` with more than one alternative, `OPEN`/`CLOSE`,
    /// look-around opens). Everything else just advances `scan` and loops,
    /// which both matches the original's "avoid recursion" optimization and
    /// keeps native stack depth proportional to nesting, not pattern length.
    fn match_loop(&mut self, mut scan: usize) -> bool {
        loop {
            if self.recursion_limit_exceeded {
                return false;
            }
            let op = match Opcode::from_u8(self.buf[scan]) {
                Some(op) => op,
                None => {
                    if let Some(n) = Opcode::open_paren(self.buf[scan]) {
                        return self.do_open(scan, n);
                    }
                    if let Some(n) = Opcode::close_paren(self.buf[scan]) {
                        return self.do_close(scan, n);
                    }
                    log::warn!("memory corruption, 'match'");
                    return false;
                }
            };

            let next = next_ptr(self.buf, scan);

            macro_rules! fail {
                () => {
                    return false
                };
            }

            match op {
                Opcode::End => {
                    self.touch_fw(self.pos);
                    return true;
                }

                Opcode::Bol => {
                    if !self.is_bol(self.pos) {
                        fail!();
                    }
                }
                Opcode::Eol => {
                    if !self.is_eol(self.pos) {
                        fail!();
                    }
                }
                Opcode::Boword => {
                    let prev = self.prev_is_delim_at(self.pos);
                    let cur = self.cur_is_delim(self.pos);
                    if !(prev && !cur) {
                        fail!();
                    }
                }
                Opcode::Eoword => {
                    let prev = self.prev_is_delim_at(self.pos);
                    let cur = self.cur_is_delim(self.pos);
                    if !(!prev && cur) {
                        fail!();
                    }
                }
                Opcode::NotBoundary => {
                    let prev = self.prev_is_delim_at(self.pos);
                    let cur = self.cur_is_delim(self.pos);
                    if prev != cur {
                        fail!();
                    }
                }

                Opcode::Exactly | Opcode::Similar => {
                    let s = read_cstr(self.buf, scan);
                    let end = self.pos + s.len();
                    if end > self.input.len() || end > self.logical_end.unwrap_or(usize::MAX) {
                        fail!();
                    }
                    let matches = if op == Opcode::Similar {
                        s.iter()
                            .enumerate()
                            .all(|(i, &want)| self.byte(self.pos + i).to_ascii_lowercase() == want)
                    } else {
                        s.iter().enumerate().all(|(i, &want)| self.byte(self.pos + i) == want)
                    };
                    if !matches {
                        fail!();
                    }
                    self.pos = end;
                }

                Opcode::AnyOf => {
                    if self.at_end(self.pos) {
                        fail!();
                    }
                    let set = read_cstr(self.buf, scan);
                    if !set.contains(&self.byte(self.pos)) {
                        fail!();
                    }
                    self.pos += 1;
                }
                Opcode::AnyBut => {
                    if self.at_end(self.pos) {
                        fail!();
                    }
                    let set = read_cstr(self.buf, scan);
                    if set.contains(&self.byte(self.pos)) {
                        fail!();
                    }
                    self.pos += 1;
                }

                Opcode::Any => {
                    if self.at_end(self.pos) || self.byte(self.pos) == b'\n' {
                        fail!();
                    }
                    self.pos += 1;
                }
                Opcode::Every => {
                    if self.at_end(self.pos) {
                        fail!();
                    }
                    self.pos += 1;
                }

                Opcode::Digit
                | Opcode::NotDigit
                | Opcode::Letter
                | Opcode::NotLetter
                | Opcode::Space
                | Opcode::SpaceNl
                | Opcode::NotSpace
                | Opcode::NotSpaceNl
                | Opcode::WordChar
                | Opcode::NotWordChar
                | Opcode::IsDelim
                | Opcode::NotDelim => {
                    if self.at_end(self.pos) || !class_matches(op, self.byte(self.pos), &self.delims)
                    {
                        fail!();
                    }
                    self.pos += 1;
                }

                Opcode::Nothing => {}

                Opcode::Back => {}

                Opcode::Star
                | Opcode::LazyStar
                | Opcode::Question
                | Opcode::LazyQuestion
                | Opcode::Plus
                | Opcode::LazyPlus
                | Opcode::Brace
                | Opcode::LazyBrace => {
                    return self.match_quantifier(op, scan, next);
                }

                Opcode::Branch => {
                    if !matches!(next.map(|n| self.buf[n]), Some(b) if b == Opcode::Branch as u8) {
                        // Only one alternative: no choice to make, so don't
                        // pay for a recursive call -- just step into the
                        // branch's own body.
                        scan = operand(scan);
                        continue;
                    }
                    let mut branch_idx = 0usize;
                    let mut this = scan;
                    loop {
                        let save = self.pos;
                        if self.match_node(operand(this)) {
                            self.top_branch = branch_idx;
                            return true;
                        }
                        if self.recursion_limit_exceeded {
                            return false;
                        }
                        self.pos = save;
                        match next_ptr(self.buf, this) {
                            Some(n) if self.buf[n] == Opcode::Branch as u8 => {
                                this = n;
                                branch_idx += 1;
                            }
                            _ => return false,
                        }
                    }
                }

                Opcode::InitCount => {
                    let idx = read_index(self.buf, scan);
                    self.counters[idx as usize] = 0;
                }
                Opcode::IncCount => {
                    let idx = read_index(self.buf, scan);
                    self.counters[idx as usize] += 1;
                }
                Opcode::TestCount => {
                    let (idx, value) = read_test_count(self.buf, scan);
                    if self.counters[idx as usize] < value as u32 {
                        // Loop continues: fall through to the physically
                        // next node rather than following NEXT.
                        scan = scan + NODE_SIZE + crate::opcode::INDEX_SIZE + 2;
                        continue;
                    }
                }

                Opcode::BackRef | Opcode::BackRefCi => {
                    let n = read_index(self.buf, scan) as usize;
                    let (s, e) = (self.back_ref_start[n], self.back_ref_end[n]);
                    if s > e {
                        fail!();
                    }
                    let len = e - s;
                    if self.pos + len > self.input.len()
                        || self.pos + len > self.logical_end.unwrap_or(usize::MAX)
                    {
                        fail!();
                    }
                    let captured = &self.input[s..e];
                    let candidate = &self.input[self.pos..self.pos + len];
                    let ok = if op == Opcode::BackRefCi {
                        captured
                            .iter()
                            .zip(candidate)
                            .all(|(a, b)| a.to_ascii_lowercase() == b.to_ascii_lowercase())
                    } else {
                        captured == candidate
                    };
                    if !ok {
                        fail!();
                    }
                    self.pos += len;
                }

                Opcode::CrossRegexBackRef | Opcode::CrossRegexBackRefCi => {
                    log::warn!("memory corruption, 'match'");
                    return false;
                }

                Opcode::PosAheadOpen | Opcode::NegAheadOpen => {
                    let save = self.pos;
                    let saved_end = self.logical_end.take();
                    let body = next.expect("look-ahead open always has a body");
                    let answer = self.match_node(body);
                    if self.recursion_limit_exceeded {
                        return false;
                    }
                    let positive = op == Opcode::PosAheadOpen;
                    if answer != positive {
                        self.pos = save;
                        self.logical_end = saved_end;
                        return false;
                    }
                    self.touch_fw(self.pos);
                    self.pos = save;
                    self.logical_end = saved_end;
                    scan = skip_look_around_body(self.buf, body);
                    continue;
                }

                Opcode::PosBehindOpen | Opcode::NegBehindOpen => {
                    let (lo, hi) = read_range_operand(self.buf, scan);
                    let save = self.pos;
                    let floor = self.look_behind_to;
                    let body = next.expect("look-behind open always has a body");
                    let positive = op == Opcode::PosBehindOpen;

                    let mut found = false;
                    let mut try_len = lo as usize;
                    while try_len <= hi as usize {
                        if save < try_len || save - try_len < floor {
                            try_len += 1;
                            continue;
                        }
                        let candidate_start = save - try_len;
                        self.pos = candidate_start;
                        let saved_end = self.logical_end;
                        self.logical_end = Some(save);
                        let landed = self.match_node(body) && self.pos == save;
                        self.logical_end = saved_end;
                        if self.recursion_limit_exceeded {
                            return false;
                        }
                        if landed {
                            found = true;
                            self.touch_bw(candidate_start);
                            break;
                        }
                        try_len += 1;
                    }

                    self.pos = save;
                    if found != positive {
                        return false;
                    }
                    scan = skip_look_around_body(self.buf, body);
                    continue;
                }

                Opcode::LookAheadClose | Opcode::LookBehindClose => return true,

                Opcode::Open | Opcode::Close => {
                    unreachable!("Opcode::from_u8 never produces bare Open/Close")
                }
            }

            match next {
                Some(n) => scan = n,
                None => return true,
            }
        }
    }

    fn do_open(&mut self, scan: usize, n: u8) -> bool {
        let n = n as usize;
        let open_pos = self.pos;
        if n < 10 {
            self.back_ref_start[n] = open_pos;
        }
        let next = next_ptr(self.buf, scan).expect("OPEN always has a body");
        if self.match_node(next) {
            // Reported captures are set once per attempt, the first time a
            // not-yet-set OPEN/CLOSE pair completes on the way back up the
            // recursion. For a repeated group the *last* iteration's OPEN is
            // the innermost call, so it unwinds (and writes) first; earlier
            // iterations then find the slot already filled and leave it.
            if self.cap_start[n].is_none() {
                self.cap_start[n] = Some(open_pos);
            }
            true
        } else {
            false
        }
    }

    fn do_close(&mut self, scan: usize, n: u8) -> bool {
        let n = n as usize;
        let end_pos = self.pos;
        if n < 10 {
            self.back_ref_end[n] = end_pos;
        }
        let next = next_ptr(self.buf, scan).expect("CLOSE always has a continuation");
        if self.match_node(next) {
            if self.cap_end[n].is_none() {
                self.cap_end[n] = Some(end_pos);
            }
            true
        } else {
            false
        }
    }

    fn match_quantifier(&mut self, op: Opcode, scan: usize, next: Option<usize>) -> bool {
        let lazy = matches!(
            op,
            Opcode::LazyStar | Opcode::LazyQuestion | Opcode::LazyPlus | Opcode::LazyBrace
        );
        let (min, max, atom_pos) = match op {
            Opcode::Star | Opcode::LazyStar => (0u32, u32::MAX, operand(scan)),
            Opcode::Plus | Opcode::LazyPlus => (1u32, u32::MAX, operand(scan)),
            Opcode::Question | Opcode::LazyQuestion => (0u32, 1u32, operand(scan)),
            Opcode::Brace | Opcode::LazyBrace => {
                let (lo, hi) = read_range_operand(self.buf, scan);
                let hi = if hi == 0 { u32::MAX } else { hi as u32 };
                (lo as u32, hi, operand(scan) + 4)
            }
            _ => unreachable!(),
        };

        let next = match next {
            Some(n) => n,
            None => return min == 0,
        };

        let atom_op = self.buf[atom_pos];
        let next_char: Option<u8> = if self.buf[next] == Opcode::Exactly as u8 {
            read_cstr(self.buf, next).first().copied()
        } else {
            None
        };

        let save = self.pos;
        let mut num_matched = if lazy {
            if min > 0 {
                self.greedy_count(atom_op, atom_pos, min, save)
            } else {
                0
            }
        } else {
            self.greedy_count(atom_op, atom_pos, max, save)
        };
        // `greedy_count` only counts; it never advances the cursor, so the
        // first attempt at `next` below must position it explicitly.
        self.pos = save + num_matched as usize;

        while min <= num_matched && num_matched <= max {
            let try_it = match next_char {
                None => true,
                Some(c) => self.pos < self.input.len() && !self.at_end(self.pos) && self.byte(self.pos) == c,
            };
            if try_it {
                if self.match_node(next) {
                    return true;
                }
                if self.recursion_limit_exceeded {
                    return false;
                }
            }
            if lazy {
                if self.greedy_count(atom_op, atom_pos, 1, self.pos) == 0 {
                    return false;
                }
                num_matched += 1;
            } else if num_matched > 0 {
                num_matched -= 1;
            } else if min == 0 && num_matched == 0 {
                break;
            }
            self.pos = save + num_matched as usize;
        }
        false
    }

    /// Counts up to `max` consecutive matches of the one-byte SIMPLE atom at
    /// `atom_pos`, starting from `start`. Every SIMPLE atom consumes exactly
    /// one byte per match, so the count alone determines the final cursor.
    fn greedy_count(&self, atom_op: u8, atom_pos: usize, max: u32, start: usize) -> u32 {
        let op = Opcode::from_u8(atom_op).expect("quantified operand is a plain opcode");
        let mut pos = start;
        let mut count = 0u32;
        while count < max {
            if self.at_end(pos) {
                break;
            }
            let b = self.byte(pos);
            let ok = match op {
                Opcode::Any => b != b'\n',
                Opcode::Every => true,
                Opcode::Exactly => {
                    let s = read_cstr(self.buf, atom_pos);
                    s.len() == 1 && s[0] == b
                }
                Opcode::Similar => {
                    let s = read_cstr(self.buf, atom_pos);
                    s.len() == 1 && s[0] == b.to_ascii_lowercase()
                }
                Opcode::AnyOf => read_cstr(self.buf, atom_pos).contains(&b),
                Opcode::AnyBut => !read_cstr(self.buf, atom_pos).contains(&b),
                Opcode::Digit | Opcode::NotDigit | Opcode::Letter | Opcode::NotLetter
                | Opcode::Space | Opcode::SpaceNl | Opcode::NotSpace | Opcode::NotSpaceNl
                | Opcode::WordChar | Opcode::NotWordChar | Opcode::IsDelim | Opcode::NotDelim => {
                    class_matches(op, b, &self.delims)
                }
                _ => false,
            };
            if !ok {
                break;
            }
            pos += 1;
            count += 1;
        }
        count
    }
}

/// Walks a look-around's branch chain (as `chunk` built it: the open node's
/// own `NEXT` leads to the first `BRANCH`, each `BRANCH`'s `NEXT` leads to
/// the next alternative or, for the last one, to the closing node) and
/// returns the position right after the closing node -- i.e. where matching
/// resumes once the look-around has been resolved.
fn skip_look_around_body(buf: &[u8], mut at: usize) -> usize {
    while buf[at] == Opcode::Branch as u8 {
        at = next_ptr(buf, at).expect("branch chain always terminates at the closing node");
    }
    next_ptr(buf, at).unwrap_or(at)
}

fn class_matches(op: Opcode, b: u8, delims: &[bool; 256]) -> bool {
    match op {
        Opcode::Digit => charclass::is_digit_byte(b),
        Opcode::NotDigit => !charclass::is_digit_byte(b) && b != b'\n',
        Opcode::Letter => charclass::is_letter_byte(b),
        Opcode::NotLetter => !charclass::is_letter_byte(b) && b != b'\n',
        Opcode::Space => charclass::is_space_byte_no_nl(b),
        Opcode::SpaceNl => charclass::is_space_byte(b),
        Opcode::NotSpace => !charclass::is_space_byte(b) && b != b'\n',
        Opcode::NotSpaceNl => !charclass::is_space_byte(b),
        Opcode::WordChar => charclass::is_word_byte(b),
        Opcode::NotWordChar => !charclass::is_word_byte(b) && b != b'\n',
        Opcode::IsDelim => delims[b as usize],
        Opcode::NotDelim => !delims[b as usize] && b != b'\n',
        _ => unreachable!(),
    }
}

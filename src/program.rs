// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A compiled program: the byte buffer plus the optimization fields the
//! compiler digs out of it (`match_start`, `anchored`), and the paren/brace
//! counts needed to size per-execution state.

use crate::bytecode::{next_ptr, operand, read_cstr};
use crate::captures::Captures;
use crate::error::Error;
use crate::matcher::{self, ExecOptions};
use crate::opcode::{Opcode, MAGIC, NODE_SIZE, PROGRAM_START_OFFSET};
use crate::substitute;

/// A compiled regular expression.
///
/// Cloning a `Program` is cheap-ish (it clones the byte buffer) but not
/// free; wrap it in an `Rc`/`Arc` at the call site if you need to share one
/// across many concurrent executions -- `Program` itself carries no
/// interior mutability, so sharing is always safe.
#[derive(Clone, Debug)]
pub struct Program {
    pub(crate) buf: Vec<u8>,
    pub(crate) total_paren: usize,
    pub(crate) num_braces: usize,
    pub(crate) match_start: Option<u8>,
    pub(crate) anchored: bool,
}

impl Program {
    /// Builds a `Program` from a freshly compiled node stream, filling in
    /// the preamble and the `match_start`/`anchored` optimization fields by
    /// inspecting the first top-level branch -- mirrors the "dig out
    /// information for optimizations" step at the end of the original
    /// compiler's constructor.
    pub(crate) fn finish(
        mut buf: Vec<u8>,
        total_paren: usize,
        num_braces: usize,
    ) -> Result<Program, Error> {
        if buf.len() >= crate::opcode::MAX_COMPILED_SIZE {
            return Err(Error::RegexTooLarge);
        }

        buf[1] = (total_paren - 1) as u8;
        buf[2] = num_braces as u8;

        let mut program = Program {
            buf,
            total_paren,
            num_braces,
            match_start: None,
            anchored: false,
        };
        program.analyze();
        Ok(program)
    }

    fn analyze(&mut self) {
        let mut scan = PROGRAM_START_OFFSET;

        // Only one top-level choice: the first BRANCH's NEXT points straight
        // to END, i.e. there is no second alternative to try.
        let first_branch_next_is_end = next_ptr(&self.buf, scan)
            .map(|n| self.buf[n] == Opcode::End as u8)
            .unwrap_or(true);

        if first_branch_next_is_end {
            scan = operand(scan);

            match Opcode::from_u8(self.buf[scan]) {
                Some(Opcode::Exactly) => {
                    let s = read_cstr(&self.buf, scan);
                    if let Some(&b) = s.first() {
                        self.match_start = Some(b);
                    }
                }
                Some(Opcode::Plus) | Some(Opcode::LazyPlus) => {
                    let after = scan + NODE_SIZE;
                    if self.buf[after] == Opcode::Exactly as u8 {
                        let s = read_cstr(&self.buf, after);
                        if let Some(&b) = s.first() {
                            self.match_start = Some(b);
                        }
                    }
                }
                Some(Opcode::Bol) => {
                    self.anchored = true;
                }
                _ => {}
            }
        }
    }

    /// Number of capturing groups, including the implicit whole-match group
    /// at index 0 (so `\1` through `\9` index `1..=9` of this range).
    pub fn capture_count(&self) -> usize {
        self.total_paren
    }

    pub(crate) fn node_start(&self) -> usize {
        PROGRAM_START_OFFSET
    }

    pub(crate) fn num_braces(&self) -> usize {
        self.num_braces
    }

    /// Reconstructs a `Program` from a previously compiled buffer, without
    /// recompiling the pattern. Validates the magic byte; does not re-walk
    /// the node stream for soundness, only for the optimization fields.
    pub fn from_bytes(buf: Vec<u8>) -> Result<Program, Error> {
        if buf.len() < PROGRAM_START_OFFSET || buf[0] != MAGIC {
            log::warn!("corrupted program");
            return Err(Error::Corrupted);
        }
        let total_paren = buf[1] as usize + 1;
        let num_braces = buf[2] as usize;
        let mut program = Program {
            buf,
            total_paren,
            num_braces,
            match_start: None,
            anchored: false,
        };
        program.analyze();
        Ok(program)
    }

    /// The raw compiled byte buffer, as used by [`Program::from_bytes`] for
    /// the round-trip (recompilation stability) property.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Whether every successful forward match is known to begin with a
    /// particular byte -- an optimization hint dug out at compile time, not
    /// a constraint the caller must honor.
    pub fn match_start(&self) -> Option<u8> {
        self.match_start
    }

    /// Whether the pattern can only match at offset 0 or immediately after a
    /// `\n` (the pattern begins with `^`).
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Runs this program against `haystack`, returning the first match found
    /// in the scan order `opts.reverse` selects.
    pub fn exec(
        &self,
        haystack: &[u8],
        opts: &ExecOptions<'_>,
    ) -> Result<Option<Captures>, Error> {
        matcher::exec(self, haystack, opts)
    }

    /// Expands `template` against `caps` (whose spans index into
    /// `haystack`), appending the result to `dst`. See
    /// [`crate::substitute::substitute`] for the exact escape/case-conversion
    /// rules and truncation behavior; this is the unbounded convenience
    /// entry point (no `max_len` ceiling).
    pub fn substitute(
        &self,
        template: &[u8],
        haystack: &[u8],
        caps: &Captures,
        dst: &mut Vec<u8>,
    ) -> bool {
        substitute::substitute(template, haystack, caps, dst, usize::MAX)
    }

    /// Like [`Program::substitute`], but truncates the expansion once `dst`
    /// would reach `max_len - 1` bytes, matching the original engine's
    /// fixed-size-destination-buffer contract for editor integration.
    pub fn substitute_bounded(
        &self,
        template: &[u8],
        haystack: &[u8],
        caps: &Captures,
        dst: &mut Vec<u8>,
        max_len: usize,
    ) -> bool {
        substitute::substitute(template, haystack, caps, dst, max_len)
    }
}

// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recursive-descent compiler: turns a pattern byte string into a packed
//! node stream. One pass, growing `Vec<u8>` in place (see `bytecode`'s
//! module doc for why this port doesn't need the original's two-pass
//! size-then-emit dance).

use crate::bytecode;
use crate::charclass;
use crate::error::Error;
use crate::flags::CompileFlags;
use crate::opcode::{Opcode, MAGIC, NSUBEXP};
use crate::program::Program;

/// Characters that stop a literal run dead (the original's `Default_Meta_Char`).
const META_CHARS: &[u8] = b"{.*+?[(|)^<>$";

#[inline]
fn is_quantifier(c: u8) -> bool {
    matches!(c, b'*' | b'+' | b'?' | b'{')
}

/// Replacement for the original's `WORST`/`HAS_WIDTH`/`SIMPLE` int flags.
#[derive(Clone, Copy)]
struct AtomFlags {
    has_width: bool,
    simple: bool,
}

impl AtomFlags {
    const WORST: AtomFlags = AtomFlags {
        has_width: false,
        simple: false,
    };
}

/// Replacement for the original's `len_range` struct. `lower < 0` means
/// "not a fixed length" (the original's `-1` sentinel on both fields).
#[derive(Clone, Copy)]
struct LenRange {
    lower: i64,
    upper: i64,
}

impl LenRange {
    const ZERO: LenRange = LenRange { lower: 0, upper: 0 };

    fn variable() -> LenRange {
        LenRange {
            lower: -1,
            upper: -1,
        }
    }

    fn is_fixed(&self) -> bool {
        self.lower >= 0
    }
}

/// Replacement for the original's `paren` int constants passed into `chunk`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ParenKind {
    NoParen,
    Paren,
    NoCapture,
    PosAheadOpen,
    NegAheadOpen,
    PosBehindOpen,
    NegBehindOpen,
    Insensitive,
    Sensitive,
    Newline,
    NoNewline,
}

/// Compiles `pattern` into a [`Program`]. `flags` seeds the case-sensitivity
/// state the same way an initial `(?i)` would.
pub fn compile(pattern: &[u8], flags: CompileFlags) -> Result<Program, Error> {
    if pattern.is_empty() {
        return Err(Error::NullPattern);
    }

    let mut compiler = Compiler {
        pattern,
        pos: 0,
        buf: Vec::with_capacity(pattern.len() * 2 + 16),
        total_paren: 1,
        num_braces: 0,
        closed_parens: 0,
        paren_has_width: 0,
        is_case_insensitive: flags.contains(CompileFlags::CASE_INSENSITIVE),
        match_newline: false,
    };

    compiler.buf.push(MAGIC);
    compiler.buf.push(b'%');
    compiler.buf.push(b'%');

    compiler.chunk(ParenKind::NoParen)?;

    let total_paren = compiler.total_paren;
    let num_braces = compiler.num_braces;
    Program::finish(compiler.buf, total_paren, num_braces)
}

struct Compiler<'a> {
    pattern: &'a [u8],
    pos: usize,
    buf: Vec<u8>,
    total_paren: usize,
    num_braces: usize,
    /// Bit `n` set means capturing group `n` has been fully closed.
    closed_parens: u64,
    /// Bit `n` set means capturing group `n` is known never to match the
    /// empty string.
    paren_has_width: u64,
    is_case_insensitive: bool,
    match_newline: bool,
}

impl<'a> Compiler<'a> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.pattern.get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, k: usize) -> Option<u8> {
        self.pattern.get(self.pos + k).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<u8> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn emit_class_byte(&mut self, c: u8) {
        if self.is_case_insensitive && c.is_ascii_alphabetic() {
            self.buf.push(c.to_ascii_lowercase());
            self.buf.push(c.to_ascii_uppercase());
        } else {
            self.buf.push(c);
        }
    }

    // ---- chunk / alternative / piece ----------------------------------

    /// Processes the main body of the regex, or a parenthesized sub-thing.
    /// The caller has already absorbed the opening delimiter (if any).
    fn chunk(&mut self, paren: ParenKind) -> Result<(usize, AtomFlags, LenRange), Error> {
        let old_sensitive = self.is_case_insensitive;
        let old_newline = self.match_newline;

        let mut flag_param = AtomFlags {
            has_width: true,
            simple: false,
        };
        let mut range_param = LenRange::ZERO;

        let mut ret_val: Option<usize> = None;
        let mut this_paren = 0usize;
        let mut look_only = false;
        let mut look_behind_bounds_pos: Option<usize> = None;

        match paren {
            ParenKind::Paren => {
                if self.total_paren >= NSUBEXP {
                    return Err(Error::TooManyParens);
                }
                this_paren = self.total_paren;
                self.total_paren += 1;
                ret_val = Some(bytecode::emit_node_u8(
                    &mut self.buf,
                    Opcode::encode_open(this_paren as u8),
                ));
            }
            ParenKind::PosAheadOpen | ParenKind::NegAheadOpen => {
                flag_param = AtomFlags::WORST;
                look_only = true;
                let op = if paren == ParenKind::PosAheadOpen {
                    Opcode::PosAheadOpen
                } else {
                    Opcode::NegAheadOpen
                };
                ret_val = Some(bytecode::emit_node(&mut self.buf, op));
            }
            ParenKind::PosBehindOpen | ParenKind::NegBehindOpen => {
                flag_param = AtomFlags::WORST;
                look_only = true;
                let op = if paren == ParenKind::PosBehindOpen {
                    Opcode::PosBehindOpen
                } else {
                    Opcode::NegBehindOpen
                };
                let pos = bytecode::emit_range_node(&mut self.buf, op, 0, 0);
                ret_val = Some(pos);
                look_behind_bounds_pos = Some(bytecode::operand(pos));
            }
            ParenKind::Insensitive => self.is_case_insensitive = true,
            ParenKind::Sensitive => self.is_case_insensitive = false,
            ParenKind::Newline => self.match_newline = true,
            ParenKind::NoNewline => self.match_newline = false,
            ParenKind::NoParen | ParenKind::NoCapture => {}
        }

        // Pick up the branches, linking them together.
        let mut first = true;
        loop {
            let (this_branch, flags_local, range_local) = self.alternative()?;

            if first {
                first = false;
                range_param = range_local;
                if ret_val.is_none() {
                    ret_val = Some(this_branch);
                }
            } else if range_param.is_fixed() {
                if range_local.is_fixed() {
                    if range_local.lower < range_param.lower {
                        range_param.lower = range_local.lower;
                    }
                    if range_local.upper > range_param.upper {
                        range_param.upper = range_local.upper;
                    }
                } else {
                    range_param = LenRange::variable();
                }
            }

            let ret_val_pos = ret_val.unwrap();
            bytecode::tail(&mut self.buf, ret_val_pos, this_branch);

            if !flags_local.has_width {
                flag_param.has_width = false;
            }

            if self.peek() != Some(b'|') {
                break;
            }
            self.pos += 1;
        }

        let ret_val_pos = ret_val.unwrap();

        // Make a closing node, and hook it on the end.
        let ender = match paren {
            ParenKind::Paren => {
                bytecode::emit_node_u8(&mut self.buf, Opcode::encode_close(this_paren as u8))
            }
            ParenKind::NoParen => bytecode::emit_node(&mut self.buf, Opcode::End),
            ParenKind::PosAheadOpen | ParenKind::NegAheadOpen => {
                bytecode::emit_node(&mut self.buf, Opcode::LookAheadClose)
            }
            ParenKind::PosBehindOpen | ParenKind::NegBehindOpen => {
                bytecode::emit_node(&mut self.buf, Opcode::LookBehindClose)
            }
            _ => bytecode::emit_node(&mut self.buf, Opcode::Nothing),
        };

        bytecode::tail(&mut self.buf, ret_val_pos, ender);

        // Hook the tails of the branch alternatives to the closing node.
        let mut this_branch = Some(ret_val_pos);
        while let Some(pos) = this_branch {
            bytecode::branch_tail(&mut self.buf, pos, crate::opcode::NODE_SIZE, ender);
            this_branch = bytecode::next_ptr(&self.buf, pos);
        }

        // Check for proper termination.
        if paren != ParenKind::NoParen {
            if self.peek() != Some(b')') {
                return Err(Error::MissingRightParen);
            }
            self.pos += 1;
        } else if self.peek().is_some() {
            if self.peek() == Some(b')') {
                return Err(Error::MissingLeftParen);
            } else {
                return Err(Error::JunkOnEnd);
            }
        }

        if let Some(bounds_pos) = look_behind_bounds_pos {
            if !range_param.is_fixed() {
                return Err(Error::LookbehindUnbounded);
            }
            if range_param.upper > 65535 {
                return Err(Error::LookbehindTooLarge);
            }
            let lo = range_param.lower as u16;
            let hi = range_param.upper as u16;
            self.buf[bounds_pos] = (lo >> 8) as u8;
            self.buf[bounds_pos + 1] = (lo & 0xff) as u8;
            self.buf[bounds_pos + 2] = (hi >> 8) as u8;
            self.buf[bounds_pos + 3] = (hi & 0xff) as u8;
        }

        if look_only {
            range_param = LenRange::ZERO;
        }

        let mut zero_width = false;

        if paren == ParenKind::Paren && this_paren < 64 {
            self.closed_parens |= 1u64 << this_paren;

            match self.peek() {
                Some(b'?') | Some(b'*') => zero_width = true,
                Some(b'{') => match self.peek_at(1) {
                    Some(b',') | Some(b'}') => zero_width = true,
                    Some(b'0') => {
                        let mut i = 2;
                        while self.peek_at(i) == Some(b'0') {
                            i += 1;
                        }
                        if self.peek_at(i) == Some(b',') {
                            zero_width = true;
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        if flag_param.has_width && paren == ParenKind::Paren && !zero_width && this_paren < 64 {
            self.paren_has_width |= 1u64 << this_paren;
        }

        self.is_case_insensitive = old_sensitive;
        self.match_newline = old_newline;

        Ok((ret_val_pos, flag_param, range_param))
    }

    /// Processes one alternative of an `|` operator, sequencing its pieces.
    fn alternative(&mut self) -> Result<(usize, AtomFlags, LenRange), Error> {
        let mut flag_param = AtomFlags::WORST;
        let mut range_param = LenRange::ZERO;

        let ret_val = bytecode::emit_node(&mut self.buf, Opcode::Branch);
        let mut chain: Option<usize> = None;

        while !matches!(self.peek(), None | Some(b'|') | Some(b')')) {
            let (latest, flags_local, range_local) = self.piece()?;

            flag_param.has_width |= flags_local.has_width;
            if range_local.lower < 0 {
                range_param = LenRange::variable();
            } else if range_param.is_fixed() {
                range_param.lower += range_local.lower;
                range_param.upper += range_local.upper;
            }

            if let Some(chain_pos) = chain {
                bytecode::tail(&mut self.buf, chain_pos, latest);
            }
            chain = Some(latest);
        }

        if chain.is_none() {
            bytecode::emit_node(&mut self.buf, Opcode::Nothing);
        }

        Ok((ret_val, flag_param, range_param))
    }

    /// An atom followed by an optional `*`, `+`, `?`, or `{m,n}`.
    fn piece(&mut self) -> Result<(usize, AtomFlags, LenRange), Error> {
        let (ret_val, flags_local, range_local) = self.atom()?;

        let op_code = match self.peek() {
            Some(c) if is_quantifier(c) => c,
            _ => return Ok((ret_val, flags_local, range_local)),
        };

        let mut min_max: [u32; 2] = [0, 0];
        let mut digit_present = [false, false];
        let mut comma_present = false;
        let brace_present = op_code == b'{';

        if op_code == b'{' {
            self.pos += 1;

            for i in 0..2 {
                while let Some(c) = self.peek() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    let d = (c - b'0') as u32;
                    if min_max[i] > 6552 && !(min_max[i] == 6553 && d <= 5) {
                        return Err(Error::RangeTooLarge);
                    }
                    min_max[i] = min_max[i] * 10 + d;
                    self.pos += 1;
                    digit_present[i] = true;
                }
                if !comma_present && self.peek() == Some(b',') {
                    comma_present = true;
                    self.pos += 1;
                }
            }

            if digit_present[0] && min_max[0] == 0 && !comma_present {
                return Err(Error::InvalidRangeZero);
            } else if digit_present[0] && min_max[0] == 0 && digit_present[1] && min_max[1] == 0 {
                return Err(Error::InvalidRangeZero);
            } else if digit_present[1] && min_max[1] == 0 {
                return Err(Error::InvalidRangeZero);
            }

            if !comma_present {
                min_max[1] = min_max[0];
            }

            if self.peek() != Some(b'}') {
                return Err(Error::MissingBraceClose);
            } else if min_max[1] != 0 && min_max[0] > min_max[1] {
                return Err(Error::InvalidRange);
            }
        }

        self.pos += 1; // consume the quantifier char, or the '}'

        let mut lazy = false;
        if self.peek() == Some(b'?') {
            lazy = true;
            self.pos += 1;
        }

        let mut op_code = op_code;
        if op_code == b'{' {
            if min_max[0] == 0 && min_max[1] == 0 {
                op_code = b'*';
            } else if min_max[0] == 1 && min_max[1] == 0 {
                op_code = b'+';
            } else if min_max[0] == 0 && min_max[1] == 1 {
                op_code = b'?';
            } else if min_max[0] == 1 && min_max[1] == 1 {
                // "x{1,1}" is the same as "x". Don't pollute the program.
                return Ok((ret_val, flags_local, range_local));
            } else if self.num_braces > 255 {
                return Err(Error::TooManyBraces);
            }
        }

        if op_code == b'+' {
            min_max[0] = 1;
        }
        if op_code == b'?' {
            min_max[1] = 1;
        }

        if !flags_local.has_width {
            return Err(Error::EmptyOperand);
        }
        let _ = brace_present;

        let flag_param = AtomFlags {
            has_width: min_max[0] > 0,
            simple: false,
        };
        let range_param = if range_local.lower >= 0 {
            if min_max[1] != 0 {
                LenRange {
                    lower: range_local.lower * min_max[0] as i64,
                    upper: range_local.upper * min_max[1] as i64,
                }
            } else {
                LenRange::variable()
            }
        } else {
            LenRange::variable()
        };

        self.lower_quantifier(ret_val, op_code, lazy, flags_local.simple, min_max)?;

        if let Some(c) = self.peek() {
            if is_quantifier(c) {
                return Err(Error::NestedQuantifiers);
            }
        }

        Ok((ret_val, flag_param, range_param))
    }

    /// Emits the node diagram for a quantified atom. `ret_val` is the
    /// position of the already-emitted atom; the twelve cases below mirror
    /// the structure diagrams in the original compiler's `piece`.
    fn lower_quantifier(
        &mut self,
        ret_val: usize,
        op_code: u8,
        lazy: bool,
        simple: bool,
        min_max: [u32; 2],
    ) -> Result<(), Error> {
        use crate::opcode::NODE_SIZE;
        let buf = &mut self.buf;

        if op_code == b'*' && simple {
            bytecode::insert_bare_node(
                buf,
                if lazy { Opcode::LazyStar } else { Opcode::Star },
                ret_val,
            );
        } else if op_code == b'+' && simple {
            bytecode::insert_bare_node(
                buf,
                if lazy { Opcode::LazyPlus } else { Opcode::Plus },
                ret_val,
            );
        } else if op_code == b'?' && simple {
            bytecode::insert_bare_node(
                buf,
                if lazy { Opcode::LazyQuestion } else { Opcode::Question },
                ret_val,
            );
        } else if op_code == b'{' && simple {
            bytecode::insert_range_node(
                buf,
                if lazy { Opcode::LazyBrace } else { Opcode::Brace },
                ret_val,
                min_max[0] as u16,
                min_max[1] as u16,
            );
        } else if (op_code == b'*' || op_code == b'+') && lazy {
            bytecode::tail(buf, ret_val, bytecode::emit_node(buf, Opcode::Back)); // 1
            bytecode::insert_bare_node(buf, Opcode::Branch, ret_val); // 2,4
            bytecode::insert_bare_node(buf, Opcode::Nothing, ret_val); // 3

            let next = bytecode::emit_node(buf, Opcode::Nothing); // 2,3

            bytecode::offset_tail(buf, ret_val, NODE_SIZE as isize, next); // 2
            bytecode::tail(buf, ret_val, next); // 3
            bytecode::insert_bare_node(buf, Opcode::Branch, ret_val); // 4,5
            bytecode::tail(buf, ret_val, ret_val + 2 * NODE_SIZE); // 4
            bytecode::offset_tail(buf, ret_val, 3 * NODE_SIZE as isize, ret_val); // 5

            if op_code == b'+' {
                bytecode::insert_bare_node(buf, Opcode::Nothing, ret_val); // 6
                bytecode::tail(buf, ret_val, ret_val + 4 * NODE_SIZE); // 6
            }
        } else if op_code == b'*' {
            bytecode::insert_bare_node(buf, Opcode::Branch, ret_val); // 1,3
            let back = bytecode::emit_node(buf, Opcode::Back);
            bytecode::offset_tail(buf, ret_val, NODE_SIZE as isize, back); // 2
            bytecode::offset_tail(buf, ret_val, NODE_SIZE as isize, ret_val); // 1
            let branch2 = bytecode::emit_node(buf, Opcode::Branch);
            bytecode::tail(buf, ret_val, branch2); // 3
            let nothing = bytecode::emit_node(buf, Opcode::Nothing);
            bytecode::tail(buf, ret_val, nothing); // 4
        } else if op_code == b'+' {
            let next = bytecode::emit_node(buf, Opcode::Branch); // 1
            bytecode::tail(buf, ret_val, next); // 1
            let back = bytecode::emit_node(buf, Opcode::Back);
            bytecode::tail(buf, back, ret_val); // 2
            let branch3 = bytecode::emit_node(buf, Opcode::Branch);
            bytecode::tail(buf, next, branch3); // 3
            let nothing = bytecode::emit_node(buf, Opcode::Nothing);
            bytecode::tail(buf, ret_val, nothing); // 4
        } else if op_code == b'?' && lazy {
            bytecode::insert_bare_node(buf, Opcode::Branch, ret_val); // 2,4
            bytecode::insert_bare_node(buf, Opcode::Nothing, ret_val); // 3

            let next = bytecode::emit_node(buf, Opcode::Nothing); // 1,2,3

            bytecode::offset_tail(buf, ret_val, 2 * NODE_SIZE as isize, next); // 1
            bytecode::offset_tail(buf, ret_val, NODE_SIZE as isize, next); // 2
            bytecode::tail(buf, ret_val, next); // 3
            bytecode::insert_bare_node(buf, Opcode::Branch, ret_val); // 4
            bytecode::tail(buf, ret_val, ret_val + 2 * NODE_SIZE); // 4
        } else if op_code == b'?' {
            bytecode::insert_bare_node(buf, Opcode::Branch, ret_val); // 1
            let branch2 = bytecode::emit_node(buf, Opcode::Branch);
            bytecode::tail(buf, ret_val, branch2); // 1

            let next = bytecode::emit_node(buf, Opcode::Nothing); // 2,3

            bytecode::tail(buf, ret_val, next); // 2
            bytecode::offset_tail(buf, ret_val, NODE_SIZE as isize, next); // 3
        } else if op_code == b'{' && min_max[0] == min_max[1] {
            self.lower_brace_exact(ret_val, min_max[0] as u16);
        } else if op_code == b'{' && lazy {
            if min_max[0] == 0 && min_max[1] != 0 {
                self.lower_lazy_brace_0n(ret_val, min_max[1] as u16);
            } else if min_max[0] > 0 && min_max[1] == 0 {
                self.lower_lazy_brace_m_inf(ret_val, min_max[0] as u16);
            } else {
                self.lower_lazy_brace_mn(ret_val, min_max[0] as u16, min_max[1] as u16);
            }
            self.num_braces += 1;
        } else if op_code == b'{' {
            if min_max[0] == 0 && min_max[1] != 0 {
                self.lower_brace_0n(ret_val, min_max[1] as u16);
            } else if min_max[0] > 0 && min_max[1] == 0 {
                self.lower_brace_m_inf(ret_val, min_max[0] as u16);
            } else {
                self.lower_brace_mn(ret_val, min_max[0] as u16, min_max[1] as u16);
            }
            self.num_braces += 1;
        } else {
            unreachable!("piece(): quantifier dispatch out of sync with is_quantifier()");
        }

        Ok(())
    }

    /// `(x){m,m}` / `(x){m,m}?`: minimal and maximal matching coincide.
    fn lower_brace_exact(&mut self, ret_val: usize, m: u16) {
        use crate::opcode::{INDEX_SIZE, NODE_SIZE};
        let index = self.num_braces as u8;
        let inc = bytecode::emit_index_node(&mut self.buf, Opcode::IncCount, index); // 1
        bytecode::tail(&mut self.buf, ret_val, inc);
        let test = bytecode::emit_test_count_node(&mut self.buf, index, m); // 2
        bytecode::tail(&mut self.buf, ret_val, test);
        let back = bytecode::emit_node(&mut self.buf, Opcode::Back); // 3
        bytecode::tail(&mut self.buf, back, ret_val);
        let nothing = bytecode::emit_node(&mut self.buf, Opcode::Nothing); // 4
        bytecode::tail(&mut self.buf, ret_val, nothing);
        let next = bytecode::insert_index_node(&mut self.buf, Opcode::InitCount, ret_val, index); // 5
        bytecode::tail(&mut self.buf, ret_val, next);
        let _ = (INDEX_SIZE, NODE_SIZE);
        self.num_braces += 1;
    }

    /// `(x){0,n}?` / `(x){,n}?`
    fn lower_lazy_brace_0n(&mut self, ret_val: usize, n: u16) {
        use crate::opcode::NODE_SIZE;
        let index = self.num_braces as u8;
        let inc = bytecode::emit_index_node(&mut self.buf, Opcode::IncCount, index); // 1
        bytecode::tail(&mut self.buf, ret_val, inc);

        let next = bytecode::emit_test_count_node(&mut self.buf, index, n); // 2,7
        bytecode::tail(&mut self.buf, ret_val, next); // 2
        bytecode::insert_bare_node(&mut self.buf, Opcode::Nothing, ret_val); // 5
        bytecode::insert_bare_node(&mut self.buf, Opcode::Branch, ret_val); // 3,4,8
        let back = bytecode::emit_node(&mut self.buf, Opcode::Back); // 3
        bytecode::tail(&mut self.buf, back, ret_val);
        bytecode::tail(&mut self.buf, ret_val, ret_val + 2 * NODE_SIZE); // 4

        let next2 = bytecode::emit_node(&mut self.buf, Opcode::Nothing); // 5,6,7
        bytecode::offset_tail(&mut self.buf, ret_val, NODE_SIZE as isize, next2); // 5
        bytecode::offset_tail(&mut self.buf, ret_val, 2 * NODE_SIZE as isize, next2); // 6
        bytecode::offset_tail(&mut self.buf, ret_val, 3 * NODE_SIZE as isize, next2); // 7

        let next3 = bytecode::insert_index_node(&mut self.buf, Opcode::InitCount, ret_val, index); // 8
        bytecode::tail(&mut self.buf, ret_val, next3);
        let _ = next;
    }

    /// `(x){m,}?`
    fn lower_lazy_brace_m_inf(&mut self, ret_val: usize, m: u16) {
        use crate::opcode::{INDEX_SIZE, NODE_SIZE};
        let index = self.num_braces as u8;
        let inc = bytecode::emit_index_node(&mut self.buf, Opcode::IncCount, index); // 1
        bytecode::tail(&mut self.buf, ret_val, inc);

        let next = bytecode::emit_test_count_node(&mut self.buf, index, m); // 2,4
        bytecode::tail(&mut self.buf, ret_val, next); // 2
        let back1 = bytecode::emit_node(&mut self.buf, Opcode::Back); // 3
        bytecode::tail(&mut self.buf, back1, ret_val);
        let back2 = bytecode::emit_node(&mut self.buf, Opcode::Back); // 4
        bytecode::tail(&mut self.buf, ret_val, back2);
        bytecode::insert_bare_node(&mut self.buf, Opcode::Branch, ret_val); // 5,7
        bytecode::insert_bare_node(&mut self.buf, Opcode::Nothing, ret_val); // 6

        let next2 = bytecode::emit_node(&mut self.buf, Opcode::Nothing); // 5,6
        bytecode::offset_tail(&mut self.buf, ret_val, NODE_SIZE as isize, next2); // 5
        bytecode::tail(&mut self.buf, ret_val, next2); // 6

        bytecode::insert_bare_node(&mut self.buf, Opcode::Branch, ret_val); // 7,8
        bytecode::tail(&mut self.buf, ret_val, ret_val + 2 * NODE_SIZE); // 7
        bytecode::offset_tail(&mut self.buf, ret_val, 3 * NODE_SIZE as isize, ret_val); // 8

        bytecode::insert_index_node(&mut self.buf, Opcode::InitCount, ret_val, index); // 9
        bytecode::tail(&mut self.buf, ret_val, ret_val + INDEX_SIZE + 4 * NODE_SIZE);
    }

    /// `(x){m,n}?`
    fn lower_lazy_brace_mn(&mut self, ret_val: usize, m: u16, n: u16) {
        use crate::opcode::{INDEX_SIZE, NODE_SIZE};
        let index = self.num_braces as u8;
        let inc = bytecode::emit_index_node(&mut self.buf, Opcode::IncCount, index); // 1
        bytecode::tail(&mut self.buf, ret_val, inc);

        let next = bytecode::emit_test_count_node(&mut self.buf, index, n); // 2,7
        bytecode::tail(&mut self.buf, ret_val, next); // 2

        let next2 = bytecode::emit_test_count_node(&mut self.buf, index, m); // 4

        let back1 = bytecode::emit_node(&mut self.buf, Opcode::Back); // 3
        bytecode::tail(&mut self.buf, back1, ret_val);
        let back2 = bytecode::emit_node(&mut self.buf, Opcode::Back); // 4
        bytecode::tail(&mut self.buf, next2, back2);

        bytecode::insert_bare_node(&mut self.buf, Opcode::Branch, ret_val); // 6,8
        bytecode::insert_bare_node(&mut self.buf, Opcode::Nothing, ret_val); // 5
        bytecode::insert_bare_node(&mut self.buf, Opcode::Branch, ret_val); // 8,9

        let next3 = bytecode::emit_node(&mut self.buf, Opcode::Nothing); // 5,6,7
        bytecode::offset_tail(&mut self.buf, ret_val, NODE_SIZE as isize, next3); // 5
        bytecode::offset_tail(&mut self.buf, ret_val, 2 * NODE_SIZE as isize, next3); // 6
        bytecode::offset_tail(&mut self.buf, ret_val, 3 * NODE_SIZE as isize, next3); // 7

        bytecode::tail(&mut self.buf, ret_val, ret_val + 2 * NODE_SIZE); // 8
        bytecode::offset_tail(&mut self.buf, next3, -(NODE_SIZE as isize), ret_val); // 9

        bytecode::insert_index_node(&mut self.buf, Opcode::InitCount, ret_val, index); // 10
        bytecode::tail(&mut self.buf, ret_val, ret_val + INDEX_SIZE + 4 * NODE_SIZE);
    }

    /// `(x){0,n}` / `(x){,n}`
    fn lower_brace_0n(&mut self, ret_val: usize, n: u16) {
        use crate::opcode::NODE_SIZE;
        let index = self.num_braces as u8;
        let inc = bytecode::emit_index_node(&mut self.buf, Opcode::IncCount, index); // 1
        bytecode::tail(&mut self.buf, ret_val, inc);

        let next = bytecode::emit_test_count_node(&mut self.buf, index, n); // 2,6
        bytecode::tail(&mut self.buf, ret_val, next); // 2
        bytecode::insert_bare_node(&mut self.buf, Opcode::Branch, ret_val); // 3,4,7
        let back = bytecode::emit_node(&mut self.buf, Opcode::Back); // 3
        bytecode::tail(&mut self.buf, back, ret_val);

        let next2 = bytecode::emit_node(&mut self.buf, Opcode::Branch); // 4,5
        bytecode::tail(&mut self.buf, ret_val, next2); // 4
        let nothing = bytecode::emit_node(&mut self.buf, Opcode::Nothing); // 5,6
        bytecode::tail(&mut self.buf, next2, nothing);
        bytecode::offset_tail(&mut self.buf, ret_val, NODE_SIZE as isize, next2); // 6

        let next3 = bytecode::insert_index_node(&mut self.buf, Opcode::InitCount, ret_val, index); // 7
        bytecode::tail(&mut self.buf, ret_val, next3);
    }

    /// `(x){m,}`
    fn lower_brace_m_inf(&mut self, ret_val: usize, m: u16) {
        use crate::opcode::{INDEX_SIZE, NODE_SIZE};
        let index = self.num_braces as u8;
        let inc = bytecode::emit_index_node(&mut self.buf, Opcode::IncCount, index); // 1
        bytecode::tail(&mut self.buf, ret_val, inc);

        let next = bytecode::emit_test_count_node(&mut self.buf, index, m); // 2
        bytecode::tail(&mut self.buf, ret_val, next); // 2
        let back1 = bytecode::emit_node(&mut self.buf, Opcode::Back); // 3
        bytecode::tail(&mut self.buf, back1, ret_val);
        bytecode::insert_bare_node(&mut self.buf, Opcode::Branch, ret_val); // 4,6

        let back2 = bytecode::emit_node(&mut self.buf, Opcode::Back); // 4
        bytecode::tail(&mut self.buf, back2, ret_val);
        bytecode::offset_tail(&mut self.buf, ret_val, NODE_SIZE as isize, back2); // 5
        let next2 = bytecode::emit_node(&mut self.buf, Opcode::Branch); // 6
        bytecode::tail(&mut self.buf, ret_val, next2);
        let nothing = bytecode::emit_node(&mut self.buf, Opcode::Nothing); // 7
        bytecode::tail(&mut self.buf, ret_val, nothing);

        bytecode::insert_index_node(&mut self.buf, Opcode::InitCount, ret_val, index); // 8
        bytecode::tail(&mut self.buf, ret_val, ret_val + INDEX_SIZE + 2 * NODE_SIZE);
    }

    /// `(x){m,n}`
    fn lower_brace_mn(&mut self, ret_val: usize, m: u16, n: u16) {
        use crate::opcode::{INDEX_SIZE, NODE_SIZE};
        let index = self.num_braces as u8;
        let inc = bytecode::emit_index_node(&mut self.buf, Opcode::IncCount, index); // 1
        bytecode::tail(&mut self.buf, ret_val, inc);

        let next = bytecode::emit_test_count_node(&mut self.buf, index, n); // 2,4
        bytecode::tail(&mut self.buf, ret_val, next); // 2

        let next2 = bytecode::emit_test_count_node(&mut self.buf, index, m); // 4

        let back1 = bytecode::emit_node(&mut self.buf, Opcode::Back); // 3
        bytecode::tail(&mut self.buf, back1, ret_val);
        let back2 = bytecode::emit_node(&mut self.buf, Opcode::Back); // 4
        bytecode::tail(&mut self.buf, next2, back2);

        bytecode::insert_bare_node(&mut self.buf, Opcode::Branch, ret_val); // 5,6

        let next3 = bytecode::emit_node(&mut self.buf, Opcode::Branch); // 5,8
        bytecode::tail(&mut self.buf, ret_val, next3); // 5
        bytecode::offset_tail(&mut self.buf, next3, -(NODE_SIZE as isize), ret_val); // 6

        let next4 = bytecode::emit_node(&mut self.buf, Opcode::Nothing); // 7,8
        bytecode::offset_tail(&mut self.buf, ret_val, NODE_SIZE as isize, next4); // 7
        bytecode::offset_tail(&mut self.buf, next4, -(NODE_SIZE as isize), next4); // 8

        bytecode::insert_index_node(&mut self.buf, Opcode::InitCount, ret_val, index); // 9
        bytecode::tail(&mut self.buf, ret_val, ret_val + INDEX_SIZE + 2 * NODE_SIZE);
    }

    // ---- atom -----------------------------------------------------------

    fn atom(&mut self) -> Result<(usize, AtomFlags, LenRange), Error> {
        // Absorb '(?#comment)' sequences, possibly several in a row.
        while self.peek() == Some(b'(') && self.peek_at(1) == Some(b'?') && self.peek_at(2) == Some(b'#') {
            self.pos += 3;
            while !matches!(self.peek(), None | Some(b')')) {
                self.pos += 1;
            }
            if self.peek() == Some(b')') {
                self.pos += 1;
            }
            if matches!(self.peek(), None | Some(b')') | Some(b'|')) {
                let pos = bytecode::emit_node(&mut self.buf, Opcode::Nothing);
                return Ok((pos, AtomFlags::WORST, LenRange::ZERO));
            }
        }

        let c = match self.bump() {
            Some(c) => c,
            None => return Err(Error::JunkOnEnd),
        };

        match c {
            b'^' => Ok((
                bytecode::emit_node(&mut self.buf, Opcode::Bol),
                AtomFlags::WORST,
                LenRange::ZERO,
            )),
            b'$' => Ok((
                bytecode::emit_node(&mut self.buf, Opcode::Eol),
                AtomFlags::WORST,
                LenRange::ZERO,
            )),
            b'<' => Ok((
                bytecode::emit_node(&mut self.buf, Opcode::Boword),
                AtomFlags::WORST,
                LenRange::ZERO,
            )),
            b'>' => Ok((
                bytecode::emit_node(&mut self.buf, Opcode::Eoword),
                AtomFlags::WORST,
                LenRange::ZERO,
            )),
            b'.' => {
                let op = if self.match_newline { Opcode::Every } else { Opcode::Any };
                let pos = bytecode::emit_node(&mut self.buf, op);
                Ok((
                    pos,
                    AtomFlags {
                        has_width: true,
                        simple: true,
                    },
                    LenRange { lower: 1, upper: 1 },
                ))
            }
            b'(' => self.atom_group(),
            b'\0' | b'|' | b')' => unreachable!("caught by chunk/alternative before atom() is called"),
            b'?' | b'+' | b'*' => Err(Error::QuantifierFollowsNothing),
            b'{' => Err(Error::QuantifierFollowsNothing),
            b'[' => self.atom_class(),
            b'\\' => self.atom_backslash(),
            _ => {
                self.pos -= 1;
                self.atom_literal_run()
            }
        }
    }

    fn atom_group(&mut self) -> Result<(usize, AtomFlags, LenRange), Error> {
        if self.peek() != Some(b'?') {
            return self.chunk(ParenKind::Paren);
        }
        self.pos += 1;
        match self.peek() {
            Some(b':') => {
                self.pos += 1;
                self.chunk(ParenKind::NoCapture)
            }
            Some(b'=') => {
                self.pos += 1;
                self.chunk(ParenKind::PosAheadOpen)
            }
            Some(b'!') => {
                self.pos += 1;
                self.chunk(ParenKind::NegAheadOpen)
            }
            Some(b'i') => {
                self.pos += 1;
                self.chunk(ParenKind::Insensitive)
            }
            Some(b'I') => {
                self.pos += 1;
                self.chunk(ParenKind::Sensitive)
            }
            Some(b'n') => {
                self.pos += 1;
                self.chunk(ParenKind::Newline)
            }
            Some(b'N') => {
                self.pos += 1;
                self.chunk(ParenKind::NoNewline)
            }
            Some(b'<') => {
                self.pos += 1;
                match self.peek() {
                    Some(b'=') => {
                        self.pos += 1;
                        self.chunk(ParenKind::PosBehindOpen)
                    }
                    Some(b'!') => {
                        self.pos += 1;
                        self.chunk(ParenKind::NegBehindOpen)
                    }
                    _ => Err(Error::InvalidLookbehindSyntax),
                }
            }
            _ => Err(Error::InvalidGroupingSyntax),
        }
    }

    fn atom_class(&mut self) -> Result<(usize, AtomFlags, LenRange), Error> {
        let mut last_emit: u8 = 0;

        let ret_val = if self.peek() == Some(b'^') {
            let pos = bytecode::emit_node(&mut self.buf, Opcode::AnyBut);
            self.pos += 1;
            if !self.match_newline {
                self.buf.push(b'\n');
            }
            pos
        } else {
            bytecode::emit_node(&mut self.buf, Opcode::AnyOf)
        };

        if matches!(self.peek(), Some(b']') | Some(b'-')) {
            last_emit = self.peek().unwrap();
            self.buf.push(last_emit);
            self.pos += 1;
        }

        while let Some(c) = self.peek() {
            if c == b']' {
                break;
            }
            if c == b'-' {
                self.pos += 1;
                match self.peek() {
                    None | Some(b']') => {
                        self.buf.push(b'-');
                        last_emit = b'-';
                    }
                    _ => {
                        let mut second_value = last_emit as i32 + 1;
                        let mut last_value;

                        if self.peek() == Some(b'\\') {
                            self.pos += 1;
                            let ec = self.peek().ok_or(Error::MissingClassClose)?;
                            if let Some(v) = self.decode_numeric_escape()? {
                                last_value = v as i32;
                            } else if let Some(v) = charclass::literal_escape(ec) {
                                last_value = v as i32;
                                self.pos += 1;
                            } else if is_shortcut_escape(ec, true) {
                                return Err(Error::EscapeNotRangeOperand);
                            } else {
                                return Err(Error::InvalidClassEscape);
                            }
                        } else {
                            last_value = self.peek().unwrap() as i32;
                            self.pos += 1;
                        }

                        if self.is_case_insensitive {
                            second_value = (second_value as u8).to_ascii_lowercase() as i32;
                            last_value = (last_value as u8).to_ascii_lowercase() as i32;
                        }

                        if second_value - 1 > last_value {
                            return Err(Error::InvalidRange);
                        }

                        let mut v = second_value;
                        while v <= last_value {
                            self.emit_class_byte(v as u8);
                            v += 1;
                        }
                        last_emit = last_value as u8;
                    }
                }
            } else if c == b'\\' {
                self.pos += 1;
                let ec = self.peek().ok_or(Error::MissingClassClose)?;
                if let Some(v) = self.decode_numeric_escape()? {
                    self.emit_class_byte(v);
                    last_emit = v;
                } else if let Some(v) = charclass::literal_escape(ec) {
                    self.buf.push(v);
                    last_emit = v;
                    self.pos += 1;
                } else if is_shortcut_escape(ec, true) {
                    if self.peek_at(1) == Some(b'-') {
                        return Err(Error::EscapeNotRangeOperand);
                    }
                    self.emit_shortcut_class_bytes(ec);
                    self.pos += 1;
                } else {
                    return Err(Error::InvalidClassEscape);
                }
            } else {
                self.emit_class_byte(c);
                last_emit = c;
                self.pos += 1;
            }
        }

        if self.peek() != Some(b']') {
            return Err(Error::MissingClassClose);
        }
        self.buf.push(0);
        self.pos += 1;

        Ok((
            ret_val,
            AtomFlags {
                has_width: true,
                simple: true,
            },
            LenRange { lower: 1, upper: 1 },
        ))
    }

    fn atom_backslash(&mut self) -> Result<(usize, AtomFlags, LenRange), Error> {
        let ec = self.peek().ok_or(Error::InvalidEscape)?;

        if let Some((pos, mut flags)) = self.shortcut_node(ec) {
            self.pos += 1;
            let range = if ec == b'B' {
                LenRange::ZERO
            } else {
                flags.has_width = true;
                LenRange { lower: 1, upper: 1 }
            };
            return Ok((pos, flags, range));
        }

        if let Some((pos, flags)) = self.back_ref_emit(ec)? {
            self.pos += 1;
            return Ok((pos, flags, LenRange::variable()));
        }

        // Not a shortcut or back-reference: fall through to the ordinary
        // literal-run code, pointing back at the backslash.
        self.pos -= 1;
        self.atom_literal_run()
    }

    fn atom_literal_run(&mut self) -> Result<(usize, AtomFlags, LenRange), Error> {
        let op = if self.is_case_insensitive {
            Opcode::Similar
        } else {
            Opcode::Exactly
        };
        let ret_val = bytecode::emit_node(&mut self.buf, op);

        let mut len = 0usize;

        while let Some(c) = self.peek() {
            if c == 0 || META_CHARS.contains(&c) {
                break;
            }
            let parse_save = self.pos;

            if c == b'\\' {
                self.pos += 1;
                let ec = self.peek().ok_or(Error::InvalidEscape)?;
                if let Some(v) = self.decode_numeric_escape()? {
                    self.buf.push(if self.is_case_insensitive {
                        v.to_ascii_lowercase()
                    } else {
                        v
                    });
                } else if let Some(v) = charclass::literal_escape(ec) {
                    self.buf.push(v);
                    self.pos += 1;
                } else if self.back_ref_paren_no(ec)?.is_some() {
                    // Leave the back-reference for the next `atom` call.
                    self.pos = parse_save;
                    break;
                } else if is_shortcut_escape(ec, false) {
                    // Leave the shortcut escape for the next `atom` call.
                    self.pos = parse_save;
                    break;
                } else {
                    return Err(Error::InvalidEscape);
                }
            } else {
                self.buf.push(if self.is_case_insensitive {
                    c.to_ascii_lowercase()
                } else {
                    c
                });
                self.pos += 1;
            }

            len += 1;

            // If a quantifier follows and we've already emitted more than one
            // character, leave the last one to be its own one-wide EXACTLY
            // node so the quantifier has something SIMPLE to act on.
            if let Some(q) = self.peek() {
                if is_quantifier(q) && len > 1 {
                    self.pos = parse_save;
                    self.buf.pop();
                    len -= 1;
                    break;
                }
            }
        }

        if len == 0 {
            return Err(Error::InvalidEscape);
        }

        self.buf.push(0);

        let flag_param = AtomFlags {
            has_width: true,
            simple: len == 1,
        };
        Ok((
            ret_val,
            flag_param,
            LenRange {
                lower: len as i64,
                upper: len as i64,
            },
        ))
    }

    // ---- shortcuts, escapes, back-references ----------------------------

    fn shortcut_node(&mut self, c: u8) -> Option<(usize, AtomFlags)> {
        let op = match c {
            b'd' => Opcode::Digit,
            b'D' => Opcode::NotDigit,
            b'l' => Opcode::Letter,
            b'L' => Opcode::NotLetter,
            b's' => {
                if self.match_newline {
                    Opcode::SpaceNl
                } else {
                    Opcode::Space
                }
            }
            b'S' => {
                if self.match_newline {
                    Opcode::NotSpaceNl
                } else {
                    Opcode::NotSpace
                }
            }
            b'w' => Opcode::WordChar,
            b'W' => Opcode::NotWordChar,
            b'y' => Opcode::IsDelim,
            b'Y' => Opcode::NotDelim,
            b'B' => Opcode::NotBoundary,
            _ => return None,
        };
        let pos = bytecode::emit_node(&mut self.buf, op);
        let flags = if c == b'B' {
            AtomFlags::WORST
        } else {
            AtomFlags {
                has_width: true,
                simple: true,
            }
        };
        Some((pos, flags))
    }

    fn emit_shortcut_class_bytes(&mut self, c: u8) {
        match c.to_ascii_lowercase() {
            b'd' => {
                for b in b'0'..=b'9' {
                    self.buf.push(b);
                }
            }
            b'l' => {
                for b in b'a'..=b'z' {
                    self.buf.push(b);
                }
                for b in b'A'..=b'Z' {
                    self.buf.push(b);
                }
            }
            b's' => {
                if self.match_newline {
                    self.buf.push(b'\n');
                }
                for &b in b" \t\x0b\x0c\r" {
                    self.buf.push(b);
                }
            }
            b'w' => {
                for b in b'a'..=b'z' {
                    self.buf.push(b);
                }
                for b in b'A'..=b'Z' {
                    self.buf.push(b);
                }
                for b in b'0'..=b'9' {
                    self.buf.push(b);
                }
                self.buf.push(b'_');
            }
            _ => unreachable!("emit_shortcut_class_bytes called with a non-class-code byte"),
        }
    }

    /// Decodes the paren number of a `\1`..`\9` back-reference, if `c` looks
    /// like one. Errors eagerly if it refers to a group that is not yet
    /// closed -- the original engine applies this check uniformly whether
    /// it's actually emitting the reference or merely probing for one while
    /// scanning a literal run.
    fn back_ref_paren_no(&self, c: u8) -> Result<Option<u8>, Error> {
        if !c.is_ascii_digit() {
            return Ok(None);
        }
        let paren_no = c - b'0';
        if paren_no == 0 {
            return Ok(None);
        }
        if self.closed_parens & (1u64 << paren_no) == 0 {
            return Err(Error::IllegalBackReference);
        }
        Ok(Some(paren_no))
    }

    fn back_ref_emit(&mut self, c: u8) -> Result<Option<(usize, AtomFlags)>, Error> {
        match self.back_ref_paren_no(c)? {
            None => Ok(None),
            Some(paren_no) => {
                let op = if self.is_case_insensitive {
                    Opcode::BackRefCi
                } else {
                    Opcode::BackRef
                };
                let pos = bytecode::emit_index_node(&mut self.buf, op, paren_no);
                let has_width = self.paren_has_width & (1u64 << paren_no) != 0;
                Ok(Some((pos, AtomFlags { has_width, simple: false })))
            }
        }
    }

    /// `self.pos` must point at the marker byte (`0`, `x`, or `X`).
    fn decode_numeric_escape(&mut self) -> Result<Option<u8>, Error> {
        let marker = self.peek().unwrap();
        let rest = &self.pattern[self.pos + 1..];
        match charclass::numeric_escape(marker, rest) {
            None => Ok(None),
            Some((0, _)) => Err(if marker == b'0' {
                Error::InvalidOctalEscape
            } else {
                Error::InvalidHexEscape
            }),
            Some((val, consumed)) => {
                self.pos += 1 + consumed;
                Ok(Some(val))
            }
        }
    }
}

fn is_shortcut_escape(c: u8, in_class: bool) -> bool {
    if in_class {
        charclass::SHORTCUT_CLASS_CODES.contains(&c)
    } else {
        charclass::SHORTCUT_CLASS_CODES.contains(&c) || charclass::SHORTCUT_NODE_ONLY.contains(&c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{next_ptr, op_at, read_cstr};
    use crate::opcode::PROGRAM_START_OFFSET;

    fn compile_ok(pattern: &str) -> Program {
        compile(pattern.as_bytes(), CompileFlags::empty()).expect("pattern should compile")
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_eq!(compile(b"", CompileFlags::empty()), Err(Error::NullPattern));
    }

    #[test]
    fn literal_compiles_to_single_exactly_node() {
        let prog = compile_ok("abc");
        let buf = prog.as_bytes();
        let scan = PROGRAM_START_OFFSET;
        assert_eq!(op_at(buf, scan), Opcode::Branch as u8);
    }

    #[test]
    fn star_on_simple_atom_uses_inline_star_node() {
        let prog = compile_ok("a*");
        let buf = prog.as_bytes();
        // BRANCH -> STAR -> EXACTLY("a") -> BACK -> BRANCH -> NOTHING -> END
        let branch = PROGRAM_START_OFFSET;
        let star = bytecode::operand(branch);
        assert_eq!(op_at(buf, star), Opcode::Star as u8);
    }

    #[test]
    fn unclosed_paren_is_an_error() {
        assert_eq!(compile(b"(abc", CompileFlags::empty()), Err(Error::MissingRightParen));
    }

    #[test]
    fn unopened_paren_is_an_error() {
        assert_eq!(compile(b"abc)", CompileFlags::empty()), Err(Error::MissingLeftParen));
    }

    #[test]
    fn nested_quantifier_is_rejected() {
        assert_eq!(compile(b"a**", CompileFlags::empty()), Err(Error::NestedQuantifiers));
    }

    #[test]
    fn back_reference_to_unclosed_group_is_illegal() {
        assert_eq!(
            compile(b"(a\\1)", CompileFlags::empty()),
            Err(Error::IllegalBackReference)
        );
    }

    #[test]
    fn back_reference_to_closed_group_is_legal() {
        let prog = compile_ok("(a)\\1");
        assert_eq!(prog.capture_count(), 2);
    }

    #[test]
    fn brace_zero_is_rejected() {
        assert_eq!(compile(b"a{0}", CompileFlags::empty()), Err(Error::InvalidRangeZero));
        assert_eq!(compile(b"a{0,0}", CompileFlags::empty()), Err(Error::InvalidRangeZero));
        assert_eq!(compile(b"a{2,0}", CompileFlags::empty()), Err(Error::InvalidRangeZero));
    }

    #[test]
    fn brace_backward_range_is_rejected() {
        assert_eq!(compile(b"a{5,2}", CompileFlags::empty()), Err(Error::InvalidRange));
    }

    #[test]
    fn too_many_parens_is_rejected() {
        let pattern: String = std::iter::repeat("(a)").take(50).collect();
        assert_eq!(
            compile(pattern.as_bytes(), CompileFlags::empty()),
            Err(Error::TooManyParens)
        );
    }

    #[test]
    fn case_insensitive_class_doubles_ascii_letters() {
        let prog = compile_ok("(?i)[a]");
        let buf = prog.as_bytes();
        let branch = PROGRAM_START_OFFSET;
        // BRANCH -> ANY_OF, whose operand holds both cases of 'a'.
        let any_of = bytecode::operand(branch);
        let s = read_cstr(buf, any_of);
        assert!(s.contains(&b'a') && s.contains(&b'A'));
    }

    #[test]
    fn lookbehind_with_unbounded_body_is_rejected() {
        assert_eq!(
            compile(b"(?<=a*)b", CompileFlags::empty()),
            Err(Error::LookbehindUnbounded)
        );
    }

    #[test]
    fn lookbehind_with_fixed_body_compiles() {
        let _ = compile_ok("(?<=abc)def");
    }

    #[test]
    fn quantifier_on_empty_operand_is_rejected() {
        assert_eq!(compile(b"(?:)*", CompileFlags::empty()), Err(Error::EmptyOperand));
    }

    #[test]
    fn braces_without_counting_quantifier_enabled_still_count() {
        let prog = compile_ok("a{2,4}");
        assert!(prog.as_bytes().len() > 0);
    }

    #[test]
    fn named_groups_are_not_supported_so_parens_are_numbered_positionally() {
        let prog = compile_ok("(a)(b)(c)");
        assert_eq!(prog.capture_count(), 4);
    }

    #[test]
    fn comment_group_compiles_to_nothing() {
        let prog = compile_ok("a(?#comment)b");
        let buf = prog.as_bytes();
        assert!(next_ptr(buf, PROGRAM_START_OFFSET).is_some());
    }
}

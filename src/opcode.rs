// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The bytecode node format: opcode numbering, node sizes and the packed
//! 16-bit `NEXT` offset scheme described in the data model.

/// Number of capturing groups allowed, including the implicit whole-match
/// group at index 0.
pub const NSUBEXP: usize = 50;

/// Largest size a compiled program's node stream may occupy. Offsets are
/// packed into 16 bits, so the real ceiling is 65535, but a margin is kept
/// for safety exactly as the original engine does.
pub const MAX_COMPILED_SIZE: usize = 32_767;

/// Byte 0 of every compiled program: guards against executing a buffer that
/// isn't actually a compiled program.
pub const MAGIC: u8 = 0o234;

/// Byte offset of the node stream within a compiled program buffer.
pub const PROGRAM_START_OFFSET: usize = 3;

pub const OP_CODE_SIZE: usize = 1;
pub const NEXT_PTR_SIZE: usize = 2;
pub const NODE_SIZE: usize = OP_CODE_SIZE + NEXT_PTR_SIZE;
pub const INDEX_SIZE: usize = 1;
pub const LENGTH_SIZE: usize = 4;

/// Opcode numbering. `OPEN+n`/`CLOSE+n` are encoded by adding `n` (1..=49)
/// directly to `Open`/`Close`, so the ordering below must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Opcode {
    End = 1,

    Bol = 2,
    Eol = 3,
    Boword = 4,
    Eoword = 5,
    NotBoundary = 6,

    Exactly = 7,
    Similar = 8,
    AnyOf = 9,
    AnyBut = 10,

    Any = 11,
    Every = 12,

    Digit = 13,
    NotDigit = 14,
    Letter = 15,
    NotLetter = 16,
    Space = 17,
    SpaceNl = 18,
    NotSpace = 19,
    NotSpaceNl = 20,
    WordChar = 21,
    NotWordChar = 22,
    IsDelim = 23,
    NotDelim = 24,

    Star = 25,
    LazyStar = 26,
    Question = 27,
    LazyQuestion = 28,
    Plus = 29,
    LazyPlus = 30,
    Brace = 31,
    LazyBrace = 32,

    Nothing = 33,
    Branch = 34,
    Back = 35,
    InitCount = 36,
    IncCount = 37,
    TestCount = 38,

    BackRef = 39,
    BackRefCi = 40,
    /// Reserved for cross-pattern back-references used by syntax
    /// highlighting in the original engine. Never emitted; rejected at
    /// parse time (see `Error::InvalidEscape`).
    CrossRegexBackRef = 41,
    CrossRegexBackRefCi = 42,

    PosAheadOpen = 43,
    NegAheadOpen = 44,
    LookAheadClose = 45,

    PosBehindOpen = 46,
    NegBehindOpen = 47,
    LookBehindClose = 48,

    Open = 49,
    // Open+1 .. Open+49 are capturing group 1..49.
    Close = 99,
    // Close+1 .. Close+49 are capturing group 1..49.
}

impl Opcode {
    pub const LAST_PAREN: u8 = Opcode::Close as u8 + NSUBEXP as u8;

    #[inline]
    pub fn from_u8(byte: u8) -> Option<Opcode> {
        use Opcode::*;
        Some(match byte {
            1 => End,
            2 => Bol,
            3 => Eol,
            4 => Boword,
            5 => Eoword,
            6 => NotBoundary,
            7 => Exactly,
            8 => Similar,
            9 => AnyOf,
            10 => AnyBut,
            11 => Any,
            12 => Every,
            13 => Digit,
            14 => NotDigit,
            15 => Letter,
            16 => NotLetter,
            17 => Space,
            18 => SpaceNl,
            19 => NotSpace,
            20 => NotSpaceNl,
            21 => WordChar,
            22 => NotWordChar,
            23 => IsDelim,
            24 => NotDelim,
            25 => Star,
            26 => LazyStar,
            27 => Question,
            28 => LazyQuestion,
            29 => Plus,
            30 => LazyPlus,
            31 => Brace,
            32 => LazyBrace,
            33 => Nothing,
            34 => Branch,
            35 => Back,
            36 => InitCount,
            37 => IncCount,
            38 => TestCount,
            39 => BackRef,
            40 => BackRefCi,
            41 => CrossRegexBackRef,
            42 => CrossRegexBackRefCi,
            43 => PosAheadOpen,
            44 => NegAheadOpen,
            45 => LookAheadClose,
            46 => PosBehindOpen,
            47 => NegBehindOpen,
            48 => LookBehindClose,
            _ => return None,
        })
    }

    /// Whether `byte` falls in the `OPEN+n` range, and if so which `n`.
    #[inline]
    pub fn open_paren(byte: u8) -> Option<u8> {
        let open = Opcode::Open as u8;
        if byte > open && (byte as usize) < open as usize + NSUBEXP {
            Some(byte - open)
        } else {
            None
        }
    }

    /// Whether `byte` falls in the `CLOSE+n` range, and if so which `n`.
    #[inline]
    pub fn close_paren(byte: u8) -> Option<u8> {
        let close = Opcode::Close as u8;
        if byte > close && (byte as usize) < close as usize + NSUBEXP {
            Some(byte - close)
        } else {
            None
        }
    }

    #[inline]
    pub fn encode_open(n: u8) -> u8 {
        Opcode::Open as u8 + n
    }

    #[inline]
    pub fn encode_close(n: u8) -> u8 {
        Opcode::Close as u8 + n
    }
}

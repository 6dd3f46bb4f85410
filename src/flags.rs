// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compile-time default flags (`REDFLT_STANDARD` / `REDFLT_CASE_INSENSITIVE`
//! in the original engine).

use bitflags::bitflags;

bitflags! {
    /// Default settings in effect before the pattern's own `(?i)`/`(?I)`
    /// toggles are parsed. `CASE_INSENSITIVE` seeds the compiler's
    /// `Is_Case_Insensitive` state the same way an initial `(?i)` would.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CompileFlags: u32 {
        const CASE_INSENSITIVE = 1 << 0;
    }
}

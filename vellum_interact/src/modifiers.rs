// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer modifier-key state.

bitflags::bitflags! {
    /// Modifier keys held during a pointer interaction.
    ///
    /// During drags, `SHIFT` requests uniform scaling and 45° snapping
    /// and `ALT` requests center-pivot scaling (or vertex removal on
    /// press in vertex-edit mode). `CTRL` and `META` are carried for
    /// embedders but unused by the core math.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0000_0001;
        /// Alt/option key.
        const ALT   = 0b0000_0010;
        /// Control key.
        const CTRL  = 0b0000_0100;
        /// Meta/command key.
        const META  = 0b0000_1000;
    }
}

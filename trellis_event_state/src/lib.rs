// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Event State: small state machines layered over raw pointer input.
//!
//! - [`click`]: recognizes double clicks from a stream of presses using a time
//!   window and a positional tolerance box.
//!
//! The machines here never perform hit testing. Callers resolve the pressed
//! target themselves (for example with `trellis_widget::Tree::trace`) and feed
//! the result in together with a millisecond timestamp.
//!
//! This crate is `no_std`.

#![no_std]

pub mod click;

// SPDX-License-Identifier: MIT

//! scribe-rs: research and writing agents that turn a topic into an article file

pub mod adk;
pub mod scribe;

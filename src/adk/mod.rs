// SPDX-License-Identifier: MIT

//! Agent development kit: model clients, agents and their errors

pub mod agent;
pub mod error;
pub mod model;

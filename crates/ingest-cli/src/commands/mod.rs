// SPDX-License-Identifier: MIT

//! `ingestd` subcommands.

pub mod check_config;
pub mod run;

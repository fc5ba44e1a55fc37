// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ingest-core: shared domain types for the ingest service.

pub mod allow_list;
pub mod application_id;

pub use allow_list::AllowList;
pub use application_id::{ApplicationId, InvalidApplicationId};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod category;
pub mod path_codec;

pub use account::{hash_password, AccountService, Registration};
pub use category::{CategoryFilter, CategorySelection};

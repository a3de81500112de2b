//! Core domain types for the cbx exchange client.
//!
//! This crate provides the fundamental types shared by the client and CLI:
//! - `Money`: precision-safe decimal amount
//! - `OrderSide`, `OrderKind`, `OrderStatus`: trading enums

pub mod error;
pub mod money;
pub mod order;

pub use error::{CoreError, Result};
pub use money::Money;
pub use order::{OrderKind, OrderSide, OrderStatus};

//! Ports Layer
//!
//! Defines the driving (inbound) interface that callers program against.

pub mod inbound;

pub use inbound::MembershipFilter;

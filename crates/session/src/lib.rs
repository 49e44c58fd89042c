//! Identity, session, and seller earnings.
//!
//! The checkout core treats identity as a collaborator: it reads the
//! current user and role, and mutates earnings only through
//! [`Session::credit`] and [`Session::request_payout`]. This crate also
//! carries the local identity registry (signup/login against persisted
//! credential records), which backs those reads.

pub mod error;
pub mod registry;
pub mod session;
pub mod user;

pub use error::{Result, SessionError};
pub use registry::Registry;
pub use session::Session;
pub use user::{ProfileUpdate, Role, Signup, User};

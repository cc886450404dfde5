//! The local storage accessor.
//!
//! [`LocalStore`] is built once per context from whatever storage area the
//! host exposes, and then reads and writes JSON records through it.

mod local;

pub use local::LocalStore;

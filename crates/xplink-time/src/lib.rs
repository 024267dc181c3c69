//! XPLINK Time - Simulator clock synchronization
//!
//! Converts the simulator's reported elapsed time into a monotonic local
//! timeline, absorbing scenario resets and backward jumps.

pub mod clock;

pub use clock::*;

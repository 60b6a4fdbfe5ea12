//! Client-side reward simulator: session counters, boost, withdrawal gate and
//! the event countdown, plus the line-based console driving them. Nothing in
//! here talks to the backend.

pub mod command;
pub mod console;
pub mod countdown;
pub mod session;

pub use command::{Command, ParseCommandError};
pub use countdown::{Countdown, Remaining};
pub use session::{MiningSession, SimulatorError, Withdrawal, WITHDRAW_THRESHOLD};

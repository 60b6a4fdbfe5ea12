use std::io::{self, Write};

use rand::Rng;
use time::OffsetDateTime;

use crate::simulator::{command::HELP, Command, Countdown, MiningSession};

/// Width the ticker line is padded to so a shorter render fully covers the last one.
const STATUS_WIDTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front end for one `MiningSession`.
///
/// Command replies go to `out`. The once-a-second countdown line goes to
/// `status`, rewritten in place with `\r`. When `title` is set the countdown
/// is also mirrored into the terminal window title on `out`.
pub struct Console<O, S> {
    session: MiningSession,
    countdown: Countdown,
    out: O,
    status: S,
    title: bool,
}

impl<O: Write, S: Write> Console<O, S> {
    pub fn new(countdown: Countdown, out: O, status: S, title: bool) -> Self {
        Self {
            session: MiningSession::new(),
            countdown,
            out,
            status,
            title,
        }
    }

    pub fn session(&self) -> &MiningSession {
        &self.session
    }

    pub fn status_line(&self, now: OffsetDateTime) -> String {
        format!(
            "event: {} | balance: {}",
            self.countdown.remaining_at(now),
            self.session.balance()
        )
    }

    pub fn tick_at(&mut self, now: OffsetDateTime) -> io::Result<()> {
        let line = self.status_line(now);
        write!(self.status, "\r{line:<STATUS_WIDTH$}")?;
        self.status.flush()?;
        if self.title {
            write!(self.out, "\x1b]0;{}\x07", self.countdown.remaining_at(now))?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn tick(&mut self) -> io::Result<()> {
        self.tick_at(OffsetDateTime::now_utc())
    }

    pub fn dispatch<R: Rng + ?Sized>(&mut self, command: Command, rng: &mut R) -> io::Result<Flow> {
        match command {
            Command::Mine => {
                let reward = self.session.mine(rng);
                writeln!(
                    self.out,
                    "+{reward} tokens | balance: {} | mined today: {}",
                    self.session.balance(),
                    self.session.mined_today()
                )?;
            }
            Command::Boost(level) => match self.session.set_boost(level) {
                Ok(level) => writeln!(self.out, "Boost activated: x{level}")?,
                Err(e) => {
                    tracing::warn!(error = %e, "boost rejected");
                    writeln!(self.out, "{e}")?;
                }
            },
            Command::Withdraw => writeln!(self.out, "{}", self.session.withdraw().message())?,
            Command::Status => writeln!(
                self.out,
                "balance: {} | mined today: {} | boost: x{} | event: {}",
                self.session.balance(),
                self.session.mined_today(),
                self.session.boost(),
                self.countdown.remaining()
            )?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    /// Parse and run one input line; parse errors are echoed, not fatal.
    pub fn handle_line<R: Rng + ?Sized>(&mut self, line: &str, rng: &mut R) -> io::Result<Flow> {
        match line.parse::<Command>() {
            Ok(command) => {
                tracing::debug!(?command, "command");
                self.dispatch(command, rng)
            }
            Err(e) => {
                writeln!(self.out, "{e}")?;
                Ok(Flow::Continue)
            }
        }
    }
}

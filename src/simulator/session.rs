use std::ops::RangeInclusive;

use rand::Rng;
use thiserror::Error;

/// Possible base rewards per mine, before boost.
pub const REWARD_RANGE: RangeInclusive<u32> = 2..=4;

/// Minimum balance before a withdrawal is entertained.
pub const WITHDRAW_THRESHOLD: f64 = 40.0;

#[derive(Debug, Error, PartialEq)]
pub enum SimulatorError {
    #[error("boost level must be a finite, non-negative number (got {0})")]
    InvalidBoost(f64),
}

/// Outcome of a withdrawal request. Neither variant changes the balance.
#[derive(Debug, Clone, PartialEq)]
pub enum Withdrawal {
    Insufficient { balance: f64 },
    ManualTask { balance: f64 },
}

impl Withdrawal {
    pub fn message(&self) -> String {
        match self {
            Withdrawal::Insufficient { balance } => format!(
                "Insufficient balance: {balance} tokens. You need at least {WITHDRAW_THRESHOLD} tokens to withdraw."
            ),
            Withdrawal::ManualTask { .. } => "Withdrawal requested. Complete the verification task \
                 to receive your tokens; payouts are processed manually."
                .to_string(),
        }
    }
}

/// Process-local mining counters. Nothing here is persisted or synced.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningSession {
    balance: f64,
    mined_today: f64,
    boost: f64,
}

impl Default for MiningSession {
    fn default() -> Self {
        Self {
            balance: 0.0,
            mined_today: 0.0,
            boost: 1.0,
        }
    }
}

impl MiningSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn mined_today(&self) -> f64 {
        self.mined_today
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    /// Draw a base reward from [`REWARD_RANGE`] and credit it. Returns the
    /// boosted amount added to both counters.
    pub fn mine<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let draw = rng.gen_range(REWARD_RANGE);
        self.credit(draw)
    }

    fn credit(&mut self, draw: u32) -> f64 {
        let reward = f64::from(draw) * self.boost;
        self.balance += reward;
        self.mined_today += reward;
        reward
    }

    pub fn set_boost(&mut self, level: f64) -> Result<f64, SimulatorError> {
        if !level.is_finite() || level < 0.0 {
            return Err(SimulatorError::InvalidBoost(level));
        }
        self.boost = level;
        Ok(level)
    }

    pub fn withdraw(&self) -> Withdrawal {
        if self.balance < WITHDRAW_THRESHOLD {
            Withdrawal::Insufficient {
                balance: self.balance,
            }
        } else {
            Withdrawal::ManualTask {
                balance: self.balance,
            }
        }
    }
}

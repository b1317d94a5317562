//! Board-mode convergence.
//!
//! Changing the board mode reboots parts of the card, so the new value is
//! only visible after a while. The poller writes the mode once and then
//! reads it back at a fixed interval for a bounded number of attempts.

use std::thread;
use std::time::Duration;

use sonic_lai::metadata::linecard_attr;
use sonic_lai::{LaiApi, LaiAttribute, LaiAttributeValue, LaiObjectId, LaiObjectType};

use crate::config::BoardModeConfig;
use crate::{debug_log, error_log, info_log, warn_log};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardModeOutcome {
    /// The card already ran in the requested mode.
    AlreadySet,
    /// The mode read back after `attempts` polls.
    Converged { attempts: u32 },
    /// The card still reported `last` after every attempt.
    TimedOut { last: Option<i32> },
    /// The card rejected the write.
    SetFailed,
}

impl BoardModeOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(
            self,
            BoardModeOutcome::AlreadySet | BoardModeOutcome::Converged { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct BoardModePoller {
    poll_interval: Duration,
    max_attempts: u32,
}

impl BoardModePoller {
    pub fn new(poll_interval: Duration, max_attempts: u32) -> Self {
        Self {
            poll_interval,
            max_attempts,
        }
    }

    pub fn from_config(config: &BoardModeConfig) -> Self {
        Self::new(config.poll_interval(), config.max_attempts)
    }

    /// Drives the card at `linecard_rid` to `mode`. Never fails the caller.
    pub fn converge(&self, api: &dyn LaiApi, linecard_rid: LaiObjectId, mode: i32) -> BoardModeOutcome {
        let current = read_mode(api, linecard_rid);
        if current == Some(mode) {
            debug_log!("BoardMode", mode, "linecard already runs the requested board mode");
            return BoardModeOutcome::AlreadySet;
        }

        info_log!("BoardMode", mode, ?current, "setting board mode");

        let attr = LaiAttribute::new(linecard_attr::BOARD_MODE, LaiAttributeValue::S32(mode));
        if let Err(e) = api.set(LaiObjectType::Linecard, linecard_rid, &attr) {
            error_log!("BoardMode", mode, error = %e, "failed to set board mode");
            return BoardModeOutcome::SetFailed;
        }

        let mut last = current;
        for attempt in 1..=self.max_attempts {
            thread::sleep(self.poll_interval);

            match read_mode(api, linecard_rid) {
                Some(value) if value == mode => {
                    info_log!("BoardMode", mode, attempts = attempt, "board mode converged");
                    return BoardModeOutcome::Converged { attempts: attempt };
                }
                Some(value) => last = Some(value),
                None => {}
            }
        }

        warn_log!(
            "BoardMode",
            mode,
            ?last,
            attempts = self.max_attempts,
            "board mode did not converge"
        );
        BoardModeOutcome::TimedOut { last }
    }
}

fn read_mode(api: &dyn LaiApi, linecard_rid: LaiObjectId) -> Option<i32> {
    api.get(LaiObjectType::Linecard, linecard_rid, &[linecard_attr::BOARD_MODE])
        .ok()
        .and_then(|attrs| attrs.first().and_then(|attr| attr.value.as_s32()))
}

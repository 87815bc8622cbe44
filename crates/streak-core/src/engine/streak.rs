//! Daily check-in computation.
//!
//! Given the prior record and the calendar day of the check-in, produce the next
//! record. Nothing here performs I/O; the only dependency is `chrono` date arithmetic.
//!
//! Rules:
//! - a second check-in on the same day is rejected
//! - a day earlier than the last check-in is rejected
//! - the first check-in ever starts the streak at 1
//! - a check-in on the following day extends the streak
//! - a gap of `missed` days is bridged only if `frozen_days >= missed`, consuming
//!   that many credits; otherwise the streak restarts at 1 and all credits are lost
//! - every accepted check-in grants a flat [`CHECKIN_XP_REWARD`]

use chrono::NaiveDate;

use crate::entities::UserRecord;
use crate::error::DomainError;

/// Experience points granted per accepted check-in
pub const CHECKIN_XP_REWARD: i64 = 10;

/// Compute the record that results from checking in on `today`.
///
/// `prior` is borrowed, so a rejected check-in leaves it untouched.
pub fn advance(prior: &UserRecord, today: NaiveDate) -> Result<UserRecord, DomainError> {
    let mut next = prior.clone();

    match prior.last_checkin {
        None => next.streak = 1,
        Some(last) if last == today => {
            return Err(DomainError::AlreadyCheckedIn { date: today });
        }
        Some(last) if today < last => {
            return Err(DomainError::InvalidDate {
                last_checkin: last,
                today,
            });
        }
        Some(last) => {
            let missed = (today - last).num_days() - 1;
            if missed == 0 {
                next.streak = prior.streak.saturating_add(1);
            } else if i64::from(prior.frozen_days) >= missed {
                next.frozen_days = prior.frozen_days - missed as i32;
                next.streak = prior.streak.saturating_add(1);
            } else {
                next.streak = 1;
                next.frozen_days = 0;
            }
        }
    }

    next.max_streak = prior.max_streak.max(next.streak);
    next.xp = prior.xp.saturating_add(CHECKIN_XP_REWARD);
    next.last_checkin = Some(today);

    Ok(next)
}

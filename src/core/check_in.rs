//! Check-in state machine
//!
//! ```text
//! NotCheckedIn ──check_in──▶ CheckedIn (terminal)
//! ```
//!
//! Only CONFIRMED registrations may make the transition. The function here is
//! pure: it validates a registration and returns the checked-in copy, leaving
//! lookup and persistence to the registry.

use crate::types::{CheckInState, Registration, RegistryError};
use chrono::{DateTime, Utc};

/// Validate and apply the check-in transition
///
/// # Arguments
///
/// * `registration` - The registration found for the presented code
/// * `now` - Timestamp to record on success
///
/// # Returns
///
/// The checked-in copy of `registration`
///
/// # Errors
///
/// - `AlreadyCheckedIn` if the registration already made the transition.
///   Checked first, so the recorded timestamp is never touched again.
/// - `NotConfirmed` if the registration is on the waitlist
pub fn check_in_transition(
    registration: &Registration,
    now: DateTime<Utc>,
) -> Result<Registration, RegistryError> {
    if registration.check_in_state() == CheckInState::CheckedIn {
        return Err(RegistryError::already_checked_in(
            &registration.confirmation_code,
        ));
    }

    if !registration.is_confirmed() {
        return Err(RegistryError::not_confirmed(&registration.confirmation_code));
    }

    let mut checked_in = registration.clone();
    checked_in.checked_in = true;
    checked_in.checked_in_at = Some(now);
    Ok(checked_in)
}

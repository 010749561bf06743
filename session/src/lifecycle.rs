//! Visit lifecycle.
//!
//! Pure creation-vs-mutation policy applied to a resolved session before
//! it is persisted. Randomness is passed in, never taken from a hidden
//! global, so tests can pin the greeting.

use crate::constants::GREETINGS;
use crate::error::{Result, SessionError};
use crate::state::Session;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

/// Pick a greeting uniformly from [`GREETINGS`].
#[must_use]
pub fn pick_greeting<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    GREETINGS.choose(rng).copied().unwrap_or(GREETINGS[0])
}

/// Apply one page view to a session.
///
/// A new session is initialized with `views = 0` and a random greeting
/// first. Existing values are kept as loaded, including the greeting.
/// Either way `views` is then incremented by one.
///
/// # Errors
///
/// Returns [`SessionError::CorruptSessionState`] if the counter cannot be
/// incremented without overflowing.
pub fn apply_visit<R: Rng + ?Sized>(mut session: Session, rng: &mut R) -> Result<Session> {
    if session.is_new {
        session.values.views = 0;
        session.values.greeting = pick_greeting(rng).to_string();
    }

    session.values.views = session.values.views.checked_add(1).ok_or_else(|| {
        SessionError::CorruptSessionState(format!(
            "view counter overflow for session {}",
            session.id
        ))
    })?;

    Ok(session)
}

/// Where greeting randomness comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntropySource {
    /// The calling thread's generator, seeded independently per thread.
    #[default]
    ThreadLocal,
    /// A generator freshly seeded with this value on every use.
    Fixed(u64),
}

impl EntropySource {
    /// Run `f` with a generator from this source.
    ///
    /// The generator never outlives the call, so it is never held across
    /// an `.await`.
    pub fn with_rng<T>(self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        match self {
            Self::ThreadLocal => f(&mut rand::thread_rng()),
            Self::Fixed(seed) => f(&mut StdRng::seed_from_u64(seed)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::state::{SessionId, VisitValues};
    use proptest::prelude::*;

    fn existing(views: u64, greeting: &str) -> Session {
        Session {
            id: SessionId::new(),
            is_new: false,
            values: VisitValues {
                views,
                greeting: greeting.to_string(),
            },
            created_at: None,
        }
    }

    #[test]
    fn test_new_session_gets_first_view_and_greeting() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = apply_visit(Session::fresh(), &mut rng).unwrap();

        assert_eq!(session.values.views, 1);
        assert!(GREETINGS.contains(&session.values.greeting.as_str()));
    }

    #[test]
    fn test_new_session_ignores_preexisting_values() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::fresh();
        session.values.views = 41;

        let session = apply_visit(session, &mut rng).unwrap();

        assert_eq!(session.values.views, 1);
    }

    #[test]
    fn test_existing_session_keeps_greeting() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = apply_visit(existing(4, "Hallo Welt"), &mut rng).unwrap();

        assert_eq!(session.values.views, 5);
        assert_eq!(session.values.greeting, "Hallo Welt");
    }

    #[test]
    fn test_overflow_is_corrupt_not_reset() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = apply_visit(existing(u64::MAX, "Hola Mundo"), &mut rng).unwrap_err();

        assert!(matches!(err, SessionError::CorruptSessionState(_)));
    }

    #[test]
    fn test_fixed_source_is_deterministic() {
        let first = EntropySource::Fixed(42).with_rng(|rng| pick_greeting(rng));
        let second = EntropySource::Fixed(42).with_rng(|rng| pick_greeting(rng));

        assert_eq!(first, second);
    }

    #[test]
    fn test_every_greeting_is_reachable() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(pick_greeting(&mut rng));
        }

        assert_eq!(seen.len(), GREETINGS.len());
    }

    proptest! {
        #[test]
        fn prop_n_visits_count_n(n in 1u64..200, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut session = apply_visit(Session::fresh(), &mut rng).unwrap();
            let greeting = session.values.greeting.clone();

            for _ in 1..n {
                session.is_new = false;
                session = apply_visit(session, &mut rng).unwrap();
            }

            prop_assert_eq!(session.values.views, n);
            prop_assert_eq!(session.values.greeting, greeting);
        }
    }
}

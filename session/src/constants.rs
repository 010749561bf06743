//! Session constants.

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "hello-views";

/// Default cookie max age and record TTL, in seconds (30 days).
pub const DEFAULT_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Prefix of session record keys in the document store.
pub const RECORD_KEY_PREFIX: &str = "hello-views:session:";

/// Greetings a new session can be assigned, in selection order.
pub const GREETINGS: [&str; 5] = [
    "Hello World",
    "Hallo Welt",
    "Ciao Mondo",
    "Salut le Monde",
    "Hola Mundo",
];

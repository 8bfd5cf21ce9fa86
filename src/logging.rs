//! Conditional logging macros for library-level tracing.
//!
//! Every level goes through `log_event!`, which forwards to `tracing` under
//! the `typed_kv` target when the `logging` feature is enabled and expands
//! to nothing otherwise. Log arguments must therefore never carry side
//! effects: without the feature they are not evaluated.
//!
//! Levels used by the crate:
//!
//! - `trace!` - codec fallbacks
//! - `debug!` - one event per facade operation
//! - `info!` - backend lifecycle
//! - `warn!` - a store answered a batch with something unexpected
//! - `error!` - a merge argument was refused
//!
//! ```rust,ignore
//! use crate::logging::{debug, warn};
//!
//! debug!(key = K::NAME, "get");
//! warn!(expected = K::NAME, found = %name, "batch response out of order");
//! ```

#[cfg(feature = "logging")]
macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::event!(target: "typed_kv", ::tracing::Level::$level, $($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => {};
}

macro_rules! log_trace {
    ($($arg:tt)*) => { log_event!(TRACE, $($arg)*) };
}

macro_rules! log_debug {
    ($($arg:tt)*) => { log_event!(DEBUG, $($arg)*) };
}

macro_rules! log_info {
    ($($arg:tt)*) => { log_event!(INFO, $($arg)*) };
}

macro_rules! log_warn {
    ($($arg:tt)*) => { log_event!(WARN, $($arg)*) };
}

macro_rules! log_error {
    ($($arg:tt)*) => { log_event!(ERROR, $($arg)*) };
}

pub(crate) use log_debug as debug;
pub(crate) use log_error as error;
#[cfg_attr(not(feature = "fjall"), allow(unused_imports))]
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
pub(crate) use log_warn as warn;

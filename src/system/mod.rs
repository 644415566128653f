//! # System Interaction Layer
//!
//! The boundary between the dispatcher and the outside world.
//!
//! ## Modules
//!
//! - **`writer`**: the `Writer` capability every piece of usage and error text
//!   goes through. `TerminalWriter` prints to stdout with `textwrap` wrapping and
//!   `colored` highlighting; `RecordingWriter` keeps lines in memory for tests and
//!   for applications that want to capture output.
//! - **`settings`**: loading of the `settings.toml` file that controls the
//!   program name, wrap width, colour policy and indentation of usage output.

/// Loading of `settings.toml`.
pub mod settings;
/// The output capability usage text goes through.
pub mod writer;

//! Error types for compilation failures.
//!
//! Every error here aborts the current compile call entirely; a partially
//! compiled message set or schema never escapes to the caller.

mod compile_error;

pub use compile_error::CompileError;

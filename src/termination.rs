//! Defines the [`Termination`] trait.

use std::{convert::Infallible, fmt::Debug, process};

/// This trait extends the [`std::process::Termination`] trait for use by the GUI runner.
///
/// Since winit does not allow returning from its event loop handler on all platforms, the process
/// is exited by the GUI runner itself, depending on the [`Termination`] value returned by the
/// application code.
pub trait Termination: process::Termination {
    fn is_success(&self) -> bool;
}

impl Termination for Infallible {
    fn is_success(&self) -> bool {
        match *self {}
    }
}

impl Termination for () {
    fn is_success(&self) -> bool {
        true
    }
}

impl<T: Termination, E: Debug> Termination for Result<T, E> {
    fn is_success(&self) -> bool {
        match self {
            Ok(term) => term.is_success(),
            Err(_) => false,
        }
    }
}

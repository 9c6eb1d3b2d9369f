//! The action-executor seam.
//!
//! The real executor (a remote UI automation client) is an external
//! collaborator with its own retry and availability behavior. The engine
//! only ever performs a zero-argument invocation per matched action name;
//! this module defines that boundary and a printing implementation for the
//! CLI. Sink errors are reported by the frame loop and never retried here.

use std::fmt;

/// Errors from an action sink.
#[derive(Debug)]
pub enum ActionError {
    /// The sink does not know the action name.
    UnknownAction(String),
    /// The underlying executor failed.
    ExecutorFailed(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::UnknownAction(name) => write!(f, "Unknown action {name:?}"),
            ActionError::ExecutorFailed(e) => write!(f, "Action executor failed: {e}"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Receives matched action names.
pub trait ActionSink {
    fn invoke(&self, action: &str) -> Result<(), ActionError>;
}

/// Sink that prints fired actions to stdout.
#[derive(Debug, Default)]
pub struct PrintSink;

impl ActionSink for PrintSink {
    fn invoke(&self, action: &str) -> Result<(), ActionError> {
        println!("[action] {action}");
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Sink that records invocations for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub fired: RefCell<Vec<String>>,
    }

    impl ActionSink for RecordingSink {
        fn invoke(&self, action: &str) -> Result<(), ActionError> {
            self.fired.borrow_mut().push(action.to_string());
            Ok(())
        }
    }
}

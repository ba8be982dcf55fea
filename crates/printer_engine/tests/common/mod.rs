#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Once;

use printer_engine::{CommandOutput, ProcessRunner, RunnerError};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(printer_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Last argument; the script for PowerShell invocations.
    pub fn script(&self) -> &str {
        self.args.last().map(String::as_str).unwrap_or_default()
    }
}

/// Records invocations and answers from a script; succeeds with empty
/// output once the script runs dry.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: RefCell<Vec<Invocation>>,
    pub replies: RefCell<VecDeque<Result<CommandOutput, RunnerError>>>,
}

impl RecordingRunner {
    pub fn new() -> Rc<Self> {
        init_logging();
        Rc::new(Self::default())
    }

    pub fn with_replies(replies: Vec<Result<CommandOutput, RunnerError>>) -> Rc<Self> {
        let runner = Self::new();
        runner.replies.borrow_mut().extend(replies);
        runner
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, RunnerError> {
        self.calls.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandOutput::ok("")))
    }
}

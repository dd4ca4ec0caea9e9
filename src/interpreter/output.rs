use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

/// Receives everything a script prints or reports.
///
/// The interpreter formats diagnostics before handing them over; an
/// outputter only decides where the text goes.
pub trait Outputter {
    /// Script output from `print` and `println`.
    fn print(&mut self, text: &str);
    /// A formatted warning.
    fn warning(&mut self, message: &str);
    /// A formatted error.
    fn error(&mut self, message: &str);
    /// Output of the `debug` built-in.
    fn debug(&mut self, message: &str);
}

/// Writes output to stdout and diagnostics to stderr.
///
/// `debug` messages become `tracing` events, so they show up only when the
/// subscriber enables them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleOutputter;

impl Outputter for ConsoleOutputter {
    fn print(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        // A closed stdout is not the script's problem.
        let _ = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush());
    }

    fn warning(&mut self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn error(&mut self, message: &str) {
        eprintln!("error: {message}");
    }

    fn debug(&mut self, message: &str) {
        tracing::debug!(target: "pile::script", "{message}");
    }
}

/// Everything a [`CaptureOutputter`] received.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Captured {
    /// Concatenated script output.
    pub output:   String,
    /// Warnings in order.
    pub warnings: Vec<String>,
    /// Errors in order.
    pub errors:   Vec<String>,
    /// Debug messages in order.
    pub debug:    Vec<String>,
}

/// Records everything in memory; clones share the same record.
///
/// # Example
/// ```
/// use pile::interpreter::{evaluator::core::Interpreter, output::CaptureOutputter};
///
/// let capture = CaptureOutputter::default();
/// let mut interpreter = Interpreter::new().with_outputter(capture.clone());
///
/// assert!(interpreter.read_source("demo", "println(\"hi\")"));
/// assert_eq!(capture.captured().output, "hi\n");
/// ```
#[derive(Debug, Default, Clone)]
pub struct CaptureOutputter {
    captured: Rc<RefCell<Captured>>,
}

impl CaptureOutputter {
    /// Returns a snapshot of what was recorded so far.
    #[must_use]
    pub fn captured(&self) -> Captured {
        self.captured.borrow().clone()
    }

    /// Returns the recorded script output.
    #[must_use]
    pub fn output(&self) -> String {
        self.captured.borrow().output.clone()
    }

    /// Returns the recorded errors.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.captured.borrow().errors.clone()
    }
}

impl Outputter for CaptureOutputter {
    fn print(&mut self, text: &str) {
        self.captured.borrow_mut().output.push_str(text);
    }

    fn warning(&mut self, message: &str) {
        self.captured.borrow_mut().warnings.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.captured.borrow_mut().errors.push(message.to_string());
    }

    fn debug(&mut self, message: &str) {
        self.captured.borrow_mut().debug.push(message.to_string());
    }
}

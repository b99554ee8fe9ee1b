use std::fmt::Write;

use log::debug;

/// One trial step of a backtracking line search.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSearchTraceRecord {
    pub search: &'static str,
    pub iter: usize,
    pub alpha: f64,
    /// Objective value at the trial point.
    pub value: f64,
    /// Armijo bound `f(x) + alpha * slope` the trial value is compared against.
    pub rhs: f64,
    pub note: Option<&'static str>,
}

impl LineSearchTraceRecord {
    pub fn format_line(&self) -> String {
        let mut line = format!("[{}] iter {:>4}", self.search, self.iter);
        let _ = write!(line, " | alpha {:>9.3e}", self.alpha);
        let _ = write!(line, " | f {:>13.6e}", self.value);
        let _ = write!(line, " | rhs {:>13.6e}", self.rhs);
        if let Some(note) = self.note {
            let _ = write!(line, " | note {note}");
        }
        line
    }
}

#[derive(Clone, Debug)]
pub(crate) struct LineSearchTracer {
    search: &'static str,
    history: Option<Vec<LineSearchTraceRecord>>,
}

impl LineSearchTracer {
    pub(crate) fn new(search: &'static str) -> Self {
        Self {
            search,
            history: None,
        }
    }

    pub(crate) fn with_history(search: &'static str) -> Self {
        Self {
            search,
            history: Some(Vec::new()),
        }
    }

    pub(crate) fn emit(
        &mut self,
        iter: usize,
        alpha: f64,
        value: f64,
        rhs: f64,
        note: Option<&'static str>,
    ) {
        let record = LineSearchTraceRecord {
            search: self.search,
            iter,
            alpha,
            value,
            rhs,
            note,
        };

        debug!("{}", record.format_line());

        if let Some(history) = &mut self.history {
            history.push(record);
        }
    }

    /// Collected records, or `None` when history was not requested.
    pub(crate) fn into_history(self) -> Option<Vec<LineSearchTraceRecord>> {
        self.history
    }
}

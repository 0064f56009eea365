//! Diagnostic Context Stack
//!
//! Tracks the constructs currently open while parsing, so an error at end of
//! input can say what would close it (`closure array(2)`).

use std::fmt;

/// A construct that can be left open at end of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Sequence,
    Closure,
    Array,
    Pipe,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Closure => "closure",
            Self::Array => "array",
            Self::Pipe => "pipe",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    frames: Vec<Context>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, context: Context) {
        self.frames.push(context);
    }

    pub fn pop(&mut self) -> Option<Context> {
        self.frames.pop()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render the open constructs, outermost first, with `additional` appended
    /// as if it were the innermost. Runs of the same construct collapse into
    /// `label(count)`.
    pub fn missing(&self, additional: Option<Context>) -> String {
        let mut runs: Vec<(Context, usize)> = Vec::new();
        for context in self.frames.iter().copied().chain(additional) {
            match runs.last_mut() {
                Some((last, count)) if *last == context => *count += 1,
                _ => runs.push((context, 1)),
            }
        }

        runs.iter()
            .map(|(context, count)| {
                if *count > 1 {
                    format!("{}({})", context, count)
                } else {
                    context.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack() {
        let stack = ContextStack::new();
        assert_eq!(stack.missing(None), "");
        assert_eq!(stack.missing(Some(Context::Pipe)), "pipe");
    }

    #[test]
    fn test_runs_collapse() {
        let mut stack = ContextStack::new();
        stack.push(Context::Array);
        stack.push(Context::Array);
        stack.push(Context::Array);
        assert_eq!(stack.missing(None), "array(3)");

        stack.push(Context::Closure);
        stack.push(Context::Array);
        assert_eq!(stack.missing(None), "array(3) closure array");
        assert_eq!(stack.missing(Some(Context::Array)), "array(3) closure array(2)");
    }

    #[test]
    fn test_pop_restores_rendering() {
        let mut stack = ContextStack::new();
        stack.push(Context::Sequence);
        stack.push(Context::Closure);
        assert_eq!(stack.pop(), Some(Context::Closure));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.missing(Some(Context::Pipe)), "sequence pipe");
    }
}

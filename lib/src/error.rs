//! Coded errors carrying the shape stack of the traversal that raised them.

use crate::types::ShapeId;
use oxrdf::Term;
use thiserror::Error;

/// Stable numeric codes for every failure the engines can surface.
///
/// Codes are grouped: 1xx for framing and flattening mismatches, 2xx for
/// value synthesis, 3xx for flatten-only failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// A referenced shape id does not resolve in the shape set.
    MissingShape = 1,
    /// A value or term does not have the structure the shape requires.
    ShapeMismatch = 101,
    /// A required record property found no match.
    NoPropertyMatches = 102,
    NoListHeadMatches = 103,
    MultipleListHeadMatches = 104,
    NoListTailMatches = 105,
    MultipleListTailMatches = 106,
    NoListItemMatches = 107,
    MultipleListItemMatches = 108,
    /// A map key resolved to a composite value.
    CompositeMapKey = 109,
    /// A (shape, value) pair re-entered itself while being flattened.
    CyclicMatch = 110,
    MinCountMismatch = 111,
    MaxCountMismatch = 112,
    NonMatchingTermType = 113,
    NonMatchingLiteralDatatype = 114,
    NonMatchingLiteralLanguage = 115,
    NonMatchingTermValue = 116,
    CannotSynthesizeShape = 201,
    CannotSynthesizeValue = 202,
    /// A record property could not be flattened from the given value.
    FailedToMatchProperty = 301,
    CannotUseLiteralAsSubject = 302,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// How a stack frame was entered: through a named property or a list index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEdge {
    Property(String),
    Index(usize),
}

/// One level of the traversal that was active when an error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// The shape the traversal was inside.
    pub shape: ShapeId,
    /// The edge the frame was entered through, when any.
    pub edge: Option<StackEdge>,
    /// The RDF term under inspection, when meaningful.
    pub focus: Option<Term>,
}

impl StackFrame {
    pub fn new(shape: ShapeId) -> Self {
        StackFrame {
            shape,
            edge: None,
            focus: None,
        }
    }
}

/// An error raised by framing, flattening or query generation.
///
/// Formats as `RAMP<code>: <message>` followed by one line per stack frame,
/// outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.code, .message, .stack))]
pub struct RampError {
    code: ErrorCode,
    message: String,
    stack: Vec<StackFrame>,
}

impl RampError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        RampError {
            code,
            message: message.into(),
            stack: Vec::new(),
        }
    }

    pub fn with_stack(
        code: ErrorCode,
        message: impl Into<String>,
        stack: Vec<StackFrame>,
    ) -> Self {
        RampError {
            code,
            message: message.into(),
            stack,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> &[StackFrame] {
        &self.stack
    }

    /// Replaces the stack; used by engines to attach the traversal state to
    /// errors raised below the stack bookkeeping.
    pub(crate) fn set_stack(mut self, stack: Vec<StackFrame>) -> Self {
        self.stack = stack;
        self
    }
}

fn render(code: &ErrorCode, message: &String, stack: &Vec<StackFrame>) -> String {
    let mut out = format!("RAMP{}: {}", code.as_u16(), message);
    for frame in stack {
        out.push_str(&format!("\n  at {}", frame.shape));
        match &frame.edge {
            Some(StackEdge::Property(name)) => out.push_str(&format!(" (property \"{}\")", name)),
            Some(StackEdge::Index(i)) => out.push_str(&format!(" (item {})", i)),
            None => {}
        }
        if let Some(focus) = &frame.focus {
            out.push_str(&format!(" on {}", focus));
        }
    }
    out
}

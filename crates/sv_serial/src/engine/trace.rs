use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write;

// -----------------------------------------------------------------------------
// TraceSegment

/// One step of a [`TracePath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceSegment {
    /// An object property.
    Field(String),
    /// A container or tuple element.
    Index(usize),
    /// A map entry.
    Key(String),
}

// -----------------------------------------------------------------------------
// TracePath

/// The property/index chain from the root of the value tree to the node
/// currently being converted.
///
/// Maintained by the per-call contexts while converters recurse, and attached
/// to failures as a diagnostic hint. Rendered like `friends[2].address["city"]`.
/// The path never affects conversion outcome.
#[derive(Default, Clone)]
pub struct TracePath {
    segments: Vec<TraceSegment>,
}

impl TracePath {
    /// Creates an empty path.
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Pushes a segment while descending into a sub-value.
    pub(crate) fn push(&mut self, segment: TraceSegment) {
        self.segments.push(segment);
    }

    /// Pops the last segment when the sub-value is done.
    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    /// Whether the path is at the root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Renders the path; empty at the root.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                TraceSegment::Field(name) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                TraceSegment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
                TraceSegment::Key(key) => {
                    let _ = write!(out, "[\"{key}\"]");
                }
            }
        }
        out
    }
}

impl fmt::Display for TracePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for TracePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TracePath({self})")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_dotted_and_bracketed_chains() {
        let mut path = TracePath::new();
        assert_eq!(path.render(), "");

        path.push(TraceSegment::Field("friends".into()));
        path.push(TraceSegment::Index(2));
        path.push(TraceSegment::Field("address".into()));
        path.push(TraceSegment::Key("city".into()));
        assert_eq!(path.render(), "friends[2].address[\"city\"]");

        path.pop();
        path.pop();
        assert_eq!(path.render(), "friends[2]");
    }

    #[test]
    fn index_at_root_has_no_leading_dot() {
        let mut path = TracePath::new();
        path.push(TraceSegment::Index(0));
        path.push(TraceSegment::Field("x".into()));
        assert_eq!(path.render(), "[0].x");
    }
}

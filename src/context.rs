//! Immutable parsing context threaded through the recursive-descent parser
//! (spec.md §3 `ParsingContext`, §4.3).
//!
//! Grounded on `src/typechecker/context.rs::Context`: a small, cheaply-cloned
//! struct wrapping the ambient state a recursive check/parse function needs,
//! rebuilt (not mutated in place) for each child call.
use crate::registry::Registry;

/// One level of call nesting: the operator that owns this argument slot and
/// the positional index the argument occupies within that call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub op: &'static str,
    pub index: usize,
}

/// The path + operator ancestry of the node currently being parsed.
///
/// A child context is derived from a parent by pushing one [`Frame`]
/// (operator name + argument index) per recursive descent step (spec.md §3).
#[derive(Clone)]
pub struct ParsingContext<'a> {
    frames: Vec<Frame>,
    registry: &'a Registry,
}

impl<'a> ParsingContext<'a> {
    pub fn root(registry: &'a Registry) -> Self {
        ParsingContext {
            frames: vec![],
            registry,
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The operator names on the path from the root to this node, outermost
    /// first.
    pub fn ancestors(&self) -> Vec<&'static str> {
        self.frames.iter().map(|f| f.op).collect()
    }

    /// The dotted path from the root to this node, used as the `key` of any
    /// [`crate::error::Diagnostic`] raised here (spec.md §6.3).
    pub fn key(&self) -> String {
        self.frames
            .iter()
            .map(|f| f.index.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Derive the context for the argument at `index` of the operator
    /// `op_name`.
    pub fn child(&self, op_name: &'static str, index: usize) -> Self {
        let mut frames = self.frames.clone();
        frames.push(Frame { op: op_name, index });
        ParsingContext {
            frames,
            registry: self.registry,
        }
    }

    /// The frame describing this node's own position (its parent operator
    /// and the slot it occupies), if any.
    pub fn own_frame(&self) -> Option<Frame> {
        self.frames.last().copied()
    }

    /// The frame one level further up (the parent operator's own position
    /// within *its* parent), if any. Used by `zoom`'s contextual restriction
    /// (spec.md §4.6) to see through one level of wrapping, e.g. `coalesce`.
    pub fn grandparent_frame(&self) -> Option<Frame> {
        let len = self.frames.len();
        if len < 2 {
            None
        } else {
            Some(self.frames[len - 2])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn root_context_has_empty_key() {
        let registry = Registry::empty();
        let ctx = ParsingContext::root(&registry);
        assert_eq!(ctx.key(), "");
        assert!(ctx.ancestors().is_empty());
        assert_eq!(ctx.own_frame(), None);
    }

    #[test]
    fn child_extends_path_and_ancestors() {
        let registry = Registry::empty();
        let ctx = ParsingContext::root(&registry);
        let child = ctx.child("curve", 2);
        assert_eq!(child.key(), "2");
        assert_eq!(child.ancestors(), vec!["curve"]);
        assert_eq!(child.own_frame(), Some(Frame { op: "curve", index: 2 }));

        let grandchild = child.child("coalesce", 0);
        assert_eq!(grandchild.key(), "2.0");
        assert_eq!(grandchild.ancestors(), vec!["curve", "coalesce"]);
        assert_eq!(
            grandchild.grandparent_frame(),
            Some(Frame { op: "curve", index: 2 })
        );
    }

    #[test]
    fn grandparent_frame_is_none_near_root() {
        let registry = Registry::empty();
        let ctx = ParsingContext::root(&registry).child("curve", 2);
        assert_eq!(ctx.grandparent_frame(), None);
    }
}

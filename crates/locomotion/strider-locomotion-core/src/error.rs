//! Setup-time error types. Runtime geometric edge cases never error; they
//! degrade to documented fallbacks instead.

use crate::node::NodeId;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RigError {
    /// Parent assignment would make a node its own ancestor.
    #[error("parent assignment creates a cycle: {child:?} -> {parent:?}")]
    NodeCycle { child: NodeId, parent: NodeId },

    /// A node id does not belong to this arena.
    #[error("unknown node id: {0:?}")]
    UnknownNode(NodeId),

    /// The rig was built with no usable legs.
    #[error("rig has no legs (anchors={anchors}, aims={aims}, limbs={limbs})")]
    NoLegs {
        anchors: usize,
        aims: usize,
        limbs: usize,
    },
}

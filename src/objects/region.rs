//! Region objects.
//!
//! A region is a binary tree of nodes. Leaves are rectangles, paths, or the empty and infinite
//! regions; inner nodes combine their two children. On the wire the tree is written depth first,
//! left child before right child, after a count of all nodes below the root.

use crate::{
    objects::{decode_sized, encode_sized, EmfObject, GraphicsVersion, PathObject},
    pseudo::{Oid, PseudoObject},
    serial::{serialize, Field, Parser},
    types::{RectF, RegionNodeDataType},
    Error, Result,
};

/// Deepest node tree the decoder follows.
pub const MAX_REGION_DEPTH: usize = 256;

/// One node of a region tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionNode {
    /// Two regions combined by `kind`
    Combine {
        /// One of `And`, `Or`, `Xor`, `Exclude` or `Complement`
        kind: RegionNodeDataType,
        /// Left operand
        left: Box<RegionNode>,
        /// Right operand
        right: Box<RegionNode>,
    },
    /// A rectangle
    Rect(RectF),
    /// The interior of a path
    Path(PathObject),
    /// Nothing
    Empty,
    /// Everything
    Infinite,
}

fn is_combining(kind: RegionNodeDataType) -> bool {
    matches!(
        kind,
        RegionNodeDataType::And
            | RegionNodeDataType::Or
            | RegionNodeDataType::Xor
            | RegionNodeDataType::Exclude
            | RegionNodeDataType::Complement
    )
}

impl RegionNode {
    /// Combine two nodes.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] if `kind` is not a combining node type.
    pub fn combine(kind: RegionNodeDataType, left: RegionNode, right: RegionNode) -> Result<Self> {
        if !is_combining(kind) {
            return Err(Error::TypeMismatch {
                expected: "combining region node",
                found: kind.into(),
            });
        }
        Ok(RegionNode::Combine {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Node type written on the wire.
    #[must_use]
    pub fn node_type(&self) -> RegionNodeDataType {
        match self {
            RegionNode::Combine { kind, .. } => *kind,
            RegionNode::Rect(_) => RegionNodeDataType::Rect,
            RegionNode::Path(_) => RegionNodeDataType::Path,
            RegionNode::Empty => RegionNodeDataType::Empty,
            RegionNode::Infinite => RegionNodeDataType::Infinite,
        }
    }

    /// Number of nodes below this one.
    #[must_use]
    pub fn descendants(&self) -> usize {
        match self {
            RegionNode::Combine { left, right, .. } => {
                2 + left.descendants() + right.descendants()
            }
            _ => 0,
        }
    }

    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
        let kind = self.node_type();
        out.extend_from_slice(&kind.value().to_le_bytes());
        match self {
            RegionNode::Combine { left, right, .. } => {
                if !is_combining(kind) {
                    return Err(Error::TypeMismatch {
                        expected: "combining region node",
                        found: kind.into(),
                    });
                }
                left.encode_into(out)?;
                right.encode_into(out)?;
            }
            RegionNode::Rect(rect) => {
                let po = serialize(Oid::RectF, &[Field::Item(rect)])?;
                out.extend_from_slice(po.data());
            }
            RegionNode::Path(path) => out.extend(encode_sized(path)?),
            RegionNode::Empty | RegionNode::Infinite => {}
        }
        Ok(())
    }

    fn decode_at(parser: &mut Parser<'_>, depth: usize) -> Result<Self> {
        if depth > MAX_REGION_DEPTH {
            return Err(malformed_error!(
                "Region node tree deeper than {}",
                MAX_REGION_DEPTH
            ));
        }

        let kind = RegionNodeDataType::try_from(parser.read_le::<u32>()?)?;
        Ok(match kind {
            RegionNodeDataType::Rect => RegionNode::Rect(parser.read()?),
            RegionNodeDataType::Path => RegionNode::Path(decode_sized(parser)?),
            RegionNodeDataType::Empty => RegionNode::Empty,
            RegionNodeDataType::Infinite => RegionNode::Infinite,
            RegionNodeDataType::Kids => {
                return Err(malformed_error!("Region node of type 0"));
            }
            _ => {
                let left = Self::decode_at(parser, depth + 1)?;
                let right = Self::decode_at(parser, depth + 1)?;
                RegionNode::Combine {
                    kind,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
        })
    }
}

impl EmfObject for RegionNode {
    const OID: Oid = Oid::RegionNode;

    fn encode(&self) -> Result<PseudoObject> {
        let mut data = Vec::new();
        self.encode_into(&mut data)?;
        Ok(PseudoObject::from_parts(Self::OID, data))
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        Self::decode_at(parser, 0)
    }
}

/// A region object.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Graphics version
    pub version: GraphicsVersion,
    /// Root node
    pub root: RegionNode,
}

impl Region {
    /// A region holding one rectangle.
    #[must_use]
    pub fn rect(rect: RectF) -> Self {
        Region {
            version: GraphicsVersion::default(),
            root: RegionNode::Rect(rect),
        }
    }

    /// The infinite region.
    #[must_use]
    pub fn infinite() -> Self {
        Region {
            version: GraphicsVersion::default(),
            root: RegionNode::Infinite,
        }
    }
}

impl EmfObject for Region {
    const OID: Oid = Oid::Region;

    fn encode(&self) -> Result<PseudoObject> {
        let mut nodes = Vec::new();
        self.root.encode_into(&mut nodes)?;
        let count = u32::try_from(self.root.descendants()).map_err(|_| Error::OutOfRange {
            what: "region node count",
            value: i64::MAX,
        })?;
        serialize(
            Self::OID,
            &[
                Field::Item(&self.version),
                Field::U32(count),
                Field::Bytes(&nodes),
            ],
        )
    }

    fn decode(parser: &mut Parser<'_>) -> Result<Self> {
        let version = parser.read()?;
        let count: u32 = parser.read_le()?;
        let root = RegionNode::decode(parser)?;
        if usize::try_from(count).ok() != Some(root.descendants()) {
            log::warn!(
                "region declares {} child nodes but holds {}",
                count,
                root.descendants()
            );
        }
        Ok(Region { version, root })
    }
}

//! Physical components and database layouts.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Physical component a data file holds.
///
/// Declaration order is the classification order: when a path carries more
/// than one tag, the first one listed here wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ComponentRole {
    #[serde(rename = "PX")]
    Px,
    #[serde(rename = "PZ")]
    Pz,
    #[serde(rename = "MZZ")]
    Mzz,
    #[serde(rename = "MXX_P_MYY")]
    MxxPMyy,
    #[serde(rename = "MXZ_MYZ")]
    MxzMyz,
    #[serde(rename = "MXY_MXX_M_MYY")]
    MxyMxxMMyy,
}

impl ComponentRole {
    /// All roles in classification order.
    pub const ALL: [ComponentRole; 6] = [
        ComponentRole::Px,
        ComponentRole::Pz,
        ComponentRole::Mzz,
        ComponentRole::MxxPMyy,
        ComponentRole::MxzMyz,
        ComponentRole::MxyMxxMMyy,
    ];

    /// The four elemental moment tensor roles of a forward database.
    pub const MOMENT_TENSOR: [ComponentRole; 4] = [
        ComponentRole::Mzz,
        ComponentRole::MxxPMyy,
        ComponentRole::MxzMyz,
        ComponentRole::MxyMxxMMyy,
    ];

    /// Directory tag identifying this role.
    pub fn tag(&self) -> &'static str {
        match self {
            ComponentRole::Px => "PX",
            ComponentRole::Pz => "PZ",
            ComponentRole::Mzz => "MZZ",
            ComponentRole::MxxPMyy => "MXX_P_MYY",
            ComponentRole::MxzMyz => "MXZ_MYZ",
            ComponentRole::MxyMxxMMyy => "MXY_MXX_M_MYY",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.tag() == tag)
    }

    pub fn is_moment_tensor(&self) -> bool {
        Self::MOMENT_TENSOR.contains(self)
    }
}

impl fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    /// Single-force (PX/PZ) components; receiver at the surface.
    Reciprocal,
    /// Four elemental moment tensors; source depth fixed.
    Forward,
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::Reciprocal => f.write_str("reciprocal"),
            DatabaseKind::Forward => f.write_str("forward"),
        }
    }
}

/// A classified set of data files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseLayout {
    pub kind: DatabaseKind,
    pub files: BTreeMap<ComponentRole, PathBuf>,
}

impl DatabaseLayout {
    pub fn is_reciprocal(&self) -> bool {
        self.kind == DatabaseKind::Reciprocal
    }

    /// Component tags in classification order.
    pub fn component_tags(&self) -> Vec<String> {
        self.files.keys().map(|role| role.tag().to_string()).collect()
    }

    pub fn file(&self, role: ComponentRole) -> Option<&PathBuf> {
        self.files.get(&role)
    }
}

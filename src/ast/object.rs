use std::fmt::{self, Display, Formatter};

use super::CType;

/// Where an object lives. Frame-resident objects carry the signed byte offset the
/// front end assigned them within the activation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Global,
    Static,
    Extern,
    Local(isize),
    Param(isize),
}
impl StorageClass {
    /// Objects with static storage duration are addressed by name.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            StorageClass::Global | StorageClass::Static | StorageClass::Extern
        )
    }

    pub fn frame_offset(&self) -> Option<isize> {
        match self {
            StorageClass::Local(offset) | StorageClass::Param(offset) => Some(*offset),
            _ => None,
        }
    }
}

/// A symbol table entry for an object or function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub name: String,
    pub ty: CType,
    pub storage: StorageClass,
}
impl Object {
    pub fn new<S: Into<String>>(name: S, ty: CType, storage: StorageClass) -> Self {
        Self {
            name: name.into(),
            ty,
            storage,
        }
    }

    pub fn global<S: Into<String>>(name: S, ty: CType) -> Self {
        Self::new(name, ty, StorageClass::Global)
    }

    pub fn local<S: Into<String>>(name: S, ty: CType, offset: isize) -> Self {
        Self::new(name, ty, StorageClass::Local(offset))
    }

    pub fn param<S: Into<String>>(name: S, ty: CType, offset: isize) -> Self {
        Self::new(name, ty, StorageClass::Param(offset))
    }
}
impl Display for Object {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} : {}", self.name, self.ty)
    }
}

//! Type system definitions
//!
//! The subset of the host's type system the normalization layer and the
//! constant evaluator need: builtin arithmetic types with their widths,
//! pointers, references, records, enums and function types.

use crate::ast::DeclId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    /// Void type
    Void,

    /// Boolean type
    Bool,

    /// Character types
    Char,
    SignedChar,
    UnsignedChar,

    /// Integer types (LP64 widths)
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Int128,
    UnsignedInt128,

    /// Floating types
    Float,
    Double,

    Pointer(Box<Type>),
    LValueReference(Box<Type>),
    RValueReference(Box<Type>),

    /// Class, struct or union type
    Record {
        name: String,
        decl: Option<DeclId>,
    },

    Enum {
        name: String,
        underlying: Box<Type>,
    },

    Function {
        return_type: Box<Type>,
        parameters: Vec<Type>,
        is_variadic: bool,
    },

    /// Type of a member function named without being called
    BoundMember,

    /// Type that depends on a template parameter
    Dependent,
}

impl Type {
    /// Width in bits of an integral or enumeration type
    pub fn int_width(&self) -> Option<u32> {
        match self {
            Type::Bool => Some(1),
            Type::Char | Type::SignedChar | Type::UnsignedChar => Some(8),
            Type::Short | Type::UnsignedShort => Some(16),
            Type::Int | Type::UnsignedInt => Some(32),
            Type::Long | Type::UnsignedLong => Some(64),
            Type::LongLong | Type::UnsignedLongLong => Some(64),
            Type::Int128 | Type::UnsignedInt128 => Some(128),
            Type::Enum { underlying, .. } => underlying.int_width(),
            _ => None,
        }
    }

    pub fn is_unsigned_integer(&self) -> bool {
        match self {
            Type::Bool
            | Type::UnsignedChar
            | Type::UnsignedShort
            | Type::UnsignedInt
            | Type::UnsignedLong
            | Type::UnsignedLongLong
            | Type::UnsignedInt128 => true,
            Type::Enum { underlying, .. } => underlying.is_unsigned_integer(),
            _ => false,
        }
    }

    pub fn is_integral_or_enumeration(&self) -> bool {
        self.int_width().is_some()
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Type::Float | Type::Double)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Type::Record { .. })
    }

    pub fn record_decl(&self) -> Option<DeclId> {
        match self.non_reference() {
            Type::Record { decl, .. } => *decl,
            _ => None,
        }
    }

    /// The referenced type for reference types, the type itself otherwise
    pub fn non_reference(&self) -> &Type {
        match self {
            Type::LValueReference(inner) | Type::RValueReference(inner) => inner,
            _ => self,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Bool => write!(f, "bool"),
            Type::Char => write!(f, "char"),
            Type::SignedChar => write!(f, "signed char"),
            Type::UnsignedChar => write!(f, "unsigned char"),
            Type::Short => write!(f, "short"),
            Type::UnsignedShort => write!(f, "unsigned short"),
            Type::Int => write!(f, "int"),
            Type::UnsignedInt => write!(f, "unsigned int"),
            Type::Long => write!(f, "long"),
            Type::UnsignedLong => write!(f, "unsigned long"),
            Type::LongLong => write!(f, "long long"),
            Type::UnsignedLongLong => write!(f, "unsigned long long"),
            Type::Int128 => write!(f, "__int128"),
            Type::UnsignedInt128 => write!(f, "unsigned __int128"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::Pointer(target) => write!(f, "{target} *"),
            Type::LValueReference(target) => write!(f, "{target} &"),
            Type::RValueReference(target) => write!(f, "{target} &&"),
            Type::Record { name, .. } => write!(f, "class {name}"),
            Type::Enum { name, .. } => write!(f, "enum {name}"),
            Type::Function { return_type, parameters, is_variadic } => {
                write!(f, "{return_type} (")?;
                for (i, param) in parameters.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{param}")?;
                }
                if *is_variadic { write!(f, ", ...")?; }
                write!(f, ")")
            }
            Type::BoundMember => write!(f, "<bound member function type>"),
            Type::Dependent => write!(f, "<dependent type>"),
        }
    }
}

/// A type with its const qualifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualType {
    pub ty: Type,
    pub is_const: bool,
}

impl QualType {
    pub fn new(ty: Type) -> Self {
        Self { ty, is_const: false }
    }

    pub fn constant(ty: Type) -> Self {
        Self { ty, is_const: true }
    }
}

impl From<Type> for QualType {
    fn from(ty: Type) -> Self {
        QualType::new(ty)
    }
}

impl fmt::Display for QualType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_widths() {
        assert_eq!(Type::Bool.int_width(), Some(1));
        assert_eq!(Type::Char.int_width(), Some(8));
        assert_eq!(Type::Int.int_width(), Some(32));
        assert_eq!(Type::UnsignedLong.int_width(), Some(64));
        assert_eq!(Type::Double.int_width(), None);
        let color = Type::Enum {
            name: "Color".to_string(),
            underlying: Box::new(Type::UnsignedInt),
        };
        assert_eq!(color.int_width(), Some(32));
        assert!(color.is_unsigned_integer());
    }

    #[test]
    fn test_type_properties() {
        assert!(Type::Int.is_integral_or_enumeration());
        assert!(!Type::Int.is_unsigned_integer());
        assert!(Type::Bool.is_unsigned_integer());
        assert!(Type::Float.is_floating());
        assert!(Type::Pointer(Box::new(Type::Int)).is_pointer());
        assert!(!Type::Int.is_pointer());
    }

    #[test]
    fn test_record_decl_through_reference() {
        let record = Type::Record { name: "ResString".to_string(), decl: Some(DeclId(3)) };
        let reference = Type::RValueReference(Box::new(record.clone()));
        assert!(record.is_record());
        assert_eq!(reference.record_decl(), Some(DeclId(3)));
    }

    #[test]
    fn test_type_display() {
        assert_eq!(format!("{}", Type::Int), "int");
        assert_eq!(format!("{}", Type::Pointer(Box::new(Type::Char))), "char *");
        assert_eq!(format!("{}", QualType::constant(Type::Int)), "const int");
        assert_eq!(
            format!("{}", Type::Record { name: "ResString".to_string(), decl: None }),
            "class ResString"
        );
    }
}

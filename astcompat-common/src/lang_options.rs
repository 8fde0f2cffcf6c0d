//! Language options of the translation unit

use crate::error::CompatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language standard the translation unit was compiled as
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LangStandard {
    C99,
    C11,
    Cxx98,
    Cxx11,
    Cxx14,
    Cxx17,
    Cxx20,
}

impl LangStandard {
    pub fn is_cxx(self) -> bool {
        self >= LangStandard::Cxx98
    }
}

impl fmt::Display for LangStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LangStandard::C99 => "c99",
            LangStandard::C11 => "c11",
            LangStandard::Cxx98 => "c++98",
            LangStandard::Cxx11 => "c++11",
            LangStandard::Cxx14 => "c++14",
            LangStandard::Cxx17 => "c++17",
            LangStandard::Cxx20 => "c++20",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LangStandard {
    type Err = CompatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c99" | "gnu99" => Ok(LangStandard::C99),
            "c11" | "gnu11" => Ok(LangStandard::C11),
            "c++98" | "c++03" | "gnu++98" => Ok(LangStandard::Cxx98),
            "c++11" | "gnu++11" => Ok(LangStandard::Cxx11),
            "c++14" | "c++1y" | "gnu++14" => Ok(LangStandard::Cxx14),
            "c++17" | "c++1z" | "gnu++17" => Ok(LangStandard::Cxx17),
            "c++20" | "c++2a" | "gnu++20" => Ok(LangStandard::Cxx20),
            _ => Err(CompatError::UnknownStandard {
                name: s.to_string(),
            }),
        }
    }
}

/// Feature flags derived from the language standard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LangOptions {
    pub c99: bool,
    pub c11: bool,
    pub c_plus_plus: bool,
    pub c_plus_plus11: bool,
    pub c_plus_plus14: bool,
    pub c_plus_plus17: bool,
    pub c_plus_plus2a: bool,
    /// `bool` is a builtin type (always true in C++)
    pub bool_type: bool,
}

impl LangOptions {
    pub fn for_standard(standard: LangStandard) -> Self {
        let cxx = standard.is_cxx();
        Self {
            c99: !cxx,
            c11: standard == LangStandard::C11,
            c_plus_plus: cxx,
            c_plus_plus11: standard >= LangStandard::Cxx11,
            c_plus_plus14: standard >= LangStandard::Cxx14,
            c_plus_plus17: standard >= LangStandard::Cxx17,
            c_plus_plus2a: standard >= LangStandard::Cxx20,
            bool_type: cxx,
        }
    }

    /// The newest standard whose flag is set
    pub fn standard(&self) -> LangStandard {
        if self.c_plus_plus2a {
            LangStandard::Cxx20
        } else if self.c_plus_plus17 {
            LangStandard::Cxx17
        } else if self.c_plus_plus14 {
            LangStandard::Cxx14
        } else if self.c_plus_plus11 {
            LangStandard::Cxx11
        } else if self.c_plus_plus {
            LangStandard::Cxx98
        } else if self.c11 {
            LangStandard::C11
        } else {
            LangStandard::C99
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_aliases() {
        assert_eq!("c++1z".parse::<LangStandard>().unwrap(), LangStandard::Cxx17);
        assert_eq!("c++2a".parse::<LangStandard>().unwrap(), LangStandard::Cxx20);
        assert!(matches!(
            "c++42".parse::<LangStandard>(),
            Err(CompatError::UnknownStandard { .. })
        ));
    }

    #[test]
    fn test_flags_are_cumulative() {
        let opts = LangOptions::for_standard(LangStandard::Cxx17);
        assert!(opts.c_plus_plus && opts.c_plus_plus11 && opts.c_plus_plus14);
        assert!(opts.c_plus_plus17);
        assert!(!opts.c_plus_plus2a);
        assert_eq!(opts.standard(), LangStandard::Cxx17);
    }

    #[test]
    fn test_c_standard_has_no_cxx_flags() {
        let opts = LangOptions::for_standard(LangStandard::C11);
        assert!(!opts.c_plus_plus);
        assert!(opts.c11);
        assert_eq!(opts.standard(), LangStandard::C11);
    }
}

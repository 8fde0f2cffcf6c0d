//! Contract violations
//!
//! Raised when the host tree breaks an assumption the normalization layer
//! relies on. These are programmer errors in the host, not conditions a caller
//! is expected to recover from; they are never turned into "no result".

use astcompat_common::CompatError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("constructor conversion operand is a {found}, expected a construct expression")]
    ExpectedConstructExpr { found: &'static str },

    #[error("constructor conversion calls a constructor without arguments")]
    MissingConstructorArgument,

    #[error("user-defined conversion operand is a {found}, expected a member call or block")]
    UnexpectedConversionOperand { found: &'static str },

    #[error("member call has no implicit object argument")]
    MissingImplicitObject,
}

impl From<ContractViolation> for CompatError {
    fn from(violation: ContractViolation) -> Self {
        CompatError::contract_violation("get_sub_expr_as_written", violation.to_string())
    }
}

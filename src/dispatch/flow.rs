//! # Handler Control Flow
//!
//! Handlers return [`Step`]. `Ok` is normal completion; `Err` either carries
//! an early-return signal, which stops at the dispatch boundary of the call
//! that raised it, or a failure, which `call` hands back to its caller.

use crate::error::DaoError;
use uuid::Uuid;

pub type Step<T = ()> = std::result::Result<T, Interrupt>;

#[derive(Debug, Clone, PartialEq)]
pub enum Interrupt {
    /// Early return out of the call identified by `call_id`
    Return { call_id: Uuid },
    Fail(DaoError),
}

impl Interrupt {
    /// Handler-level failure with a free-form message
    pub fn fail(message: impl Into<String>) -> Self {
        Interrupt::Fail(DaoError::Handler(message.into()))
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Interrupt::Return { .. })
    }
}

impl From<DaoError> for Interrupt {
    fn from(err: DaoError) -> Self {
        Interrupt::Fail(err)
    }
}

/// Early-return boundary pushed for every active call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnScope {
    pub label: &'static str,
    pub call_id: Uuid,
}

//! Error taxonomy (spec.md §7). Execution failures are captured in-band as
//! `Status::Failed`; only structural/API misuse reaches the caller as a
//! `CtError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CtError {
    /// A [`StateBuilder`](crate::builder::StateBuilder) field was fixed
    /// twice with incompatible values (spec.md §4.6, §7).
    #[error("builder conflict: {field} is already fixed to a different value")]
    BuilderConflict { field: &'static str },

    /// Code length exceeds the 24 576-byte cap (spec.md §3).
    #[error("code length {0} exceeds the 24576-byte limit")]
    CodeTooLong(usize),

    /// The adapter could not encode `pc` back into 16 bits (spec.md §4.8, §6).
    #[error("pc {0} exceeds the 16-bit representable range")]
    PcOutOfRange(u32),

    /// `IsCode`/`IsData` restrict was asked to write through a position
    /// expression it does not support (spec.md §9 open question).
    #[error("unsupported position expression in IsCode/IsData restrict")]
    UnsupportedPositionExpr,
}

pub type Result<T> = std::result::Result<T, CtError>;

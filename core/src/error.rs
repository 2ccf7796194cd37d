/// Faults that stop the instruction task.
///
/// None of these are recoverable: once one is returned the machine's control state can't be
/// trusted and the host should stop running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryFault { address: usize },

    #[error("stack overflow: call depth is already at its limit")]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;

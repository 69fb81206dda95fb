//! Request decorators that attach credentials to outbound calls.

mod bearer;

pub use bearer::Bearer;

pub mod clone_protocol;
pub mod seal_state;
pub mod source_type;

pub use clone_protocol::CloneProtocol;
pub use seal_state::SealState;
pub use source_type::{SourceType, SourceTypeError};

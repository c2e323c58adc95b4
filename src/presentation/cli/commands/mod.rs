pub mod clone;
pub mod discover;
pub mod init;
pub mod sync;
pub mod update;

pub use clone::*;
pub use discover::*;
pub use init::*;
pub use sync::*;
pub use update::*;

pub mod permissions;

pub use permissions::{
    apply_seal_state, inspect_seal_state, seal_tree, unseal_tree, PermissionError, SealGuard,
};

use std::fmt;

/// Write-protection state of a mirrored repository tree.
///
/// The mode bits on disk are the only state persisted between runs:
/// `Sealed` (directories `r-x`, files `r--`) is the resting state,
/// `Unsealed` (directories `rwx`, files `rw-`) only exists while the
/// version-control tool is mutating the tree, or after an interrupted run.
/// Executable files keep their `x` bits in both states so the working copy
/// never differs from the index in file mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SealState {
    Sealed,
    Unsealed,
}

impl SealState {
    /// Unix mode applied to directories in this state
    pub fn directory_mode(&self) -> u32 {
        match self {
            SealState::Sealed => 0o555,
            SealState::Unsealed => 0o755,
        }
    }

    /// Unix mode applied to regular files in this state
    pub fn file_mode(&self, executable: bool) -> u32 {
        match (self, executable) {
            (SealState::Sealed, false) => 0o444,
            (SealState::Sealed, true) => 0o555,
            (SealState::Unsealed, false) => 0o644,
            (SealState::Unsealed, true) => 0o755,
        }
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self, SealState::Sealed)
    }
}

impl fmt::Display for SealState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SealState::Sealed => write!(f, "sealed"),
            SealState::Unsealed => write!(f, "unsealed"),
        }
    }
}

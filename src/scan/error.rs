use derive_more::Display;

/// Which collaborator rejected a write.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    #[display(fmt = "event log")]
    EventLog,
    #[display(fmt = "profile")]
    Profile,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// Scanned content yields no usable location id. The caller re-arms
    /// the scanner and prompts for a rescan.
    #[display(fmt = "scanned code carries no usable location id")]
    InvalidPayload,

    /// No resolved identity at scan time. The caller redirects to
    /// authentication instead of retrying the scan.
    #[display(fmt = "no authenticated user at scan time")]
    NotAuthenticated,

    /// One of the two outcome writes was rejected. The other write must
    /// not proceed and no cached status may advance.
    #[display(fmt = "{} write failed", _0)]
    StoreWriteFailed(StoreKind),
}

impl std::error::Error for ScanError {}

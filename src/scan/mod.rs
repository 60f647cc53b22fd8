pub mod error;
pub mod payload;
pub mod processor;

pub use error::{ScanError, StoreKind};
pub use payload::{AttendancePayload, DecodedPayload, UNKNOWN_LOCATION, decode_payload};
pub use processor::{
    AttendanceAction, AttendanceEvent, AttendanceStatus, ScanOutcome, classify, process,
};

//! Detection results and run bookkeeping for tonedetect

mod capture;
mod result;
mod status;

pub use capture::CaptureBuffer;
pub use result::SequenceEvent;
pub use status::{pretty_duration, pretty_size, Status};

//! Label decoding domain module

mod label_result;
mod restructure;

pub use label_result::{LabelResult, UNKNOWN_LABEL};
pub use restructure::{restructure_response, LABEL_RESULT_KEY};

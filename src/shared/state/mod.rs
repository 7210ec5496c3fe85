// View state shared with the UI layer
pub mod debouncer;
pub mod result_sink;

pub use debouncer::Debouncer;
pub use result_sink::{DispatchTicket, ResultSink, ResultState};

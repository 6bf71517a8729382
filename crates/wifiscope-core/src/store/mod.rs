// ── Sample storage ──
//
// The versioned raw-record store and the bounded history buffers the
// trackers append to.

mod history;
mod sample_store;

pub use history::HistoryBuffer;
pub use sample_store::{Generation, SampleStore};

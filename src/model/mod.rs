//! Row and report model for the merge pipeline.
//!
//! Parsers produce [`RawRow`]s, the normalizer turns them into
//! [`NormalizedRow`]s, and the aggregator collects accepted rows into an
//! [`AggregatedTable`] that report sinks persist.

mod report;
mod table;

pub use report::*;
pub use table::*;

pub mod benchmark;
pub mod test_set;

pub use benchmark::{BenchmarkResults, Benchmarker};
pub use test_set::{get_test_set, LabelledUtterance};

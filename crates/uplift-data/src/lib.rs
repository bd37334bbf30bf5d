//! Dataset plumbing for uplift evaluation: CSV and gzip I/O, down-sampling,
//! column utilities and a synthetic demo dataset.

pub mod csv_io;
pub mod reduce;
pub mod synthetic;
pub mod transform;

pub use csv_io::{parse_csv, read_csv, write_csv};
pub use reduce::{file_sizes, reduce_csv, FileSize, ReduceStats};
pub use synthetic::{simulate_dataset, SimulationConfig};
pub use transform::{apply_function_to_column, create_binned_column, get_value_positions};

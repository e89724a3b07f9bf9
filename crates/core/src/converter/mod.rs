//! Converter module for turning FIT files into CSV and back.
//!
//! The external converter is treated as an opaque program invoked as
//! `<program> <program_args...> <flag> <input> <output>`. Its output pipes are
//! drained line by line into the tracing channel before the exit status is
//! inspected; a non-zero exit or a missing/empty output file is a failure.
//!
//! # Example
//!
//! ```ignore
//! use fitconv_core::converter::{Converter, ConverterConfig, FitCsvToolConverter};
//!
//! let converter = FitCsvToolConverter::new(ConverterConfig::default());
//! let result = converter.convert(Path::new("/tmp/ride.fit")).await?;
//! assert!(result.output_path.ends_with("ride.csv"));
//! ```

mod config;
mod error;
mod fit_csv;
mod traits;
mod types;

pub(crate) use config::default_scratch_dir;
pub use config::ConverterConfig;
pub use error::ConverterError;
pub use fit_csv::FitCsvToolConverter;
pub use traits::Converter;
pub use types::{ConversionPlan, ConversionResult};

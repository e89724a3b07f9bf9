pub mod config;
pub mod converter;
pub mod event;
pub mod format;
pub mod pipeline;
pub mod storage;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, ServerConfig,
};
pub use converter::{
    ConversionPlan, ConversionResult, Converter, ConverterConfig, ConverterError,
    FitCsvToolConverter,
};
pub use event::{ConversionEvent, EventError, RecordSelection, S3Event};
pub use format::{Direction, FileFormat, FormatError, StagePrefix};
pub use pipeline::{
    ConversionPipeline, PipelineConfig, PipelineError, PipelineOutcome, PipelineReport,
    PipelineStage,
};
pub use storage::{ObjectMetadata, ObjectStorage, S3Storage, StorageConfig, StorageError};

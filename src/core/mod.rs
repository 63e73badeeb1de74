pub mod archive;
pub mod orchestrator;
pub mod resizer;

pub use crate::domain::model::{
    FailedItem, FailurePolicy, ImageSource, JobOutcome, JobRequest, LoadedImage, PlatformFamily,
    ResizedAsset, SizePreset,
};
pub use crate::domain::ports::{ConfigProvider, Resizer, Storage};
pub use crate::utils::error::Result;

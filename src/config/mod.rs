pub mod cli;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::FailurePolicy;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_file_extensions, validate_path, validate_positive_number, Validate,
    IMAGE_EXTENSIONS,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "imgpack")]
#[command(about = "Resize images to platform screenshot presets and zip them")]
pub struct CliConfig {
    /// Source image files to resize.
    pub images: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Skip the ios preset family")]
    pub no_ios: bool,

    #[arg(long, help = "Skip the android preset family")]
    pub no_android: bool,

    #[arg(long, default_value = "4")]
    pub concurrency: usize,

    #[arg(
        long,
        help = "Package what succeeds and report failures instead of aborting"
    )]
    pub continue_on_error: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_path("output_path", &self.output_path)?;
        validate_positive_number("concurrency", self.concurrency, 1)?;
        validate_file_extensions("images", &self.images, IMAGE_EXTENSIONS)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn failure_policy(&self) -> FailurePolicy {
        if self.continue_on_error {
            FailurePolicy::CollectAndContinue
        } else {
            FailurePolicy::Abort
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            images: vec!["a.png".to_string()],
            output_path: "./output".to_string(),
            no_ios: false,
            no_android: false,
            concurrency: 4,
            continue_on_error: false,
            verbose: false,
        }
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn non_image_inputs_are_rejected() {
        let mut config = config();
        config.images.push("notes.txt".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut config = config();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn failure_policy_follows_continue_on_error() {
        let mut config = config();
        assert_eq!(config.failure_policy(), FailurePolicy::Abort);
        config.continue_on_error = true;
        assert_eq!(config.failure_policy(), FailurePolicy::CollectAndContinue);
    }
}

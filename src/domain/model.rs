use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// A target output dimension. Every preset belongs to exactly one
/// platform family; the catalog below is fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizePreset {
    pub width: u32,
    pub height: u32,
}

impl SizePreset {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Folder name inside the archive, e.g. "2732x2048".
    pub fn label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

const IOS_PRESETS: [SizePreset; 3] = [
    SizePreset::new(2732, 2048),
    SizePreset::new(2208, 1242),
    SizePreset::new(2796, 1290),
];

const ANDROID_PRESETS: [SizePreset; 3] = [
    SizePreset::new(1024, 500),
    SizePreset::new(320, 3840),
    SizePreset::new(1080, 7680),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformFamily {
    Ios,
    Android,
}

impl PlatformFamily {
    /// Enumeration order is fixed: ios before android. Archive folders are
    /// emitted in this order.
    pub const ALL: [PlatformFamily; 2] = [PlatformFamily::Ios, PlatformFamily::Android];

    pub fn dir_name(&self) -> &'static str {
        match self {
            PlatformFamily::Ios => "ios",
            PlatformFamily::Android => "android",
        }
    }

    /// Preset lookup for this family, in catalog order.
    pub fn presets(&self) -> &'static [SizePreset] {
        match self {
            PlatformFamily::Ios => &IOS_PRESETS,
            PlatformFamily::Android => &ANDROID_PRESETS,
        }
    }
}

/// A source image reference. The job only ever reads the underlying file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSource {
    pub path: PathBuf,
}

impl ImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Final path segment; used as the file name inside every preset folder.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A source image after its bytes have been read. The buffer is shared
/// read-only across concurrent resize tasks.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub name: String,
    pub bytes: Arc<Vec<u8>>,
}

/// Output of one (preset x image) transformation, consumed by archive
/// assembly.
#[derive(Debug, Clone)]
pub struct ResizedAsset {
    pub name: String,
    pub preset: SizePreset,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct JobRequest {
    pub images: Vec<ImageSource>,
    pub include_ios: bool,
    pub include_android: bool,
}

impl JobRequest {
    pub fn new(images: Vec<ImageSource>) -> Self {
        Self {
            images,
            include_ios: true,
            include_android: true,
        }
    }

    pub fn enabled_families(&self) -> Vec<PlatformFamily> {
        PlatformFamily::ALL
            .into_iter()
            .filter(|family| match family {
                PlatformFamily::Ios => self.include_ios,
                PlatformFamily::Android => self.include_android,
            })
            .collect()
    }
}

/// What to do when a single resize operation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Cancel outstanding work and fail the whole job. No destination file
    /// is written. Matches the original behavior.
    #[default]
    Abort,
    /// Keep going, package what succeeded, and report the failures both in
    /// the job outcome and as a failures.json entry inside the archive.
    CollectAndContinue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedItem {
    pub image: String,
    pub preset: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub output_path: String,
    /// Number of resized assets packaged into the archive (a failures.json
    /// report entry is not counted).
    pub file_count: usize,
    pub failures: Vec<FailedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ios_catalog_matches_reference_data() {
        let presets = PlatformFamily::Ios.presets();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[0], SizePreset::new(2732, 2048));
        assert_eq!(presets[1], SizePreset::new(2208, 1242));
        assert_eq!(presets[2], SizePreset::new(2796, 1290));
    }

    #[test]
    fn android_catalog_matches_reference_data() {
        let presets = PlatformFamily::Android.presets();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[0], SizePreset::new(1024, 500));
        assert_eq!(presets[1], SizePreset::new(320, 3840));
        assert_eq!(presets[2], SizePreset::new(1080, 7680));
    }

    #[test]
    fn families_enumerate_ios_first() {
        assert_eq!(
            PlatformFamily::ALL,
            [PlatformFamily::Ios, PlatformFamily::Android]
        );
        assert_eq!(PlatformFamily::Ios.dir_name(), "ios");
        assert_eq!(PlatformFamily::Android.dir_name(), "android");
    }

    #[test]
    fn preset_label_formats_dimensions() {
        assert_eq!(SizePreset::new(1024, 500).label(), "1024x500");
    }

    #[test]
    fn display_name_is_final_path_segment() {
        let source = ImageSource::new("/home/user/Pictures/screenshot.png");
        assert_eq!(source.display_name(), "screenshot.png");
    }

    #[test]
    fn request_defaults_enable_both_families() {
        let request = JobRequest::new(vec![]);
        assert_eq!(
            request.enabled_families(),
            vec![PlatformFamily::Ios, PlatformFamily::Android]
        );
    }

    #[test]
    fn disabled_families_are_skipped() {
        let request = JobRequest {
            images: vec![],
            include_ios: false,
            include_android: true,
        };
        assert_eq!(request.enabled_families(), vec![PlatformFamily::Android]);

        let request = JobRequest {
            images: vec![],
            include_ios: false,
            include_android: false,
        };
        assert!(request.enabled_families().is_empty());
    }
}

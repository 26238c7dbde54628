//! Where the monthly extracts live on disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::period::Period;

/// Environment variable naming the data root.
pub const DATA_DIR_ENV: &str = "MA_DATA_DIR";

/// Directory layout of the extracted data, relative to a root.
///
/// Can be overridden from a JSON file; keys that are left out keep their
/// defaults:
/// ```json
/// {
///   "enrollment_dir": "ma/enrollment/Extracted Data",
///   "penetration_dir": "penetration"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLayout {
    pub root: PathBuf,
    pub enrollment_dir: PathBuf,
    pub service_area_dir: PathBuf,
    pub penetration_dir: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            enrollment_dir: PathBuf::from("ma/enrollment/Extracted Data"),
            service_area_dir: PathBuf::from("ma/service-area/Extracted Data"),
            penetration_dir: PathBuf::from("ma/penetration/Extracted Data"),
        }
    }
}

impl DataLayout {
    /// Default layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Loads a layout from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replaces the root, keeping the sub-directories.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn contract_path(&self, period: Period) -> PathBuf {
        self.root
            .join(&self.enrollment_dir)
            .join(format!("CPSC_Contract_Info_{}.csv", period.file_suffix()))
    }

    pub fn enrollment_path(&self, period: Period) -> PathBuf {
        self.root
            .join(&self.enrollment_dir)
            .join(format!("CPSC_Enrollment_Info_{}.csv", period.file_suffix()))
    }

    pub fn service_area_path(&self, period: Period) -> PathBuf {
        self.root
            .join(&self.service_area_dir)
            .join(format!("MA_Cnty_SA_{}.csv", period.file_suffix()))
    }

    pub fn penetration_path(&self, period: Period) -> PathBuf {
        self.root
            .join(&self.penetration_dir)
            .join(format!("State_County_Penetration_MA_{}.csv", period.file_suffix()))
    }
}

//! Package manifest records as served by the package API
//!
//! Only the fields that filters and display read are modelled. Unknown
//! fields are ignored and missing ones default to empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Object metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: Option<String>,
}

/// One package in the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    pub metadata: ObjectMeta,
    pub status: PackageStatus,
}

/// Catalog listing response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManifestList {
    pub items: Vec<PackageManifest>,
}

/// Where the package comes from and which channels it offers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageStatus {
    pub catalog_source: String,
    pub catalog_source_display_name: String,
    pub catalog_source_namespace: String,
    pub catalog_source_publisher: String,
    pub provider: Provider,
    pub default_channel: String,
    pub channels: Vec<PackageChannel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provider {
    pub name: String,
    pub url: Option<String>,
}

/// A release track within a package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageChannel {
    pub name: String,
    #[serde(rename = "currentCSV")]
    pub current_csv: String,
    #[serde(rename = "currentCSVDesc")]
    pub current_csv_desc: CsvDescription,
}

/// Descriptive metadata of the channel head
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CsvDescription {
    pub display_name: String,
    pub version: String,
    pub long_description: String,
    pub keywords: Vec<String>,
    pub annotations: BTreeMap<String, String>,
    pub install_modes: Vec<InstallMode>,
}

/// Whether the package supports one install scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallMode {
    #[serde(rename = "type")]
    pub mode_type: String,
    pub supported: bool,
}

impl PackageManifest {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn channels(&self) -> &[PackageChannel] {
        &self.status.channels
    }

    pub fn channel_by_name(&self, name: &str) -> Option<&PackageChannel> {
        self.status.channels.iter().find(|c| c.name == name)
    }

    pub fn default_channel_name(&self) -> &str {
        &self.status.default_channel
    }

    /// The channel named as default, if the package actually has it
    pub fn default_channel(&self) -> Option<&PackageChannel> {
        self.channel_by_name(&self.status.default_channel)
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.status.channels.iter().map(|c| c.name.as_str()).collect()
    }

    /// Long description of the default channel head (empty if none)
    pub fn default_description(&self) -> &str {
        self.default_channel()
            .map(|c| c.current_csv_desc.long_description.as_str())
            .unwrap_or_default()
    }

    pub fn default_keywords(&self) -> &[String] {
        self.default_channel()
            .map(|c| c.current_csv_desc.keywords.as_slice())
            .unwrap_or_default()
    }

    /// Install modes the default channel marks as supported
    pub fn default_install_modes(&self) -> Vec<&str> {
        self.default_channel()
            .map(|c| {
                c.current_csv_desc
                    .install_modes
                    .iter()
                    .filter(|m| m.supported)
                    .map(|m| m.mode_type.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check whether the default channel supports `mode` (exact type name)
    pub fn supports_install_mode(&self, mode: &str) -> bool {
        self.default_channel()
            .and_then(|c| {
                c.current_csv_desc
                    .install_modes
                    .iter()
                    .find(|m| m.mode_type == mode)
            })
            .is_some_and(|m| m.supported)
    }

    /// Display name of the first channel head, falling back to the package name
    pub fn display_name(&self) -> &str {
        self.status
            .channels
            .first()
            .map(|c| c.current_csv_desc.display_name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(self.metadata.name.as_str())
    }
}

//! Machine profile schema.
//!
//! A profile is the declarative description a front-end hands to its
//! machine builder: CPU type and clock, physical memories, mapped
//! regions, swap groups, controllers, ROM images with verification
//! policy, slot cards, device choices, and boot behaviour. The builder
//! that walks the profile lives with the front-end; this module owns the
//! wire format and its validation.
//!
//! Profiles round-trip exactly: `deserialize(serialize(p)) == p`.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Profile loading and validation errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile names no CPU type")]
    MissingCpu,
    #[error("memory regions '{first}' and '{second}' overlap")]
    OverlappingRegions { first: String, second: String },
    #[error("region '{region}' references unknown physical memory '{physical}'")]
    UnknownPhysical { region: String, physical: String },
    #[error("unresolvable resource path '{0}'")]
    UnresolvedPath(String),
    #[error("ROM image '{name}': hash mismatch (expected {expected}, got {actual})")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// A resource location: a scheme-tagged path or a plain file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourcePath {
    /// `library://roms/monitor.bin` — the user's ROM library.
    Library(String),
    /// `app://defaults/profile.json` — application bundle data.
    App(String),
    /// `embedded://Assembly/Resource` — resources compiled into a
    /// front-end binary.
    Embedded { assembly: String, resource: String },
    /// An absolute filesystem path.
    Absolute(String),
    /// Relative to the profile file's own directory.
    Relative(String),
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library(path) => write!(f, "library://{path}"),
            Self::App(path) => write!(f, "app://{path}"),
            Self::Embedded { assembly, resource } => {
                write!(f, "embedded://{assembly}/{resource}")
            }
            Self::Absolute(path) | Self::Relative(path) => write!(f, "{path}"),
        }
    }
}

impl FromStr for ResourcePath {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("library://") {
            return Ok(Self::Library(rest.to_owned()));
        }
        if let Some(rest) = s.strip_prefix("app://") {
            return Ok(Self::App(rest.to_owned()));
        }
        if let Some(rest) = s.strip_prefix("embedded://") {
            let (assembly, resource) = rest
                .split_once('/')
                .ok_or_else(|| ProfileError::UnresolvedPath(s.to_owned()))?;
            return Ok(Self::Embedded {
                assembly: assembly.to_owned(),
                resource: resource.to_owned(),
            });
        }
        if s.contains("://") {
            return Err(ProfileError::UnresolvedPath(s.to_owned()));
        }
        if s.starts_with('/') {
            return Ok(Self::Absolute(s.to_owned()));
        }
        Ok(Self::Relative(s.to_owned()))
    }
}

impl Serialize for ResourcePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourcePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// What to do when a ROM image's hash does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyPolicy {
    /// Fail the machine build.
    Strict,
    /// Log and continue.
    #[default]
    Warn,
    /// Continue silently; the builder may substitute a fallback image.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineProfile {
    pub cpu: CpuProfile,
    /// Address-space width in bits.
    pub address_space: u8,
    pub memory: MemoryProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<SlotsProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<DevicesProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot: Option<BootProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuProfile {
    #[serde(rename = "type")]
    pub cpu_type: String,
    pub clock_speed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryProfile {
    pub physical: Vec<PhysicalDecl>,
    pub regions: Vec<RegionDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub swap_groups: Vec<SwapGroupDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controllers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rom_images: Vec<RomImageDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalDecl {
    pub name: String,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionType {
    Ram,
    Rom,
    Io,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDecl {
    pub name: String,
    pub start: u16,
    pub end: u16,
    #[serde(rename = "type")]
    pub region_type: RegionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_base: Option<u32>,
}

/// A group of regions a controller swaps as a unit (e.g. the Language
/// Card banks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapGroupDecl {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RomImageDecl {
    pub name: String,
    pub path: ResourcePath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default)]
    pub verify: VerifyPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsProfile {
    pub cards: Vec<CardDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDecl {
    pub slot: u8,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rom: Option<ResourcePath>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(rename = "gameIO", default, skip_serializing_if = "Option::is_none")]
    pub game_io: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootProfile {
    pub auto_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_slot: Option<u8>,
}

impl MachineProfile {
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build-time checks: a named CPU, regions that reference known
    /// physical memories and do not overlap.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.cpu.cpu_type.is_empty() {
            return Err(ProfileError::MissingCpu);
        }

        for region in &self.memory.regions {
            if let Some(physical) = &region.physical {
                if !self.memory.physical.iter().any(|p| p.name == *physical) {
                    return Err(ProfileError::UnknownPhysical {
                        region: region.name.clone(),
                        physical: physical.clone(),
                    });
                }
            }
        }

        for (i, a) in self.memory.regions.iter().enumerate() {
            for b in &self.memory.regions[i + 1..] {
                if a.start <= b.end && b.start <= a.end {
                    return Err(ProfileError::OverlappingRegions {
                        first: a.name.clone(),
                        second: b.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Check a loaded ROM image against its declared SHA-256.
///
/// `Strict` mismatches fail; `Warn` logs and accepts; `Fallback` accepts
/// quietly (the builder substitutes its own image).
pub fn verify_rom_image(decl: &RomImageDecl, data: &[u8]) -> Result<(), ProfileError> {
    let Some(expected) = &decl.sha256 else {
        return Ok(());
    };
    let actual = hex_digest(data);
    if actual.eq_ignore_ascii_case(expected) {
        return Ok(());
    }
    match decl.verify {
        VerifyPolicy::Strict => Err(ProfileError::HashMismatch {
            name: decl.name.clone(),
            expected: expected.clone(),
            actual,
        }),
        VerifyPolicy::Warn => {
            warn!(
                "ROM image '{}': hash mismatch (expected {expected}, got {actual})",
                decl.name
            );
            Ok(())
        }
        VerifyPolicy::Fallback => {
            debug!("ROM image '{}': hash mismatch, using fallback", decl.name);
            Ok(())
        }
    }
}

fn hex_digest(data: &[u8]) -> String {
    use std::fmt::Write;
    let digest = Sha256::digest(data);
    let mut out = String::with_capacity(64);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

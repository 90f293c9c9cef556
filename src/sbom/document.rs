//! SBOM document model and format rendering

use crate::error::{DepLayerError, DepLayerResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Output encodings, named by media type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SbomFormat {
    /// `application/vnd.cyclonedx+json`
    CycloneDxJson,
    /// `application/spdx+json`
    SpdxJson,
    /// `application/vnd.syft+json`
    SyftJson,
}

impl SbomFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::CycloneDxJson => "application/vnd.cyclonedx+json",
            Self::SpdxJson => "application/spdx+json",
            Self::SyftJson => "application/vnd.syft+json",
        }
    }

    /// File extension tag used when the rendering is written next to the layer
    pub fn extension(&self) -> &'static str {
        match self {
            Self::CycloneDxJson => "cdx.json",
            Self::SpdxJson => "spdx.json",
            Self::SyftJson => "syft.json",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::CycloneDxJson, Self::SpdxJson, Self::SyftJson]
    }
}

impl FromStr for SbomFormat {
    type Err = DepLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.media_type() == wanted)
            .ok_or_else(|| DepLayerError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.media_type())
    }
}

/// One rendered SBOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SbomRendering {
    pub extension: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// A file installed by a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomFile {
    /// Path relative to the layer root
    pub path: String,
    pub sha256: String,
}

/// A package described by the SBOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomComponent {
    pub id: String,
    pub name: String,
    pub version: String,
    pub sha256: String,
    pub uri: String,
    #[serde(default)]
    pub licenses: Vec<String>,
    #[serde(default)]
    pub files: Vec<SbomFile>,
}

impl SbomComponent {
    /// Package URL for the component
    pub fn purl(&self) -> String {
        format!("pkg:generic/{}@{}", self.id, self.version)
    }
}

/// Format-neutral SBOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomDocument {
    pub components: Vec<SbomComponent>,
}

impl SbomDocument {
    pub fn new(components: Vec<SbomComponent>) -> Self {
        Self { components }
    }

    /// Render into every named format.
    ///
    /// All names are parsed before anything is rendered, so an unknown
    /// format fails the whole request.
    pub fn in_formats(&self, formats: &[String]) -> DepLayerResult<Vec<SbomRendering>> {
        let parsed = formats
            .iter()
            .map(|f| f.parse::<SbomFormat>())
            .collect::<DepLayerResult<Vec<_>>>()?;

        parsed
            .into_iter()
            .map(|format| {
                Ok(SbomRendering {
                    extension: format.extension().to_string(),
                    content: self.render(format)?,
                })
            })
            .collect()
    }

    /// Encode the document in one format
    pub fn render(&self, format: SbomFormat) -> DepLayerResult<Vec<u8>> {
        let value = match format {
            SbomFormat::CycloneDxJson => self.cyclonedx(),
            SbomFormat::SpdxJson => self.spdx(),
            SbomFormat::SyftJson => self.syft(),
        };
        Ok(serde_json::to_vec_pretty(&value)?)
    }

    fn cyclonedx(&self) -> serde_json::Value {
        let components: Vec<_> = self
            .components
            .iter()
            .map(|c| {
                let licenses: Vec<_> = c
                    .licenses
                    .iter()
                    .map(|l| json!({ "license": { "id": l } }))
                    .collect();
                json!({
                    "type": "application",
                    "name": c.id,
                    "version": c.version,
                    "purl": c.purl(),
                    "hashes": [{ "alg": "SHA-256", "content": c.sha256 }],
                    "licenses": licenses,
                    "externalReferences": [{ "type": "distribution", "url": c.uri }],
                })
            })
            .collect();

        json!({
            "bomFormat": "CycloneDX",
            "specVersion": "1.4",
            "serialNumber": format!("urn:uuid:{}", Uuid::new_v4()),
            "version": 1,
            "components": components,
        })
    }

    fn spdx(&self) -> serde_json::Value {
        let packages: Vec<_> = self
            .components
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let license = if c.licenses.is_empty() {
                    "NOASSERTION".to_string()
                } else {
                    c.licenses.join(" AND ")
                };
                json!({
                    "SPDXID": format!("SPDXRef-Package-{}", i),
                    "name": c.id,
                    "versionInfo": c.version,
                    "downloadLocation": c.uri,
                    "checksums": [{ "algorithm": "SHA256", "checksumValue": c.sha256 }],
                    "licenseConcluded": license,
                    "externalRefs": [{
                        "referenceCategory": "PACKAGE_MANAGER",
                        "referenceType": "purl",
                        "referenceLocator": c.purl(),
                    }],
                })
            })
            .collect();

        let files: Vec<_> = self
            .components
            .iter()
            .flat_map(|c| c.files.iter())
            .enumerate()
            .map(|(i, f)| {
                json!({
                    "SPDXID": format!("SPDXRef-File-{}", i),
                    "fileName": f.path,
                    "checksums": [{ "algorithm": "SHA256", "checksumValue": f.sha256 }],
                })
            })
            .collect();

        let namespace = format!(
            "https://paketo.io/unknown-source-type/unknown-{}",
            Uuid::new_v4()
        );
        json!({
            "spdxVersion": "SPDX-2.2",
            "dataLicense": "CC0-1.0",
            "SPDXID": "SPDXRef-DOCUMENT",
            "name": "unknown",
            "documentNamespace": namespace,
            "packages": packages,
            "files": files,
        })
    }

    fn syft(&self) -> serde_json::Value {
        let artifacts: Vec<_> = self
            .components
            .iter()
            .map(|c| {
                let locations: Vec<_> = c.files.iter().map(|f| json!({ "path": f.path })).collect();
                json!({
                    "name": c.id,
                    "version": c.version,
                    "type": "UnknownPackage",
                    "licenses": c.licenses,
                    "purl": c.purl(),
                    "locations": locations,
                })
            })
            .collect();

        json!({
            "artifacts": artifacts,
            "schema": { "version": "3.0.1" },
        })
    }
}

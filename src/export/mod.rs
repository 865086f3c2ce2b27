//! End-to-end export: meshes in, C2G buffer and optional mirrors out.
//! Everything happens in memory. A failed merge or encode produces nothing; an
//! unwritable JSON mirror is reported on the [`Export`] instead.

use serde::Deserialize;
use thiserror::Error;

use crate::core::mesh::Mesh;
use crate::core::shared::ConfigType;
use crate::core::unit::{MeshExportUnit, VertexShape};
use crate::extract::{extract, SkippedFace};
use crate::shared::header::{FormatVersion, UnsupportedFormatVersion};
use crate::{dedup, encode, mirror};

/// Recognized export options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default = "default_config", rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub format_version: FormatVersion,
    pub write_base64: bool,
    pub write_json: bool,
}

fn default_config() -> Config {
    Config::default()
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            format_version: FormatVersion::default(),
            write_base64: false,
            write_json: false,
        }
    }
}

impl Config {
    /// Default options with the layout selected by its ASCII tag, e.g. `"0200"`.
    pub fn with_version_tag(tag: &str) -> Result<Self, Err> {
        Ok(Self {
            format_version: tag.parse()?,
            ..Self::default()
        })
    }

    /// Reads options from JSON such as `{"formatVersion": "0100", "writeJson": true}`.
    /// Missing options take their default.
    pub fn from_json(text: &str) -> Result<Self, Err> {
        serde_json::from_str(text).map_err(Err::ConfigError)
    }

    fn encoder_config(&self) -> encode::Config {
        encode::Config { format_version: self.format_version }
    }
}

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("Invalid export options: {0}")]
    ConfigError(serde_json::Error),
    #[error("Encoding error: {0}")]
    EncodeError(#[from] encode::Err),
    #[error("Object '{object}' has vertex shape {found}, but the objects before it have {expected}")]
    ShapeMismatch { object: String, expected: VertexShape, found: VertexShape },
    #[error(transparent)]
    UnsupportedFormatVersion(#[from] UnsupportedFormatVersion),
}

/// What happened to one input object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectReport {
    pub name: String,
    pub num_corners: usize,
    pub num_vertices: usize,
    pub num_triangles: usize,
    pub skipped_faces: Vec<SkippedFace>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub objects: Vec<ObjectReport>,
}

impl ExportReport {
    pub fn num_skipped_faces(&self) -> usize {
        self.objects.iter().map(|o| o.skipped_faces.len()).sum()
    }
}

/// Result of a successful export.
///
/// A JSON mirror that cannot be produced does not fail the export: `json` is
/// then `None` and `json_error` says why.
#[derive(Debug)]
pub struct Export {
    pub format_version: FormatVersion,
    pub unit: MeshExportUnit,
    pub binary: Vec<u8>,
    pub base64: Option<String>,
    pub json: Option<String>,
    pub json_error: Option<mirror::Err>,
    pub report: ExportReport,
}

/// Extracts and deduplicates one object in its own scope.
pub fn build_object(mesh: &Mesh) -> (MeshExportUnit, ObjectReport) {
    let extraction = extract(mesh);
    let num_corners = extraction.corners.len();
    let skipped_faces = extraction.skipped_faces.clone();
    let unit = dedup::build_unit(extraction);
    let report = ObjectReport {
        name: mesh.get_name().to_owned(),
        num_corners,
        num_vertices: unit.vertices().len(),
        num_triangles: unit.triangles().len(),
        skipped_faces,
    };
    (unit, report)
}

/// Exports the meshes as one merged unit and encodes it.
pub fn export(meshes: &[Mesh], cfg: &Config) -> Result<Export, Err> {
    let (units, objects): (Vec<_>, Vec<_>) = meshes.iter().map(build_object).unzip();
    let report = ExportReport { objects };

    let unit = dedup::merge(units).map_err(|e| match e {
        dedup::Err::ShapeMismatch { object, expected, found } => Err::ShapeMismatch {
            object: meshes[object].get_name().to_owned(),
            expected,
            found,
        },
    })?;

    let binary = encode::encode_to_vec(&unit, &cfg.encoder_config())?;
    let base64 = cfg.write_base64.then(|| mirror::to_base64(&binary));
    let (json, json_error) = match cfg.write_json.then(|| mirror::to_json(&unit)) {
        Some(Ok(json)) => (Some(json), None),
        Some(Err(e)) => {
            log::warn!("JSON mirror not written: {}", e);
            (None, Some(e))
        }
        None => (None, None),
    };

    if report.num_skipped_faces() > 0 {
        log::warn!("{} faces were skipped during export", report.num_skipped_faces());
    }
    log::debug!(
        "Exported {} objects: {} vertices, {} triangles, {} bytes",
        meshes.len(), unit.vertices().len(), unit.triangles().len(), binary.len()
    );

    Ok(Export {
        format_version: cfg.format_version,
        unit,
        binary,
        base64,
        json,
        json_error,
        report,
    })
}

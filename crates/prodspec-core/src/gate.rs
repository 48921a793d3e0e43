//! Hash-gated access to a persisted layout.
//!
//! A layout file is trusted only while a sidecar marker holds the SHA-256
//! fingerprint of its exact bytes. The marker is written by a successful
//! validation pass and never by anything else, so any edit to the file after
//! validation locks downstream consumers out until it is validated again.

use crate::{
    codec::{self, CodecError, Generator},
    graph::Layout,
    validate::{ValidateError, Validators},
};
use derive_more::Deref;
use sha2::{Digest, Sha256};
use std::{
    ffi::OsString,
    fmt, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Suffix appended to the layout file name to form the default marker path.
pub const MARKER_SUFFIX: &str = ".validated";

///
/// Fingerprint
/// SHA-256 of the exact bytes of a layout file.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);

        Self(out)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lower-case hex, the exact marker file content.
    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }

        out
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

///
/// NotValidatedReason
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NotValidatedReason {
    MissingMarker,
    Mismatch { recorded: String },
}

impl fmt::Display for NotValidatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMarker => f.write_str("no validation marker"),
            Self::Mismatch { .. } => f.write_str("file changed since last validation"),
        }
    }
}

///
/// GateError
///

#[derive(Debug, ThisError)]
pub enum GateError {
    #[error("{}: not validated ({reason})", path.display())]
    NotValidated {
        path: PathBuf,
        reason: NotValidatedReason,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Validate(#[from] ValidateError),
}

impl GateError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn codec(path: &Path) -> impl FnOnce(CodecError) -> Self + '_ {
        move |source| Self::Codec {
            path: path.to_path_buf(),
            source,
        }
    }
}

///
/// GateStatus
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GateStatus {
    Validated {
        fingerprint: Fingerprint,
    },
    Unvalidated {
        fingerprint: Fingerprint,
        reason: NotValidatedReason,
    },
}

impl GateStatus {
    #[must_use]
    pub const fn is_validated(&self) -> bool {
        matches!(self, Self::Validated { .. })
    }

    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        match self {
            Self::Validated { fingerprint } | Self::Unvalidated { fingerprint, .. } => {
                *fingerprint
            }
        }
    }
}

///
/// ValidatedLayout
///
/// A layout whose file matched its validation marker when it was loaded.
/// Read-only: it derefs to [`Layout`] but hands out no mutable access.
///

#[derive(Debug, Deref)]
pub struct ValidatedLayout {
    #[deref]
    layout: Layout,
    fingerprint: Fingerprint,
}

impl ValidatedLayout {
    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

///
/// Gate
/// A layout file path paired with its validation marker path.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Gate {
    layout: PathBuf,
    marker: PathBuf,
}

impl Gate {
    /// Gate for `layout`, with the marker as a sibling `<file name>.validated`.
    pub fn new(layout: impl Into<PathBuf>) -> Self {
        let layout = layout.into();
        let marker = default_marker(&layout);

        Self { layout, marker }
    }

    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<PathBuf>) -> Self {
        self.marker = marker.into();
        self
    }

    #[must_use]
    pub fn layout_path(&self) -> &Path {
        &self.layout
    }

    #[must_use]
    pub fn marker_path(&self) -> &Path {
        &self.marker
    }

    /// Serialize and write the layout file. The marker is left alone, so a
    /// changed file reads as unvalidated until it is validated again.
    pub fn save(&self, layout: &Layout, generator: &Generator) -> Result<Fingerprint, GateError> {
        let text =
            codec::encode(layout, Some(generator)).map_err(GateError::codec(&self.layout))?;
        fs::write(&self.layout, &text).map_err(GateError::io(&self.layout))?;

        let fingerprint = Fingerprint::of(text.as_bytes());
        tracing::info!(
            path = %self.layout.display(),
            entities = layout.total(),
            %fingerprint,
            "saved layout"
        );

        Ok(fingerprint)
    }

    /// Load without consulting the marker. The fingerprint covers exactly
    /// the bytes that were decoded.
    pub fn load_unvalidated(&self) -> Result<(Layout, Fingerprint), GateError> {
        let bytes = self.read_layout()?;
        let fingerprint = Fingerprint::of(&bytes);
        let layout = self.decode(bytes)?;
        tracing::debug!(
            path = %self.layout.display(),
            %fingerprint,
            "loaded unvalidated layout"
        );

        Ok((layout, fingerprint))
    }

    /// Validate the current file and, only if every validator passes,
    /// record its fingerprint in the marker.
    pub fn run_validation(&self, validators: &Validators) -> Result<Fingerprint, GateError> {
        let (layout, fingerprint) = self.load_unvalidated()?;
        validators.validate(&layout)?;

        fs::write(&self.marker, fingerprint.as_hex()).map_err(GateError::io(&self.marker))?;
        tracing::info!(
            path = %self.layout.display(),
            marker = %self.marker.display(),
            %fingerprint,
            "layout validated"
        );

        Ok(fingerprint)
    }

    /// Load a layout whose current bytes match the recorded fingerprint.
    ///
    /// The marker is checked before decoding, so an edited file is refused
    /// as unvalidated even if the edit also broke its syntax.
    pub fn load_validated(&self) -> Result<ValidatedLayout, GateError> {
        let bytes = self.read_layout()?;
        let fingerprint = Fingerprint::of(&bytes);

        if let Some(reason) = self.check_marker(fingerprint)? {
            tracing::warn!(
                path = %self.layout.display(),
                %reason,
                "refusing unvalidated layout"
            );
            return Err(GateError::NotValidated {
                path: self.layout.clone(),
                reason,
            });
        }

        let layout = self.decode(bytes)?;
        tracing::debug!(path = %self.layout.display(), %fingerprint, "loaded validated layout");

        Ok(ValidatedLayout {
            layout,
            fingerprint,
        })
    }

    /// Compare file and marker without decoding the layout.
    pub fn status(&self) -> Result<GateStatus, GateError> {
        let fingerprint = Fingerprint::of(&self.read_layout()?);

        Ok(match self.check_marker(fingerprint)? {
            None => GateStatus::Validated { fingerprint },
            Some(reason) => GateStatus::Unvalidated {
                fingerprint,
                reason,
            },
        })
    }

    fn read_layout(&self) -> Result<Vec<u8>, GateError> {
        fs::read(&self.layout).map_err(GateError::io(&self.layout))
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<Layout, GateError> {
        let text = String::from_utf8(bytes).map_err(|e| GateError::Io {
            path: self.layout.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        codec::decode(&text).map_err(GateError::codec(&self.layout))
    }

    // `None` when the marker matches exactly.
    fn check_marker(
        &self,
        fingerprint: Fingerprint,
    ) -> Result<Option<NotValidatedReason>, GateError> {
        let recorded = match fs::read_to_string(&self.marker) {
            Ok(recorded) => recorded,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Some(NotValidatedReason::MissingMarker));
            }
            Err(e) => return Err(GateError::io(&self.marker)(e)),
        };

        if recorded == fingerprint.as_hex() {
            Ok(None)
        } else {
            Ok(Some(NotValidatedReason::Mismatch { recorded }))
        }
    }
}

fn default_marker(layout: &Path) -> PathBuf {
    let mut name = layout
        .file_name()
        .map_or_else(|| OsString::from("layout"), OsString::from);
    name.push(MARKER_SUFFIX);

    layout.with_file_name(name)
}

///
/// TESTS
///

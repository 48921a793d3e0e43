use crate::{
    codec::CodecError,
    gate::GateError,
    graph::{RelationError, StoreError},
    validate::ValidateError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Relation(#[from] RelationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validate(#[from] ValidateError),
}

impl Error {
    /// Stable classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Codec(e) => codec_kind(e),
            Self::Gate(e) => match e {
                GateError::NotValidated { .. } => ErrorKind::NotValidated,
                GateError::Io { .. } => ErrorKind::Io,
                GateError::Codec { source, .. } => codec_kind(source),
                GateError::Validate(_) => ErrorKind::ValidationFailed,
            },
            Self::Relation(e) => relation_kind(e),
            Self::Store(e) => store_kind(e),
            Self::Validate(ValidateError::ValidationFailed(_)) => ErrorKind::ValidationFailed,
        }
    }
}

const fn store_kind(e: &StoreError) -> ErrorKind {
    match e {
        StoreError::DuplicateId { .. } => ErrorKind::DuplicateId,
        StoreError::InvalidId { .. } | StoreError::ForeignHandle { .. } => ErrorKind::InvalidId,
        StoreError::NotFound { .. } => ErrorKind::NotFound,
        StoreError::UnknownField { .. } => ErrorKind::UnknownField,
        StoreError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
    }
}

const fn relation_kind(e: &RelationError) -> ErrorKind {
    match e {
        RelationError::UnknownRelation { .. } => ErrorKind::UnknownField,
        RelationError::KindMismatch { .. } => ErrorKind::KindMismatch,
        RelationError::WrongCardinality { .. } => ErrorKind::WrongCardinality,
        RelationError::AlreadySet { .. } => ErrorKind::RelationAlreadySet,
        RelationError::Duplicate { .. } => ErrorKind::DuplicateRelation,
        RelationError::NotLinked { .. } => ErrorKind::NotLinked,
        RelationError::Dangling { .. } => ErrorKind::DanglingReference,
        RelationError::Asymmetric { .. } => ErrorKind::AsymmetricRelation,
        RelationError::Store(e) => store_kind(e),
    }
}

const fn codec_kind(e: &CodecError) -> ErrorKind {
    match e {
        CodecError::Parse(_) | CodecError::Serialize(_) => ErrorKind::Parse,
        CodecError::UnrecognizedField { .. } => ErrorKind::UnrecognizedField,
        CodecError::InvalidValue { .. } => ErrorKind::InvalidValue,
        CodecError::Schema(_) => ErrorKind::InvalidSchema,
        CodecError::Store(e) => store_kind(e),
        CodecError::Relation(e) => relation_kind(e),
    }
}

///
/// ErrorKind
/// Stable error taxonomy shared by every prodspec crate.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum ErrorKind {
    AsymmetricRelation,
    DanglingReference,
    DuplicateId,
    DuplicateRelation,
    InvalidId,
    InvalidSchema,
    InvalidValue,
    Io,
    KindMismatch,
    NotFound,
    NotLinked,
    NotValidated,
    Parse,
    RelationAlreadySet,
    TypeMismatch,
    UnknownField,
    UnrecognizedField,
    ValidationFailed,
    WrongCardinality,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AsymmetricRelation => "asymmetric_relation",
            Self::DanglingReference => "dangling_reference",
            Self::DuplicateId => "duplicate_id",
            Self::DuplicateRelation => "duplicate_relation",
            Self::InvalidId => "invalid_id",
            Self::InvalidSchema => "invalid_schema",
            Self::InvalidValue => "invalid_value",
            Self::Io => "io",
            Self::KindMismatch => "kind_mismatch",
            Self::NotFound => "not_found",
            Self::NotLinked => "not_linked",
            Self::NotValidated => "not_validated",
            Self::Parse => "parse",
            Self::RelationAlreadySet => "relation_already_set",
            Self::TypeMismatch => "type_mismatch",
            Self::UnknownField => "unknown_field",
            Self::UnrecognizedField => "unrecognized_field",
            Self::ValidationFailed => "validation_failed",
            Self::WrongCardinality => "wrong_cardinality",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// TESTS
///

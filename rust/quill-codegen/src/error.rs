//! Validation errors raised before any IR is built.

/// Stable machine-readable codes for [`CodeGenError`].
///
/// The plugin caller surfaces these as compiler diagnostics; the strings
/// from [`ErrorCode::as_str`] are part of that contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DuplicateServiceDescriptor,
    NominalTypeCollision,
    DuplicateMethodName,
    UnknownImportItemKind,
}

impl ErrorCode {
    /// Wire-stable identifier for plugin diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateServiceDescriptor => "duplicate-service-descriptor",
            ErrorCode::NominalTypeCollision => "nominal-type-collision",
            ErrorCode::DuplicateMethodName => "duplicate-method-name",
            ErrorCode::UnknownImportItemKind => "unknown-import-item-kind",
        }
    }
}

/// Request validation failure.
///
/// Generation is all-or-nothing: any of these aborts the call before IR
/// construction, and no partial output is produced. Nothing is retried or
/// recovered internally; the plugin caller decides how to surface it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CodeGenError {
    /// Two services share the same (namespace, name) pair.
    #[error("duplicate service descriptor: {fully_qualified}")]
    DuplicateService {
        /// Wire name of the repeated service.
        fully_qualified: String,
    },

    /// Two same-level nominal types would be generated under one name.
    #[error("colliding nominal type {type_name}: {context}")]
    NominalTypeCollision {
        /// The generated-upper-case name both declarations want.
        type_name: String,
        /// What collided with what.
        context: String,
    },

    /// A method name is repeated within one service, in the named casing.
    #[error("service {service}: duplicate {casing} method name {method}")]
    DuplicateMethodName {
        /// Wire name of the offending service.
        service: String,
        /// Which casing collided: `base`, `generated-upper-case`, or
        /// `generated-lower-case`.
        casing: &'static str,
        /// The repeated name, in that casing.
        method: String,
    },

    /// A dependency names an import-item kind the generator does not know.
    #[error("unknown import item kind {kind:?} in dependency on {module}")]
    UnknownImportItemKind {
        /// Module the dependency imports from.
        module: String,
        /// The unrecognized kind, as spelled.
        kind: String,
    },
}

impl CodeGenError {
    /// The machine-readable code for this failure.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            CodeGenError::DuplicateService { .. } => ErrorCode::DuplicateServiceDescriptor,
            CodeGenError::NominalTypeCollision { .. } => ErrorCode::NominalTypeCollision,
            CodeGenError::DuplicateMethodName { .. } => ErrorCode::DuplicateMethodName,
            CodeGenError::UnknownImportItemKind { .. } => ErrorCode::UnknownImportItemKind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offender() {
        let err = CodeGenError::DuplicateMethodName {
            service: "helloworld.Greeter".into(),
            casing: "generated-lower-case",
            method: "sayHello".into(),
        };
        assert_eq!(
            err.to_string(),
            "service helloworld.Greeter: duplicate generated-lower-case method name sayHello"
        );
        assert_eq!(err.code(), ErrorCode::DuplicateMethodName);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            ErrorCode::DuplicateServiceDescriptor.as_str(),
            "duplicate-service-descriptor"
        );
        assert_eq!(
            ErrorCode::UnknownImportItemKind.as_str(),
            "unknown-import-item-kind"
        );
    }
}

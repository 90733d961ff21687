//! Generation knobs supplied by the plugin caller.

/// Visibility applied uniformly to generated declarations, ordered from most
/// to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum AccessLevel {
    FilePrivate,
    #[default]
    Internal,
    Package,
    Public,
}

impl AccessLevel {
    /// The Swift keyword for this level.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            AccessLevel::FilePrivate => "fileprivate",
            AccessLevel::Internal => "internal",
            AccessLevel::Package => "package",
            AccessLevel::Public => "public",
        }
    }
}

/// Configuration for one generation call.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Access level stamped on every generated declaration that admits one.
    pub access_level: AccessLevel,

    /// Spaces per indentation level. Must be positive.
    pub indentation: u32,

    /// Generate the client-facing protocol, convenience extension, and
    /// concrete client type.
    pub client: bool,

    /// Generate the server-facing protocols and default-implementation
    /// extensions.
    pub server: bool,

    /// Module imports appended after the schema-derived dependencies.
    pub extra_module_imports: Vec<String>,

    /// Module-name remapping, applied to schema-derived import modules and
    /// to the module component of qualified message type references. The
    /// pinned runtime modules are not remapped.
    pub module_overrides: Vec<(String, String)>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            access_level: AccessLevel::Internal,
            indentation: 4,
            client: true,
            server: true,
            extra_module_imports: Vec::new(),
            module_overrides: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Apply the configured module overrides to a module name.
    pub(crate) fn remap_module<'a>(&'a self, module: &'a str) -> &'a str {
        self.module_overrides
            .iter()
            .find(|(from, _)| from == module)
            .map(|(_, to)| to.as_str())
            .unwrap_or(module)
    }

    /// Apply the configured module overrides to a type reference. Only the
    /// module component of a `Module.Type` reference is rewritten;
    /// unqualified references pass through.
    pub(crate) fn remap_type(&self, type_name: &str) -> String {
        match type_name.split_once('.') {
            Some((module, rest)) => format!("{}.{}", self.remap_module(module), rest),
            None => type_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_keywords() {
        assert_eq!(AccessLevel::FilePrivate.keyword(), "fileprivate");
        assert_eq!(AccessLevel::Internal.keyword(), "internal");
        assert_eq!(AccessLevel::Package.keyword(), "package");
        assert_eq!(AccessLevel::Public.keyword(), "public");
    }

    #[test]
    fn levels_order_most_to_least_restrictive() {
        assert!(AccessLevel::FilePrivate < AccessLevel::Internal);
        assert!(AccessLevel::Internal < AccessLevel::Package);
        assert!(AccessLevel::Package < AccessLevel::Public);
    }

    #[test]
    fn remaps_qualified_references_only() {
        let config = GeneratorConfig {
            module_overrides: vec![("OldMessages".into(), "NewMessages".into())],
            ..GeneratorConfig::default()
        };
        assert_eq!(
            config.remap_type("OldMessages.HelloRequest"),
            "NewMessages.HelloRequest"
        );
        assert_eq!(config.remap_type("HelloRequest"), "HelloRequest");
        assert_eq!(config.remap_module("OldMessages"), "NewMessages");
        assert_eq!(config.remap_module("Untouched"), "Untouched");
    }
}

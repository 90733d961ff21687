#![deny(unsafe_code)]

//! Schema types for quill RPC code generation.
//!
//! The upstream protocol-compiler plugin parses an IDL schema and lowers it
//! into a [`CodeGenerationRequest`]. Everything in this crate is plain data
//! describing that request: identifiers in the casings generated code needs,
//! method and service descriptors, and the inter-module dependencies the
//! generated file must import.
//!
//! Generation itself lives in `quill-codegen`; a request is immutable for
//! the duration of one generation call.

use std::borrow::Cow;

use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// An identifier carried in the three casings generated code needs.
///
/// The empty name stands in for "no namespace"; every consumer tolerates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Name {
    /// The identifier as spelled in the schema (e.g. `say_hello`).
    pub base: Cow<'static, str>,

    /// UpperCamelCase form, used for nominal types (e.g. `SayHello`).
    pub upper_camel: Cow<'static, str>,

    /// lowerCamelCase form, used for functions (e.g. `sayHello`).
    pub lower_camel: Cow<'static, str>,
}

impl Name {
    /// The "no namespace" name.
    pub const EMPTY: Name = Name {
        base: Cow::Borrowed(""),
        upper_camel: Cow::Borrowed(""),
        lower_camel: Cow::Borrowed(""),
    };

    /// Build a name from three explicit casings.
    pub fn new(
        base: impl Into<Cow<'static, str>>,
        upper_camel: impl Into<Cow<'static, str>>,
        lower_camel: impl Into<Cow<'static, str>>,
    ) -> Self {
        Name {
            base: base.into(),
            upper_camel: upper_camel.into(),
            lower_camel: lower_camel.into(),
        }
    }

    /// Build a name deriving both generated casings from `base`.
    pub fn derived(base: impl Into<Cow<'static, str>>) -> Self {
        let base = base.into();
        let upper_camel = base.to_upper_camel_case();
        let lower_camel = base.to_lower_camel_case();
        Name {
            base,
            upper_camel: upper_camel.into(),
            lower_camel: lower_camel.into(),
        }
    }

    /// Whether this is the "no namespace" case.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

/// One of the four RPC call shapes, determined by the two streaming flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamingShape {
    /// Single request, single response.
    Unary,
    /// Streamed requests, single response.
    ClientStreaming,
    /// Single request, streamed responses.
    ServerStreaming,
    /// Streamed both ways.
    Bidirectional,
}

/// A single method in a service definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Documentation rendered above the generated declarations. Empty means
    /// no documentation.
    pub doc: Cow<'static, str>,

    /// Method name.
    pub name: Name,

    /// Whether the client sends a stream of request messages.
    pub input_streaming: bool,

    /// Whether the server sends a stream of response messages.
    pub output_streaming: bool,

    /// Fully-qualified generated type of the request message.
    pub input_type: Cow<'static, str>,

    /// Fully-qualified generated type of the response message.
    pub output_type: Cow<'static, str>,
}

impl MethodDescriptor {
    /// The call shape implied by the two streaming flags.
    pub fn shape(&self) -> StreamingShape {
        match (self.input_streaming, self.output_streaming) {
            (false, false) => StreamingShape::Unary,
            (true, false) => StreamingShape::ClientStreaming,
            (false, true) => StreamingShape::ServerStreaming,
            (true, true) => StreamingShape::Bidirectional,
        }
    }
}

/// A complete service definition with all its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Documentation rendered above the generated declarations. Empty means
    /// no documentation.
    pub doc: Cow<'static, str>,

    /// Service name.
    pub name: Name,

    /// Enclosing namespace; [`Name::EMPTY`] for top-level services.
    pub namespace: Name,

    /// Methods in schema order.
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    /// The service name as it appears on the wire: `namespace.Service`, or
    /// just `Service` when the namespace is empty.
    pub fn fully_qualified(&self) -> String {
        if self.namespace.is_empty() {
            self.name.base.to_string()
        } else {
            format!("{}.{}", self.namespace.base, self.name.base)
        }
    }

    /// Prefix minting the generated top-level type names, e.g.
    /// `Helloworld_Greeter` (just `Greeter` without a namespace).
    pub fn namespaced_prefix(&self) -> String {
        if self.namespace.is_empty() {
            self.name.upper_camel.to_string()
        } else {
            format!("{}_{}", self.namespace.upper_camel, self.name.upper_camel)
        }
    }

    /// Dot path to the service's alias namespace, e.g. `Helloworld.Greeter`
    /// (just `Greeter` without a namespace).
    pub fn alias_path(&self) -> String {
        if self.namespace.is_empty() {
            self.name.upper_camel.to_string()
        } else {
            format!("{}.{}", self.namespace.upper_camel, self.name.upper_camel)
        }
    }
}

/// Kind of item imported from a module (`import struct Foo.Bar`).
///
/// String-backed: the upstream plugin hands kinds through as spelled, and an
/// unrecognized kind surfaces as a validation error rather than a parse
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKind(pub Cow<'static, str>);

impl ItemKind {
    pub const TYPEALIAS: ItemKind = ItemKind(Cow::Borrowed("typealias"));
    pub const STRUCT: ItemKind = ItemKind(Cow::Borrowed("struct"));
    pub const CLASS: ItemKind = ItemKind(Cow::Borrowed("class"));
    pub const ENUM: ItemKind = ItemKind(Cow::Borrowed("enum"));
    pub const PROTOCOL: ItemKind = ItemKind(Cow::Borrowed("protocol"));
    pub const LET: ItemKind = ItemKind(Cow::Borrowed("let"));
    pub const VAR: ItemKind = ItemKind(Cow::Borrowed("var"));
    pub const FUNC: ItemKind = ItemKind(Cow::Borrowed("func"));

    const RECOGNIZED: [&'static str; 8] = [
        "typealias",
        "struct",
        "class",
        "enum",
        "protocol",
        "let",
        "var",
        "func",
    ];

    /// Build a kind from its spelling, recognized or not.
    pub fn new(kind: impl Into<Cow<'static, str>>) -> Self {
        ItemKind(kind.into())
    }

    /// Whether the generator knows how to render this kind.
    pub fn is_recognized(&self) -> bool {
        Self::RECOGNIZED.contains(&self.0.as_ref())
    }

    /// The kind as spelled in the import statement.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single item imported from a module instead of the whole module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    /// Kind of the imported item.
    pub kind: ItemKind,

    /// Name of the imported item.
    pub name: Cow<'static, str>,
}

/// Whether an import needs `@preconcurrency` decoration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConcurrencyRequirement {
    /// Always decorate the import.
    Required,

    /// Never decorate the import.
    #[default]
    NotRequired,

    /// Decorate only on the named platforms, behind an `#if os(...)` fence.
    RequiredOnPlatforms(Vec<Cow<'static, str>>),
}

/// A module the generated file depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Module to import.
    pub module: Cow<'static, str>,

    /// Import a single item instead of the whole module.
    pub item: Option<ImportItem>,

    /// `@_spi(...)` group name, when the import is SPI-gated.
    pub spi: Option<Cow<'static, str>>,

    /// `@preconcurrency` requirement for this import.
    pub concurrency: ConcurrencyRequirement,
}

impl Dependency {
    /// A plain whole-module dependency with no decorations.
    pub fn module(name: impl Into<Cow<'static, str>>) -> Self {
        Dependency {
            module: name.into(),
            item: None,
            spi: None,
            concurrency: ConcurrencyRequirement::NotRequired,
        }
    }
}

/// Everything the generator needs to produce one source file.
///
/// Built once by the upstream plugin, immutable for the duration of a
/// generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGenerationRequest {
    /// License/documentation header emitted verbatim at the top of the file.
    pub leading_trivia: Cow<'static, str>,

    /// Name of the schema file this request was built from.
    pub file_name: Cow<'static, str>,

    /// Modules the generated file imports, in schema order.
    pub dependencies: Vec<Dependency>,

    /// Services to generate, in schema order.
    pub services: Vec<ServiceDescriptor>,
}

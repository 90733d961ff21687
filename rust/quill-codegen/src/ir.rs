//! The declaration tree the translators build and the renderer walks.
//!
//! One generation call builds a fresh [`SourceFileIr`], renders it, and
//! discards it. The tree models exactly the Swift constructs the translators
//! need; the renderer is its only consumer.

use quill_schema::{ConcurrencyRequirement, ImportItem};

/// Everything that goes into one rendered file, in render order.
#[derive(Debug, Clone)]
pub(crate) struct SourceFileIr {
    /// License/documentation header, emitted verbatim.
    pub leading_trivia: String,

    /// Import section, already deduplicated and ordered.
    pub imports: Vec<Import>,

    /// Code blocks in translator order: aliases, then server, then client.
    pub declarations: Vec<Declaration>,
}

/// One import statement with its decorations.
#[derive(Debug, Clone)]
pub(crate) struct Import {
    pub module: String,
    pub item: Option<ImportItem>,
    pub spi: Option<String>,
    pub concurrency: ConcurrencyRequirement,
}

impl Import {
    /// A plain whole-module import.
    pub fn module(name: impl Into<String>) -> Self {
        Import {
            module: name.into(),
            item: None,
            spi: None,
            concurrency: ConcurrencyRequirement::NotRequired,
        }
    }
}

/// A single generated declaration.
#[derive(Debug, Clone)]
pub(crate) enum Declaration {
    Namespace(Namespace),
    Protocol(Protocol),
    Extension(Extension),
    Struct(Struct),
    TypeAlias(TypeAlias),
    Constant(Constant),
    StoredProperty(StoredProperty),
    Initializer(Initializer),
    Function(Function),
}

impl Declaration {
    /// Single-line declarations are packed without separating blank lines;
    /// everything else gets one.
    pub fn is_compact(&self) -> bool {
        matches!(
            self,
            Declaration::TypeAlias(_) | Declaration::StoredProperty(_)
        ) || matches!(
            self,
            Declaration::Constant(Constant {
                value: ConstantValue::Inline(_),
                ..
            })
        )
    }
}

/// A caseless enum used as a namespace block.
#[derive(Debug, Clone)]
pub(crate) struct Namespace {
    pub doc: Option<String>,
    pub name: String,
    pub members: Vec<Declaration>,
}

/// A protocol declaration with its ordered requirements.
#[derive(Debug, Clone)]
pub(crate) struct Protocol {
    pub doc: Option<String>,
    pub availability: bool,
    pub name: String,
    /// Capabilities this protocol refines.
    pub refines: Vec<String>,
    pub requirements: Vec<FunctionSignature>,
}

/// A default-implementation block attached to an existing type.
#[derive(Debug, Clone)]
pub(crate) struct Extension {
    pub availability: bool,
    /// The (possibly dot-qualified) extended type.
    pub extended: String,
    pub members: Vec<Declaration>,
}

/// A concrete nominal type (the generated client).
#[derive(Debug, Clone)]
pub(crate) struct Struct {
    pub doc: Option<String>,
    pub availability: bool,
    pub name: String,
    pub conforms: Vec<String>,
    pub members: Vec<Declaration>,
}

#[derive(Debug, Clone)]
pub(crate) struct TypeAlias {
    pub doc: Option<String>,
    pub availability: bool,
    pub name: String,
    pub target: String,
}

/// A `let` binding, optionally `static`, with an inline or list value.
#[derive(Debug, Clone)]
pub(crate) struct Constant {
    pub doc: Option<String>,
    pub is_static: bool,
    pub name: String,
    pub type_annotation: Option<String>,
    pub value: ConstantValue,
}

#[derive(Debug, Clone)]
pub(crate) enum ConstantValue {
    /// Rendered on the binding's line.
    Inline(String),
    /// Rendered as a bracketed list, one element per line.
    List(Vec<String>),
}

/// A stored property of a struct.
#[derive(Debug, Clone)]
pub(crate) struct StoredProperty {
    /// `private` instead of the configured access level.
    pub is_private: bool,
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Initializer {
    pub parameters: Vec<String>,
    pub body: Vec<Code>,
}

/// A function signature, shared between protocol requirements and concrete
/// functions.
#[derive(Debug, Clone)]
pub(crate) struct FunctionSignature {
    pub doc: Option<String>,
    /// Function name, including any generic parameter clause.
    pub name: String,
    /// Fully formatted parameters, e.g. `request: GRPCCore.ClientRequest<In>`.
    pub parameters: Vec<String>,
    /// Effects clause, e.g. `async throws`.
    pub effects: Option<&'static str>,
    pub returns: Option<String>,
}

/// A concrete function with a body.
#[derive(Debug, Clone)]
pub(crate) struct Function {
    pub signature: FunctionSignature,
    pub body: Vec<Code>,
}

/// Body code: flat lines, or a nested block indented one extra level.
#[derive(Debug, Clone)]
pub(crate) enum Code {
    Line(String),
    Block {
        open: String,
        body: Vec<Code>,
        close: String,
    },
}

impl Code {
    pub fn line(text: impl Into<String>) -> Self {
        Code::Line(text.into())
    }
}

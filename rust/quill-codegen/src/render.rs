//! Recursive-descent rendering of the declaration tree.
//!
//! File order is fixed: leading trivia, import section, then declarations in
//! the order the translators appended them. Rendering the same tree twice
//! yields byte-identical text; all state lives in the per-call writer.

use quill_schema::ConcurrencyRequirement;

use crate::config::GeneratorConfig;
use crate::ir::{
    Code, Constant, ConstantValue, Declaration, Extension, Function, FunctionSignature, Import,
    Initializer, Namespace, Protocol, SourceFileIr, StoredProperty, Struct, TypeAlias,
};
use crate::writer::CodeWriter;

/// Minimum platform versions for declarations touching the runtime's
/// concurrency surface.
const AVAILABILITY: &str =
    "@available(macOS 15.0, iOS 18.0, watchOS 11.0, tvOS 18.0, visionOS 2.0, *)";

pub(crate) fn render(config: &GeneratorConfig, ir: &SourceFileIr) -> String {
    let renderer = Renderer {
        w: CodeWriter::new(config.indentation),
        config,
    };
    renderer.render_file(ir)
}

struct Renderer<'a> {
    w: CodeWriter,
    config: &'a GeneratorConfig,
}

impl Renderer<'_> {
    fn render_file(mut self, ir: &SourceFileIr) -> String {
        for line in ir.leading_trivia.lines() {
            self.w.line(line);
        }
        if !ir.imports.is_empty() {
            self.gap();
            for import in &ir.imports {
                self.import(import);
            }
        }
        for declaration in &ir.declarations {
            self.gap();
            self.declaration(declaration);
        }
        self.w.finish()
    }

    /// Blank separator, suppressed at the very top of the file.
    fn gap(&mut self) {
        if !self.w.is_fresh() {
            self.w.blank();
        }
    }

    fn access(&self) -> &'static str {
        self.config.access_level.keyword()
    }

    fn import(&mut self, import: &Import) {
        let spi = import
            .spi
            .as_ref()
            .map(|name| format!("@_spi({name}) "))
            .unwrap_or_default();
        let stmt = match &import.item {
            Some(item) => format!(
                "import {} {}.{}",
                item.kind.as_str(),
                import.module,
                item.name
            ),
            None => format!("import {}", import.module),
        };
        match &import.concurrency {
            ConcurrencyRequirement::NotRequired => self.w.line(&format!("{spi}{stmt}")),
            ConcurrencyRequirement::Required => {
                self.w.line(&format!("{spi}@preconcurrency {stmt}"));
            }
            ConcurrencyRequirement::RequiredOnPlatforms(platforms) => {
                let condition = platforms
                    .iter()
                    .map(|platform| format!("os({platform})"))
                    .collect::<Vec<_>>()
                    .join(" || ");
                self.w.line(&format!("#if {condition}"));
                self.w.line(&format!("{spi}@preconcurrency {stmt}"));
                self.w.line("#else");
                self.w.line(&format!("{spi}{stmt}"));
                self.w.line("#endif");
            }
        }
    }

    fn declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Namespace(d) => self.namespace(d),
            Declaration::Protocol(d) => self.protocol(d),
            Declaration::Extension(d) => self.extension(d),
            Declaration::Struct(d) => self.struct_decl(d),
            Declaration::TypeAlias(d) => self.type_alias(d),
            Declaration::Constant(d) => self.constant(d),
            Declaration::StoredProperty(d) => self.stored_property(d),
            Declaration::Initializer(d) => self.initializer(d),
            Declaration::Function(d) => self.function(d),
        }
    }

    /// Members of a block, blank-separated except between consecutive
    /// single-line declarations.
    fn members(&mut self, members: &[Declaration]) {
        for (index, member) in members.iter().enumerate() {
            if index > 0 && !(members[index - 1].is_compact() && member.is_compact()) {
                self.w.blank();
            }
            self.declaration(member);
        }
    }

    fn doc(&mut self, doc: &Option<String>) {
        if let Some(doc) = doc {
            self.w.doc(doc);
        }
    }

    fn availability(&mut self, gated: bool) {
        if gated {
            self.w.line(AVAILABILITY);
        }
    }

    /// `header {` / members / `}`, collapsing empty bodies to `header {}`.
    fn block(&mut self, header: &str, members: &[Declaration]) {
        if members.is_empty() {
            self.w.line(&format!("{header} {{}}"));
        } else {
            self.w.line(&format!("{header} {{"));
            self.w.push();
            self.members(members);
            self.w.pop();
            self.w.line("}");
        }
    }

    fn namespace(&mut self, namespace: &Namespace) {
        self.doc(&namespace.doc);
        let header = format!("{} enum {}", self.access(), namespace.name);
        self.block(&header, &namespace.members);
    }

    fn protocol(&mut self, protocol: &Protocol) {
        self.doc(&protocol.doc);
        self.availability(protocol.availability);
        let inherit = if protocol.refines.is_empty() {
            String::new()
        } else {
            format!(": {}", protocol.refines.join(", "))
        };
        let header = format!("{} protocol {}{}", self.access(), protocol.name, inherit);
        if protocol.requirements.is_empty() {
            self.w.line(&format!("{header} {{}}"));
            return;
        }
        self.w.line(&format!("{header} {{"));
        self.w.push();
        // Protocol requirements admit no access-level keyword.
        for requirement in &protocol.requirements {
            self.doc(&requirement.doc);
            self.w.line(&format!("func {}", signature_text(requirement)));
        }
        self.w.pop();
        self.w.line("}");
    }

    fn extension(&mut self, extension: &Extension) {
        self.availability(extension.availability);
        let header = format!("extension {}", extension.extended);
        self.block(&header, &extension.members);
    }

    fn struct_decl(&mut self, decl: &Struct) {
        self.doc(&decl.doc);
        self.availability(decl.availability);
        let conforms = if decl.conforms.is_empty() {
            String::new()
        } else {
            format!(": {}", decl.conforms.join(", "))
        };
        let header = format!("{} struct {}{}", self.access(), decl.name, conforms);
        self.block(&header, &decl.members);
    }

    fn type_alias(&mut self, alias: &TypeAlias) {
        self.doc(&alias.doc);
        self.availability(alias.availability);
        self.w.line(&format!(
            "{} typealias {} = {}",
            self.access(),
            alias.name,
            alias.target
        ));
    }

    fn constant(&mut self, constant: &Constant) {
        self.doc(&constant.doc);
        let modifier = if constant.is_static { "static " } else { "" };
        let annotation = constant
            .type_annotation
            .as_ref()
            .map(|ty| format!(": {ty}"))
            .unwrap_or_default();
        let head = format!(
            "{} {}let {}{}",
            self.access(),
            modifier,
            constant.name,
            annotation
        );
        match &constant.value {
            ConstantValue::Inline(value) => self.w.line(&format!("{head} = {value}")),
            ConstantValue::List(items) if items.is_empty() => {
                self.w.line(&format!("{head} = []"));
            }
            ConstantValue::List(items) => {
                self.w.line(&format!("{head} = ["));
                self.w.push();
                for (index, item) in items.iter().enumerate() {
                    if index + 1 < items.len() {
                        self.w.line(&format!("{item},"));
                    } else {
                        self.w.line(item);
                    }
                }
                self.w.pop();
                self.w.line("]");
            }
        }
    }

    fn stored_property(&mut self, property: &StoredProperty) {
        let access = if property.is_private {
            "private"
        } else {
            self.access()
        };
        self.w.line(&format!(
            "{access} let {}: {}",
            property.name, property.type_name
        ));
    }

    fn initializer(&mut self, init: &Initializer) {
        let header = format!("{} init({})", self.access(), init.parameters.join(", "));
        self.body_block(&header, &init.body);
    }

    fn function(&mut self, function: &Function) {
        self.doc(&function.signature.doc);
        let header = format!(
            "{} func {}",
            self.access(),
            signature_text(&function.signature)
        );
        self.body_block(&header, &function.body);
    }

    fn body_block(&mut self, header: &str, body: &[Code]) {
        if body.is_empty() {
            self.w.line(&format!("{header} {{}}"));
            return;
        }
        self.w.line(&format!("{header} {{"));
        self.w.push();
        for code in body {
            self.code(code);
        }
        self.w.pop();
        self.w.line("}");
    }

    fn code(&mut self, code: &Code) {
        match code {
            Code::Line(text) => self.w.line(text),
            Code::Block { open, body, close } => {
                self.w.line(open);
                self.w.push();
                for code in body {
                    self.code(code);
                }
                self.w.pop();
                self.w.line(close);
            }
        }
    }
}

fn signature_text(signature: &FunctionSignature) -> String {
    let mut out = format!("{}({})", signature.name, signature.parameters.join(", "));
    if let Some(effects) = signature.effects {
        out.push(' ');
        out.push_str(effects);
    }
    if let Some(returns) = &signature.returns {
        out.push_str(" -> ");
        out.push_str(returns);
    }
    out
}

#[cfg(test)]
mod tests {
    use quill_schema::{ConcurrencyRequirement, ImportItem, ItemKind};

    use super::*;
    use crate::config::{AccessLevel, GeneratorConfig};

    fn config() -> GeneratorConfig {
        GeneratorConfig::default()
    }

    fn file_with(declarations: Vec<Declaration>) -> SourceFileIr {
        SourceFileIr {
            leading_trivia: String::new(),
            imports: vec![],
            declarations,
        }
    }

    #[test]
    fn compact_members_pack_without_blanks() {
        let ir = file_with(vec![Declaration::Namespace(Namespace {
            doc: None,
            name: "SayHello".into(),
            members: vec![
                Declaration::TypeAlias(TypeAlias {
                    doc: None,
                    availability: false,
                    name: "Input".into(),
                    target: "HelloRequest".into(),
                }),
                Declaration::TypeAlias(TypeAlias {
                    doc: None,
                    availability: false,
                    name: "Output".into(),
                    target: "HelloReply".into(),
                }),
                Declaration::Constant(Constant {
                    doc: None,
                    is_static: true,
                    name: "descriptor".into(),
                    type_annotation: None,
                    value: ConstantValue::Inline("makeDescriptor()".into()),
                }),
            ],
        })]);
        let out = render(&config(), &ir);
        assert_eq!(
            out,
            "internal enum SayHello {\n\
             \x20   internal typealias Input = HelloRequest\n\
             \x20   internal typealias Output = HelloReply\n\
             \x20   internal static let descriptor = makeDescriptor()\n\
             }\n"
        );
    }

    #[test]
    fn empty_blocks_collapse() {
        let ir = file_with(vec![
            Declaration::Protocol(Protocol {
                doc: None,
                availability: false,
                name: "Empty".into(),
                refines: vec!["Sendable".into()],
                requirements: vec![],
            }),
            Declaration::Extension(Extension {
                availability: false,
                extended: "Empty".into(),
                members: vec![],
            }),
        ]);
        let out = render(&config(), &ir);
        assert_eq!(
            out,
            "internal protocol Empty: Sendable {}\n\nextension Empty {}\n"
        );
    }

    #[test]
    fn availability_precedes_gated_declarations() {
        let ir = file_with(vec![Declaration::TypeAlias(TypeAlias {
            doc: None,
            availability: true,
            name: "Client".into(),
            target: "Greeter_Client".into(),
        })]);
        let out = render(&config(), &ir);
        assert_eq!(
            out,
            "@available(macOS 15.0, iOS 18.0, watchOS 11.0, tvOS 18.0, visionOS 2.0, *)\n\
             internal typealias Client = Greeter_Client\n"
        );
    }

    #[test]
    fn import_decorations() {
        let ir = SourceFileIr {
            leading_trivia: String::new(),
            imports: vec![
                Import::module("GRPCCore"),
                Import {
                    module: "Tracing".into(),
                    item: None,
                    spi: Some("Experimental".into()),
                    concurrency: ConcurrencyRequirement::Required,
                },
                Import {
                    module: "Dispatch".into(),
                    item: Some(ImportItem {
                        kind: ItemKind::STRUCT,
                        name: "DispatchQueue".into(),
                    }),
                    spi: None,
                    concurrency: ConcurrencyRequirement::RequiredOnPlatforms(vec![
                        "macOS".into(),
                        "iOS".into(),
                    ]),
                },
            ],
            declarations: vec![],
        };
        let out = render(&config(), &ir);
        assert_eq!(
            out,
            "import GRPCCore\n\
             @_spi(Experimental) @preconcurrency import Tracing\n\
             #if os(macOS) || os(iOS)\n\
             @preconcurrency import struct Dispatch.DispatchQueue\n\
             #else\n\
             import struct Dispatch.DispatchQueue\n\
             #endif\n"
        );
    }

    #[test]
    fn leading_trivia_is_verbatim() {
        let ir = SourceFileIr {
            leading_trivia: "// Copyright 2026.\n// All rights reserved.\n".into(),
            imports: vec![Import::module("GRPCCore")],
            declarations: vec![],
        };
        let out = render(&config(), &ir);
        assert_eq!(
            out,
            "// Copyright 2026.\n// All rights reserved.\n\nimport GRPCCore\n"
        );
    }

    #[test]
    fn list_constants_trail_no_comma() {
        let ir = file_with(vec![Declaration::Constant(Constant {
            doc: None,
            is_static: true,
            name: "descriptors".into(),
            type_annotation: Some("[GRPCCore.MethodDescriptor]".into()),
            value: ConstantValue::List(vec!["A.descriptor".into(), "B.descriptor".into()]),
        })]);
        let out = render(&config(), &ir);
        assert_eq!(
            out,
            "internal static let descriptors: [GRPCCore.MethodDescriptor] = [\n\
             \x20   A.descriptor,\n\
             \x20   B.descriptor\n\
             ]\n"
        );
    }

    #[test]
    fn access_level_is_configurable() {
        let config = GeneratorConfig {
            access_level: AccessLevel::Public,
            ..GeneratorConfig::default()
        };
        let ir = file_with(vec![Declaration::TypeAlias(TypeAlias {
            doc: None,
            availability: false,
            name: "Input".into(),
            target: "HelloRequest".into(),
        })]);
        assert_eq!(
            render(&config, &ir),
            "public typealias Input = HelloRequest\n"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let ir = file_with(vec![Declaration::Struct(Struct {
            doc: Some("A client.".into()),
            availability: false,
            name: "Greeter_Client".into(),
            conforms: vec!["Greeter.ClientProtocol".into()],
            members: vec![
                Declaration::StoredProperty(StoredProperty {
                    is_private: true,
                    name: "client".into(),
                    type_name: "GRPCCore.GRPCClient".into(),
                }),
                Declaration::Initializer(Initializer {
                    parameters: vec!["wrapping client: GRPCCore.GRPCClient".into()],
                    body: vec![Code::line("self.client = client")],
                }),
            ],
        })]);
        let first = render(&config(), &ir);
        let second = render(&config(), &ir);
        assert_eq!(first, second);
        assert!(first.contains("private let client: GRPCCore.GRPCClient"));
        assert!(first.contains("internal init(wrapping client: GRPCCore.GRPCClient) {"));
    }
}

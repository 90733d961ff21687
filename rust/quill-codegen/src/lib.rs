#![deny(unsafe_code)]

//! Swift source generation for quill RPC services.
//!
//! This crate is the core of a protocol-compiler plugin: an upstream tool
//! parses an IDL schema into a [`quill_schema::CodeGenerationRequest`], and
//! [`generate`] maps that request deterministically to compilable Swift
//! text: client stubs, server interfaces, and the supporting declarations.
//!
//! # The Pipeline
//!
//! ```text
//! CodeGenerationRequest → validate → translators → IR → renderer → SourceFile
//! ```
//!
//! - **validate** enforces name/descriptor uniqueness before anything is
//!   built; any failure aborts the call with a [`CodeGenError`] and no
//!   partial output.
//! - **translators** map the request to a declaration tree: the alias
//!   skeleton first, then server code, then client code, each gated by
//!   [`GeneratorConfig`].
//! - the **renderer** walks the tree once and emits indentation-correct,
//!   access-level-correct text.
//!
//! The whole transformation is pure and synchronous: no I/O, no suspension
//! points, no state shared between calls. Rendering the same request twice
//! yields byte-identical output.

mod config;
mod error;
mod ir;
mod render;
mod translator;
mod validate;
pub mod writer;

use quill_schema::CodeGenerationRequest;
use tracing::debug;

pub use crate::config::{AccessLevel, GeneratorConfig};
pub use crate::error::{CodeGenError, ErrorCode};
use crate::ir::{Import, SourceFileIr};

/// The runtime module every generated file imports first.
const RUNTIME_MODULE: &str = "GRPCCore";

/// The module providing the canonical message coding pair.
const CODING_MODULE: &str = "GRPCProtobuf";

/// A rendered source artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Schema file name with its extension replaced by `.swift`.
    pub name: String,

    /// The complete generated source.
    pub contents: String,
}

/// Generate one Swift source file from a request.
///
/// Either returns the complete rendered text or fails before producing any
/// output.
pub fn generate(
    request: &CodeGenerationRequest,
    config: &GeneratorConfig,
) -> Result<SourceFile, CodeGenError> {
    debug!(
        file = %request.file_name,
        services = request.services.len(),
        dependencies = request.dependencies.len(),
        client = config.client,
        server = config.server,
        "generating"
    );

    validate::validate(request)?;

    let mut declarations = translator::aliases::translate(request, config);
    if config.server {
        declarations.extend(translator::server::translate(request, config));
    }
    if config.client {
        declarations.extend(translator::client::translate(request, config));
    }

    let ir = SourceFileIr {
        leading_trivia: request.leading_trivia.to_string(),
        imports: imports(request, config),
        declarations,
    };
    let contents = render::render(config, &ir);
    let name = output_name(&request.file_name);

    debug!(file = %name, bytes = contents.len(), "rendered");
    Ok(SourceFile { name, contents })
}

/// The import section: runtime module first, then the coding module when any
/// stub code is generated, then schema-derived dependencies and configured
/// extras, deduplicated by module name in stable order.
fn imports(request: &CodeGenerationRequest, config: &GeneratorConfig) -> Vec<Import> {
    let mut imports = vec![Import::module(RUNTIME_MODULE)];
    if config.client || config.server {
        imports.push(Import::module(CODING_MODULE));
    }
    for dependency in &request.dependencies {
        let module = config.remap_module(&dependency.module).to_string();
        if imports.iter().any(|import| import.module == module) {
            continue;
        }
        imports.push(Import {
            module,
            item: dependency.item.clone(),
            spi: dependency.spi.as_ref().map(|spi| spi.to_string()),
            concurrency: dependency.concurrency.clone(),
        });
    }
    for module in &config.extra_module_imports {
        if imports.iter().any(|import| &import.module == module) {
            continue;
        }
        imports.push(Import::module(module.clone()));
    }
    imports
}

fn output_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.swift"),
        None => format!("{file_name}.swift"),
    }
}

#[cfg(test)]
mod tests {
    use quill_schema::Dependency;

    use super::*;

    #[test]
    fn output_name_strips_the_schema_extension() {
        assert_eq!(output_name("helloworld.proto"), "helloworld.swift");
        assert_eq!(output_name("pkg.v1.proto"), "pkg.v1.swift");
        assert_eq!(output_name("helloworld"), "helloworld.swift");
    }

    #[test]
    fn imports_deduplicate_by_module() {
        let request = CodeGenerationRequest {
            leading_trivia: "".into(),
            file_name: "test.proto".into(),
            dependencies: vec![
                Dependency::module("Foundation"),
                Dependency::module("Foundation"),
                // The runtime module stays pinned at the front even when a
                // dependency names it again.
                Dependency::module("GRPCCore"),
            ],
            services: vec![],
        };
        let config = GeneratorConfig::default();
        let imports = imports(&request, &config);
        let modules: Vec<&str> = imports.iter().map(|i| i.module.as_str()).collect();
        assert_eq!(modules, vec!["GRPCCore", "GRPCProtobuf", "Foundation"]);
    }

    #[test]
    fn extra_imports_follow_dependencies() {
        let request = CodeGenerationRequest {
            leading_trivia: "".into(),
            file_name: "test.proto".into(),
            dependencies: vec![Dependency::module("Foundation")],
            services: vec![],
        };
        let config = GeneratorConfig {
            client: false,
            server: false,
            extra_module_imports: vec!["Logging".into(), "Foundation".into()],
            ..GeneratorConfig::default()
        };
        let imports = imports(&request, &config);
        let modules: Vec<&str> = imports.iter().map(|i| i.module.as_str()).collect();
        // No stub code, so no coding module.
        assert_eq!(modules, vec!["GRPCCore", "Foundation", "Logging"]);
    }
}

//! Server translator: the two-tier interface pair and its bridging default
//! implementations.
//!
//! The streaming protocol requires the full-duplex shape for every method.
//! The narrower service protocol redeclares each method at the shape its call
//! pattern implies; bidirectional methods cannot narrow and are not
//! redeclared. Two extensions bridge the tiers: one routes incoming calls to
//! the streaming requirements, one adapts narrow implementations back up to
//! the full-duplex shape.

use quill_schema::{CodeGenerationRequest, MethodDescriptor, ServiceDescriptor, StreamingShape};

use crate::config::GeneratorConfig;
use crate::ir::{Code, Declaration, Extension, Function, FunctionSignature, Protocol};
use crate::translator::{
    availability_gated, deserializer_expr, doc_opt, ordered_services, serializer_expr,
    service_protocol_name, streaming_protocol_name,
};

pub(crate) fn translate(
    request: &CodeGenerationRequest,
    config: &GeneratorConfig,
) -> Vec<Declaration> {
    let availability = availability_gated(request);
    let mut declarations = Vec::new();
    for service in ordered_services(request) {
        declarations.push(streaming_protocol(service, config, availability));
        declarations.push(routing_extension(service, config, availability));
        declarations.push(service_protocol(service, config, availability));
        declarations.push(adaptation_extension(service, config, availability));
    }
    declarations
}

fn single_request(type_name: &str) -> String {
    format!("GRPCCore.ServerRequest<{type_name}>")
}

fn streaming_request(type_name: &str) -> String {
    format!("GRPCCore.StreamingServerRequest<{type_name}>")
}

fn single_response(type_name: &str) -> String {
    format!("GRPCCore.ServerResponse<{type_name}>")
}

fn streaming_response(type_name: &str) -> String {
    format!("GRPCCore.StreamingServerResponse<{type_name}>")
}

/// The full-duplex signature every method has in the streaming protocol.
fn streaming_signature(
    method: &MethodDescriptor,
    config: &GeneratorConfig,
    doc: bool,
) -> FunctionSignature {
    FunctionSignature {
        doc: if doc { doc_opt(&method.doc) } else { None },
        name: method.name.lower_camel.to_string(),
        parameters: vec![
            format!(
                "request: {}",
                streaming_request(&config.remap_type(&method.input_type))
            ),
            "context: GRPCCore.ServerContext".into(),
        ],
        effects: Some("async throws"),
        returns: Some(streaming_response(&config.remap_type(&method.output_type))),
    }
}

/// The narrowed signature implied by the method's call shape. `None` for
/// bidirectional methods, which cannot narrow.
fn narrow_signature(
    method: &MethodDescriptor,
    config: &GeneratorConfig,
) -> Option<FunctionSignature> {
    let input = config.remap_type(&method.input_type);
    let output = config.remap_type(&method.output_type);
    let (request, response) = match method.shape() {
        StreamingShape::Unary => (single_request(&input), single_response(&output)),
        StreamingShape::ClientStreaming => (streaming_request(&input), single_response(&output)),
        StreamingShape::ServerStreaming => (single_request(&input), streaming_response(&output)),
        StreamingShape::Bidirectional => return None,
    };
    Some(FunctionSignature {
        doc: doc_opt(&method.doc),
        name: method.name.lower_camel.to_string(),
        parameters: vec![
            format!("request: {request}"),
            "context: GRPCCore.ServerContext".into(),
        ],
        effects: Some("async throws"),
        returns: Some(response),
    })
}

fn streaming_protocol(
    service: &ServiceDescriptor,
    config: &GeneratorConfig,
    availability: bool,
) -> Declaration {
    Declaration::Protocol(Protocol {
        doc: doc_opt(&service.doc),
        availability,
        name: streaming_protocol_name(service),
        refines: vec!["GRPCCore.RegistrableRPCService".into()],
        requirements: service
            .methods
            .iter()
            .map(|method| streaming_signature(method, config, true))
            .collect(),
    })
}

/// The dispatch table: registers every method's descriptor with the
/// canonical coding pair and a handler forwarding to the streaming
/// requirement.
fn routing_extension(
    service: &ServiceDescriptor,
    config: &GeneratorConfig,
    availability: bool,
) -> Declaration {
    let body: Vec<Code> = service
        .methods
        .iter()
        .map(|method| Code::Block {
            open: "router.registerHandler(".into(),
            body: vec![
                Code::line(format!(
                    "forMethod: {}.Method.{}.descriptor,",
                    service.alias_path(),
                    method.name.upper_camel
                )),
                Code::line(format!(
                    "deserializer: {},",
                    deserializer_expr(&config.remap_type(&method.input_type))
                )),
                Code::line(format!(
                    "serializer: {},",
                    serializer_expr(&config.remap_type(&method.output_type))
                )),
                Code::Block {
                    open: "handler: { request, context in".into(),
                    body: vec![Code::line(format!(
                        "try await self.{}(request: request, context: context)",
                        method.name.lower_camel
                    ))],
                    close: "}".into(),
                },
            ],
            close: ")".into(),
        })
        .collect();
    Declaration::Extension(Extension {
        availability,
        extended: format!("{}.StreamingServiceProtocol", service.alias_path()),
        members: vec![Declaration::Function(Function {
            signature: FunctionSignature {
                doc: Some("Registers the service's methods with `router`.".into()),
                name: "registerMethods".into(),
                parameters: vec!["with router: inout GRPCCore.RPCRouter".into()],
                effects: None,
                returns: None,
            },
            body,
        })],
    })
}

fn service_protocol(
    service: &ServiceDescriptor,
    config: &GeneratorConfig,
    availability: bool,
) -> Declaration {
    Declaration::Protocol(Protocol {
        doc: doc_opt(&service.doc),
        availability,
        name: service_protocol_name(service),
        refines: vec![format!(
            "{}.StreamingServiceProtocol",
            service.alias_path()
        )],
        requirements: service
            .methods
            .iter()
            .filter_map(|method| narrow_signature(method, config))
            .collect(),
    })
}

/// Bridges narrow implementations up to the full-duplex shape. Bidirectional
/// methods need no shim; a service of only bidirectional methods yields an
/// empty extension.
fn adaptation_extension(
    service: &ServiceDescriptor,
    config: &GeneratorConfig,
    availability: bool,
) -> Declaration {
    let members: Vec<Declaration> = service
        .methods
        .iter()
        .filter(|method| method.shape() != StreamingShape::Bidirectional)
        .map(|method| {
            Declaration::Function(Function {
                signature: streaming_signature(method, config, false),
                body: shim_body(method),
            })
        })
        .collect();
    Declaration::Extension(Extension {
        availability,
        extended: format!("{}.ServiceProtocol", service.alias_path()),
        members,
    })
}

fn shim_body(method: &MethodDescriptor) -> Vec<Code> {
    let name = &method.name.lower_camel;
    match method.shape() {
        StreamingShape::Unary => vec![
            Code::line(format!(
                "let response = try await self.{name}(request: GRPCCore.ServerRequest(stream: request), context: context)"
            )),
            Code::line("return GRPCCore.StreamingServerResponse(single: response)"),
        ],
        StreamingShape::ClientStreaming => vec![
            Code::line(format!(
                "let response = try await self.{name}(request: request, context: context)"
            )),
            Code::line("return GRPCCore.StreamingServerResponse(single: response)"),
        ],
        StreamingShape::ServerStreaming => vec![Code::line(format!(
            "return try await self.{name}(request: GRPCCore.ServerRequest(stream: request), context: context)"
        ))],
        // Filtered out by the caller.
        StreamingShape::Bidirectional => vec![],
    }
}

//! Client translator: the calling-side mirror of the server translator.
//!
//! One protocol exposes, per method, a generic continuation-passing call
//! taking an explicit coding pair. An extension supplies the convenience
//! overload injecting the canonical pair. A concrete client type wraps a
//! generic RPC transport handle and forwards each call with the method's
//! descriptor.

use quill_schema::{CodeGenerationRequest, MethodDescriptor, ServiceDescriptor, StreamingShape};

use crate::config::GeneratorConfig;
use crate::ir::{
    Code, Declaration, Extension, Function, FunctionSignature, Initializer, Protocol,
    StoredProperty, Struct,
};
use crate::translator::{
    availability_gated, client_protocol_name, client_struct_name, deserializer_expr, doc_opt,
    ordered_services, serializer_expr,
};

pub(crate) fn translate(
    request: &CodeGenerationRequest,
    config: &GeneratorConfig,
) -> Vec<Declaration> {
    let availability = availability_gated(request);
    let mut declarations = Vec::new();
    for service in ordered_services(request) {
        declarations.push(client_protocol(service, config, availability));
        declarations.push(convenience_extension(service, config, availability));
        declarations.push(client_struct(service, config, availability));
    }
    declarations
}

fn request_type(method: &MethodDescriptor, config: &GeneratorConfig) -> String {
    let input = config.remap_type(&method.input_type);
    if method.input_streaming {
        format!("GRPCCore.StreamingClientRequest<{input}>")
    } else {
        format!("GRPCCore.ClientRequest<{input}>")
    }
}

fn response_type(method: &MethodDescriptor, config: &GeneratorConfig) -> String {
    let output = config.remap_type(&method.output_type);
    if method.output_streaming {
        format!("GRPCCore.StreamingClientResponse<{output}>")
    } else {
        format!("GRPCCore.ClientResponse<{output}>")
    }
}

/// The transport-handle entry point for the method's call shape.
fn transport_call(method: &MethodDescriptor) -> &'static str {
    match method.shape() {
        StreamingShape::Unary => "unary",
        StreamingShape::ClientStreaming => "clientStreaming",
        StreamingShape::ServerStreaming => "serverStreaming",
        StreamingShape::Bidirectional => "bidirectionalStreaming",
    }
}

/// The generic continuation-passing signature. `with_coding` includes the
/// explicit serializer/deserializer pair; `default_options` defaults the
/// call options (illegal on protocol requirements).
fn call_signature(
    method: &MethodDescriptor,
    config: &GeneratorConfig,
    with_coding: bool,
    default_options: bool,
    doc: bool,
) -> FunctionSignature {
    let input = config.remap_type(&method.input_type);
    let output = config.remap_type(&method.output_type);
    let mut parameters = vec![format!("request: {}", request_type(method, config))];
    if with_coding {
        parameters.push(format!(
            "serializer: some GRPCCore.MessageSerializer<{input}>"
        ));
        parameters.push(format!(
            "deserializer: some GRPCCore.MessageDeserializer<{output}>"
        ));
    }
    if default_options {
        parameters.push("options: GRPCCore.CallOptions = .defaults".into());
    } else {
        parameters.push("options: GRPCCore.CallOptions".into());
    }
    parameters.push(format!(
        "_ body: @Sendable @escaping ({}) async throws -> Result",
        response_type(method, config)
    ));
    FunctionSignature {
        doc: if doc { doc_opt(&method.doc) } else { None },
        name: format!("{}<Result: Sendable>", method.name.lower_camel),
        parameters,
        effects: Some("async throws"),
        returns: Some("Result".into()),
    }
}

fn client_protocol(
    service: &ServiceDescriptor,
    config: &GeneratorConfig,
    availability: bool,
) -> Declaration {
    Declaration::Protocol(Protocol {
        doc: doc_opt(&service.doc),
        availability,
        name: client_protocol_name(service),
        refines: vec!["Sendable".into()],
        requirements: service
            .methods
            .iter()
            .map(|method| call_signature(method, config, true, false, true))
            .collect(),
    })
}

/// Injects the canonical coding pair so callers only supply the request.
fn convenience_extension(
    service: &ServiceDescriptor,
    config: &GeneratorConfig,
    availability: bool,
) -> Declaration {
    let members: Vec<Declaration> = service
        .methods
        .iter()
        .map(|method| {
            let input = config.remap_type(&method.input_type);
            let output = config.remap_type(&method.output_type);
            Declaration::Function(Function {
                signature: call_signature(method, config, false, true, true),
                body: vec![Code::Block {
                    open: format!("try await self.{}(", method.name.lower_camel),
                    body: vec![
                        Code::line("request: request,"),
                        Code::line(format!("serializer: {},", serializer_expr(&input))),
                        Code::line(format!("deserializer: {},", deserializer_expr(&output))),
                        Code::line("options: options,"),
                        Code::line("body"),
                    ],
                    close: ")".into(),
                }],
            })
        })
        .collect();
    Declaration::Extension(Extension {
        availability,
        extended: format!("{}.ClientProtocol", service.alias_path()),
        members,
    })
}

fn client_struct(
    service: &ServiceDescriptor,
    config: &GeneratorConfig,
    availability: bool,
) -> Declaration {
    let mut members = vec![
        Declaration::StoredProperty(StoredProperty {
            is_private: true,
            name: "client".into(),
            type_name: "GRPCCore.GRPCClient".into(),
        }),
        Declaration::Initializer(Initializer {
            parameters: vec!["wrapping client: GRPCCore.GRPCClient".into()],
            body: vec![Code::line("self.client = client")],
        }),
    ];
    members.extend(service.methods.iter().map(|method| {
        Declaration::Function(Function {
            signature: call_signature(method, config, true, false, false),
            body: vec![Code::Block {
                open: format!("try await self.client.{}(", transport_call(method)),
                body: vec![
                    Code::line("request: request,"),
                    Code::line(format!(
                        "descriptor: {}.Method.{}.descriptor,",
                        service.alias_path(),
                        method.name.upper_camel
                    )),
                    Code::line("serializer: serializer,"),
                    Code::line("deserializer: deserializer,"),
                    Code::line("options: options,"),
                    Code::line("handler: body"),
                ],
                close: ")".into(),
            }],
        })
    }));
    Declaration::Struct(Struct {
        doc: doc_opt(&service.doc),
        availability,
        name: client_struct_name(service),
        conforms: vec![format!("{}.ClientProtocol", service.alias_path())],
        members,
    })
}

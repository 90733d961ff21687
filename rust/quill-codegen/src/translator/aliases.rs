//! Alias translator: the nominal-namespace skeleton and per-method identity
//! metadata.
//!
//! Emits one block per top-level entry. A namespaced entry nests its services
//! one level deep; a no-namespace service is emitted bare. Each service block
//! carries its wire descriptor, a `Method` namespace with per-method
//! `Input`/`Output` aliases and descriptor constants, and the capability
//! typealiases for whichever translators are enabled.

use quill_schema::{CodeGenerationRequest, MethodDescriptor, ServiceDescriptor};

use crate::config::GeneratorConfig;
use crate::ir::{Constant, ConstantValue, Declaration, Namespace, TypeAlias};
use crate::translator::{
    TopLevelEntry, availability_gated, client_protocol_name, client_struct_name, doc_opt,
    service_protocol_name, streaming_protocol_name, top_level_entries,
};

pub(crate) fn translate(
    request: &CodeGenerationRequest,
    config: &GeneratorConfig,
) -> Vec<Declaration> {
    let availability = availability_gated(request);
    top_level_entries(request)
        .into_iter()
        .map(|entry| match entry {
            TopLevelEntry::Namespace { name, services } => Declaration::Namespace(Namespace {
                doc: None,
                name: name.upper_camel.to_string(),
                members: services
                    .into_iter()
                    .map(|service| service_block(service, config, availability))
                    .collect(),
            }),
            TopLevelEntry::Standalone(service) => service_block(service, config, availability),
        })
        .collect()
}

fn service_block(
    service: &ServiceDescriptor,
    config: &GeneratorConfig,
    availability: bool,
) -> Declaration {
    let mut members = vec![
        Declaration::Constant(Constant {
            doc: None,
            is_static: true,
            name: "descriptor".into(),
            type_annotation: None,
            value: ConstantValue::Inline(format!(
                "GRPCCore.ServiceDescriptor(fullyQualifiedService: \"{}\")",
                service.fully_qualified()
            )),
        }),
        method_namespace(service, config),
    ];
    if config.server {
        members.push(capability_alias(
            "StreamingServiceProtocol",
            streaming_protocol_name(service),
            availability,
        ));
        members.push(capability_alias(
            "ServiceProtocol",
            service_protocol_name(service),
            availability,
        ));
    }
    if config.client {
        members.push(capability_alias(
            "ClientProtocol",
            client_protocol_name(service),
            availability,
        ));
        members.push(capability_alias(
            "Client",
            client_struct_name(service),
            availability,
        ));
    }
    Declaration::Namespace(Namespace {
        doc: doc_opt(&service.doc),
        name: service.name.upper_camel.to_string(),
        members,
    })
}

fn capability_alias(name: &str, target: String, availability: bool) -> Declaration {
    Declaration::TypeAlias(TypeAlias {
        doc: None,
        availability,
        name: name.into(),
        target,
    })
}

fn method_namespace(service: &ServiceDescriptor, config: &GeneratorConfig) -> Declaration {
    let mut members: Vec<Declaration> = service
        .methods
        .iter()
        .map(|method| method_block(service, method, config))
        .collect();
    let items: Vec<String> = service
        .methods
        .iter()
        .map(|method| format!("{}.descriptor", method.name.upper_camel))
        .collect();
    members.push(Declaration::Constant(Constant {
        doc: None,
        is_static: true,
        name: "descriptors".into(),
        type_annotation: Some("[GRPCCore.MethodDescriptor]".into()),
        value: ConstantValue::List(items),
    }));
    Declaration::Namespace(Namespace {
        doc: None,
        name: "Method".into(),
        members,
    })
}

fn method_block(
    service: &ServiceDescriptor,
    method: &MethodDescriptor,
    config: &GeneratorConfig,
) -> Declaration {
    Declaration::Namespace(Namespace {
        doc: doc_opt(&method.doc),
        name: method.name.upper_camel.to_string(),
        members: vec![
            Declaration::TypeAlias(TypeAlias {
                doc: None,
                availability: false,
                name: "Input".into(),
                target: config.remap_type(&method.input_type),
            }),
            Declaration::TypeAlias(TypeAlias {
                doc: None,
                availability: false,
                name: "Output".into(),
                target: config.remap_type(&method.output_type),
            }),
            Declaration::Constant(Constant {
                doc: None,
                is_static: true,
                name: "descriptor".into(),
                type_annotation: None,
                value: ConstantValue::Inline(format!(
                    "GRPCCore.MethodDescriptor(service: \"{}\", method: \"{}\")",
                    service.fully_qualified(),
                    method.name.base
                )),
            }),
        ],
    })
}

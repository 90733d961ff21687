//! Request → IR translators.
//!
//! Each translator maps the validated request to a list of declarations; the
//! pipeline concatenates them in fixed order (aliases, then server, then
//! client) and hands the result to the renderer.

pub(crate) mod aliases;
pub(crate) mod client;
pub(crate) mod server;

use quill_schema::{CodeGenerationRequest, ConcurrencyRequirement, Name, ServiceDescriptor};

/// A namespace block or a standalone no-namespace service.
///
/// Entries appear in the order their first representative appears in the
/// request; within a namespace entry, services sort alphabetically by
/// generated-upper-case name.
pub(crate) enum TopLevelEntry<'a> {
    Namespace {
        name: &'a Name,
        services: Vec<&'a ServiceDescriptor>,
    },
    Standalone(&'a ServiceDescriptor),
}

pub(crate) fn top_level_entries(request: &CodeGenerationRequest) -> Vec<TopLevelEntry<'_>> {
    let mut entries: Vec<TopLevelEntry<'_>> = Vec::new();
    for service in &request.services {
        if service.namespace.is_empty() {
            entries.push(TopLevelEntry::Standalone(service));
            continue;
        }
        let existing = entries.iter_mut().find(|entry| match entry {
            TopLevelEntry::Namespace { name, .. } => {
                name.upper_camel == service.namespace.upper_camel
            }
            TopLevelEntry::Standalone(_) => false,
        });
        match existing {
            Some(TopLevelEntry::Namespace { services, .. }) => services.push(service),
            _ => entries.push(TopLevelEntry::Namespace {
                name: &service.namespace,
                services: vec![service],
            }),
        }
    }
    for entry in &mut entries {
        if let TopLevelEntry::Namespace { services, .. } = entry {
            services.sort_by(|a, b| a.name.upper_camel.cmp(&b.name.upper_camel));
        }
    }
    entries
}

/// Services in rendered order: entries first-seen, namespace members
/// alphabetical. The server and client translators iterate this.
pub(crate) fn ordered_services(request: &CodeGenerationRequest) -> Vec<&ServiceDescriptor> {
    let mut services = Vec::with_capacity(request.services.len());
    for entry in top_level_entries(request) {
        match entry {
            TopLevelEntry::Namespace { services: group, .. } => services.extend(group),
            TopLevelEntry::Standalone(service) => services.push(service),
        }
    }
    services
}

/// Whether the request's dependency model asks for minimum-platform
/// availability gating on runtime-facing declarations.
pub(crate) fn availability_gated(request: &CodeGenerationRequest) -> bool {
    request
        .dependencies
        .iter()
        .any(|dependency| dependency.concurrency != ConcurrencyRequirement::NotRequired)
}

pub(crate) fn streaming_protocol_name(service: &ServiceDescriptor) -> String {
    format!("{}_StreamingServiceProtocol", service.namespaced_prefix())
}

pub(crate) fn service_protocol_name(service: &ServiceDescriptor) -> String {
    format!("{}_ServiceProtocol", service.namespaced_prefix())
}

pub(crate) fn client_protocol_name(service: &ServiceDescriptor) -> String {
    format!("{}_ClientProtocol", service.namespaced_prefix())
}

pub(crate) fn client_struct_name(service: &ServiceDescriptor) -> String {
    format!("{}_Client", service.namespaced_prefix())
}

/// Canonical serializer expression for a message type.
pub(crate) fn serializer_expr(type_name: &str) -> String {
    format!("GRPCProtobuf.ProtobufSerializer<{type_name}>()")
}

/// Canonical deserializer expression for a message type.
pub(crate) fn deserializer_expr(type_name: &str) -> String {
    format!("GRPCProtobuf.ProtobufDeserializer<{type_name}>()")
}

/// Schema docs are plain strings with empty meaning "none".
pub(crate) fn doc_opt(doc: &str) -> Option<String> {
    if doc.is_empty() {
        None
    } else {
        Some(doc.to_string())
    }
}

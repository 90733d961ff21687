//! Eager request validation.
//!
//! All checks run before any IR is built; the first failure aborts the call.
//! Rules, in order: service pair uniqueness, no-namespace vs namespace
//! nominal-type collisions, per-group service-name uniqueness, per-service
//! method-name uniqueness in all three casings, import-item kind
//! recognition.

use std::collections::{HashMap, HashSet};

use quill_schema::{CodeGenerationRequest, ServiceDescriptor};

use crate::error::CodeGenError;

pub(crate) fn validate(request: &CodeGenerationRequest) -> Result<(), CodeGenError> {
    let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
    for service in &request.services {
        let pair = (
            service.namespace.base.as_ref(),
            service.name.base.as_ref(),
        );
        if !seen_pairs.insert(pair) {
            return Err(CodeGenError::DuplicateService {
                fully_qualified: service.fully_qualified(),
            });
        }
    }

    // A no-namespace service becomes a top-level nominal type, same level as
    // the namespace blocks.
    let namespaces: HashSet<&str> = request
        .services
        .iter()
        .filter(|service| !service.namespace.is_empty())
        .map(|service| service.namespace.upper_camel.as_ref())
        .collect();
    for service in &request.services {
        if service.namespace.is_empty() && namespaces.contains(service.name.upper_camel.as_ref()) {
            return Err(CodeGenError::NominalTypeCollision {
                type_name: service.name.upper_camel.to_string(),
                context: format!(
                    "no-namespace service {} collides with a namespace of the same generated name",
                    service.name.base
                ),
            });
        }
    }

    let mut groups: HashMap<&str, HashSet<&str>> = HashMap::new();
    for service in &request.services {
        let group = groups
            .entry(service.namespace.upper_camel.as_ref())
            .or_default();
        if !group.insert(service.name.upper_camel.as_ref()) {
            let context = if service.namespace.is_empty() {
                "two services without a namespace".to_string()
            } else {
                format!("two services in namespace {}", service.namespace.base)
            };
            return Err(CodeGenError::NominalTypeCollision {
                type_name: service.name.upper_camel.to_string(),
                context,
            });
        }
    }

    for service in &request.services {
        validate_method_names(service)?;
    }

    for dependency in &request.dependencies {
        if let Some(item) = &dependency.item
            && !item.kind.is_recognized()
        {
            return Err(CodeGenError::UnknownImportItemKind {
                module: dependency.module.to_string(),
                kind: item.kind.as_str().to_string(),
            });
        }
    }

    Ok(())
}

fn validate_method_names(service: &ServiceDescriptor) -> Result<(), CodeGenError> {
    let mut base: HashSet<&str> = HashSet::new();
    let mut upper: HashSet<&str> = HashSet::new();
    let mut lower: HashSet<&str> = HashSet::new();
    for method in &service.methods {
        if !base.insert(method.name.base.as_ref()) {
            return Err(duplicate_method(service, "base", &method.name.base));
        }
        if !upper.insert(method.name.upper_camel.as_ref()) {
            return Err(duplicate_method(
                service,
                "generated-upper-case",
                &method.name.upper_camel,
            ));
        }
        if !lower.insert(method.name.lower_camel.as_ref()) {
            return Err(duplicate_method(
                service,
                "generated-lower-case",
                &method.name.lower_camel,
            ));
        }
    }
    Ok(())
}

fn duplicate_method(
    service: &ServiceDescriptor,
    casing: &'static str,
    method: &str,
) -> CodeGenError {
    CodeGenError::DuplicateMethodName {
        service: service.fully_qualified(),
        casing,
        method: method.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use quill_schema::{
        Dependency, ImportItem, ItemKind, MethodDescriptor, Name, ServiceDescriptor,
    };

    use super::*;
    use crate::error::ErrorCode;

    fn method(name: Name) -> MethodDescriptor {
        MethodDescriptor {
            doc: "".into(),
            name,
            input_streaming: false,
            output_streaming: false,
            input_type: "In".into(),
            output_type: "Out".into(),
        }
    }

    fn service(namespace: &'static str, name: &'static str) -> ServiceDescriptor {
        ServiceDescriptor {
            doc: "".into(),
            name: Name::derived(name),
            namespace: if namespace.is_empty() {
                Name::EMPTY
            } else {
                Name::derived(namespace)
            },
            methods: vec![],
        }
    }

    fn request(services: Vec<ServiceDescriptor>) -> CodeGenerationRequest {
        CodeGenerationRequest {
            leading_trivia: "".into(),
            file_name: "test.proto".into(),
            dependencies: vec![],
            services,
        }
    }

    #[test]
    fn accepts_distinct_services() {
        let req = request(vec![
            service("helloworld", "Greeter"),
            service("helloworld", "Farewell"),
            service("", "Echo"),
        ]);
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn rejects_duplicate_service_pair() {
        let req = request(vec![
            service("helloworld", "Greeter"),
            service("helloworld", "Greeter"),
        ]);
        let err = validate(&req).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateServiceDescriptor);
        assert!(err.to_string().contains("helloworld.Greeter"));
    }

    #[test]
    fn same_name_in_different_namespaces_is_fine() {
        let req = request(vec![service("alpha", "Greeter"), service("beta", "Greeter")]);
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn rejects_service_colliding_with_namespace() {
        let req = request(vec![
            service("helloworld", "Greeter"),
            service("", "Helloworld"),
        ]);
        let err = validate(&req).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NominalTypeCollision);

        // Renaming the no-namespace service resolves it.
        let req = request(vec![
            service("helloworld", "Greeter"),
            service("", "Helloword"),
        ]);
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn rejects_upper_collision_within_namespace() {
        // Distinct bases, identical generated-upper-case names.
        let a = service("helloworld", "say_hello");
        let b = service("helloworld", "SayHello");
        let err = validate(&request(vec![a, b])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NominalTypeCollision);
    }

    #[test]
    fn rejects_duplicate_method_casings() {
        let mut svc = service("", "Greeter");
        svc.methods = vec![
            method(Name::derived("say_hello")),
            method(Name::derived("sayHello")),
        ];
        let err = validate(&request(vec![svc])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateMethodName);
        assert!(err.to_string().contains("generated-upper-case"));
    }

    #[test]
    fn rejects_unknown_import_item_kind() {
        let mut req = request(vec![service("", "Greeter")]);
        req.dependencies.push(Dependency {
            module: "Foundation".into(),
            item: Some(ImportItem {
                kind: ItemKind::new("actor"),
                name: "Clock".into(),
            }),
            spi: None,
            concurrency: Default::default(),
        });
        let err = validate(&req).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownImportItemKind);
        assert!(err.to_string().contains("actor"));
    }
}

//! Descriptor decoding.
//!
//! Walks serialized `FileDescriptorProto` blobs into the pipeline's
//! [`DescriptorSet`] model. The walk is deliberately manual rather than going
//! through a descriptor pool: reflection servers are free to omit transitive
//! imports from a `file_containing_symbol` reply, and a pool would reject
//! such a reply outright. Declaration order is preserved throughout.

use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};

use protoscout_common::descriptor::{
    simple_name, DescriptorSet, FieldDescriptor, MessageDescriptor, MethodDescriptor,
    ServiceDescriptor,
};
use protoscout_common::{ProtoscoutError, Result};

/// Decodes every blob of a `FileDescriptorResponse` into one [`DescriptorSet`].
pub fn decode_file_descriptors(endpoint: &str, blobs: &[Vec<u8>]) -> Result<DescriptorSet> {
    let mut set = DescriptorSet::default();
    for blob in blobs {
        let file = FileDescriptorProto::decode(blob.as_slice()).map_err(|e| {
            ProtoscoutError::EndpointUnavailable(format!(
                "{}: undecodable file descriptor in reflection reply: {}",
                endpoint, e
            ))
        })?;
        collect_file(&file, &mut set);
    }
    Ok(set)
}

fn collect_file(file: &FileDescriptorProto, set: &mut DescriptorSet) {
    let package = file.package();

    for service in &file.service {
        let methods = service
            .method
            .iter()
            .map(|method| MethodDescriptor {
                name: method.name().to_string(),
                request_type: strip_leading_dot(method.input_type()).to_string(),
                response_type: strip_leading_dot(method.output_type()).to_string(),
                request_streaming: method.client_streaming(),
                response_streaming: method.server_streaming(),
            })
            .collect();

        set.push_service(ServiceDescriptor {
            name: scoped(package, service.name()),
            methods,
        });
    }

    for message in &file.message_type {
        collect_message(package, message, set);
    }
}

fn collect_message(scope: &str, message: &DescriptorProto, set: &mut DescriptorSet) {
    let full_name = scoped(scope, message.name());

    let fields = message.field.iter().map(field_descriptor).collect();
    set.push_message(MessageDescriptor {
        name: full_name.clone(),
        fields,
    });

    for nested in &message.nested_type {
        // Synthetic map entries can never be a method's request or response
        // type, so they have no place in the set.
        let is_map_entry = nested
            .options
            .as_ref()
            .map(|options| options.map_entry())
            .unwrap_or(false);
        if !is_map_entry {
            collect_message(&full_name, nested, set);
        }
    }
}

fn field_descriptor(field: &FieldDescriptorProto) -> FieldDescriptor {
    FieldDescriptor {
        name: field.name().to_string(),
        type_name: field_type_name(field),
        number: field.number(),
        repeated: field.label() == Label::Repeated,
    }
}

fn field_type_name(field: &FieldDescriptorProto) -> String {
    match field.r#type() {
        Type::Message | Type::Enum | Type::Group => {
            simple_name(strip_leading_dot(field.type_name())).to_string()
        }
        Type::Double => "double".to_string(),
        Type::Float => "float".to_string(),
        Type::Int64 => "int64".to_string(),
        Type::Uint64 => "uint64".to_string(),
        Type::Int32 => "int32".to_string(),
        Type::Fixed64 => "fixed64".to_string(),
        Type::Fixed32 => "fixed32".to_string(),
        Type::Bool => "bool".to_string(),
        Type::String => "string".to_string(),
        Type::Bytes => "bytes".to_string(),
        Type::Uint32 => "uint32".to_string(),
        Type::Sfixed32 => "sfixed32".to_string(),
        Type::Sfixed64 => "sfixed64".to_string(),
        Type::Sint32 => "sint32".to_string(),
        Type::Sint64 => "sint64".to_string(),
    }
}

fn strip_leading_dot(type_name: &str) -> &str {
    type_name.strip_prefix('.').unwrap_or(type_name)
}

fn scoped(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

    fn balance_file() -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("cosmos/bank/v1beta1/query.proto".to_string()),
            package: Some("cosmos.bank.v1beta1".to_string()),
            service: vec![ServiceDescriptorProto {
                name: Some("Query".to_string()),
                method: vec![
                    MethodDescriptorProto {
                        name: Some("Balance".to_string()),
                        input_type: Some(".cosmos.bank.v1beta1.QueryBalanceRequest".to_string()),
                        output_type: Some(".cosmos.bank.v1beta1.QueryBalanceResponse".to_string()),
                        ..Default::default()
                    },
                    MethodDescriptorProto {
                        name: Some("Watch".to_string()),
                        input_type: Some(".cosmos.bank.v1beta1.WatchRequest".to_string()),
                        output_type: Some(".cosmos.bank.v1beta1.WatchResponse".to_string()),
                        client_streaming: Some(true),
                        server_streaming: Some(true),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            message_type: vec![DescriptorProto {
                name: Some("QueryBalanceRequest".to_string()),
                field: vec![
                    FieldDescriptorProto {
                        name: Some("address".to_string()),
                        number: Some(1),
                        r#type: Some(Type::String as i32),
                        ..Default::default()
                    },
                    FieldDescriptorProto {
                        name: Some("denoms".to_string()),
                        number: Some(2),
                        label: Some(Label::Repeated as i32),
                        r#type: Some(Type::String as i32),
                        ..Default::default()
                    },
                    FieldDescriptorProto {
                        name: Some("pagination".to_string()),
                        number: Some(3),
                        r#type: Some(Type::Message as i32),
                        type_name: Some(".cosmos.base.query.v1beta1.PageRequest".to_string()),
                        ..Default::default()
                    },
                ],
                nested_type: vec![DescriptorProto {
                    name: Some("Meta".to_string()),
                    field: vec![FieldDescriptorProto {
                        name: Some("height".to_string()),
                        number: Some(1),
                        r#type: Some(Type::Int64 as i32),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn decode(file: &FileDescriptorProto) -> DescriptorSet {
        decode_file_descriptors("test:9090", &[file.encode_to_vec()]).unwrap()
    }

    #[test]
    fn test_services_are_package_qualified() {
        let set = decode(&balance_file());
        let service = set.service("cosmos.bank.v1beta1.Query").unwrap();
        assert_eq!(service.methods.len(), 2);
        assert_eq!(service.methods[0].name, "Balance");
        assert_eq!(
            service.methods[0].request_type,
            "cosmos.bank.v1beta1.QueryBalanceRequest"
        );
        assert!(!service.methods[0].request_streaming);
        assert!(service.methods[1].request_streaming);
        assert!(service.methods[1].response_streaming);
    }

    #[test]
    fn test_fields_keep_declared_order_and_types() {
        let set = decode(&balance_file());
        let message = set.message("cosmos.bank.v1beta1.QueryBalanceRequest").unwrap();

        assert_eq!(message.fields.len(), 3);
        assert_eq!(message.fields[0].name, "address");
        assert_eq!(message.fields[0].type_name, "string");
        assert_eq!(message.fields[0].number, 1);
        assert!(!message.fields[0].repeated);

        assert!(message.fields[1].repeated);

        // message-typed field renders its simple name
        assert_eq!(message.fields[2].type_name, "PageRequest");
    }

    #[test]
    fn test_nested_messages_are_scoped_under_their_parent() {
        let set = decode(&balance_file());
        let nested = set
            .message("cosmos.bank.v1beta1.QueryBalanceRequest.Meta")
            .unwrap();
        assert_eq!(nested.fields[0].type_name, "int64");
    }

    #[test]
    fn test_map_entries_are_skipped() {
        let mut file = balance_file();
        file.message_type[0].nested_type.push(DescriptorProto {
            name: Some("BalancesEntry".to_string()),
            options: Some(prost_types::MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });

        let set = decode(&file);
        assert!(set
            .message("cosmos.bank.v1beta1.QueryBalanceRequest.BalancesEntry")
            .is_none());
    }

    #[test]
    fn test_undecodable_blob_is_endpoint_unavailable() {
        let err = decode_file_descriptors("test:9090", &[vec![0xff, 0xff, 0xff]]).unwrap_err();
        assert!(matches!(err, ProtoscoutError::EndpointUnavailable(_)));
    }

    #[test]
    fn test_empty_package_services_are_unqualified() {
        let file = FileDescriptorProto {
            name: Some("standalone.proto".to_string()),
            service: vec![ServiceDescriptorProto {
                name: Some("Health".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let set = decode(&file);
        assert!(set.service("Health").is_some());
    }
}

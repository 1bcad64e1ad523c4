//! Descriptor rendering.
//!
//! Converts service and message descriptors into deterministic proto
//! snippets. Method and field order come straight from declaration order;
//! referenced message types render in first-seen order across the service's
//! methods. Output is byte-for-byte reproducible for a given descriptor set.

use tracing::debug;

use protoscout_common::descriptor::{simple_name, DescriptorSet, MessageDescriptor, ServiceDescriptor};
use protoscout_common::{ProtoscoutError, Result};

/// What to do with a referenced message type that has no resolvable
/// descriptor or no fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTypePolicy {
    /// Log and omit the block. Keeps output flowing when well-known or
    /// external types are referenced.
    #[default]
    Skip,
    /// Raise [`ProtoscoutError::MissingDescriptor`].
    Fail,
}

/// Renders the `service <Name> { ... }` block, one `rpc` line per method in
/// declaration order.
pub fn render_service(service: &ServiceDescriptor) -> String {
    let mut out = String::new();
    out.push_str(&format!("service {} {{\n", service.simple_name()));
    for method in &service.methods {
        out.push_str(&format!(
            "  rpc {} ({}) returns ({});\n",
            method.name,
            rpc_type(&method.request_type, method.request_streaming),
            rpc_type(&method.response_type, method.response_streaming),
        ));
    }
    out.push_str("}\n");
    out
}

fn rpc_type(type_name: &str, streaming: bool) -> String {
    let name = simple_name(type_name);
    if streaming {
        format!("stream {}", name)
    } else {
        name.to_string()
    }
}

/// Renders one `message <Name> { ... }` block per distinct referenced
/// request/response type, in first-seen order. Returns an empty string when
/// nothing renders.
pub fn render_messages(
    service: &ServiceDescriptor,
    set: &DescriptorSet,
    policy: MissingTypePolicy,
) -> Result<String> {
    let mut out = String::new();

    for type_name in service.referenced_message_types() {
        match set.message(&type_name) {
            Some(message) if !message.fields.is_empty() => {
                if !out.is_empty() {
                    out.push('\n');
                }
                render_message(&mut out, message);
            }
            resolved => match policy {
                MissingTypePolicy::Skip => {
                    let reason = if resolved.is_some() { "no fields" } else { "no descriptor" };
                    debug!("Skipping message type {} ({})", type_name, reason);
                }
                MissingTypePolicy::Fail => {
                    return Err(ProtoscoutError::MissingDescriptor(type_name));
                }
            },
        }
    }

    Ok(out)
}

fn render_message(out: &mut String, message: &MessageDescriptor) {
    out.push_str(&format!("message {} {{\n", simple_name(&message.name)));
    for field in &message.fields {
        let repeated = if field.repeated { "repeated " } else { "" };
        out.push_str(&format!(
            "  {}{} {} = {};\n",
            repeated, field.type_name, field.name, field.number
        ));
    }
    out.push_str("}\n");
}

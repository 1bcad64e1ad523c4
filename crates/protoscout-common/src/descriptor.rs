//! Descriptor value types.
//!
//! The reflection collaborator produces loosely-shaped descriptor data on the
//! wire; this module pins the contract down to explicit value types so the
//! pipeline and renderer never depend on protobuf runtime types. Iteration
//! order everywhere equals declaration order as reported by the server.

/// Reflection-introspection services live under this prefix (both the v1 and
/// v1alpha variants) and are excluded from enumeration and rendering.
pub const REFLECTION_SERVICE_PREFIX: &str = "grpc.reflection.";

/// Last dot-separated component of a fully-qualified name.
pub fn simple_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    /// Fully-qualified request type name.
    pub request_type: String,
    /// Fully-qualified response type name.
    pub response_type: String,
    pub request_streaming: bool,
    pub response_streaming: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Fully-qualified service name, e.g. `cosmos.bank.v1beta1.Query`.
    pub name: String,
    /// Methods in declaration order.
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Deduplicated union of all request/response types, in first-seen order
    /// across the methods. Never re-sorted.
    pub fn referenced_message_types(&self) -> Vec<String> {
        let mut seen = OrderedSet::new();
        for method in &self.methods {
            seen.insert(&method.request_type);
            seen.insert(&method.response_type);
        }
        seen.into_vec()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Textual type name: a scalar keyword or the simple name of a
    /// message/enum type.
    pub type_name: String,
    pub number: i32,
    pub repeated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    /// Fully-qualified message name.
    pub name: String,
    /// Fields in declared order.
    pub fields: Vec<FieldDescriptor>,
}

/// Everything resolvable from one `file_containing_symbol` response: the
/// services and messages of the returned file descriptors, keyed by
/// fully-qualified name.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSet {
    services: Vec<ServiceDescriptor>,
    messages: Vec<MessageDescriptor>,
}

impl DescriptorSet {
    pub fn push_service(&mut self, service: ServiceDescriptor) {
        self.services.push(service);
    }

    pub fn push_message(&mut self, message: MessageDescriptor) {
        self.messages.push(message);
    }

    pub fn service(&self, full_name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.name == full_name)
    }

    pub fn message(&self, full_name: &str) -> Option<&MessageDescriptor> {
        self.messages.iter().find(|m| m.name == full_name)
    }

    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn messages(&self) -> &[MessageDescriptor] {
        &self.messages
    }
}

/// String set that remembers insertion order.
///
/// Rendering order must be derived from first-seen order, so deduplication
/// cannot go through a hash set's iteration order.
#[derive(Debug, Default)]
pub struct OrderedSet {
    items: Vec<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the value unless already present. Returns true when inserted.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.items.iter().any(|item| item == value) {
            return false;
        }
        self.items.push(value.to_string());
        true
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, request: &str, response: &str) -> MethodDescriptor {
        MethodDescriptor {
            name: name.to_string(),
            request_type: request.to_string(),
            response_type: response.to_string(),
            request_streaming: false,
            response_streaming: false,
        }
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("cosmos.bank.v1beta1.Query"), "Query");
        assert_eq!(simple_name("Query"), "Query");
        assert_eq!(simple_name(""), "");
    }

    #[test]
    fn test_referenced_types_first_seen_order() {
        let service = ServiceDescriptor {
            name: "pkg.Query".to_string(),
            methods: vec![
                method("Balance", "pkg.BalanceRequest", "pkg.BalanceResponse"),
                method("AllBalances", "pkg.BalanceRequest", "pkg.AllBalancesResponse"),
            ],
        };

        assert_eq!(
            service.referenced_message_types(),
            vec![
                "pkg.BalanceRequest".to_string(),
                "pkg.BalanceResponse".to_string(),
                "pkg.AllBalancesResponse".to_string(),
            ]
        );
    }

    #[test]
    fn test_ordered_set_rejects_duplicates() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert_eq!(set.into_vec(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_descriptor_set_lookup() {
        let mut set = DescriptorSet::default();
        set.push_service(ServiceDescriptor {
            name: "pkg.Query".to_string(),
            methods: vec![],
        });
        set.push_message(MessageDescriptor {
            name: "pkg.BalanceRequest".to_string(),
            fields: vec![],
        });

        assert!(set.service("pkg.Query").is_some());
        assert!(set.service("pkg.Other").is_none());
        assert!(set.message("pkg.BalanceRequest").is_some());
        assert!(set.message("pkg.Missing").is_none());
    }
}

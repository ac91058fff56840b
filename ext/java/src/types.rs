//! A table-backed [`TypeOracle`] for hosts (and tests) without a compiler
//!
//! Types are declared by fully-qualified name together with their direct
//! supertypes; nodes are then tagged with a type and call sites with the
//! method they resolve to. Subtyping is the reflexive transitive closure of
//! the declared supertype edges.

use crate::NodeId;
use arbor::{ConstValue, MethodKind, MethodSymbol, TypeHandle, TypeOracle};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Type information kept in plain tables.
///
/// ```
/// use arbor::TypeOracle;
/// use arbor_java::SimpleTypes;
///
/// let mut types = SimpleTypes::new();
/// let list = types.declare_subtype("java.util.ArrayList", &["java.util.List"]);
/// let iface = types.declare("java.util.List");
/// assert!(types.is_subtype(list, iface));
/// assert!(!types.is_subtype(iface, list));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimpleTypes {
    names: HashMap<String, TypeHandle>,
    declared: Vec<String>,
    supertypes: HashMap<TypeHandle, Vec<TypeHandle>>,
    nodes: HashMap<NodeId, TypeHandle>,
    constants: HashMap<NodeId, ConstValue>,
    methods: HashMap<NodeId, MethodSymbol>,
}

impl SimpleTypes {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name`, returning its handle. Declaring twice is a no-op.
    pub fn declare(&mut self, name: &str) -> TypeHandle {
        if let Some(&handle) = self.names.get(name) {
            return handle;
        }
        let handle = TypeHandle(self.declared.len() as u32);
        self.names.insert(name.to_owned(), handle);
        self.declared.push(name.to_owned());
        handle
    }

    /// Declare `name` with direct supertypes (declared on demand).
    pub fn declare_subtype(&mut self, name: &str, supertypes: &[&str]) -> TypeHandle {
        let handle = self.declare(name);
        for &sup in supertypes {
            let sup = self.declare(sup);
            let edges = self.supertypes.entry(handle).or_default();
            if !edges.contains(&sup) {
                edges.push(sup);
            }
        }
        handle
    }

    /// Tag `node` with type `name` (declared on demand).
    pub fn set_type(&mut self, node: NodeId, name: &str) -> TypeHandle {
        let handle = self.declare(name);
        self.nodes.insert(node, handle);
        handle
    }

    /// Record the compile-time constant value of `node`.
    pub fn set_constant(&mut self, node: NodeId, value: ConstValue) {
        self.constants.insert(node, value);
    }

    /// Resolve the call site `node` to `owner.name(parameters)`; types are
    /// declared on demand.
    pub fn set_method(
        &mut self,
        node: NodeId,
        owner: &str,
        name: &str,
        kind: MethodKind,
        parameters: &[&str],
    ) {
        let symbol = MethodSymbol {
            owner: self.declare(owner),
            name: Arc::from(name),
            kind,
            parameters: parameters.iter().map(|p| self.declare(p)).collect(),
        };
        self.methods.insert(node, symbol);
    }
}

impl TypeOracle<NodeId> for SimpleTypes {
    fn type_of(&self, node: NodeId) -> Option<TypeHandle> {
        self.nodes.get(&node).copied()
    }

    fn resolve(&self, name: &str) -> Option<TypeHandle> {
        self.names.get(name).copied()
    }

    fn is_subtype(&self, sub: TypeHandle, sup: TypeHandle) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![sub];
        while let Some(ty) = pending.pop() {
            if ty == sup {
                return true;
            }
            if seen.insert(ty) {
                pending.extend(self.supertypes.get(&ty).into_iter().flatten().copied());
            }
        }
        false
    }

    fn constant_value(&self, node: NodeId) -> Option<ConstValue> {
        self.constants.get(&node).cloned()
    }

    fn type_name(&self, ty: TypeHandle) -> Option<&str> {
        self.declared.get(ty.0 as usize).map(String::as_str)
    }

    fn method_symbol(&self, node: NodeId) -> Option<&MethodSymbol> {
        self.methods.get(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_is_idempotent() {
        let mut types = SimpleTypes::new();
        let a = types.declare("java.lang.String");
        assert_eq!(types.declare("java.lang.String"), a);
        assert_eq!(types.resolve("java.lang.String"), Some(a));
        assert_eq!(types.resolve("java.lang.Object"), None);
    }

    #[test]
    fn subtyping_is_reflexive_and_transitive() {
        let mut types = SimpleTypes::new();
        let array_list = types.declare_subtype("java.util.ArrayList", &["java.util.AbstractList"]);
        types.declare_subtype("java.util.AbstractList", &["java.util.List", "java.lang.Object"]);
        let list = types.declare("java.util.List");

        assert!(types.is_subtype(array_list, array_list));
        assert!(types.is_subtype(array_list, list));
        assert!(!types.is_subtype(list, array_list));
    }

    #[test]
    fn cyclic_declarations_terminate() {
        let mut types = SimpleTypes::new();
        let a = types.declare_subtype("A", &["B"]);
        types.declare_subtype("B", &["A"]);
        let c = types.declare("C");
        assert!(!types.is_subtype(a, c));
    }

    #[test]
    fn node_types_and_constants() {
        let mut types = SimpleTypes::new();
        let node = NodeId::from_index(3);
        let string = types.set_type(node, "java.lang.String");
        types.set_constant(node, ConstValue::Str("hi".into()));

        assert_eq!(types.type_of(node), Some(string));
        assert_eq!(types.type_of(NodeId::from_index(4)), None);
        assert_eq!(types.constant_value(node), Some(ConstValue::Str("hi".into())));
    }

    #[test]
    fn type_names_round_trip_through_handles() {
        let mut types = SimpleTypes::new();
        let int = types.declare("int");
        let array = types.declare("java.lang.String[]");
        assert_eq!(types.type_name(int), Some("int"));
        assert_eq!(types.type_name(array), Some("java.lang.String[]"));
        assert_eq!(types.type_name(TypeHandle(9)), None);
    }

    #[test]
    fn call_sites_resolve_to_method_symbols() {
        let mut types = SimpleTypes::new();
        let call = NodeId::from_index(2);
        let object = ["java.lang.Object"];
        types.set_method(call, "java.util.List", "add", MethodKind::Instance, &object);

        let symbol = types.method_symbol(call).unwrap();
        assert_eq!(&*symbol.name, "add");
        assert_eq!(types.type_name(symbol.owner), Some("java.util.List"));
        assert_eq!(symbol.parameters, vec![types.resolve("java.lang.Object").unwrap()]);
        assert!(!symbol.is_static());
        assert!(types.method_symbol(NodeId::from_index(3)).is_none());
    }
}

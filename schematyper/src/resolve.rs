//! Type resolution: schema nodes to named type definitions.
//!
//! Nodes are resolved depth-first. A `$ref` to a path that has no type yet
//! defers the referring node (and every node enclosing it) instead of failing;
//! [`Resolver::drain`] retries deferred nodes until none are left, and reports
//! the reference cycle or dangling reference that blocks them when a pass
//! stops making progress.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::error::SchemaTyperError;
use crate::graph::DependencyGraph;
use crate::inflect::singularize;
use crate::json_pointer::{self, ROOT};
use crate::model::{FieldDef, Generation, Primitive, TypeDef, TypeExpr, TypeKind};
use crate::naming::IdentifierSynthesizer;
use crate::schema::{Items, JsonType, SchemaNode, TypeSpec};
use crate::settings::GenerateSettings;

/// Name and nullability of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub nullable: bool,
}

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(TypeRef),
    /// Postponed until `waiting_on` has a type.
    Deferred { waiting_on: String },
}

/// Internal counterpart of [`Resolution`] for partial results.
enum Progress<T> {
    Done(T),
    Blocked(String),
}

/// Structural kind of a node, from `type` and `format`.
enum BaseKind {
    Primitive(Primitive),
    Array,
    Object,
}

/// Base kind and union nullability of a node.
fn base_kind(node: &SchemaNode) -> (BaseKind, bool) {
    let (json_type, nullable): (Option<JsonType>, bool) = match node.r#type {
        TypeSpec::Missing | TypeSpec::Unsupported => (None, false),
        TypeSpec::Single(t) => (Some(t), false),
        TypeSpec::NullableUnion(t) => (Some(t), true),
    };

    if node.format.as_deref() == Some("date-time") {
        return (BaseKind::Primitive(Primitive::Timestamp), nullable);
    }

    let kind: BaseKind = match json_type {
        Some(JsonType::String) => BaseKind::Primitive(Primitive::String),
        Some(JsonType::Integer) => BaseKind::Primitive(Primitive::Integer),
        Some(JsonType::Number) => BaseKind::Primitive(Primitive::Number),
        Some(JsonType::Boolean) => BaseKind::Primitive(Primitive::Boolean),
        Some(JsonType::Null) => BaseKind::Primitive(Primitive::Null),
        Some(JsonType::Array) => BaseKind::Array,
        Some(JsonType::Object) => BaseKind::Object,
        Some(JsonType::Unknown) | None => BaseKind::Primitive(Primitive::Any),
    };
    (kind, nullable)
}

/// True when a node with `properties` should become a record.
fn is_record(node: &SchemaNode) -> bool {
    !node.properties.is_empty() && !node.allows_additional_properties()
}

/// A node waiting for another path to get a type.
#[derive(Debug, Clone)]
struct DeferredEntry<'s> {
    node: &'s SchemaNode,
    name: String,
    description: Option<&'s str>,
    waiting_on: String,
}

/// Resolver context: the registry of generated types, the deferred queue,
/// and the stack of nodes currently being resolved.
pub struct Resolver<'s> {
    settings: &'s GenerateSettings,
    names: IdentifierSynthesizer,
    root_name: String,
    registry: BTreeMap<String, TypeDef>,
    /// `$ref` nodes that resolved to another path's type.
    aliases: BTreeMap<String, TypeRef>,
    deferred: IndexMap<String, DeferredEntry<'s>>,
    in_progress: Vec<(String, TypeRef)>,
    root_header: Option<TypeRef>,
}

impl<'s> Resolver<'s> {
    /// # Errors
    ///
    /// Returns `SchemaTyperError::EmptyIdentifier` if `root_name` has no
    /// usable characters.
    pub fn new(settings: &'s GenerateSettings, root_name: &str) -> Result<Self, SchemaTyperError> {
        let names = IdentifierSynthesizer::new()?;
        let root_name: String = names.synthesize(root_name, true).ok_or_else(|| {
            SchemaTyperError::EmptyIdentifier {
                raw: root_name.to_string(),
                path: ROOT.to_string(),
            }
        })?;
        Ok(Self {
            settings,
            names,
            root_name,
            registry: BTreeMap::new(),
            aliases: BTreeMap::new(),
            deferred: IndexMap::new(),
            in_progress: Vec::new(),
            root_header: None,
        })
    }

    /// Resolve a whole document: its definitions in document order, then the
    /// root, then everything deferred along the way.
    ///
    /// # Errors
    ///
    /// Naming errors, reference cycles, dangling references and type name
    /// collisions.
    pub fn resolve_document(mut self, document: &'s SchemaNode) -> Result<Generation, SchemaTyperError> {
        for (keyword, definitions) in [("definitions", &document.definitions), ("$defs", &document.defs)] {
            for (name, definition) in definitions {
                let path: String = json_pointer::format(ROOT, &[keyword, name.as_str()]);
                self.resolve(definition, name, definition.description(), &path)?;
            }
        }

        let root_name: String = self.root_name.clone();
        self.resolve(document, &root_name, document.description(), ROOT)?;
        self.drain()?;
        self.finish()
    }

    /// Resolve one node at `path`, proposing `name` when the node has no title.
    ///
    /// # Errors
    ///
    /// Returns `SchemaTyperError::EmptyIdentifier` when a type or field name
    /// can't be synthesized.
    pub fn resolve(
        &mut self,
        node: &'s SchemaNode,
        name: &str,
        description: Option<&'s str>,
        path: &str,
    ) -> Result<Resolution, SchemaTyperError> {
        if let Some(target) = node.reference() {
            return Ok(match self.lookup(target) {
                Some(found) => {
                    self.deferred.shift_remove(path);
                    self.aliases.insert(path.to_string(), found.clone());
                    Resolution::Resolved(found)
                }
                None => {
                    self.defer(node, name, description, path, target);
                    Resolution::Deferred {
                        waiting_on: target.to_string(),
                    }
                }
            });
        }

        let is_root: bool = path == ROOT;
        let origin_name: String = if is_root {
            self.root_name.clone()
        } else {
            node.title().unwrap_or(name).to_string()
        };
        let type_name: String = if is_root {
            self.root_name.clone()
        } else {
            self.type_name(&origin_name, path)?
        };

        let (kind, union_nullable) = base_kind(node);
        let header = TypeRef {
            name: type_name,
            nullable: is_root || union_nullable,
        };
        if is_root {
            self.root_header = Some(header.clone());
        }

        self.in_progress.push((path.to_string(), header.clone()));
        let shape: Result<Progress<TypeKind>, SchemaTyperError> =
            self.resolve_shape(node, kind, &origin_name, path);
        self.in_progress.pop();

        match shape? {
            Progress::Done(kind) => {
                trace!(path, name = %header.name, "registered type");
                self.deferred.shift_remove(path);
                self.registry.insert(
                    path.to_string(),
                    TypeDef {
                        name: header.name.clone(),
                        kind,
                        nullable: header.nullable,
                        description: node.description().or(description).map(str::to_string),
                        path: path.to_string(),
                        recursive: false,
                    },
                );
                Ok(Resolution::Resolved(header))
            }
            Progress::Blocked(target) => {
                self.defer(node, name, description, path, &target);
                Ok(Resolution::Deferred { waiting_on: target })
            }
        }
    }

    /// Retry deferred nodes until none are left.
    ///
    /// # Errors
    ///
    /// Returns `SchemaTyperError::ReferenceCycle` or
    /// `SchemaTyperError::UnresolvedReference` when a pass neither registers
    /// anything nor shrinks the queue, and any error from [`Resolver::resolve`].
    pub fn drain(&mut self) -> Result<(), SchemaTyperError> {
        let mut pass: usize = 0;
        while !self.deferred.is_empty() {
            pass += 1;
            let known_before: usize = self.registry.len() + self.aliases.len();
            let pending: Vec<String> = self.deferred.keys().cloned().collect();
            let pending_len: usize = pending.len();
            for path in pending {
                let Some(entry) = self.deferred.get(&path).cloned() else {
                    continue;
                };
                if let Resolution::Resolved(_) =
                    self.resolve(entry.node, &entry.name, entry.description, &path)?
                {
                    self.deferred.shift_remove(&path);
                }
            }
            debug!(pass, remaining = self.deferred.len(), "deferred pass finished");

            let registered_more: bool = self.registry.len() + self.aliases.len() > known_before;
            if !self.deferred.is_empty() && !registered_more && self.deferred.len() >= pending_len {
                return Err(self.stall_error());
            }
        }
        Ok(())
    }

    /// Number of nodes waiting in the deferred queue.
    #[must_use]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Check names, mark recursive fields and types, and order types by name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaTyperError::TypeNameCollision` when two paths produced
    /// the same type name.
    pub fn finish(self) -> Result<Generation, SchemaTyperError> {
        let mut by_name: BTreeMap<&str, &str> = BTreeMap::new();
        for (path, def) in &self.registry {
            if let Some(first) = by_name.insert(&def.name, path) {
                return Err(SchemaTyperError::TypeNameCollision {
                    name: def.name.clone(),
                    first: first.to_string(),
                    second: path.clone(),
                });
            }
        }

        // Records contain their direct fields; arrays and maps expand to
        // their element type.
        let mut containment = DependencyGraph::default();
        let mut expansion = DependencyGraph::default();
        for def in self.registry.values() {
            match &def.kind {
                TypeKind::Record(fields) => {
                    for target in fields.iter().filter_map(|f| f.type_expr.direct_name()) {
                        containment.add_edge(&def.name, target);
                    }
                }
                TypeKind::Array(element) | TypeKind::Map(element) => {
                    if let Some(target) = element.direct_name() {
                        expansion.add_edge(&def.name, target);
                    }
                }
                TypeKind::Alias(_) => {}
            }
        }

        let mut types: Vec<TypeDef> = self.registry.into_values().collect();
        for def in &mut types {
            let owner: String = def.name.clone();
            match &mut def.kind {
                TypeKind::Record(fields) => {
                    for field in fields.iter_mut() {
                        field.recursive = field
                            .type_expr
                            .direct_name()
                            .is_some_and(|target| containment.reaches(target, &owner));
                    }
                }
                TypeKind::Array(element) | TypeKind::Map(element) => {
                    def.recursive = element
                        .direct_name()
                        .is_some_and(|target| expansion.reaches(target, &owner));
                }
                TypeKind::Alias(_) => {}
            }
        }
        types.sort_by(|a, b| a.name.cmp(&b.name));

        let needs_timestamp: bool = types.iter().any(TypeDef::uses_timestamp);
        info!(types = types.len(), needs_timestamp, "resolution complete");
        Ok(Generation {
            types,
            needs_timestamp,
        })
    }

    fn resolve_shape(
        &mut self,
        node: &'s SchemaNode,
        kind: BaseKind,
        origin_name: &str,
        path: &str,
    ) -> Result<Progress<TypeKind>, SchemaTyperError> {
        Ok(match kind {
            BaseKind::Primitive(primitive) => Progress::Done(TypeKind::Alias(primitive)),
            BaseKind::Object if is_record(node) => match self.record_fields(node, path)? {
                Progress::Done(fields) => Progress::Done(TypeKind::Record(fields)),
                Progress::Blocked(target) => Progress::Blocked(target),
            },
            BaseKind::Object => match self.map_value(node, origin_name, node.description(), path)? {
                Progress::Done(value) => Progress::Done(TypeKind::Map(value)),
                Progress::Blocked(target) => Progress::Blocked(target),
            },
            BaseKind::Array => match self.array_element(node, origin_name, node.description(), path)? {
                Progress::Done(element) => Progress::Done(TypeKind::Array(element)),
                Progress::Blocked(target) => Progress::Blocked(target),
            },
        })
    }

    /// Fields of a record, sorted by name. Blocked as a whole if any field is.
    fn record_fields(
        &mut self,
        node: &'s SchemaNode,
        path: &str,
    ) -> Result<Progress<Vec<FieldDef>>, SchemaTyperError> {
        let mut fields: Vec<FieldDef> = Vec::with_capacity(node.properties.len());
        for (key, property) in &node.properties {
            let property_path: String = json_pointer::format(path, &["properties", key.as_str()]);
            let raw_name: &str = property.title().unwrap_or(key);
            let field_name: String = self.names.synthesize(raw_name, true).ok_or_else(|| {
                SchemaTyperError::EmptyIdentifier {
                    raw: raw_name.to_string(),
                    path: property_path.clone(),
                }
            })?;

            let (type_expr, nullable) =
                match self.field_type(property, key, &field_name, &property_path)? {
                    Progress::Done(resolved) => resolved,
                    Progress::Blocked(target) => {
                        debug!(path, field = %key, waiting_on = %target, "record blocked on field");
                        return Ok(Progress::Blocked(target));
                    }
                };

            fields.push(FieldDef {
                name: field_name,
                type_expr,
                nullable,
                property_name: key.clone(),
                required: node.is_required(key),
                recursive: false,
                description: property.description().map(str::to_string),
            });
        }
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Progress::Done(fields))
    }

    /// Type of one record field and whether it is nullable.
    fn field_type(
        &mut self,
        property: &'s SchemaNode,
        key: &str,
        field_name: &str,
        path: &str,
    ) -> Result<Progress<(TypeExpr, bool)>, SchemaTyperError> {
        if let Some(target) = property.reference() {
            return Ok(match self.lookup(target) {
                Some(found) => Progress::Done((TypeExpr::Named(found.name), found.nullable)),
                None => Progress::Blocked(target.to_string()),
            });
        }

        let (kind, nullable) = base_kind(property);
        let type_expr: TypeExpr = match kind {
            BaseKind::Primitive(primitive) => TypeExpr::Primitive(primitive),
            BaseKind::Object if is_record(property) => {
                match self.resolve(property, field_name, property.description(), path)? {
                    Resolution::Resolved(found) => TypeExpr::Named(found.name),
                    Resolution::Deferred { waiting_on } => return Ok(Progress::Blocked(waiting_on)),
                }
            }
            BaseKind::Object => match self.map_value(property, key, property.description(), path)? {
                Progress::Done(value) => TypeExpr::Map(Box::new(value)),
                Progress::Blocked(target) => return Ok(Progress::Blocked(target)),
            },
            BaseKind::Array => {
                match self.array_element(property, key, property.description(), path)? {
                    Progress::Done(element) => TypeExpr::Array(Box::new(element)),
                    Progress::Blocked(target) => return Ok(Progress::Blocked(target)),
                }
            }
        };
        Ok(Progress::Done((type_expr, nullable)))
    }

    /// Value type of a non-record object: the `additionalProperties` schema
    /// when it is the only shape given, `any` otherwise.
    fn map_value(
        &mut self,
        node: &'s SchemaNode,
        container_name: &str,
        description: Option<&'s str>,
        path: &str,
    ) -> Result<Progress<TypeExpr>, SchemaTyperError> {
        let values: Option<&'s SchemaNode> = if node.properties.is_empty() {
            node.additional_properties_schema()
        } else {
            None
        };
        let Some(values) = values else {
            debug!(path, "object without a usable shape, falling back to an untyped map");
            return Ok(Progress::Done(TypeExpr::any()));
        };

        let value_path: String = json_pointer::format(path, &["additionalProperties"]);
        self.element(values, container_name, description, &value_path)
    }

    /// Element type of an array: a single `items` schema (or a one-element
    /// list), `any` for missing items and tuples.
    fn array_element(
        &mut self,
        node: &'s SchemaNode,
        container_name: &str,
        description: Option<&'s str>,
        path: &str,
    ) -> Result<Progress<TypeExpr>, SchemaTyperError> {
        let (items, items_path): (&'s SchemaNode, String) = match &node.items {
            Some(Items::Single(item)) => (&**item, json_pointer::format(path, &["items"])),
            Some(Items::List(list)) if list.len() == 1 => {
                (&list[0], json_pointer::format(path, &["items", "0"]))
            }
            Some(Items::List(_)) => {
                debug!(path, "tuple items are not supported, falling back to an untyped array");
                return Ok(Progress::Done(TypeExpr::any()));
            }
            None => return Ok(Progress::Done(TypeExpr::any())),
        };
        self.element(items, container_name, description, &items_path)
    }

    /// Resolve an element or value node, named after the singular of its container.
    fn element(
        &mut self,
        node: &'s SchemaNode,
        container_name: &str,
        description: Option<&'s str>,
        path: &str,
    ) -> Result<Progress<TypeExpr>, SchemaTyperError> {
        let element_name: String = singularize(container_name);
        Ok(match self.resolve(node, &element_name, description, path)? {
            Resolution::Resolved(found) => Progress::Done(TypeExpr::Named(found.name)),
            Resolution::Deferred { waiting_on } => Progress::Blocked(waiting_on),
        })
    }

    fn type_name(&self, raw: &str, path: &str) -> Result<String, SchemaTyperError> {
        let name: String = self
            .names
            .synthesize(raw, self.settings.exports_types())
            .ok_or_else(|| SchemaTyperError::EmptyIdentifier {
                raw: raw.to_string(),
                path: path.to_string(),
            })?;
        Ok(format!("{}{name}", self.settings.type_name_prefix))
    }

    /// The type already known for `target`: registered, aliased, the declared
    /// root, or a node still being resolved further up the stack.
    fn lookup(&self, target: &str) -> Option<TypeRef> {
        if let Some(def) = self.registry.get(target) {
            return Some(TypeRef {
                name: def.name.clone(),
                nullable: def.nullable,
            });
        }
        if let Some(alias) = self.aliases.get(target) {
            return Some(alias.clone());
        }
        if target == ROOT
            && let Some(root) = &self.root_header
        {
            return Some(root.clone());
        }
        self.in_progress
            .iter()
            .rev()
            .find(|(path, _)| path == target)
            .map(|(_, header)| header.clone())
    }

    fn defer(
        &mut self,
        node: &'s SchemaNode,
        name: &str,
        description: Option<&'s str>,
        path: &str,
        waiting_on: &str,
    ) {
        debug!(path, waiting_on, "deferring");
        self.deferred.insert(
            path.to_string(),
            DeferredEntry {
                node,
                name: name.to_string(),
                description,
                waiting_on: waiting_on.to_string(),
            },
        );
    }

    /// Explain why the deferred queue stopped shrinking.
    fn stall_error(&self) -> SchemaTyperError {
        let mut waits = DependencyGraph::default();
        for (path, entry) in &self.deferred {
            waits.add_edge(path, &entry.waiting_on);
        }
        if let Some(cycle) = waits.find_cycle() {
            return SchemaTyperError::ReferenceCycle { cycle };
        }

        let dangling: Option<(&String, &DeferredEntry<'s>)> = self
            .deferred
            .iter()
            .find(|(_, entry)| !self.deferred.contains_key(&entry.waiting_on));
        match dangling.or_else(|| self.deferred.first()) {
            Some((path, entry)) => SchemaTyperError::UnresolvedReference {
                from: path.clone(),
                target: entry.waiting_on.clone(),
            },
            None => SchemaTyperError::ReferenceCycle { cycle: Vec::new() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SchemaNode {
        serde_json::from_str(json).expect("schema should parse")
    }

    fn run(json: &str, settings: &GenerateSettings) -> Result<Generation, SchemaTyperError> {
        let document: SchemaNode = parse(json);
        Resolver::new(settings, "Root")?.resolve_document(&document)
    }

    fn generate(json: &str) -> Generation {
        run(json, &GenerateSettings::default()).expect("resolution should succeed")
    }

    fn fields<'g>(generation: &'g Generation, name: &str) -> &'g [FieldDef] {
        match &generation.get(name).expect("type should exist").kind {
            TypeKind::Record(fields) => fields,
            other => panic!("expected record, got {other:?}"),
        }
    }

    fn field<'g>(generation: &'g Generation, type_name: &str, field_name: &str) -> &'g FieldDef {
        fields(generation, type_name)
            .iter()
            .find(|f| f.name == field_name)
            .expect("field should exist")
    }

    fn names(generation: &Generation) -> Vec<&str> {
        generation.types.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn record_fields_are_sorted_by_name() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "zeta": { "type": "string" },
                    "alpha": { "type": "integer" },
                    "mid": { "type": "boolean" }
                }
            }"#,
        );
        let actual: Vec<&str> = fields(&generation, "Root")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(vec!["Alpha", "Mid", "Zeta"], actual);
    }

    #[test]
    fn resolution_is_deterministic() {
        let schema: &str = r##"{
            "type": "object",
            "definitions": {
                "B": { "type": "object", "properties": { "a": { "$ref": "#/definitions/A" } } },
                "A": { "type": "object", "properties": { "n": { "type": "number" } } }
            },
            "properties": {
                "b": { "$ref": "#/definitions/B" },
                "tags": { "type": "array", "items": { "type": "string" } }
            }
        }"##;
        assert_eq!(generate(schema), generate(schema));
    }

    #[test]
    fn acronym_field_name_is_preserved() {
        let generation: Generation = generate(
            r#"{ "type": "object", "properties": { "userID": { "type": "string" } } }"#,
        );
        let f: &FieldDef = field(&generation, "Root", "UserID");
        assert_eq!("userID", f.property_name);
    }

    #[test]
    fn nullable_union_fields_in_either_order() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "name": { "type": ["string", "null"] },
                    "count": { "type": ["null", "integer"] }
                }
            }"#,
        );
        let name: &FieldDef = field(&generation, "Root", "Name");
        assert!(name.nullable);
        assert_eq!(TypeExpr::Primitive(Primitive::String), name.type_expr);

        let count: &FieldDef = field(&generation, "Root", "Count");
        assert!(count.nullable);
        assert_eq!(TypeExpr::Primitive(Primitive::Integer), count.type_expr);
    }

    #[test]
    fn forward_reference_between_definitions_resolves() {
        let generation: Generation = generate(
            r##"{
                "type": "object",
                "definitions": {
                    "A": { "type": "object", "properties": { "b": { "$ref": "#/definitions/B" } } },
                    "B": { "type": "object", "properties": { "value": { "type": "string" } } }
                },
                "properties": { "a": { "$ref": "#/definitions/A" } }
            }"##,
        );
        assert_eq!(vec!["A", "B", "Root"], names(&generation));
        assert_eq!(
            TypeExpr::Named("B".to_string()),
            field(&generation, "A", "B").type_expr
        );
    }

    #[test]
    fn deferred_queue_is_empty_after_drain() {
        let document: SchemaNode = parse(
            r##"{
                "definitions": {
                    "A": { "type": "array", "items": { "$ref": "#/definitions/B" } },
                    "B": { "type": "string" }
                }
            }"##,
        );
        let settings = GenerateSettings::default();
        let mut resolver: Resolver<'_> =
            Resolver::new(&settings, "Root").expect("root name is valid");

        let a: &SchemaNode = &document.definitions["A"];
        let first: Resolution = resolver
            .resolve(a, "A", None, "#/definitions/A")
            .expect("no naming errors");
        assert_eq!(
            Resolution::Deferred {
                waiting_on: "#/definitions/B".to_string()
            },
            first
        );
        assert_eq!(2, resolver.deferred_len());

        let b: &SchemaNode = &document.definitions["B"];
        resolver
            .resolve(b, "B", None, "#/definitions/B")
            .expect("no naming errors");
        resolver.drain().expect("drain should succeed");
        assert_eq!(0, resolver.deferred_len());

        let generation: Generation = resolver.finish().expect("no collisions");
        assert_eq!(
            TypeKind::Array(TypeExpr::Named("B".to_string())),
            generation.get("A").expect("A should exist").kind
        );
    }

    #[test]
    fn root_self_reference_is_nullable() {
        let generation: Generation = generate(
            r##"{
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "parent": { "$ref": "#" }
                }
            }"##,
        );
        let parent: &FieldDef = field(&generation, "Root", "Parent");
        assert_eq!(TypeExpr::Named("Root".to_string()), parent.type_expr);
        assert!(parent.nullable);
        assert!(parent.recursive);
        assert!(generation.get("Root").expect("root").nullable);
    }

    #[test]
    fn definition_referencing_root_before_root_is_visited() {
        let generation: Generation = generate(
            r##"{
                "type": "object",
                "definitions": {
                    "Node": { "type": "object", "properties": { "owner": { "$ref": "#" } } }
                },
                "properties": { "node": { "$ref": "#/definitions/Node" } }
            }"##,
        );
        assert_eq!(vec!["Node", "Root"], names(&generation));
        let owner: &FieldDef = field(&generation, "Node", "Owner");
        assert!(owner.nullable);
        assert!(owner.recursive);
        assert!(field(&generation, "Root", "Node").recursive);
    }

    #[test]
    fn properties_only_object_is_a_record() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "info": { "type": "object", "properties": { "x": { "type": "number" } } }
                }
            }"#,
        );
        assert_eq!(
            TypeExpr::Named("Info".to_string()),
            field(&generation, "Root", "Info").type_expr
        );
        assert_eq!(1, fields(&generation, "Info").len());
    }

    #[test]
    fn additional_properties_only_object_is_a_map_of_singular() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "Tags": { "type": "object", "additionalProperties": { "type": "string" } },
                    "Data": { "type": "object", "additionalProperties": { "type": "integer" } }
                }
            }"#,
        );
        assert_eq!(
            TypeExpr::Map(Box::new(TypeExpr::Named("Tag".to_string()))),
            field(&generation, "Root", "Tags").type_expr
        );
        assert_eq!(
            TypeKind::Alias(Primitive::String),
            generation.get("Tag").expect("Tag should exist").kind
        );
        assert_eq!(
            TypeExpr::Map(Box::new(TypeExpr::Named("DataItem".to_string()))),
            field(&generation, "Root", "Data").type_expr
        );
    }

    #[test]
    fn map_definition_is_a_map_type() {
        let generation: Generation = generate(
            r#"{
                "definitions": {
                    "Tags": { "type": "object", "additionalProperties": { "type": "string" } }
                }
            }"#,
        );
        assert_eq!(
            TypeKind::Map(TypeExpr::Named("Tag".to_string())),
            generation.get("Tags").expect("Tags should exist").kind
        );
    }

    #[test]
    fn ambiguous_objects_are_untyped_maps() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "open": { "type": "object" },
                    "both": {
                        "type": "object",
                        "properties": { "a": { "type": "string" } },
                        "additionalProperties": true
                    }
                }
            }"#,
        );
        let untyped = TypeExpr::Map(Box::new(TypeExpr::any()));
        assert_eq!(untyped, field(&generation, "Root", "Open").type_expr);
        assert_eq!(untyped, field(&generation, "Root", "Both").type_expr);
        assert_eq!(vec!["Root"], names(&generation));
    }

    #[test]
    fn closed_object_with_properties_is_a_record() {
        let generation: Generation = generate(
            r#"{
                "definitions": {
                    "Point": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": { "x": { "type": "number" } }
                    }
                }
            }"#,
        );
        assert_eq!(1, fields(&generation, "Point").len());
    }

    #[test]
    fn array_elements_are_named_by_singular() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "books": {
                        "type": "array",
                        "items": { "type": "object", "properties": { "title": { "type": "string" } } }
                    }
                }
            }"#,
        );
        assert_eq!(
            TypeExpr::Array(Box::new(TypeExpr::Named("Book".to_string()))),
            field(&generation, "Root", "Books").type_expr
        );
        assert_eq!(
            "#/properties/books/items",
            generation.get("Book").expect("Book should exist").path
        );
    }

    #[test]
    fn one_element_items_list_is_a_single_schema() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "ids": { "type": "array", "items": [{ "type": "integer" }] }
                }
            }"#,
        );
        assert_eq!(
            TypeExpr::Array(Box::new(TypeExpr::Named("ID".to_string()))),
            field(&generation, "Root", "Ids").type_expr
        );
        assert_eq!(
            "#/properties/ids/items/0",
            generation.get("ID").expect("ID should exist").path
        );
    }

    #[test]
    fn tuples_and_missing_items_are_untyped_arrays() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "pair": { "type": "array", "items": [{ "type": "string" }, { "type": "integer" }] },
                    "bag": { "type": "array" }
                }
            }"#,
        );
        let untyped = TypeExpr::Array(Box::new(TypeExpr::any()));
        assert_eq!(untyped, field(&generation, "Root", "Pair").type_expr);
        assert_eq!(untyped, field(&generation, "Root", "Bag").type_expr);
    }

    #[test]
    fn missing_and_unknown_types_are_any() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "anything": {},
                    "odd": { "type": "decimal" },
                    "mixed": { "type": ["string", "integer"] }
                }
            }"#,
        );
        for name in ["Anything", "Odd", "Mixed"] {
            assert_eq!(TypeExpr::any(), field(&generation, "Root", name).type_expr);
        }
    }

    #[test]
    fn date_time_format_is_a_timestamp() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "properties": {
                    "created": { "type": "string", "format": "date-time" },
                    "email": { "type": "string", "format": "email" }
                }
            }"#,
        );
        assert_eq!(
            TypeExpr::Primitive(Primitive::Timestamp),
            field(&generation, "Root", "Created").type_expr
        );
        assert_eq!(
            TypeExpr::Primitive(Primitive::String),
            field(&generation, "Root", "Email").type_expr
        );
        assert!(generation.needs_timestamp);
    }

    #[test]
    fn no_timestamp_when_unused() {
        let generation: Generation =
            generate(r#"{ "type": "object", "properties": { "a": { "type": "string" } } }"#);
        assert!(!generation.needs_timestamp);
    }

    #[test]
    fn property_title_names_the_field_and_nested_type() {
        let generation: Generation = generate(
            r#"{
                "type": "object",
                "required": ["widget"],
                "properties": {
                    "widget": {
                        "title": "The Widget",
                        "description": "A widget.",
                        "type": "object",
                        "properties": { "size": { "type": "integer" } }
                    }
                }
            }"#,
        );
        let widget: &FieldDef = field(&generation, "Root", "TheWidget");
        assert_eq!("widget", widget.property_name);
        assert!(widget.required);
        assert_eq!(Some("A widget."), widget.description.as_deref());
        let nested: &TypeDef = generation.get("TheWidget").expect("nested type");
        assert_eq!(Some("A widget."), nested.description.as_deref());
    }

    #[test]
    fn ref_field_takes_referenced_nullability() {
        let generation: Generation = generate(
            r##"{
                "type": "object",
                "definitions": {
                    "MaybeName": { "type": ["string", "null"] }
                },
                "properties": { "name": { "$ref": "#/definitions/MaybeName" } }
            }"##,
        );
        let name: &FieldDef = field(&generation, "Root", "Name");
        assert_eq!(TypeExpr::Named("MaybeName".to_string()), name.type_expr);
        assert!(name.nullable);
    }

    #[test]
    fn ref_only_definition_aliases_its_target() {
        let generation: Generation = generate(
            r##"{
                "type": "object",
                "definitions": {
                    "Author": { "$ref": "#/definitions/Person" },
                    "Person": { "type": "object", "properties": { "name": { "type": "string" } } }
                },
                "properties": { "author": { "$ref": "#/definitions/Author" } }
            }"##,
        );
        assert_eq!(vec!["Person", "Root"], names(&generation));
        assert_eq!(
            TypeExpr::Named("Person".to_string()),
            field(&generation, "Root", "Author").type_expr
        );
    }

    #[test]
    fn self_recursive_definition_resolves() {
        let generation: Generation = generate(
            r##"{
                "definitions": {
                    "Tree": {
                        "type": "object",
                        "properties": {
                            "children": { "type": "array", "items": { "$ref": "#/definitions/Tree" } },
                            "next": { "$ref": "#/definitions/Tree" }
                        }
                    }
                }
            }"##,
        );
        assert_eq!(
            TypeExpr::Array(Box::new(TypeExpr::Named("Tree".to_string()))),
            field(&generation, "Tree", "Children").type_expr
        );
        assert!(!field(&generation, "Tree", "Children").recursive);
        assert!(field(&generation, "Tree", "Next").recursive);
    }

    #[test]
    fn array_and_map_reaching_themselves_are_recursive() {
        let generation: Generation = generate(
            r##"{
                "definitions": {
                    "List": { "type": "array", "items": { "$ref": "#/definitions/List" } },
                    "Forest": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "additionalProperties": { "$ref": "#/definitions/Forest" }
                        }
                    },
                    "Names": { "type": "array", "items": { "type": "string" } }
                }
            }"##,
        );
        assert!(generation.get("List").expect("List should exist").recursive);
        assert!(generation.get("Forest").expect("Forest should exist").recursive);
        assert!(generation.get("ForestItem").expect("ForestItem should exist").recursive);
        assert!(!generation.get("Names").expect("Names should exist").recursive);
    }

    #[test]
    fn array_of_recursive_record_is_not_recursive() {
        let generation: Generation = generate(
            r##"{
                "definitions": {
                    "Trees": { "type": "array", "items": { "$ref": "#/definitions/Tree" } },
                    "Tree": {
                        "type": "object",
                        "properties": { "rest": { "$ref": "#/definitions/Trees" } }
                    }
                }
            }"##,
        );
        assert!(!generation.get("Trees").expect("Trees should exist").recursive);
    }

    #[test]
    fn forward_reference_map_value_drains() {
        let generation: Generation = generate(
            r##"{
                "definitions": {
                    "A": { "type": "object", "additionalProperties": { "$ref": "#/definitions/B" } },
                    "B": { "type": "string" }
                }
            }"##,
        );
        assert_eq!(
            TypeKind::Map(TypeExpr::Named("B".to_string())),
            generation.get("A").expect("A should exist").kind
        );
        assert_eq!(vec!["A", "B", "Root"], names(&generation));
    }

    #[test]
    fn defs_keyword_is_resolved() {
        let generation: Generation = generate(
            r##"{
                "type": "object",
                "$defs": { "Color": { "type": "string" } },
                "properties": { "color": { "$ref": "#/$defs/Color" } }
            }"##,
        );
        assert_eq!(
            TypeKind::Alias(Primitive::String),
            generation.get("Color").expect("Color should exist").kind
        );
    }

    #[test]
    fn mutual_reference_cycle_is_reported() {
        let result: Result<Generation, SchemaTyperError> = run(
            r##"{
                "definitions": {
                    "A": { "type": "array", "items": { "$ref": "#/definitions/B" } },
                    "B": { "type": "array", "items": { "$ref": "#/definitions/A" } }
                }
            }"##,
            &GenerateSettings::default(),
        );
        let Err(SchemaTyperError::ReferenceCycle { cycle }) = result else {
            panic!("expected a reference cycle, got {result:?}");
        };
        assert!(cycle.contains(&"#/definitions/A".to_string()));
        assert!(cycle.contains(&"#/definitions/B".to_string()));
        assert_eq!(cycle.first(), cycle.last());
    }

    #[test]
    fn dangling_reference_is_reported() {
        let result: Result<Generation, SchemaTyperError> = run(
            r##"{
                "type": "object",
                "properties": { "ghost": { "$ref": "#/definitions/Missing" } }
            }"##,
            &GenerateSettings::default(),
        );
        let Err(SchemaTyperError::UnresolvedReference { from, target }) = result else {
            panic!("expected an unresolved reference, got {result:?}");
        };
        assert_eq!("#", from);
        assert_eq!("#/definitions/Missing", target);
    }

    #[test]
    fn unnameable_field_is_fatal() {
        let result: Result<Generation, SchemaTyperError> = run(
            r#"{ "type": "object", "properties": { "$$$": { "type": "string" } } }"#,
            &GenerateSettings::default(),
        );
        let Err(SchemaTyperError::EmptyIdentifier { raw, path }) = result else {
            panic!("expected an empty identifier error, got {result:?}");
        };
        assert_eq!("$$$", raw);
        assert_eq!("#/properties/$$$", path);
    }

    #[test]
    fn unnameable_root_is_fatal() {
        let settings = GenerateSettings::default();
        let result: Result<Resolver<'_>, SchemaTyperError> = Resolver::new(&settings, "...");
        assert!(matches!(
            result,
            Err(SchemaTyperError::EmptyIdentifier { .. })
        ));
    }

    #[test]
    fn duplicate_type_names_are_reported() {
        let result: Result<Generation, SchemaTyperError> = run(
            r#"{
                "type": "object",
                "properties": {
                    "a": { "type": "object", "properties": { "item": { "type": "object", "properties": { "x": { "type": "string" } } } } },
                    "b": { "type": "object", "properties": { "item": { "type": "object", "properties": { "y": { "type": "string" } } } } }
                }
            }"#,
            &GenerateSettings::default(),
        );
        let Err(SchemaTyperError::TypeNameCollision { name, first, second }) = result else {
            panic!("expected a collision, got {result:?}");
        };
        assert_eq!("Item", name);
        assert_eq!("#/properties/a/properties/item", first);
        assert_eq!("#/properties/b/properties/item", second);
    }

    #[test]
    fn isolated_namespace_unexports_non_root_types() {
        let settings = GenerateSettings {
            isolated_namespace: true,
            ..GenerateSettings::default()
        };
        let generation: Generation = run(
            r#"{
                "type": "object",
                "properties": {
                    "userInfo": { "type": "object", "properties": { "userID": { "type": "string" } } }
                }
            }"#,
            &settings,
        )
        .expect("resolution should succeed");
        assert_eq!(vec!["Root", "userInfo"], names(&generation));
        assert_eq!("UserID", field(&generation, "userInfo", "UserID").name);
    }

    #[test]
    fn prefix_applies_to_non_root_types_only() {
        let settings = GenerateSettings {
            type_name_prefix: "Meta".to_string(),
            ..GenerateSettings::default()
        };
        let generation: Generation = run(
            r#"{
                "type": "object",
                "properties": {
                    "links": { "type": "array", "items": { "type": "string", "format": "uri" } }
                }
            }"#,
            &settings,
        )
        .expect("resolution should succeed");
        assert_eq!(vec!["MetaLink", "Root"], names(&generation));
    }

    #[test]
    fn root_array_uses_root_name_for_elements() {
        let document: SchemaNode =
            parse(r#"{ "type": "array", "items": { "type": "string" } }"#);
        let settings = GenerateSettings::default();
        let generation: Generation = Resolver::new(&settings, "tags")
            .expect("root name is valid")
            .resolve_document(&document)
            .expect("resolution should succeed");
        assert_eq!(vec!["Tag", "Tags"], names(&generation));
    }
}

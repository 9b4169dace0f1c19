//! The class diagram document
//!
//! Owns every node by id, the change log that records mutations, the name
//! registry, and the observer lists. All mutation goes through this type so
//! each externally visible change emits exactly one before/after snapshot
//! pair, in that order (removals record after-then-before, so undoing a
//! removal replays as a re-insertion at the original index).

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;
use umlboard_common::{ComponentId, IdAllocator, NameKind, NameRegistry};
use umlboard_undo_redo::ChangeLog;

use crate::buffer::{Buffer, EntityState};
use crate::entity::{Entity, EntityKind};
use crate::error::ModelError;
use crate::method::Method;
use crate::observer::DiagramObserver;
use crate::policy::{AcceptDeabstract, ConfirmationPolicy};
use crate::relationship::{Association, Inheritance, Role};
use crate::values::{DataType, Multiplicity, ParameterViewStyle, Visibility};
use crate::variable::Variable;

/// A class-diagram document with transactional undo/redo
pub struct ClassDiagram {
    allocator: IdAllocator,
    log: ChangeLog<Buffer>,
    names: NameRegistry,
    entities: HashMap<ComponentId, Entity>,
    entity_order: Vec<ComponentId>,
    inheritances: HashMap<ComponentId, Inheritance>,
    associations: HashMap<ComponentId, Association>,
    roles: HashMap<ComponentId, Role>,
    observers: HashMap<ComponentId, Vec<Arc<dyn DiagramObserver>>>,
    changed: RefCell<HashSet<ComponentId>>,
    policy: Box<dyn ConfirmationPolicy>,
    default_view_style: ParameterViewStyle,
}

impl Default for ClassDiagram {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassDiagram {
    /// Create an empty diagram that de-abstracts methods without asking
    pub fn new() -> Self {
        Self::with_policy(Box::new(AcceptDeabstract))
    }

    /// Create an empty diagram with an injected confirmation policy
    pub fn with_policy(policy: Box<dyn ConfirmationPolicy>) -> Self {
        ClassDiagram {
            allocator: IdAllocator::new(),
            log: ChangeLog::new(),
            names: NameRegistry::new(),
            entities: HashMap::new(),
            entity_order: Vec::new(),
            inheritances: HashMap::new(),
            associations: HashMap::new(),
            roles: HashMap::new(),
            observers: HashMap::new(),
            changed: RefCell::new(HashSet::new()),
            policy,
            default_view_style: ParameterViewStyle::TypeAndName,
        }
    }

    /// Replace the confirmation policy
    pub fn set_policy(&mut self, policy: Box<dyn ConfirmationPolicy>) {
        self.policy = policy;
    }

    /// The diagram-wide parameter display style
    ///
    /// Methods whose own style is [`ParameterViewStyle::Default`] resolve
    /// through this setting.
    pub fn default_view_style(&self) -> ParameterViewStyle {
        self.default_view_style
    }

    /// Change the diagram-wide parameter display style
    ///
    /// `Default` is not a concrete style and is rejected.
    pub fn set_default_view_style(&mut self, style: ParameterViewStyle) -> bool {
        if style == ParameterViewStyle::Default {
            return false;
        }
        self.default_view_style = style;
        true
    }

    // ----- entity lifecycle -------------------------------------------------

    /// Create an entity and append it to the diagram order
    ///
    /// The name must pass the identifier grammar and be unused among type
    /// names.
    pub fn create_entity(
        &mut self,
        kind: EntityKind,
        name: impl Into<String>,
        visibility: Visibility,
    ) -> Result<ComponentId, ModelError> {
        let name = name.into();
        let id = self.allocator.allocate();
        if !self.names.verify(NameKind::Type, &name, id) {
            return Err(ModelError::invalid_argument(format!(
                "invalid or taken type name: {}",
                name
            )));
        }
        self.names.register(NameKind::Type, &name, id);
        let entity = Entity::new(id, kind, name, visibility);
        let index = self.entity_order.len();
        self.log.push_before(Buffer::EntityIndex {
            entity: entity.clone(),
            index: None,
        });
        self.entities.insert(id, entity.clone());
        self.entity_order.push(id);
        self.log.push_after(Buffer::EntityIndex {
            entity,
            index: Some(index),
        });
        self.set_changed(id);
        Ok(id)
    }

    /// Remove an entity together with its inheritance edges and roles
    ///
    /// Recorded as one atomic group, so a single undo brings back the
    /// entity and everything that hung off it.
    pub fn remove_entity(&mut self, id: ComponentId) -> bool {
        if !self.entities.contains_key(&id) {
            return false;
        }
        let was_recording = self.log.is_recording();
        self.log.record();

        let edges: Vec<ComponentId> = self
            .inheritances
            .values()
            .filter(|i| i.parent == id || i.child == id)
            .map(|i| i.id)
            .collect();
        for edge in edges {
            self.remove_inheritance(edge);
        }
        let roles: Vec<ComponentId> = self
            .roles
            .values()
            .filter(|r| r.entity == id)
            .map(|r| r.id)
            .collect();
        for role in roles {
            self.remove_role(role);
        }

        let index = self.entity_order.iter().position(|e| *e == id);
        if let Some(entity) = self.entities.remove(&id) {
            self.entity_order.retain(|e| *e != id);
            self.release_entity_names(&entity);
            self.log.push_after(Buffer::EntityIndex {
                entity: entity.clone(),
                index: None,
            });
            self.log.push_before(Buffer::EntityIndex { entity, index });
        }

        if !was_recording {
            self.log.stop_record();
        }
        self.set_changed(id);
        true
    }

    /// Deep-copy an entity under a fresh id
    ///
    /// Attributes, methods and parameters are copied with fresh ids and
    /// methods are re-parented to the copy. An association class copies as
    /// a plain class. The copy keeps the source's name; the name registry
    /// continues to track the source, so renaming the copy later validates
    /// as a new registration.
    pub fn clone_entity(&mut self, source: ComponentId) -> Result<ComponentId, ModelError> {
        let original = self
            .entities
            .get(&source)
            .cloned()
            .ok_or(ModelError::CloneFailed(source))?;
        let id = self.allocator.allocate();
        let mut copy = Entity::new(
            id,
            original.kind.clone_target(),
            original.name.clone(),
            original.visibility,
        );
        copy.is_abstract = original.is_abstract;
        copy.stereotype = original.stereotype.clone();
        for attribute in &original.attributes {
            let mut dup = attribute.clone();
            dup.id = self.allocator.allocate();
            copy.attributes.push(dup);
        }
        for method in &original.methods {
            let mut dup = method.clone();
            dup.id = self.allocator.allocate();
            dup.entity = id;
            for parameter in &mut dup.parameters {
                parameter.id = self.allocator.allocate();
            }
            copy.methods.push(dup);
        }
        let index = self.entity_order.len();
        self.log.push_before(Buffer::EntityIndex {
            entity: copy.clone(),
            index: None,
        });
        self.entities.insert(id, copy.clone());
        self.entity_order.push(id);
        self.log.push_after(Buffer::EntityIndex {
            entity: copy,
            index: Some(index),
        });
        self.set_changed(id);
        Ok(id)
    }

    /// Look up an entity by id
    pub fn entity(&self, id: ComponentId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Entities in diagram order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entity_order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Number of entities in the diagram
    pub fn entity_count(&self) -> usize {
        self.entity_order.len()
    }

    // ----- entity field setters ---------------------------------------------

    /// Rename an entity; `false` when unchanged, invalid or taken
    pub fn set_entity_name(&mut self, id: ComponentId, name: impl Into<String>) -> bool {
        let name = name.into();
        let Some(current) = self.entities.get(&id).map(|e| e.name.clone()) else {
            return false;
        };
        if current == name {
            return false;
        }
        if !self.names.verify(NameKind::Type, &name, id) {
            return false;
        }
        self.names.release(NameKind::Type, &current, id);
        self.names.register(NameKind::Type, &name, id);
        self.mutate_entity(id, |e| e.name = name)
    }

    /// Change an entity's visibility; no-op when equal to the current value
    pub fn set_entity_visibility(&mut self, id: ComponentId, visibility: Visibility) -> bool {
        match self.entities.get(&id) {
            Some(entity) if entity.visibility != visibility => {
                self.mutate_entity(id, |e| e.visibility = visibility)
            }
            _ => false,
        }
    }

    /// Change an entity's stereotype
    pub fn set_entity_stereotype(&mut self, id: ComponentId, stereotype: impl Into<String>) -> bool {
        let stereotype = stereotype.into();
        self.mutate_entity(id, |e| e.stereotype = stereotype)
    }

    /// Change an entity's abstract flag
    ///
    /// Dropping the flag while abstract methods remain consults the
    /// confirmation policy: accepting de-abstracts every method first as
    /// one atomic group, declining keeps the entity abstract regardless of
    /// the request. Returns `false` only for an unknown entity.
    pub fn set_entity_abstract(&mut self, id: ComponentId, is_abstract: bool) -> bool {
        let Some((has_abstract, name)) = self
            .entities
            .get(&id)
            .map(|e| (e.has_abstract_methods(), e.name.clone()))
        else {
            return false;
        };
        let mut target = is_abstract;
        if !is_abstract && has_abstract {
            if self.policy.allow_deabstract(&name) {
                let abstract_methods: Vec<ComponentId> = self
                    .entities
                    .get(&id)
                    .map(|e| {
                        e.methods
                            .iter()
                            .filter(|m| m.is_abstract)
                            .map(|m| m.id)
                            .collect()
                    })
                    .unwrap_or_default();
                let was_recording = self.log.is_recording();
                self.log.record();
                for method in abstract_methods {
                    self.mutate_method(id, method, |m| m.is_abstract = false);
                }
                self.mutate_entity(id, |e| e.is_abstract = false);
                if !was_recording {
                    self.log.stop_record();
                }
                return true;
            }
            target = true;
        }
        self.mutate_entity(id, |e| e.is_abstract = target)
    }

    // ----- attributes -------------------------------------------------------

    /// Add an attribute, at `index` or at the end
    pub fn add_attribute(
        &mut self,
        entity: ComponentId,
        name: impl Into<String>,
        data_type: DataType,
        index: Option<usize>,
    ) -> Result<ComponentId, ModelError> {
        let name = name.into();
        let len = self
            .entities
            .get(&entity)
            .map(|e| e.attributes.len())
            .ok_or(ModelError::UnknownComponent(entity))?;
        let at = index.unwrap_or(len);
        if at > len {
            return Err(ModelError::invalid_argument(format!(
                "attribute index {} out of range",
                at
            )));
        }
        let id = self.allocator.allocate();
        if !self.names.verify(NameKind::Variable, &name, id) {
            return Err(ModelError::invalid_argument(format!(
                "invalid or taken variable name: {}",
                name
            )));
        }
        self.names.register(NameKind::Variable, &name, id);
        let attribute = Variable::new(id, name, data_type);
        self.log.push_before(Buffer::AttributeIndex {
            entity,
            attribute: attribute.clone(),
            index: None,
        });
        if let Some(owner) = self.entities.get_mut(&entity) {
            owner.attributes.insert(at, attribute.clone());
        }
        self.log.push_after(Buffer::AttributeIndex {
            entity,
            attribute,
            index: Some(at),
        });
        self.set_changed(entity);
        Ok(id)
    }

    /// Remove an attribute; `false` when not present
    pub fn remove_attribute(&mut self, entity: ComponentId, attribute: ComponentId) -> bool {
        let Some((index, copy)) = self.entities.get(&entity).and_then(|e| {
            e.attribute_index(attribute)
                .map(|i| (i, e.attributes[i].clone()))
        }) else {
            return false;
        };
        if let Some(owner) = self.entities.get_mut(&entity) {
            owner.attributes.remove(index);
        }
        self.names.release(NameKind::Variable, &copy.name, attribute);
        // Removal records its after state first so undo replays as a
        // re-insertion at the captured index.
        self.log.push_after(Buffer::AttributeIndex {
            entity,
            attribute: copy.clone(),
            index: None,
        });
        self.log.push_before(Buffer::AttributeIndex {
            entity,
            attribute: copy,
            index: Some(index),
        });
        self.set_changed(entity);
        true
    }

    /// Move an attribute by `offset` positions; `false` when not present
    ///
    /// # Panics
    ///
    /// Panics when the target position falls outside the attribute list.
    /// Keeping offsets in range is the caller's responsibility.
    pub fn move_attribute_position(
        &mut self,
        entity: ComponentId,
        attribute: ComponentId,
        offset: isize,
    ) -> bool {
        let Some((index, copy)) = self.entities.get(&entity).and_then(|e| {
            e.attribute_index(attribute)
                .map(|i| (i, e.attributes[i].clone()))
        }) else {
            return false;
        };
        let target = (index as isize + offset) as usize;
        self.log.push_before(Buffer::AttributeIndex {
            entity,
            attribute: copy.clone(),
            index: Some(index),
        });
        if let Some(owner) = self.entities.get_mut(&entity) {
            owner.attributes.remove(index);
            owner.attributes.insert(target, copy.clone());
        }
        self.log.push_after(Buffer::AttributeIndex {
            entity,
            attribute: copy,
            index: Some(target),
        });
        self.set_changed(entity);
        true
    }

    /// Rename an attribute; `false` when unchanged, invalid or taken
    pub fn set_attribute_name(
        &mut self,
        entity: ComponentId,
        attribute: ComponentId,
        name: impl Into<String>,
    ) -> bool {
        let name = name.into();
        let Some(current) = self
            .entities
            .get(&entity)
            .and_then(|e| e.attribute(attribute))
            .map(|a| a.name.clone())
        else {
            return false;
        };
        if current == name {
            return false;
        }
        if !self.names.verify(NameKind::Variable, &name, attribute) {
            return false;
        }
        self.names.release(NameKind::Variable, &current, attribute);
        self.names.register(NameKind::Variable, &name, attribute);
        self.mutate_attribute(entity, attribute, |a| a.name = name)
    }

    /// Change an attribute's declared type
    pub fn set_attribute_type(
        &mut self,
        entity: ComponentId,
        attribute: ComponentId,
        data_type: DataType,
    ) -> bool {
        self.mutate_attribute(entity, attribute, |a| a.data_type = data_type)
    }

    /// Change an attribute's constant flag
    pub fn set_attribute_constant(
        &mut self,
        entity: ComponentId,
        attribute: ComponentId,
        constant: bool,
    ) -> bool {
        self.mutate_attribute(entity, attribute, |a| a.constant = constant)
    }

    // ----- methods ----------------------------------------------------------

    /// Add a method, at `index` or at the end
    ///
    /// The method's abstract flag follows the owning entity's current flag
    /// at insertion time, whatever the caller intends to set later.
    pub fn create_method(
        &mut self,
        entity: ComponentId,
        name: impl Into<String>,
        return_type: DataType,
        visibility: Visibility,
        index: Option<usize>,
    ) -> Result<ComponentId, ModelError> {
        let name = name.into();
        let (len, owner_abstract) = self
            .entities
            .get(&entity)
            .map(|e| (e.methods.len(), e.is_abstract))
            .ok_or(ModelError::UnknownComponent(entity))?;
        let at = index.unwrap_or(len);
        if at > len {
            return Err(ModelError::invalid_argument(format!(
                "method index {} out of range",
                at
            )));
        }
        let id = self.allocator.allocate();
        if !self.names.verify(NameKind::Method, &name, id) {
            return Err(ModelError::invalid_argument(format!(
                "invalid or taken method name: {}",
                name
            )));
        }
        self.names.register(NameKind::Method, &name, id);
        let mut method = Method::new(id, name, return_type, visibility, entity);
        method.is_abstract = owner_abstract;
        self.log.push_before(Buffer::MethodIndex {
            entity,
            method: method.clone(),
            index: None,
        });
        if let Some(owner) = self.entities.get_mut(&entity) {
            owner.methods.insert(at, method.clone());
        }
        self.log.push_after(Buffer::MethodIndex {
            entity,
            method,
            index: Some(at),
        });
        self.set_changed(entity);
        Ok(id)
    }

    /// Remove a method; `false` when not present
    pub fn remove_method(&mut self, entity: ComponentId, method: ComponentId) -> bool {
        let Some((index, copy)) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method_index(method).map(|i| (i, e.methods[i].clone())))
        else {
            return false;
        };
        if let Some(owner) = self.entities.get_mut(&entity) {
            owner.methods.remove(index);
        }
        self.names.release(NameKind::Method, &copy.name, method);
        for parameter in &copy.parameters {
            self.names
                .release(NameKind::Variable, &parameter.name, parameter.id);
        }
        self.log.push_after(Buffer::MethodIndex {
            entity,
            method: copy.clone(),
            index: None,
        });
        self.log.push_before(Buffer::MethodIndex {
            entity,
            method: copy,
            index: Some(index),
        });
        self.set_changed(entity);
        true
    }

    /// Move a method by `offset` positions; `false` when not present
    ///
    /// # Panics
    ///
    /// Panics when the target position falls outside the method list.
    /// Keeping offsets in range is the caller's responsibility.
    pub fn move_method_position(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        offset: isize,
    ) -> bool {
        let Some((index, copy)) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method_index(method).map(|i| (i, e.methods[i].clone())))
        else {
            return false;
        };
        let target = (index as isize + offset) as usize;
        self.log.push_before(Buffer::MethodIndex {
            entity,
            method: copy.clone(),
            index: Some(index),
        });
        if let Some(owner) = self.entities.get_mut(&entity) {
            owner.methods.remove(index);
            owner.methods.insert(target, copy.clone());
        }
        self.log.push_after(Buffer::MethodIndex {
            entity,
            method: copy,
            index: Some(target),
        });
        self.set_changed(entity);
        true
    }

    /// Rename a method; `false` when unchanged, invalid or taken
    pub fn set_method_name(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        name: impl Into<String>,
    ) -> bool {
        let name = name.into();
        let Some(current) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .map(|m| m.name.clone())
        else {
            return false;
        };
        if current == name {
            return false;
        }
        if !self.names.verify(NameKind::Method, &name, method) {
            return false;
        }
        self.names.release(NameKind::Method, &current, method);
        self.names.register(NameKind::Method, &name, method);
        self.mutate_method(entity, method, |m| m.name = name)
    }

    /// Change a method's return type
    pub fn set_method_return_type(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        return_type: DataType,
    ) -> bool {
        self.mutate_method(entity, method, |m| m.return_type = return_type)
    }

    /// Change a method's visibility; no-op when equal to the current value
    pub fn set_method_visibility(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        visibility: Visibility,
    ) -> bool {
        match self.entities.get(&entity).and_then(|e| e.method(method)) {
            Some(m) if m.visibility != visibility => {
                self.mutate_method(entity, method, |m| m.visibility = visibility)
            }
            _ => false,
        }
    }

    /// Change a method's static flag
    pub fn set_method_static(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        is_static: bool,
    ) -> bool {
        self.mutate_method(entity, method, |m| m.is_static = is_static)
    }

    /// Change a method's abstract flag
    ///
    /// A method cannot become abstract while its owner is concrete;
    /// such a request returns `false` and changes nothing.
    pub fn set_method_abstract(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        is_abstract: bool,
    ) -> bool {
        if is_abstract {
            let owner_abstract = self
                .entities
                .get(&entity)
                .map(|e| e.is_abstract)
                .unwrap_or(false);
            if !owner_abstract {
                return false;
            }
        }
        self.mutate_method(entity, method, |m| m.is_abstract = is_abstract)
    }

    /// Overwrite a method's header fields as one undoable step
    ///
    /// Name, return type, visibility and static flag change together in a
    /// single snapshot pair. A rename that fails validation rejects the
    /// whole overwrite.
    pub fn overwrite_method(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        name: impl Into<String>,
        return_type: DataType,
        visibility: Visibility,
        is_static: bool,
    ) -> bool {
        let name = name.into();
        let Some(current) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .map(|m| m.name.clone())
        else {
            return false;
        };
        if current != name {
            if !self.names.verify(NameKind::Method, &name, method) {
                return false;
            }
            self.names.release(NameKind::Method, &current, method);
            self.names.register(NameKind::Method, &name, method);
        }
        self.mutate_method(entity, method, |m| {
            m.name = name;
            m.return_type = return_type;
            m.visibility = visibility;
            m.is_static = is_static;
        })
    }

    /// Render a method's UML signature, resolving the default display style
    pub fn method_signature(&self, entity: ComponentId, method: ComponentId) -> Option<String> {
        let method = self.entities.get(&entity)?.method(method)?;
        let style = match method.view_style {
            ParameterViewStyle::Default => self.default_view_style,
            concrete => concrete,
        };
        Some(method.signature(style))
    }

    /// Change how a method renders its parameter list
    pub fn set_method_view_style(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        style: ParameterViewStyle,
    ) -> bool {
        self.mutate_method(entity, method, |m| m.view_style = style)
    }

    // ----- parameters -------------------------------------------------------

    /// Append a parameter to a method
    pub fn add_parameter(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Result<ComponentId, ModelError> {
        let name = name.into();
        if self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .is_none()
        {
            return Err(ModelError::UnknownComponent(method));
        }
        let id = self.allocator.allocate();
        if !self.names.verify(NameKind::Variable, &name, id) {
            return Err(ModelError::invalid_argument(format!(
                "invalid or taken variable name: {}",
                name
            )));
        }
        self.names.register(NameKind::Variable, &name, id);
        let parameter = Variable::new(id, name, data_type);
        self.mutate_method(entity, method, |m| m.parameters.push(parameter));
        Ok(id)
    }

    /// Remove a parameter from a method; `false` when not present
    pub fn remove_parameter(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        parameter: ComponentId,
    ) -> bool {
        let Some(before) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .cloned()
        else {
            return false;
        };
        let Some(index) = before.parameter_index(parameter) else {
            return false;
        };
        self.names
            .release(NameKind::Variable, &before.parameters[index].name, parameter);
        let after = {
            let Some(live) = self
                .entities
                .get_mut(&entity)
                .and_then(|e| e.method_mut(method))
            else {
                return false;
            };
            live.parameters.remove(index);
            live.clone()
        };
        self.log.push_after(Buffer::Method { method: after });
        self.log.push_before(Buffer::Method { method: before });
        self.set_changed(method);
        true
    }

    /// Remove every parameter of a method
    pub fn clear_parameters(&mut self, entity: ComponentId, method: ComponentId) -> bool {
        let released: Vec<(String, ComponentId)> = match self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
        {
            Some(m) => m
                .parameters
                .iter()
                .map(|p| (p.name.clone(), p.id))
                .collect(),
            None => return false,
        };
        for (name, id) in &released {
            self.names.release(NameKind::Variable, name, *id);
        }
        self.mutate_method(entity, method, |m| m.parameters.clear())
    }

    /// Move a parameter by `offset` positions; `false` when not present
    ///
    /// # Panics
    ///
    /// Panics when the target position falls outside the parameter list.
    /// Keeping offsets in range is the caller's responsibility.
    pub fn move_parameter_position(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        parameter: ComponentId,
        offset: isize,
    ) -> bool {
        let Some(index) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .and_then(|m| m.parameter_index(parameter))
        else {
            return false;
        };
        let target = (index as isize + offset) as usize;
        self.mutate_method(entity, method, |m| {
            let moved = m.parameters.remove(index);
            m.parameters.insert(target, moved);
        })
    }

    /// Rename a parameter; `false` when unchanged, invalid or taken
    pub fn set_parameter_name(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        parameter: ComponentId,
        name: impl Into<String>,
    ) -> bool {
        let name = name.into();
        let Some(current) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .and_then(|m| m.parameters.iter().find(|p| p.id == parameter))
            .map(|p| p.name.clone())
        else {
            return false;
        };
        if current == name {
            return false;
        }
        if !self.names.verify(NameKind::Variable, &name, parameter) {
            return false;
        }
        self.names.release(NameKind::Variable, &current, parameter);
        self.names.register(NameKind::Variable, &name, parameter);
        self.mutate_method(entity, method, |m| {
            if let Some(p) = m.parameters.iter_mut().find(|p| p.id == parameter) {
                p.name = name;
            }
        })
    }

    /// Change a parameter's declared type
    pub fn set_parameter_type(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        parameter: ComponentId,
        data_type: DataType,
    ) -> bool {
        if self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .and_then(|m| m.parameters.iter().find(|p| p.id == parameter))
            .is_none()
        {
            return false;
        }
        self.mutate_method(entity, method, |m| {
            if let Some(p) = m.parameters.iter_mut().find(|p| p.id == parameter) {
                p.data_type = data_type;
            }
        })
    }

    // ----- inheritance ------------------------------------------------------

    /// Add a parent-to-child generalization edge
    ///
    /// Rejected when either endpoint is unknown or the edge would make
    /// `parent` its own ancestor.
    pub fn add_inheritance(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
    ) -> Result<ComponentId, ModelError> {
        if !self.entities.contains_key(&parent) {
            return Err(ModelError::UnknownComponent(parent));
        }
        if !self.entities.contains_key(&child) {
            return Err(ModelError::UnknownComponent(child));
        }
        if self.all_children(child).contains(&parent) {
            return Err(ModelError::InheritanceCycle { parent, child });
        }
        let id = self.allocator.allocate();
        let inheritance = Inheritance { id, parent, child };
        self.log.push_before(Buffer::InheritanceLink {
            inheritance,
            present: false,
        });
        self.inheritances.insert(id, inheritance);
        if let Some(p) = self.entities.get_mut(&parent) {
            p.edges_as_parent.push(id);
        }
        if let Some(c) = self.entities.get_mut(&child) {
            c.edges_as_child.push(id);
        }
        self.log.push_after(Buffer::InheritanceLink {
            inheritance,
            present: true,
        });
        self.set_changed(parent);
        self.set_changed(child);
        Ok(id)
    }

    /// Remove a generalization edge; `false` when not present
    pub fn remove_inheritance(&mut self, id: ComponentId) -> bool {
        let Some(inheritance) = self.inheritances.remove(&id) else {
            return false;
        };
        if let Some(p) = self.entities.get_mut(&inheritance.parent) {
            p.edges_as_parent.retain(|e| *e != id);
        }
        if let Some(c) = self.entities.get_mut(&inheritance.child) {
            c.edges_as_child.retain(|e| *e != id);
        }
        self.log.push_after(Buffer::InheritanceLink {
            inheritance,
            present: false,
        });
        self.log.push_before(Buffer::InheritanceLink {
            inheritance,
            present: true,
        });
        self.set_changed(inheritance.parent);
        self.set_changed(inheritance.child);
        true
    }

    /// Look up an inheritance edge by id
    pub fn inheritance(&self, id: ComponentId) -> Option<&Inheritance> {
        self.inheritances.get(&id)
    }

    /// Transitive ancestors of an entity, itself included
    pub fn all_parents(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut seen = Vec::new();
        self.collect(id, &mut seen, true);
        seen
    }

    /// Transitive descendants of an entity, itself included
    pub fn all_children(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut seen = Vec::new();
        self.collect(id, &mut seen, false);
        seen
    }

    fn collect(&self, id: ComponentId, seen: &mut Vec<ComponentId>, upward: bool) {
        if seen.contains(&id) {
            return;
        }
        seen.push(id);
        if let Some(entity) = self.entities.get(&id) {
            let edges = if upward {
                &entity.edges_as_child
            } else {
                &entity.edges_as_parent
            };
            for edge in edges {
                if let Some(inheritance) = self.inheritances.get(edge) {
                    let next = if upward {
                        inheritance.parent
                    } else {
                        inheritance.child
                    };
                    self.collect(next, seen, upward);
                }
            }
        }
    }

    /// True when `child` descends from `parent` (or is `parent` itself)
    pub fn is_child_of(&self, child: ComponentId, parent: ComponentId) -> bool {
        self.all_parents(child).contains(&parent)
    }

    /// True when `parent` is an ancestor of `child` (or is `child` itself)
    pub fn is_parent_of(&self, parent: ComponentId, child: ComponentId) -> bool {
        self.all_children(parent).contains(&child)
    }

    // ----- associations and roles -------------------------------------------

    /// Create an empty association
    pub fn create_association(&mut self, name: impl Into<String>) -> ComponentId {
        let id = self.allocator.allocate();
        let association = Association {
            id,
            name: name.into(),
            roles: Vec::new(),
        };
        self.log.push_before(Buffer::AssociationLink {
            association: association.clone(),
            roles: Vec::new(),
            present: false,
        });
        self.associations.insert(id, association.clone());
        self.log.push_after(Buffer::AssociationLink {
            association,
            roles: Vec::new(),
            present: true,
        });
        self.set_changed(id);
        id
    }

    /// Remove an association together with its roles; `false` when not present
    pub fn remove_association(&mut self, id: ComponentId) -> bool {
        let Some(association) = self.associations.get(&id).cloned() else {
            return false;
        };
        let role_copies: Vec<Role> = association
            .roles
            .iter()
            .filter_map(|r| self.roles.get(r).cloned())
            .collect();
        for role in &role_copies {
            if let Some(entity) = self.entities.get_mut(&role.entity) {
                entity.roles.retain(|r| *r != role.id);
            }
            self.roles.remove(&role.id);
            self.set_changed(role.entity);
        }
        self.associations.remove(&id);
        self.log.push_after(Buffer::AssociationLink {
            association: association.clone(),
            roles: role_copies.clone(),
            present: false,
        });
        self.log.push_before(Buffer::AssociationLink {
            association,
            roles: role_copies,
            present: true,
        });
        self.set_changed(id);
        true
    }

    /// Look up an association by id
    pub fn association(&self, id: ComponentId) -> Option<&Association> {
        self.associations.get(&id)
    }

    /// Attach a role endpoint to an association and an entity
    ///
    /// Both sides reference the new role; removing it later detaches both.
    pub fn add_role(
        &mut self,
        association: ComponentId,
        entity: ComponentId,
        multiplicity: Multiplicity,
    ) -> Result<ComponentId, ModelError> {
        if !self.associations.contains_key(&association) {
            return Err(ModelError::UnknownComponent(association));
        }
        if !self.entities.contains_key(&entity) {
            return Err(ModelError::UnknownComponent(entity));
        }
        let id = self.allocator.allocate();
        let role = Role {
            id,
            name: String::new(),
            visibility: Visibility::Private,
            multiplicity,
            association,
            entity,
        };
        self.log.push_before(Buffer::RoleLink {
            role: role.clone(),
            present: false,
        });
        self.roles.insert(id, role.clone());
        if let Some(a) = self.associations.get_mut(&association) {
            a.roles.push(id);
        }
        if let Some(e) = self.entities.get_mut(&entity) {
            e.roles.push(id);
        }
        self.log.push_after(Buffer::RoleLink {
            role,
            present: true,
        });
        self.set_changed(association);
        self.set_changed(entity);
        Ok(id)
    }

    /// Detach a role from both its association and its entity
    pub fn remove_role(&mut self, id: ComponentId) -> bool {
        let Some(role) = self.roles.remove(&id) else {
            return false;
        };
        if let Some(a) = self.associations.get_mut(&role.association) {
            a.roles.retain(|r| *r != id);
        }
        if let Some(e) = self.entities.get_mut(&role.entity) {
            e.roles.retain(|r| *r != id);
        }
        self.log.push_after(Buffer::RoleLink {
            role: role.clone(),
            present: false,
        });
        self.log.push_before(Buffer::RoleLink {
            role: role.clone(),
            present: true,
        });
        self.set_changed(role.association);
        self.set_changed(role.entity);
        true
    }

    /// Look up a role by id
    pub fn role(&self, id: ComponentId) -> Option<&Role> {
        self.roles.get(&id)
    }

    /// Rename a role; `false` when unchanged or unknown
    pub fn set_role_name(&mut self, id: ComponentId, name: impl Into<String>) -> bool {
        let name = name.into();
        match self.roles.get(&id) {
            Some(role) if role.name != name => self.mutate_role(id, |r| r.name = name),
            _ => false,
        }
    }

    /// Change a role's visibility; no-op when equal to the current value
    pub fn set_role_visibility(&mut self, id: ComponentId, visibility: Visibility) -> bool {
        match self.roles.get(&id) {
            Some(role) if role.visibility != visibility => {
                self.mutate_role(id, |r| r.visibility = visibility)
            }
            _ => false,
        }
    }

    /// Change a role's multiplicity
    pub fn set_role_multiplicity(&mut self, id: ComponentId, multiplicity: Multiplicity) -> bool {
        self.mutate_role(id, |r| r.multiplicity = multiplicity)
    }

    // ----- undo / redo ------------------------------------------------------

    /// Undo the most recent transaction; `false` when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(txn) = self.log.pop_undo() else {
            return false;
        };
        let was_blocked = self.log.set_blocked(true);
        for buffer in txn.undo_buffers() {
            self.apply_buffer(buffer);
        }
        self.log.set_blocked(was_blocked);
        self.log.stash_redo(txn);
        true
    }

    /// Redo the most recently undone transaction; `false` when there is none
    pub fn redo(&mut self) -> bool {
        let Some(txn) = self.log.pop_redo() else {
            return false;
        };
        let was_blocked = self.log.set_blocked(true);
        for buffer in txn.redo_buffers() {
            self.apply_buffer(buffer);
        }
        self.log.set_blocked(was_blocked);
        self.log.stash_undo(txn);
        true
    }

    /// True when at least one transaction can be undone
    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    /// True when at least one transaction can be redone
    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// Number of transactions available to undo
    pub fn undo_depth(&self) -> usize {
        self.log.undo_depth()
    }

    /// Number of transactions available to redo
    pub fn redo_depth(&self) -> usize {
        self.log.redo_depth()
    }

    /// Start grouping subsequent mutations into one atomic transaction
    pub fn record(&mut self) {
        self.log.record();
    }

    /// Stop grouping and seal the accumulated transaction
    pub fn stop_record(&mut self) {
        self.log.stop_record();
    }

    /// True while grouping is active
    pub fn is_recording(&self) -> bool {
        self.log.is_recording()
    }

    /// Block or unblock snapshot recording, returning the previous state
    pub fn set_blocked(&mut self, blocked: bool) -> bool {
        self.log.set_blocked(blocked)
    }

    /// True when mutations are not being recorded
    pub fn is_blocked(&self) -> bool {
        self.log.is_blocked()
    }

    /// Forget all undo and redo history
    pub fn clear_history(&mut self) {
        self.log.clear();
    }

    // ----- observers --------------------------------------------------------

    /// Register an observer on one component
    pub fn add_observer(&mut self, component: ComponentId, observer: Arc<dyn DiagramObserver>) {
        self.observers.entry(component).or_default().push(observer);
    }

    /// Remove a previously registered observer
    pub fn delete_observer(&mut self, component: ComponentId, observer: &Arc<dyn DiagramObserver>) {
        if let Some(list) = self.observers.get_mut(&component) {
            list.retain(|o| !Arc::ptr_eq(o, observer));
        }
    }

    /// Mark a component as changed
    pub fn set_changed(&self, component: ComponentId) {
        self.changed.borrow_mut().insert(component);
    }

    /// True when a component carries an unflushed change mark
    pub fn is_changed(&self, component: ComponentId) -> bool {
        self.changed.borrow().contains(&component)
    }

    /// Deliver a change notification for one component, then clear its mark
    ///
    /// Does nothing unless the component is marked changed. Observers run
    /// synchronously in registration order.
    pub fn notify_observers(&self, component: ComponentId) {
        if !self.is_changed(component) {
            return;
        }
        if let Some(list) = self.observers.get(&component) {
            for observer in list.clone() {
                observer.update(self, component);
            }
        }
        self.changed.borrow_mut().remove(&component);
    }

    // ----- snapshot capture and replay --------------------------------------

    fn mutate_entity<F: FnOnce(&mut Entity)>(&mut self, id: ComponentId, mutate: F) -> bool {
        let Some(before) = self.entities.get(&id).map(EntityState::capture) else {
            return false;
        };
        self.log.push_before(Buffer::Entity(before));
        if let Some(entity) = self.entities.get_mut(&id) {
            mutate(entity);
        }
        if let Some(after) = self.entities.get(&id).map(EntityState::capture) {
            self.log.push_after(Buffer::Entity(after));
        }
        self.set_changed(id);
        true
    }

    fn mutate_method<F: FnOnce(&mut Method)>(
        &mut self,
        entity: ComponentId,
        method: ComponentId,
        mutate: F,
    ) -> bool {
        let Some(before) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .cloned()
        else {
            return false;
        };
        self.log.push_before(Buffer::Method { method: before });
        if let Some(live) = self
            .entities
            .get_mut(&entity)
            .and_then(|e| e.method_mut(method))
        {
            mutate(live);
        }
        if let Some(after) = self
            .entities
            .get(&entity)
            .and_then(|e| e.method(method))
            .cloned()
        {
            self.log.push_after(Buffer::Method { method: after });
        }
        self.set_changed(method);
        true
    }

    fn mutate_attribute<F: FnOnce(&mut Variable)>(
        &mut self,
        entity: ComponentId,
        attribute: ComponentId,
        mutate: F,
    ) -> bool {
        let Some(before) = self
            .entities
            .get(&entity)
            .and_then(|e| e.attribute(attribute))
            .cloned()
        else {
            return false;
        };
        self.log.push_before(Buffer::Attribute {
            entity,
            variable: before,
        });
        if let Some(live) = self
            .entities
            .get_mut(&entity)
            .and_then(|e| e.attribute_mut(attribute))
        {
            mutate(live);
        }
        if let Some(after) = self
            .entities
            .get(&entity)
            .and_then(|e| e.attribute(attribute))
            .cloned()
        {
            self.log.push_after(Buffer::Attribute {
                entity,
                variable: after,
            });
        }
        self.set_changed(attribute);
        true
    }

    fn mutate_role<F: FnOnce(&mut Role)>(&mut self, id: ComponentId, mutate: F) -> bool {
        let Some(before) = self.roles.get(&id).cloned() else {
            return false;
        };
        self.log.push_before(Buffer::Role { role: before });
        if let Some(live) = self.roles.get_mut(&id) {
            mutate(live);
        }
        if let Some(after) = self.roles.get(&id).cloned() {
            self.log.push_after(Buffer::Role { role: after });
        }
        self.set_changed(id);
        true
    }

    fn release_entity_names(&mut self, entity: &Entity) {
        self.names.release(NameKind::Type, &entity.name, entity.id);
        for attribute in &entity.attributes {
            self.names
                .release(NameKind::Variable, &attribute.name, attribute.id);
        }
        for method in &entity.methods {
            self.names.release(NameKind::Method, &method.name, method.id);
            for parameter in &method.parameters {
                self.names
                    .release(NameKind::Variable, &parameter.name, parameter.id);
            }
        }
    }

    fn register_entity_names(&mut self, entity: &Entity) {
        self.names.register(NameKind::Type, &entity.name, entity.id);
        for attribute in &entity.attributes {
            self.names
                .register(NameKind::Variable, &attribute.name, attribute.id);
        }
        for method in &entity.methods {
            self.names.register(NameKind::Method, &method.name, method.id);
            for parameter in &method.parameters {
                self.names
                    .register(NameKind::Variable, &parameter.name, parameter.id);
            }
        }
    }

    /// Copy one snapshot's captured fields back onto the live graph
    ///
    /// A snapshot whose node has since been destroyed is skipped with a
    /// diagnostic rather than treated as an error.
    fn apply_buffer(&mut self, buffer: &Buffer) {
        match buffer {
            Buffer::Entity(state) => {
                let Some(current) = self.entities.get(&state.id).map(|e| e.name.clone()) else {
                    warn!(component = %state.id, "cannot restore entity state: node destroyed");
                    return;
                };
                if current != state.name {
                    self.names.release(NameKind::Type, &current, state.id);
                    self.names.register(NameKind::Type, &state.name, state.id);
                }
                if let Some(entity) = self.entities.get_mut(&state.id) {
                    entity.name = state.name.clone();
                    entity.visibility = state.visibility;
                    entity.is_abstract = state.is_abstract;
                    entity.stereotype = state.stereotype.clone();
                }
                self.set_changed(state.id);
            }
            Buffer::EntityIndex { entity, index } => match index {
                Some(i) => {
                    if self.entities.contains_key(&entity.id) {
                        warn!(component = %entity.id, "cannot restore entity: already present");
                        return;
                    }
                    self.entities.insert(entity.id, entity.clone());
                    let at = (*i).min(self.entity_order.len());
                    self.entity_order.insert(at, entity.id);
                    self.register_entity_names(entity);
                    self.set_changed(entity.id);
                }
                None => {
                    if let Some(removed) = self.entities.remove(&entity.id) {
                        self.entity_order.retain(|e| *e != entity.id);
                        self.release_entity_names(&removed);
                        self.set_changed(entity.id);
                    } else {
                        warn!(component = %entity.id, "cannot remove entity: node destroyed");
                    }
                }
            },
            Buffer::AttributeIndex {
                entity,
                attribute,
                index,
            } => {
                let Some(owner) = self.entities.get_mut(entity) else {
                    warn!(component = %entity, "cannot restore attribute: owner destroyed");
                    return;
                };
                match index {
                    Some(i) => {
                        let reinserted = owner.attribute_index(attribute.id).is_none();
                        if let Some(current) = owner.attribute_index(attribute.id) {
                            owner.attributes.remove(current);
                        }
                        let at = (*i).min(owner.attributes.len());
                        owner.attributes.insert(at, attribute.clone());
                        if reinserted {
                            self.names
                                .register(NameKind::Variable, &attribute.name, attribute.id);
                        }
                    }
                    None => {
                        if let Some(current) = owner.attribute_index(attribute.id) {
                            owner.attributes.remove(current);
                            self.names
                                .release(NameKind::Variable, &attribute.name, attribute.id);
                        }
                    }
                }
                self.set_changed(*entity);
            }
            Buffer::MethodIndex {
                entity,
                method,
                index,
            } => {
                let Some(owner) = self.entities.get_mut(entity) else {
                    warn!(component = %entity, "cannot restore method: owner destroyed");
                    return;
                };
                match index {
                    Some(i) => {
                        let reinserted = owner.method_index(method.id).is_none();
                        if let Some(current) = owner.method_index(method.id) {
                            owner.methods.remove(current);
                        }
                        let at = (*i).min(owner.methods.len());
                        owner.methods.insert(at, method.clone());
                        if reinserted {
                            self.names
                                .register(NameKind::Method, &method.name, method.id);
                            for parameter in &method.parameters {
                                self.names.register(
                                    NameKind::Variable,
                                    &parameter.name,
                                    parameter.id,
                                );
                            }
                        }
                    }
                    None => {
                        if let Some(current) = owner.method_index(method.id) {
                            owner.methods.remove(current);
                            self.names
                                .release(NameKind::Method, &method.name, method.id);
                            for parameter in &method.parameters {
                                self.names.release(
                                    NameKind::Variable,
                                    &parameter.name,
                                    parameter.id,
                                );
                            }
                        }
                    }
                }
                self.set_changed(*entity);
            }
            Buffer::Method { method } => {
                let old = {
                    let Some(live) = self
                        .entities
                        .get_mut(&method.entity)
                        .and_then(|e| e.method_mut(method.id))
                    else {
                        warn!(component = %method.id, "cannot restore method state: node destroyed");
                        return;
                    };
                    std::mem::replace(live, method.clone())
                };
                if old.name != method.name {
                    self.names.release(NameKind::Method, &old.name, method.id);
                    self.names.register(NameKind::Method, &method.name, method.id);
                }
                for parameter in &old.parameters {
                    if method.parameter_index(parameter.id).is_none() {
                        self.names
                            .release(NameKind::Variable, &parameter.name, parameter.id);
                    }
                }
                for parameter in &method.parameters {
                    match old.parameters.iter().find(|p| p.id == parameter.id) {
                        None => {
                            self.names
                                .register(NameKind::Variable, &parameter.name, parameter.id);
                        }
                        Some(previous) if previous.name != parameter.name => {
                            self.names
                                .release(NameKind::Variable, &previous.name, parameter.id);
                            self.names
                                .register(NameKind::Variable, &parameter.name, parameter.id);
                        }
                        Some(_) => {}
                    }
                }
                self.set_changed(method.id);
            }
            Buffer::Attribute { entity, variable } => {
                let old = {
                    let Some(live) = self
                        .entities
                        .get_mut(entity)
                        .and_then(|e| e.attribute_mut(variable.id))
                    else {
                        warn!(component = %variable.id, "cannot restore attribute state: node destroyed");
                        return;
                    };
                    std::mem::replace(live, variable.clone())
                };
                if old.name != variable.name {
                    self.names
                        .release(NameKind::Variable, &old.name, variable.id);
                    self.names
                        .register(NameKind::Variable, &variable.name, variable.id);
                }
                self.set_changed(variable.id);
            }
            Buffer::Role { role } => {
                let Some(live) = self.roles.get_mut(&role.id) else {
                    warn!(component = %role.id, "cannot restore role state: node destroyed");
                    return;
                };
                live.name = role.name.clone();
                live.visibility = role.visibility;
                live.multiplicity = role.multiplicity;
                self.set_changed(role.id);
            }
            Buffer::InheritanceLink {
                inheritance,
                present,
            } => {
                if *present {
                    if self.inheritances.contains_key(&inheritance.id) {
                        return;
                    }
                    if !self.entities.contains_key(&inheritance.parent)
                        || !self.entities.contains_key(&inheritance.child)
                    {
                        warn!(component = %inheritance.id, "cannot restore inheritance: endpoint destroyed");
                        return;
                    }
                    self.inheritances.insert(inheritance.id, *inheritance);
                    if let Some(p) = self.entities.get_mut(&inheritance.parent) {
                        p.edges_as_parent.push(inheritance.id);
                    }
                    if let Some(c) = self.entities.get_mut(&inheritance.child) {
                        c.edges_as_child.push(inheritance.id);
                    }
                } else {
                    self.inheritances.remove(&inheritance.id);
                    if let Some(p) = self.entities.get_mut(&inheritance.parent) {
                        p.edges_as_parent.retain(|e| *e != inheritance.id);
                    }
                    if let Some(c) = self.entities.get_mut(&inheritance.child) {
                        c.edges_as_child.retain(|e| *e != inheritance.id);
                    }
                }
                self.set_changed(inheritance.parent);
                self.set_changed(inheritance.child);
            }
            Buffer::AssociationLink {
                association,
                roles,
                present,
            } => {
                if *present {
                    self.associations
                        .insert(association.id, association.clone());
                    for role in roles {
                        self.roles.insert(role.id, role.clone());
                        if let Some(entity) = self.entities.get_mut(&role.entity) {
                            if !entity.roles.contains(&role.id) {
                                entity.roles.push(role.id);
                            }
                        }
                    }
                } else {
                    for role in roles {
                        self.roles.remove(&role.id);
                        if let Some(entity) = self.entities.get_mut(&role.entity) {
                            entity.roles.retain(|r| *r != role.id);
                        }
                    }
                    self.associations.remove(&association.id);
                }
                self.set_changed(association.id);
            }
            Buffer::RoleLink { role, present } => {
                if *present {
                    self.roles.insert(role.id, role.clone());
                    if let Some(a) = self.associations.get_mut(&role.association) {
                        if !a.roles.contains(&role.id) {
                            a.roles.push(role.id);
                        }
                    }
                    if let Some(e) = self.entities.get_mut(&role.entity) {
                        if !e.roles.contains(&role.id) {
                            e.roles.push(role.id);
                        }
                    }
                } else {
                    self.roles.remove(&role.id);
                    if let Some(a) = self.associations.get_mut(&role.association) {
                        a.roles.retain(|r| *r != role.id);
                    }
                    if let Some(e) = self.entities.get_mut(&role.entity) {
                        e.roles.retain(|r| *r != role.id);
                    }
                }
                self.set_changed(role.association);
                self.set_changed(role.entity);
            }
        }
    }
}

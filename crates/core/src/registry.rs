//! Id-indexed ownership of one container hierarchy.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::{
    AttributeMap, Container, ContainerError, ContainerId, ContainerRecord, RecordStore,
    RelationalMetadata, Result,
};

/// Owns every container of a hierarchy and keeps parent/child links consistent.
///
/// Invariants upheld by every operation:
/// - ids are unique;
/// - `c.children()` holds exactly the containers whose parent is `c`;
/// - no container is its own ancestor.
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    containers: HashMap<ContainerId, Container>,
    roots: Vec<ContainerId>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new container.
    ///
    /// When the container names a parent, that parent must already be
    /// registered and the container is appended to its children.
    pub fn insert(&mut self, container: Container) -> Result<ContainerId> {
        let id = container.id();
        if self.containers.contains_key(&id) {
            warn!(%id, "rejected duplicate container id");
            return Err(ContainerError::DuplicateId(id));
        }
        if !container.children().is_empty() {
            return Err(ContainerError::Validation(format!(
                "container {id} must be registered before children are attached"
            )));
        }

        match container.parent_id() {
            Some(parent_id) => {
                let parent = self
                    .containers
                    .get_mut(&parent_id)
                    .ok_or(ContainerError::NotFound(parent_id))?;
                parent.push_child(id);
            }
            None => self.roots.push(id),
        }

        debug!(%id, parent = ?container.parent_id(), "registered container");
        self.containers.insert(id, container);
        Ok(id)
    }

    /// Make `child` the last child of `parent`, moving it from any previous parent.
    ///
    /// Fails with [`ContainerError::Cycle`] if `child` is `parent` or one of
    /// its ancestors. On failure no links change.
    pub fn add_child(&mut self, parent: ContainerId, child: ContainerId) -> Result<()> {
        self.require(parent)?;
        let current_parent = self.require(child)?.parent_id();

        if self.ancestor_ids(parent)?.contains(&child) {
            warn!(%parent, %child, "rejected cyclic add_child");
            return Err(ContainerError::Cycle { parent, child });
        }
        if current_parent == Some(parent) {
            return Ok(());
        }

        self.unlink(child, current_parent);
        if let Some(container) = self.containers.get_mut(&child) {
            container.set_parent(Some(parent));
        }
        if let Some(container) = self.containers.get_mut(&parent) {
            container.push_child(child);
        }

        debug!(%parent, %child, previous = ?current_parent, "attached child container");
        Ok(())
    }

    /// Detach a container from its parent, making it a root. Roots are left alone.
    pub fn detach(&mut self, id: ContainerId) -> Result<()> {
        let Some(parent) = self.require(id)?.parent_id() else {
            return Ok(());
        };

        self.unlink(id, Some(parent));
        if let Some(container) = self.containers.get_mut(&id) {
            container.set_parent(None);
        }
        self.roots.push(id);

        debug!(%id, %parent, "detached container");
        Ok(())
    }

    /// Remove a container and its whole subtree, parents before children
    pub fn remove(&mut self, id: ContainerId) -> Result<Vec<Container>> {
        self.detach(id)?;
        let subtree = self.subtree_ids(id)?;

        self.roots.retain(|root| *root != id);
        let removed: Vec<Container> = subtree
            .iter()
            .filter_map(|member| self.containers.remove(member))
            .collect();

        debug!(%id, count = removed.len(), "removed container subtree");
        Ok(removed)
    }

    /// Containers from the root ancestor down to `id`, inclusive
    pub fn hierarchy(&self, id: ContainerId) -> Result<Vec<&Container>> {
        let mut chain = self.ancestor_ids(id)?;
        chain.reverse();
        chain
            .into_iter()
            .map(|member| self.require(member))
            .collect()
    }

    pub fn relational_metadata(&self, id: ContainerId) -> Result<RelationalMetadata> {
        Ok(self.require(id)?.relational_metadata())
    }

    /// Replace a container's permissions mapping
    pub fn set_permissions(&mut self, id: ContainerId, permissions: AttributeMap) -> Result<()> {
        self.require_mut(id)?.set_permissions(permissions);
        Ok(())
    }

    /// Set one dynamic attribute on a container, overwriting any previous value
    pub fn add_dynamic_attribute(
        &mut self,
        id: ContainerId,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<()> {
        self.require_mut(id)?.add_dynamic_attribute(key, value);
        Ok(())
    }

    /// Change a container's name and description. Blank values are rejected.
    pub fn update_details(
        &mut self,
        id: ContainerId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        self.require_mut(id)?.update_details(name, description)
    }

    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        self.containers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Root containers in the order they became roots
    pub fn roots(&self) -> Vec<&Container> {
        self.roots
            .iter()
            .filter_map(|id| self.containers.get(id))
            .collect()
    }

    /// Direct children of a container, in order
    pub fn children(&self, id: ContainerId) -> Result<Vec<&Container>> {
        self.require(id)?
            .children()
            .iter()
            .map(|child| self.require(*child))
            .collect()
    }

    /// Every container below `id`, depth-first and pre-order
    pub fn descendants(&self, id: ContainerId) -> Result<Vec<&Container>> {
        self.subtree_ids(id)?
            .into_iter()
            .skip(1)
            .map(|member| self.require(member))
            .collect()
    }

    /// Flat rows for the whole registry, each parent before its children
    pub fn records(&self) -> Result<Vec<ContainerRecord>> {
        let mut records = Vec::with_capacity(self.containers.len());
        for root in &self.roots {
            for member in self.subtree_ids(*root)? {
                records.push(self.require(member)?.to_record());
            }
        }
        Ok(records)
    }

    /// Rebuild a registry from flat rows linked only by `parent_id`.
    ///
    /// Row order does not matter, except that siblings keep their relative
    /// order. Rows pointing at a missing parent fail with `NotFound`; rows
    /// that can never reach a root fail with `Cycle`.
    pub fn from_records(records: impl IntoIterator<Item = ContainerRecord>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut by_parent: HashMap<Option<ContainerId>, Vec<Container>> = HashMap::new();

        for record in records {
            let container = Container::from_record(record)?;
            if !ids.insert(container.id()) {
                return Err(ContainerError::DuplicateId(container.id()));
            }
            by_parent
                .entry(container.parent_id())
                .or_default()
                .push(container);
        }

        if let Some(missing) = by_parent.keys().flatten().find(|parent| !ids.contains(*parent)) {
            return Err(ContainerError::NotFound(*missing));
        }

        let mut registry = Self::new();
        let mut pending = vec![None];
        while let Some(parent) = pending.pop() {
            for container in by_parent.remove(&parent).unwrap_or_default() {
                let id = container.id();
                match parent {
                    Some(parent_id) => registry.require_mut(parent_id)?.push_child(id),
                    None => registry.roots.push(id),
                }
                registry.containers.insert(id, container);
                pending.push(Some(id));
            }
        }

        // Whatever is left hangs off a loop that never reaches a root.
        if let Some(stranded) = by_parent.into_values().flatten().next() {
            let child = stranded.id();
            return Err(match stranded.parent_id() {
                Some(parent) => {
                    warn!(%child, %parent, "rejected cyclic container rows");
                    ContainerError::Cycle { parent, child }
                }
                None => ContainerError::CorruptHierarchy(child),
            });
        }

        debug!(count = registry.len(), "rebuilt container registry from records");
        Ok(registry)
    }

    /// `id` followed by its ancestors, nearest first
    fn ancestor_ids(&self, id: ContainerId) -> Result<Vec<ContainerId>> {
        let mut chain = vec![id];
        let mut current = self.require(id)?.parent_id();
        while let Some(parent) = current {
            if chain.len() > self.containers.len() {
                return Err(ContainerError::CorruptHierarchy(id));
            }
            chain.push(parent);
            current = self
                .containers
                .get(&parent)
                .ok_or(ContainerError::CorruptHierarchy(parent))?
                .parent_id();
        }
        Ok(chain)
    }

    /// `id` and everything below it, pre-order
    fn subtree_ids(&self, id: ContainerId) -> Result<Vec<ContainerId>> {
        let mut ordered = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if ordered.len() > self.containers.len() {
                return Err(ContainerError::CorruptHierarchy(id));
            }
            ordered.push(current);
            stack.extend(self.require(current)?.children().iter().rev().copied());
        }
        Ok(ordered)
    }

    fn unlink(&mut self, id: ContainerId, parent: Option<ContainerId>) {
        match parent {
            Some(parent) => {
                if let Some(container) = self.containers.get_mut(&parent) {
                    container.remove_child(id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }

    fn require(&self, id: ContainerId) -> Result<&Container> {
        self.containers.get(&id).ok_or(ContainerError::NotFound(id))
    }

    fn require_mut(&mut self, id: ContainerId) -> Result<&mut Container> {
        self.containers
            .get_mut(&id)
            .ok_or(ContainerError::NotFound(id))
    }
}

/// Fetch every stored container row and rebuild the hierarchy
pub async fn load_registry<S>(store: &S) -> Result<ContainerRegistry>
where
    S: RecordStore<ContainerRecord> + ?Sized,
{
    let records = store.list().await?;
    debug!(rows = records.len(), "loaded container rows");
    ContainerRegistry::from_records(records)
}

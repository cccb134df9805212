//! Container type for the WelcomeHub content hierarchy.
//!
//! A container only knows its own parent id and the ids of its children.
//! Structural links are changed exclusively by [`crate::ContainerRegistry`],
//! which keeps both sides in step.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{AttributeMap, ContainerError, ContainerId, Result};

/// A named, nestable holder of content metadata, permissions and attributes
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    id: ContainerId,
    #[validate(custom = "not_blank")]
    name: String,
    #[validate(custom = "not_blank")]
    description: String,
    content_metadata: AttributeMap,
    parent_id: Option<ContainerId>,
    permissions: AttributeMap,
    dynamic_attributes: AttributeMap,
    children: Vec<ContainerId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parent and child links of a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationalMetadata {
    pub parent_id: Option<ContainerId>,
    pub children: Vec<ContainerId>,
}

/// Flat row shape of a container as the data service stores it.
///
/// The hierarchy is carried by `parent_id` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: ContainerId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub content_metadata: AttributeMap,
    #[serde(default)]
    pub parent_id: Option<ContainerId>,
    #[serde(default)]
    pub permissions: AttributeMap,
    #[serde(default)]
    pub dynamic_attributes: AttributeMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Container {
    /// Create a root container with a fresh id.
    ///
    /// Fails with [`ContainerError::Validation`] when the name or description
    /// is empty or whitespace.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        let now = Utc::now();
        let container = Self {
            id: ContainerId::new(),
            name: name.into(),
            description: description.into(),
            content_metadata: AttributeMap::new(),
            parent_id: None,
            permissions: AttributeMap::new(),
            dynamic_attributes: AttributeMap::new(),
            children: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        container.validate()?;
        Ok(container)
    }

    /// Rebuild a container from its stored row, with no children yet
    pub fn from_record(record: ContainerRecord) -> Result<Self> {
        let container = Self {
            id: record.id,
            name: record.name,
            description: record.description,
            content_metadata: record.content_metadata,
            parent_id: record.parent_id,
            permissions: record.permissions,
            dynamic_attributes: record.dynamic_attributes,
            children: Vec::new(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        container.validate()?;
        Ok(container)
    }

    /// Use a caller-supplied id instead of a generated one
    pub fn with_id(mut self, id: ContainerId) -> Self {
        self.id = id;
        self
    }

    /// Mark the parent this container should be registered under
    pub fn with_parent(mut self, parent_id: ContainerId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_content_metadata(mut self, content_metadata: AttributeMap) -> Self {
        self.content_metadata = content_metadata;
        self
    }

    pub fn with_permissions(mut self, permissions: AttributeMap) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_dynamic_attributes(mut self, dynamic_attributes: AttributeMap) -> Self {
        self.dynamic_attributes = dynamic_attributes;
        self
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content_metadata(&self) -> &AttributeMap {
        &self.content_metadata
    }

    pub fn parent_id(&self) -> Option<ContainerId> {
        self.parent_id
    }

    pub fn permissions(&self) -> &AttributeMap {
        &self.permissions
    }

    pub fn dynamic_attributes(&self) -> &AttributeMap {
        &self.dynamic_attributes
    }

    /// Child ids in insertion order
    pub fn children(&self) -> &[ContainerId] {
        &self.children
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Replace the permissions mapping wholesale
    pub fn set_permissions(&mut self, permissions: AttributeMap) {
        self.permissions = permissions;
        self.touch();
    }

    /// Set a dynamic attribute, overwriting any previous value for the key
    pub fn add_dynamic_attribute(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.dynamic_attributes.insert(key.into(), value);
        self.touch();
    }

    /// Change the display fields. Nothing changes if either value is blank.
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        let description = description.into();
        for (field, value) in [("name", &name), ("description", &description)] {
            if value.trim().is_empty() {
                return Err(ContainerError::Validation(format!("{field} is required")));
            }
        }
        self.name = name;
        self.description = description;
        self.touch();
        Ok(())
    }

    pub fn relational_metadata(&self) -> RelationalMetadata {
        RelationalMetadata {
            parent_id: self.parent_id,
            children: self.children.clone(),
        }
    }

    pub fn to_record(&self) -> ContainerRecord {
        ContainerRecord {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            content_metadata: self.content_metadata.clone(),
            parent_id: self.parent_id,
            permissions: self.permissions.clone(),
            dynamic_attributes: self.dynamic_attributes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub(crate) fn set_parent(&mut self, parent_id: Option<ContainerId>) {
        self.parent_id = parent_id;
        self.touch();
    }

    // Children are not part of the stored row, so these leave updated_at alone.
    pub(crate) fn push_child(&mut self, child: ContainerId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: ContainerId) {
        self.children.retain(|id| *id != child);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Container {} ({})", self.name, self.id)
    }
}

fn not_blank(value: &str) -> std::result::Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("required");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

//! Panel configuration: which nodes exist and how they are grouped.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ValidationError;
use crate::topic::{self, DEFAULT_TOPIC_PREFIX};

/// Panels bridged by this process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PanelsConfig {
    /// First topic level shared by every panel.
    pub topic_prefix: String,
    /// Individual panels, in any order.
    pub nodes: Vec<NodeConfig>,
}

/// One configured panel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeConfig {
    pub name: String,
    /// Group alias this panel also answers to.
    #[serde(default)]
    pub group_name: Option<String>,
}

impl NodeConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_name: None,
        }
    }

    #[must_use]
    pub fn in_group(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            nodes: Vec::new(),
        }
    }
}

impl PanelsConfig {
    /// Distinct group names in first-seen order.
    #[must_use]
    pub fn group_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter_map(|node| node.group_name.as_deref())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Check the prefix and every node/group name.
    ///
    /// A group may share its name with a node; the node wins at registration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.topic_prefix.is_empty() {
            return Err(ValidationError::EmptyTopicPrefix);
        }
        if self.topic_prefix.ends_with(topic::SEPARATOR)
            || self.topic_prefix.contains([
                topic::MULTI_LEVEL_WILDCARD,
                topic::SINGLE_LEVEL_WILDCARD,
            ])
        {
            return Err(ValidationError::InvalidTopicPrefix(
                self.topic_prefix.clone(),
            ));
        }

        let mut names = HashSet::new();
        for node in &self.nodes {
            check_name(&node.name)?;
            if !names.insert(node.name.as_str()) {
                return Err(ValidationError::DuplicateNode(node.name.clone()));
            }
            if let Some(group) = &node.group_name {
                check_name(group)?;
            }
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !topic::is_valid_level(name) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

//! Project document navigation and in-place editing.

use std::str::FromStr;

use crate::error::{EditError, ParseError};
use crate::parser::parse;
use crate::value::{Item, Node};

/// Object kinds that `project.targets` lists.
const TARGET_ISAS: &[&str] = &["PBXNativeTarget", "PBXAggregateTarget", "PBXLegacyTarget"];

/// A target found in the object graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub id: String,
    pub name: String,
    pub isa: String,
}

/// A build configuration (`XCBuildConfiguration`) belonging to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRef {
    pub id: String,
    pub name: String,
}

/// A parsed `project.pbxproj` that keeps its source text.
///
/// Edits rewrite only the spans they touch and then re-parse, so every
/// byte outside an edited value survives a load/save cycle unchanged.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    root: Node,
}

impl Document {
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        let root = parse(&text)?;
        Ok(Self { text, root })
    }

    /// Current document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The top-level `objects` dictionary.
    pub fn objects(&self) -> Option<&Node> {
        self.root.get("objects")
    }

    pub fn object(&self, id: &str) -> Option<&Node> {
        self.objects()?.get(id)
    }

    /// The `PBXProject` referenced by `rootObject`.
    pub fn root_object(&self) -> Option<&Node> {
        let id = self.root.get("rootObject")?.as_str()?;
        self.object(id)
    }

    /// Targets in project order.
    ///
    /// Follows the root project's `targets` list when present and falls
    /// back to scanning `objects` by `isa` otherwise.
    pub fn targets(&self) -> Vec<TargetRef> {
        let ids: Vec<String> = match self
            .root_object()
            .and_then(|project| project.get("targets"))
            .and_then(Node::string_items)
        {
            Some(ids) => ids,
            None => self
                .objects()
                .and_then(Node::as_dict)
                .map(|entries| entries.iter().map(|e| e.key.clone()).collect())
                .unwrap_or_default(),
        };

        ids.into_iter()
            .filter_map(|id| {
                let object = self.object(&id)?;
                let isa = object.get("isa")?.as_str()?;
                if !TARGET_ISAS.contains(&isa) {
                    return None;
                }
                let name = object
                    .get("name")
                    .or_else(|| object.get("productName"))
                    .and_then(Node::as_str)
                    .unwrap_or_default()
                    .to_string();
                Some(TargetRef {
                    isa: isa.to_string(),
                    id,
                    name,
                })
            })
            .collect()
    }

    /// Build configurations listed by a target's `buildConfigurationList`.
    pub fn build_configurations(&self, target_id: &str) -> Vec<ConfigurationRef> {
        let ids = self
            .object(target_id)
            .and_then(|target| target.get("buildConfigurationList"))
            .and_then(Node::as_str)
            .and_then(|list_id| self.object(list_id))
            .and_then(|list| list.get("buildConfigurations"))
            .and_then(Node::string_items)
            .unwrap_or_default();

        ids.into_iter()
            .filter_map(|id| {
                let name = self.object(&id)?.get("name")?.as_str()?.to_string();
                Some(ConfigurationRef { id, name })
            })
            .collect()
    }

    /// The `buildSettings` dictionary of a build configuration.
    pub fn build_settings(&self, config_id: &str) -> Option<&Node> {
        self.object(config_id)?.get("buildSettings")
    }

    pub fn build_setting(&self, config_id: &str, key: &str) -> Option<&Node> {
        self.build_settings(config_id)?.get(key)
    }

    /// Drop entries from a list-valued build setting.
    ///
    /// `values` must keep the existing entries in order; the dropped
    /// entries are spliced out of the text and the rest of the list keeps
    /// its original formatting. Returns whether the text changed.
    pub fn set_string_list(
        &mut self,
        config_id: &str,
        key: &str,
        values: &[String],
    ) -> Result<bool, EditError> {
        let new_text = {
            let object = self
                .object(config_id)
                .ok_or_else(|| EditError::MissingObject(config_id.to_string()))?;
            let missing = || EditError::MissingSetting {
                config: config_id.to_string(),
                key: key.to_string(),
            };
            let entry = object
                .get("buildSettings")
                .ok_or_else(missing)?
                .entry(key)
                .ok_or_else(missing)?;
            let not_a_list = || EditError::NotAList {
                config: config_id.to_string(),
                key: key.to_string(),
            };
            let items = entry.value.as_array().ok_or_else(not_a_list)?;
            let current = entry.value.string_items().ok_or_else(not_a_list)?;

            if current == values {
                return Ok(false);
            }

            let removed =
                removed_indices(&current, values).ok_or_else(|| EditError::NotASubsequence {
                    config: config_id.to_string(),
                    key: key.to_string(),
                })?;
            splice_out(&self.text, items, &removed)
        };

        *self = Document::parse(new_text)?;
        Ok(true)
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}

/// Indices of `current` to drop so that it becomes `wanted`, or `None` if
/// `wanted` is not an in-order subsequence of `current`.
fn removed_indices(current: &[String], wanted: &[String]) -> Option<Vec<usize>> {
    let mut removed = Vec::new();
    let mut next = 0;
    for (i, item) in current.iter().enumerate() {
        if next < wanted.len() && wanted[next] == *item {
            next += 1;
        } else {
            removed.push(i);
        }
    }
    (next == wanted.len()).then_some(removed)
}

fn splice_out(text: &str, items: &[Item], removed: &[usize]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for &i in removed {
        let segment = &items[i].segment;
        out.push_str(&text[cursor..segment.start]);
        cursor = segment.end;
    }
    out.push_str(&text[cursor..]);
    out
}

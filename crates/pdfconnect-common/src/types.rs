//! Wire model exchanged with the analysis backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Predefined collections the backend ships with.
pub const TRAVEL_PLANNING: &str = "travel_planning";
pub const ACROBAT_LEARNING: &str = "acrobat_learning";
pub const RECIPE_COLLECTION: &str = "recipe_collection";

/// Name of a server-side document set. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Form inputs send `""` for "None"; blank means no collection.
    pub fn parse_optional(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CollectionName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An excerpt of a document the backend flagged as a key section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub text: String,
    pub document: String,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_uploaded: Option<bool>,
}

impl Section {
    pub fn uploaded(&self) -> bool {
        self.is_uploaded.unwrap_or(false)
    }
}

/// Semantic link between two sections, by index into `sections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: usize,
    pub target: usize,
    pub strength: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sections: Vec<Section>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl AnalysisResult {
    /// Connections whose endpoints both fall inside the first `limit` sections.
    pub fn connections_within(&self, limit: usize) -> impl Iterator<Item = &Connection> {
        let bound = limit.min(self.sections.len());
        self.connections
            .iter()
            .filter(move |c| c.source < bound && c.target < bound && c.source != c.target)
    }

    /// Distinct document names in order of first appearance.
    pub fn documents(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for s in &self.sections {
            if !seen.contains(&s.document.as_str()) {
                seen.push(&s.document);
            }
        }
        seen
    }
}

/// JSON body for the fixed-collection analyze call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeCollectionRequest {
    pub collection: CollectionName,
}

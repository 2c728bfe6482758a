use serde::{Deserialize, Serialize};

/// Deterministic naming for importer-owned scene objects. Marker and path
/// names derive from the agent's stable identity, so re-imports of the same
/// source address the same objects instead of accumulating duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameScheme {
    pub marker_prefix: String,
    /// Prepended to the marker name. Collaborators use it to locate path
    /// curves for show/hide without re-running the import.
    pub path_prefix: String,
    pub boundary_prefix: String,
}

impl NameScheme {
    pub fn new(marker_prefix: String, path_prefix: String, boundary_prefix: String) -> Self {
        Self {
            marker_prefix,
            path_prefix,
            boundary_prefix,
        }
    }

    pub fn marker_name(&self, agent_id: i64) -> String {
        format!("{}{}", self.marker_prefix, agent_id)
    }

    pub fn path_name(&self, agent_id: i64) -> String {
        format!("{}{}", self.path_prefix, self.marker_name(agent_id))
    }

    pub fn boundary_name(&self, index: usize) -> String {
        format!("{}{}", self.boundary_prefix, index)
    }

    pub fn is_path_name(&self, name: &str) -> bool {
        name.starts_with(&self.path_prefix)
    }
}

impl Default for NameScheme {
    fn default() -> Self {
        Self {
            marker_prefix: "Agent_".to_string(),
            path_prefix: "Path_".to_string(),
            boundary_prefix: "Boundary_".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let names = NameScheme::default();
        assert_eq!(names.marker_name(12), "Agent_12");
        assert_eq!(names.path_name(12), "Path_Agent_12");
        assert_eq!(names.boundary_name(0), "Boundary_0");
        assert!(names.is_path_name("Path_Agent_12"));
        assert!(!names.is_path_name("Agent_12"));
    }
}

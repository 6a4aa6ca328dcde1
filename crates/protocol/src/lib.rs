use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CAPABILITIES_SCHEMA_VERSION: u32 = 1;

/// `[a, b, weight]` with `a < b` and `weight = b - a`.
pub type EdgeTriple = [u64; 3];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct AnalysisReport {
    /// Sorted unique generators.
    pub generators: Vec<u64>,
    pub modulus: u64,
    /// Sorted ascending.
    pub apery_set: Vec<u64>,
    pub num_nodes: usize,
    pub num_edges: usize,
    /// `null` when no secure set exists (empty graph).
    pub security_number: Option<usize>,
    /// Sorted ascending; empty when `security_number` is `null`.
    pub secure_set: Vec<u64>,
    /// First edges of the pairwise scan.
    pub sample_edges: Vec<EdgeTriple>,
    /// Only present when requested; never a stand-in for `security_number`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_connectivity: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct AperySetReport {
    pub generators: Vec<u64>,
    pub modulus: u64,
    pub apery_set: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct GraphReport {
    pub generators: Vec<u64>,
    pub nodes: Vec<u64>,
    pub edges: Vec<EdgeTriple>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Explanation {
    pub topic: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct CapabilitiesServer {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Limits {
    pub closure_bound: u64,
    pub max_modulus: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct Capabilities {
    pub schema_version: u32,
    pub server: CapabilitiesServer,
    pub actions: Vec<String>,
    pub limits: Limits,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_is_omitted_unless_present() {
        let report = AnalysisReport {
            generators: vec![3, 5],
            modulus: 3,
            apery_set: vec![0, 5, 10],
            num_nodes: 3,
            num_edges: 3,
            security_number: Some(2),
            secure_set: vec![0, 5],
            sample_edges: vec![[0, 5, 5], [0, 10, 10], [5, 10, 5]],
            vertex_connectivity: None,
        };
        let raw = serialize_json(&report).unwrap();
        assert_eq!(
            raw,
            r#"{"generators":[3,5],"modulus":3,"apery_set":[0,5,10],"num_nodes":3,"num_edges":3,"security_number":2,"secure_set":[0,5],"sample_edges":[[0,5,5],[0,10,10],[5,10,5]]}"#
        );

        let parsed: AnalysisReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn undefined_security_number_is_null() {
        let report = AnalysisReport {
            generators: vec![],
            modulus: 0,
            apery_set: vec![],
            num_nodes: 0,
            num_edges: 0,
            security_number: None,
            secure_set: vec![],
            sample_edges: vec![],
            vertex_connectivity: Some(0),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["security_number"].is_null());
        assert_eq!(value["vertex_connectivity"], 0);
    }
}

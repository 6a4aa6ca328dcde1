use crate::command::domain::{
    parse_payload, AnalyzePayload, CommandOutcome, GeneratorsPayload, RequestError,
};
use crate::config::AppConfig;
use anyhow::{Context as AnyhowContext, Result};
use apery_graph::{vertex_connectivity, Analysis, AperyEdge, Derivation, Generators};
use apery_protocol::{AnalysisReport, AperySetReport, EdgeTriple, GraphReport};
use serde_json::Value;

pub(crate) struct AnalysisService {
    config: AppConfig,
}

impl AnalysisService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn analyze(&self, payload: Value) -> Result<CommandOutcome> {
        let payload: AnalyzePayload = parse_payload(payload)?;
        let mut analysis = self.config.analysis;
        if let Some(bound) = payload.closure_bound {
            analysis.closure_bound = bound;
        }
        ensure_searchable(&payload.generators, self.config.max_modulus)?;

        // The search is CPU bound and exponential; keep it off the async workers.
        let report = tokio::task::spawn_blocking(move || -> Result<AnalysisReport> {
            let derivation = Derivation::derive(&payload.generators, analysis.closure_bound)?;
            let result = derivation.solve(&analysis.solver)?;
            let connectivity = if payload.include_connectivity {
                Some(vertex_connectivity(&derivation.graph)?)
            } else {
                None
            };
            Ok(analysis_report(result, connectivity))
        })
        .await
        .context("Analysis task failed")??;

        let mut outcome = CommandOutcome::from_value(report)?;
        outcome.meta.closure_bound = Some(analysis.closure_bound);
        Ok(outcome)
    }

    pub async fn apery_set(&self, payload: Value) -> Result<CommandOutcome> {
        let payload: GeneratorsPayload = parse_payload(payload)?;
        let (derivation, bound) = self.derive(payload).await?;
        let mut outcome = CommandOutcome::from_value(AperySetReport {
            generators: derivation.generators.as_slice().to_vec(),
            modulus: derivation.modulus(),
            apery_set: derivation.apery.elements().to_vec(),
        })?;
        outcome.meta.closure_bound = Some(bound);
        Ok(outcome)
    }

    /// The full edge list grows with the square of the modulus, so this
    /// action sits behind the same size gate as `analyze`.
    pub async fn graph(&self, payload: Value) -> Result<CommandOutcome> {
        let payload: GeneratorsPayload = parse_payload(payload)?;
        ensure_searchable(&payload.generators, self.config.max_modulus)?;
        let (derivation, bound) = self.derive(payload).await?;
        let mut outcome = CommandOutcome::from_value(GraphReport {
            generators: derivation.generators.as_slice().to_vec(),
            nodes: derivation.graph.vertices().to_vec(),
            edges: derivation.graph.edges().iter().map(edge_triple).collect(),
        })?;
        outcome.meta.closure_bound = Some(bound);
        Ok(outcome)
    }

    async fn derive(&self, payload: GeneratorsPayload) -> Result<(Derivation, u64)> {
        let bound = payload
            .closure_bound
            .unwrap_or(self.config.analysis.closure_bound);
        let derivation = tokio::task::spawn_blocking(move || {
            Derivation::derive(&payload.generators, bound)
        })
        .await
        .context("Derivation task failed")??;
        Ok((derivation, bound))
    }
}

/// Size gate in front of graph construction and the exponential search.
/// The modulus is the smallest generator, so nothing is derived before the
/// check.
fn ensure_searchable(raw: &[i64], max_modulus: u64) -> Result<()> {
    let modulus = Generators::new(raw.iter().copied())?.modulus();
    if modulus > max_modulus {
        log::warn!("Refusing request: modulus {modulus} > limit {max_modulus}");
        return Err(RequestError::TooLarge {
            modulus,
            limit: max_modulus,
        }
        .into());
    }
    Ok(())
}

fn edge_triple(edge: &AperyEdge) -> EdgeTriple {
    [edge.a, edge.b, edge.weight]
}

fn analysis_report(analysis: Analysis, vertex_connectivity: Option<usize>) -> AnalysisReport {
    AnalysisReport {
        generators: analysis.generators,
        modulus: analysis.modulus,
        apery_set: analysis.apery_set,
        num_nodes: analysis.num_nodes,
        num_edges: analysis.num_edges,
        security_number: analysis.security_number,
        secure_set: analysis.secure_set,
        sample_edges: analysis.sample_edges.iter().map(edge_triple).collect(),
        vertex_connectivity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service(max_modulus: u64) -> AnalysisService {
        AnalysisService::new(AppConfig {
            max_modulus,
            ..AppConfig::default()
        })
    }

    #[tokio::test]
    async fn analyze_three_and_five() {
        let outcome = service(20)
            .analyze(json!({"generators": [5, 3]}))
            .await
            .unwrap();
        assert_eq!(
            outcome.data,
            json!({
                "generators": [3, 5],
                "modulus": 3,
                "apery_set": [0, 5, 10],
                "num_nodes": 3,
                "num_edges": 3,
                "security_number": 2,
                "secure_set": [0, 5],
                "sample_edges": [[0, 5, 5], [0, 10, 10], [5, 10, 5]]
            })
        );
        assert_eq!(outcome.meta.closure_bound, Some(2000));
    }

    #[tokio::test]
    async fn connectivity_only_on_request() {
        let outcome = service(20)
            .analyze(json!({"generators": [4, 5], "include_connectivity": true}))
            .await
            .unwrap();
        assert_eq!(outcome.data["security_number"], 2);
        assert_eq!(outcome.data["vertex_connectivity"], 3);
    }

    #[tokio::test]
    async fn modulus_gate_runs_before_the_search() {
        let err = service(4)
            .analyze(json!({"generators": [5, 6]}))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RequestError>(),
            Some(RequestError::TooLarge {
                modulus: 5,
                limit: 4
            })
        ));
    }

    #[tokio::test]
    async fn oversized_requests_are_refused_before_derivation() {
        // <30, 60> never closes every residue; a derivation would report
        // incomplete_closure, so too_large shows the gate ran first.
        for outcome in [
            service(20)
                .analyze(json!({"generators": [60, 30], "closure_bound": 16_777_216}))
                .await,
            service(20)
                .graph(json!({"generators": [30, 60], "closure_bound": 16_777_216}))
                .await,
        ] {
            let err = outcome.unwrap_err();
            assert!(matches!(
                err.downcast_ref::<RequestError>(),
                Some(RequestError::TooLarge {
                    modulus: 30,
                    limit: 20
                })
            ));
        }
    }

    #[tokio::test]
    async fn gate_still_reports_invalid_generators() {
        let err = service(20)
            .graph(json!({"generators": [0, 5]}))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<apery_graph::AnalysisError>().map(|e| e.kind()),
            Some("invalid_input")
        );
    }

    #[tokio::test]
    async fn payload_bound_overrides_config() {
        let err = service(20)
            .analyze(json!({"generators": [7, 11], "closure_bound": 20}))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<apery_graph::AnalysisError>().map(|e| e.kind()),
            Some("incomplete_closure")
        );
    }

    #[tokio::test]
    async fn graph_lists_every_edge() {
        let outcome = service(20)
            .graph(json!({"generators": [4, 5]}))
            .await
            .unwrap();
        assert_eq!(outcome.data["nodes"], json!([0, 5, 10, 15]));
        assert_eq!(outcome.data["edges"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn apery_set_skips_the_size_gate() {
        let outcome = service(4)
            .apery_set(json!({"generators": [6, 9, 20]}))
            .await
            .unwrap();
        assert_eq!(outcome.data["apery_set"], json!([0, 9, 20, 29, 40, 49]));
    }
}

//! Pure projection of the session into the five-stage workflow graph.
//!
//! The graph shape never changes: five nodes in fixed order joined by four
//! directed edges. Only the per-node activity and status text vary with the
//! session, so two structurally equal sessions always project to the same
//! graph.

use super::store::SessionState;

/// The five fixed workflow stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Data,
    Preprocess,
    Split,
    Model,
    Result,
}

impl FlowStage {
    /// All stages in pipeline order.
    pub const ALL: [FlowStage; 5] = [
        Self::Data,
        Self::Preprocess,
        Self::Split,
        Self::Model,
        Self::Result,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Data => "Data",
            Self::Preprocess => "Preprocess",
            Self::Split => "Split",
            Self::Model => "Model",
            Self::Result => "Result",
        }
    }
}

/// One node of the projected graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    pub stage: FlowStage,
    /// Whether this stage is satisfied by the current session.
    pub active: bool,
    /// Short status text rendered under the stage title.
    pub status: String,
}

/// The full projected graph: five nodes, four edges, fixed shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowGraph {
    pub nodes: [FlowNode; 5],
    pub edges: [(FlowStage, FlowStage); 4],
}

/// Project the session into the workflow graph.
pub fn project(state: &SessionState) -> FlowGraph {
    let nodes = FlowStage::ALL.map(|stage| FlowNode {
        stage,
        active: stage_active(state, stage),
        status: stage_status(state, stage),
    });
    FlowGraph {
        nodes,
        edges: [
            (FlowStage::Data, FlowStage::Preprocess),
            (FlowStage::Preprocess, FlowStage::Split),
            (FlowStage::Split, FlowStage::Model),
            (FlowStage::Model, FlowStage::Result),
        ],
    }
}

fn stage_active(state: &SessionState, stage: FlowStage) -> bool {
    match stage {
        FlowStage::Data => state.dataset.is_some(),
        FlowStage::Preprocess => !state.preprocess.is_empty(),
        // A split configuration always exists.
        FlowStage::Split => true,
        FlowStage::Model => state.model.is_some(),
        FlowStage::Result => state.result.is_some(),
    }
}

fn stage_status(state: &SessionState, stage: FlowStage) -> String {
    match stage {
        FlowStage::Data => {
            if state.dataset.is_some() {
                "ready".to_string()
            } else {
                "pending".to_string()
            }
        }
        FlowStage::Preprocess => format!("{} step(s)", state.preprocess.len()),
        FlowStage::Split => format!("Test {}%", state.split.test_percent()),
        FlowStage::Model => state
            .model
            .map(|model| model.label().to_string())
            .unwrap_or_else(|| "select".to_string()),
        FlowStage::Result => {
            if state.result.is_some() {
                "done".to_string()
            } else {
                "waiting".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{
        DatasetSummary, ModelKind, PreprocessKind, PreprocessStep, RunOutcome,
    };

    fn state_with_dataset() -> SessionState {
        SessionState {
            dataset: Some(DatasetSummary {
                dataset_id: "ds-1".to_string(),
                rows: 10,
                columns: 2,
                column_names: vec!["a".to_string(), "b".to_string()],
                dtypes: Default::default(),
                preview: Vec::new(),
            }),
            target_column: Some("a".to_string()),
            ..SessionState::default()
        }
    }

    fn node(graph: &FlowGraph, stage: FlowStage) -> &FlowNode {
        graph
            .nodes
            .iter()
            .find(|node| node.stage == stage)
            .expect("stage always present")
    }

    #[test]
    fn empty_session_activates_only_split() {
        let graph = project(&SessionState::default());
        assert!(!node(&graph, FlowStage::Data).active);
        assert!(!node(&graph, FlowStage::Preprocess).active);
        assert!(node(&graph, FlowStage::Split).active);
        assert!(!node(&graph, FlowStage::Model).active);
        assert!(!node(&graph, FlowStage::Result).active);
        assert_eq!(node(&graph, FlowStage::Data).status, "pending");
        assert_eq!(node(&graph, FlowStage::Result).status, "waiting");
    }

    #[test]
    fn graph_shape_is_fixed() {
        let graph = project(&SessionState::default());
        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(
            graph.edges,
            [
                (FlowStage::Data, FlowStage::Preprocess),
                (FlowStage::Preprocess, FlowStage::Split),
                (FlowStage::Split, FlowStage::Model),
                (FlowStage::Model, FlowStage::Result),
            ]
        );
    }

    #[test]
    fn stages_light_up_with_session_progress() {
        let mut state = state_with_dataset();
        state.preprocess.push(PreprocessStep::all_numeric(
            PreprocessKind::Standardize,
        ));
        state.model = Some(ModelKind::DecisionTree);
        state.result = Some(RunOutcome {
            status: "success".to_string(),
            accuracy: Some(0.9),
            confusion_matrix: None,
            feature_importances: None,
            message: None,
            warnings: Vec::new(),
            model_type: None,
            model_id: None,
            model_download_path: None,
        });

        let graph = project(&state);
        assert!(graph.nodes.iter().all(|node| node.active));
        assert_eq!(node(&graph, FlowStage::Data).status, "ready");
        assert_eq!(node(&graph, FlowStage::Preprocess).status, "1 step(s)");
        assert_eq!(node(&graph, FlowStage::Split).status, "Test 20%");
        assert_eq!(node(&graph, FlowStage::Model).status, "Decision tree");
        assert_eq!(node(&graph, FlowStage::Result).status, "done");
    }

    #[test]
    fn projection_is_pure() {
        let state = state_with_dataset();
        let first = project(&state);
        let second = project(&state);
        assert_eq!(first, second);
        // Projecting a clone of the state is also identical.
        assert_eq!(project(&state.clone()), first);
    }

    #[test]
    fn split_status_tracks_test_percent() {
        let mut state = SessionState::default();
        state.split.test_size = 0.3;
        let graph = project(&state);
        assert_eq!(node(&graph, FlowStage::Split).status, "Test 30%");
    }
}

//! Evaluation cases for the travel advisor, scored by `adk_eval`.

use crate::error::{Result, TravelError};
use crate::tools::tool_names;
use adk_core::Agent;
use adk_eval::{
    EvaluationConfig, EvaluationCriteria, EvaluationReport, Evaluator, TestFile,
    ToolTrajectoryConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The case file shipped with this crate.
pub fn default_cases_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("evals").join("travel_advisor.test.json")
}

/// Tool calls must happen in the expected order; expected args need only be
/// a subset of the actual ones.
pub fn default_criteria() -> EvaluationCriteria {
    EvaluationCriteria {
        tool_trajectory_score: Some(1.0),
        tool_trajectory_config: Some(ToolTrajectoryConfig {
            strict_order: true,
            strict_args: false,
        }),
        ..Default::default()
    }
}

pub fn load_cases(path: impl AsRef<Path>) -> Result<TestFile> {
    Ok(TestFile::load(path)?)
}

/// Checks that the file has cases and that every expected tool use names a
/// registered tool.
pub fn validate_cases(file: &TestFile) -> Result<()> {
    if file.eval_cases.is_empty() {
        return Err(TravelError::Eval(format!("eval set '{}' has no cases", file.eval_set_id)));
    }

    let known = tool_names();
    for case in &file.eval_cases {
        if case.conversation.is_empty() {
            return Err(TravelError::Eval(format!("case '{}' has no turns", case.eval_id)));
        }
        let uses = case
            .conversation
            .iter()
            .filter_map(|turn| turn.intermediate_data.as_ref())
            .flat_map(|data| data.tool_uses.iter());
        for tool_use in uses {
            if !known.iter().any(|name| *name == tool_use.name) {
                return Err(TravelError::Eval(format!(
                    "case '{}' expects unknown tool '{}'",
                    case.eval_id, tool_use.name
                )));
            }
        }
    }
    Ok(())
}

#[tracing::instrument(skip(agent, criteria), fields(path = %path.as_ref().display()))]
pub async fn run_evaluation(
    agent: Arc<dyn Agent>,
    path: impl AsRef<Path>,
    criteria: EvaluationCriteria,
) -> Result<EvaluationReport> {
    let file = load_cases(path.as_ref())?;
    validate_cases(&file)?;

    let evaluator = Evaluator::new(EvaluationConfig::with_criteria(criteria));
    let report = evaluator.evaluate_test_file(agent, &file).await?;
    tracing::info!(passed = report.all_passed(), "evaluation finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file_with_tool(name: &str) -> TestFile {
        serde_json::from_value(json!({
            "eval_set_id": "set",
            "name": "set",
            "eval_cases": [{
                "eval_id": "case",
                "conversation": [{
                    "invocation_id": "t1",
                    "user_content": {"parts": [{"text": "weather?"}], "role": "user"},
                    "intermediate_data": {"tool_uses": [{"name": name, "args": {}}]}
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_shipped_cases_are_valid() {
        let file = load_cases(default_cases_path()).unwrap();
        validate_cases(&file).unwrap();
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        assert!(validate_cases(&file_with_tool("get_weather")).is_ok());
        let err = validate_cases(&file_with_tool("book_flight")).unwrap_err();
        assert!(err.to_string().contains("book_flight"));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let mut file = file_with_tool("get_weather");
        file.eval_cases.clear();
        assert!(validate_cases(&file).is_err());
    }

    #[test]
    fn test_default_criteria_scores_trajectory() {
        let criteria = default_criteria();
        assert_eq!(criteria.tool_trajectory_score, Some(1.0));
        assert!(criteria.response_similarity.is_none());
    }
}

//! Invoker, batch and tracking behaviour against a scripted model

mod common;

use common::{ScriptedModel, VALID_REPLY};
use complaint_risk::analyzer::analyze_text;
use complaint_risk::batch::{analyze_csv, analyze_table, BatchOptions};
use complaint_risk::error::AnalyzerError;
use complaint_risk::table::Table;
use complaint_risk::tracking::{store, RunStatus, Tracker};
use complaint_risk_common::{AnalysisOutcome, RiskCategory};
use tempfile::tempdir;

fn input_table(texts: &[&str]) -> Table {
    let mut table = Table::new(vec!["text".into(), "Product".into()]);
    for text in texts {
        table.rows.push(vec![text.to_string(), "Credit card".into()]);
    }
    table
}

#[tokio::test]
async fn test_analyze_text_parses_reply() {
    let model = ScriptedModel::valid(1);
    let analysis = analyze_text(&model, "I was charged twice.", None).await.unwrap();

    let result = analysis.outcome.result().expect("parsed outcome");
    assert_eq!(result.risk_category, RiskCategory::Fees);
    assert!((result.risk_confidence - 0.8).abs() < 1e-9);
    assert_eq!(result.extraction.amounts, vec!["$35"]);
    assert_eq!(analysis.model, "scripted-1");
    assert_eq!(analysis.usage.as_ref().and_then(|u| u.total_tokens()), Some(160.0));

    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].contains("I was charged twice."));
}

#[tokio::test]
async fn test_analyze_text_malformed_reply_is_outcome() {
    let model = ScriptedModel::new(vec![Ok("Sorry, I cannot help with that.".into())]);
    let analysis = analyze_text(&model, "text", None).await.unwrap();

    match &analysis.outcome {
        AnalysisOutcome::ParseFailure { raw, .. } => {
            assert_eq!(raw, "Sorry, I cannot help with that.");
        }
        other => panic!("Expected ParseFailure, got {:?}", other),
    }

    let json: serde_json::Value = serde_json::to_value(&analysis.outcome).unwrap();
    assert!(json.get("parse_error").is_some());
    assert_eq!(json["raw"], "Sorry, I cannot help with that.");
}

#[tokio::test]
async fn test_analyze_text_transport_error() {
    let model = ScriptedModel::new(vec![Err(AnalyzerError::ApiCall("status 500".into()))]);
    let err = analyze_text(&model, "text", None).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::ApiCall(_)));
}

#[tokio::test]
async fn test_analyze_text_records_run() {
    let dir = tempdir().unwrap();
    let tracker = Tracker::open(dir.path(), "finance-llm");
    let model = ScriptedModel::valid(1);

    analyze_text(&model, "text", Some(&tracker)).await.unwrap();

    let exp_dir = dir.path().join("finance-llm");
    let runs = store::list_runs(&exp_dir).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_name, "analyze_single");
    assert_eq!(runs[0].status, RunStatus::Finished);
    assert!(runs[0].parent_run_id.is_none());

    let run_dir = exp_dir.join(&runs[0].run_id);
    let keys: Vec<String> = store::read_metrics(&run_dir)
        .unwrap()
        .into_iter()
        .map(|m| m.key)
        .collect();
    assert!(keys.contains(&"latency_s".to_string()));
    assert!(keys.contains(&"tokens_total_tokens".to_string()));

    let params = store::read_params(&run_dir).unwrap();
    assert_eq!(params.get("model").map(String::as_str), Some("scripted"));
}

#[tokio::test]
async fn test_failed_call_closes_run_as_failed() {
    let dir = tempdir().unwrap();
    let tracker = Tracker::open(dir.path(), "exp");
    let model = ScriptedModel::new(vec![Err(AnalyzerError::ApiCall("timeout".into()))]);

    assert!(analyze_text(&model, "text", Some(&tracker)).await.is_err());

    let runs = store::list_runs(&dir.path().join("exp")).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Failed);
    assert!(runs[0].end_time.is_some());
    assert!(tracker.active_run_id().is_none());
}

#[tokio::test]
async fn test_batch_isolates_malformed_row() {
    let model = ScriptedModel::new(vec![
        Ok(VALID_REPLY.into()),
        Ok("not json at all".into()),
        Ok(VALID_REPLY.into()),
    ]);
    let input = input_table(&["first", "second", "third"]);

    let (output, summary) = analyze_table(&model, input, &BatchOptions::default(), None)
        .await
        .unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.failures, 1);
    assert_eq!(output.len(), 3);

    let category = output.column_index("risk_category").unwrap();
    let error = output.column_index("error").unwrap();
    let raw = output.column_index("raw_response").unwrap();

    assert_eq!(output.rows[0][category], "Fees");
    assert_eq!(output.rows[0][error], "");
    assert_eq!(output.rows[1][category], "Other");
    assert!(!output.rows[1][error].is_empty());
    assert_eq!(output.rows[1][raw], "not json at all");
    assert_eq!(output.rows[2][category], "Fees");
    assert_eq!(output.rows[2][0], "third");
}

#[tokio::test]
async fn test_batch_transport_error_becomes_failure_row() {
    let model = ScriptedModel::new(vec![
        Err(AnalyzerError::ApiCall("status 429: rate limited".into())),
        Ok(VALID_REPLY.into()),
    ]);
    let input = input_table(&["first", "second"]);

    let (output, summary) = analyze_table(&model, input, &BatchOptions::default(), None)
        .await
        .unwrap();

    assert_eq!(summary.failures, 1);
    let error = output.column_index("error").unwrap();
    assert!(output.rows[0][error].contains("rate limited"));
    assert_eq!(output.rows[1][error], "");
}

#[tokio::test]
async fn test_batch_without_failures_has_no_failure_columns() {
    let model = ScriptedModel::valid(2);
    let (output, summary) = analyze_table(
        &model,
        input_table(&["a", "b"]),
        &BatchOptions::default(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(summary.failures, 0);
    assert!(output.column_index("error").is_none());
    assert_eq!(
        output.headers,
        vec![
            "text",
            "Product",
            "summary",
            "risk_category",
            "risk_confidence",
            "customer_entities",
            "company_entities",
            "amounts",
            "dates",
        ]
    );
    let amounts = output.column_index("amounts").unwrap();
    assert_eq!(output.rows[0][amounts], r#"["$35"]"#);
}

#[tokio::test]
async fn test_batch_skips_empty_text_and_samples() {
    let model = ScriptedModel::valid(10);
    let input = input_table(&["a", "  ", "b", "c", "", "d"]);
    let options = BatchOptions {
        limit: 3,
        ..BatchOptions::default()
    };

    let (output, _) = analyze_table(&model, input, &options, None).await.unwrap();
    assert_eq!(output.len(), 3);
    assert!(output.rows.iter().all(|r| !r[0].trim().is_empty()));
    assert_eq!(model.prompts.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_batch_missing_text_column() {
    let model = ScriptedModel::valid(1);
    let input = Table::new(vec!["narrative".into()]);

    let err = analyze_table(&model, input, &BatchOptions::default(), None)
        .await
        .unwrap_err();
    match err {
        AnalyzerError::MissingColumns(missing) => assert_eq!(missing, vec!["text"]),
        other => panic!("Expected MissingColumns, got {:?}", other),
    }
}

#[tokio::test]
async fn test_batch_runs_nest_under_parent() {
    let dir = tempdir().unwrap();
    let tracker = Tracker::open(dir.path(), "exp");
    let model = ScriptedModel::new(vec![
        Ok(VALID_REPLY.into()),
        Err(AnalyzerError::ApiCall("boom".into())),
    ]);

    analyze_table(&model, input_table(&["a", "b"]), &BatchOptions::default(), Some(&tracker))
        .await
        .unwrap();

    let exp_dir = dir.path().join("exp");
    let runs = store::list_runs(&exp_dir).unwrap();
    assert_eq!(runs.len(), 3);

    let parent = runs.iter().find(|r| r.run_name == "batch_analyze").unwrap();
    assert!(parent.parent_run_id.is_none());
    assert_eq!(parent.status, RunStatus::Finished);

    let children: Vec<_> = runs.iter().filter(|r| r.run_name == "analyze_single").collect();
    assert_eq!(children.len(), 2);
    assert!(children
        .iter()
        .all(|r| r.parent_run_id.as_deref() == Some(parent.run_id.as_str())));
    assert_eq!(
        children.iter().filter(|r| r.status == RunStatus::Failed).count(),
        1
    );

    let params = store::read_params(&exp_dir.join(&parent.run_id)).unwrap();
    assert_eq!(params.get("rows").map(String::as_str), Some("2"));
    assert_eq!(params.get("failures").map(String::as_str), Some("1"));
    assert!(tracker.active_run_id().is_none());
}

#[tokio::test]
async fn test_analyze_csv_writes_output() {
    let dir = tempdir().unwrap();
    let in_csv = dir.path().join("in.csv");
    let out_csv = dir.path().join("out").join("scored.csv");
    std::fs::write(&in_csv, "text,Issue\n\"Charged a fee, twice\",Fees or interest\n").unwrap();

    let model = ScriptedModel::valid(1);
    let summary = analyze_csv(&model, &in_csv, &out_csv, &BatchOptions::default(), None)
        .await
        .unwrap();
    assert_eq!(summary.rows, 1);

    let scored = Table::read_csv(&out_csv).unwrap();
    assert_eq!(scored.rows[0][0], "Charged a fee, twice");
    let category = scored.column_index("risk_category").unwrap();
    assert_eq!(scored.rows[0][category], "Fees");
}

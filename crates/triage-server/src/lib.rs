//! # Triage Server
//!
//! Web front end for the message classifier. `/` and `/index` show
//! Plotly charts of the training data; `/go?query=...` classifies one
//! message. `/api/graphs` and `/api/go` return the same data as JSON.
//!
//! The dataset and model are loaded once into an [`AppState`] before the
//! listener is bound, then shared read-only by every request.

pub mod classify;
pub mod config;
pub mod dashboard;
pub mod render;
pub mod routes;
pub mod state;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use classify::{CategoryLabel, ClassificationResult, classify};
pub use config::ServerConfig;
pub use dashboard::{DashboardStats, GroupCount, graph_ids, graphs};
pub use routes::router;
pub use state::AppState;

/// Serve `state` on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = router(Arc::new(state));
    axum::serve(listener, app).await?;
    Ok(())
}

/// Load everything `config` points at, bind, and serve.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::load(&config.database, &config.table, &config.model)?;
    let addr = config.addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    serve(listener, state).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use tempfile::TempDir;
    use triage_core::{
        AdaBoostParams, Dataset, MessageRecord, ModelArtifact, MultiLabelEstimator, Normalizer,
        Pipeline, TriageError,
    };

    const CATEGORIES: [&str; 3] = ["related", "water", "food"];

    fn dataset() -> Dataset {
        let rows = [
            ("we need water", "direct", [1, 1, 0]),
            ("water please", "direct", [1, 1, 0]),
            ("no food left", "news", [1, 0, 1]),
            ("food is needed", "social", [2, 0, 1]),
            ("the sun is out", "news", [0, 0, 0]),
            ("clean water now", "direct", [1, 1, 0]),
        ];
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, (message, genre, labels))| MessageRecord {
                id: i as i64,
                message: message.to_string(),
                original: None,
                genre: genre.to_string(),
                categories: labels.to_vec(),
            })
            .collect();
        Dataset::new(CATEGORIES.iter().map(|s| s.to_string()).collect(), records).unwrap()
    }

    fn model(dataset: &Dataset) -> ModelArtifact {
        let (texts, labels, names) = dataset.to_training_data(Default::default());
        let mut pipeline = Pipeline::new(Normalizer::new().unwrap(), AdaBoostParams::new(0.5, 20));
        pipeline.fit(&texts, &labels).unwrap();
        ModelArtifact::new(pipeline, names).unwrap()
    }

    fn state() -> AppState {
        let dataset = dataset();
        let model = model(&dataset);
        AppState::new(dataset, model).unwrap()
    }

    async fn spawn(state: AppState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, state));
        format!("http://{addr}")
    }

    #[test]
    fn test_classify_water_query() {
        let state = state();
        let result = classify(&state, "water is needed").unwrap();

        assert_eq!(result.query, "water is needed");
        assert_eq!(result.get("water"), Some(1));
        let order: Vec<&str> = result.labels.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(order, CATEGORIES);
        assert!(result.labels.iter().all(|l| l.value <= 1));
    }

    #[test]
    fn test_state_rejects_mismatched_model() {
        let dataset = dataset();
        let model = model(&dataset);
        let other = Dataset::new(
            vec!["related".into(), "food".into(), "water".into()],
            Vec::new(),
        )
        .unwrap();
        assert!(matches!(
            AppState::new(other, model),
            Err(TriageError::CategoryMismatch(_))
        ));
    }

    #[test]
    fn test_state_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("DisasterResponse.db");
        let model_path = dir.path().join("classifier.json");

        let dataset = dataset();
        let mut conn = Connection::open(&db).unwrap();
        dataset.write_table(&mut conn, "DisasterResponse").unwrap();
        drop(conn);
        model(&dataset).save(&model_path).unwrap();

        let state = AppState::load(&db, "DisasterResponse", &model_path).unwrap();
        assert_eq!(state.dataset.len(), 6);

        assert!(AppState::load(dir.path().join("nope.db"), "DisasterResponse", &model_path).is_err());
    }

    #[tokio::test]
    async fn test_http_routes() {
        let base = spawn(state()).await;
        let client = reqwest::Client::new();

        for path in ["/", "/index"] {
            let resp = client.get(format!("{base}{path}")).send().await.unwrap();
            assert_eq!(resp.status(), 200);
            let body = resp.text().await.unwrap();
            assert!(body.contains("graph-2"));
        }

        let resp = client
            .get(format!("{base}/go"))
            .query(&[("query", "water is needed")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body = resp.text().await.unwrap();
        assert!(body.contains("water is needed"));
        assert!(body.contains("list-group-item-success text-center\">Water</li>"));

        let graphs: serde_json::Value = client
            .get(format!("{base}/api/graphs"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(graphs["ids"], serde_json::json!(["graph-0", "graph-1", "graph-2"]));
        assert_eq!(graphs["graphs"][1]["data"][0]["labels"][0], "direct");
    }

    #[tokio::test]
    async fn test_missing_query_is_empty() {
        let base = spawn(state()).await;
        let client = reqwest::Client::new();

        let resp = client.get(format!("{base}/go")).send().await.unwrap();
        assert_eq!(resp.status(), 200);

        let result: ClassificationResult = client
            .get(format!("{base}/api/go"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(result.query, "");
        assert_eq!(result.labels.len(), CATEGORIES.len());
    }
}

//! JSON snapshot loading for the in-memory graph source.

#[cfg(test)]
mod snapshot_tests {
    use graph_export::export_catalog::catalog;
    use graph_export::graph_source::{GraphSource, MemoryGraph};
    use graph_export::ExportError;

    #[test]
    fn test_fixture_snapshot_loads() {
        let graph =
            MemoryGraph::from_json(include_str!("../fixtures/scheduling_graph.json")).unwrap();
        assert_eq!(graph.node_count(), 10);
        assert_eq!(graph.relationship_count(), 7);
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        let err = MemoryGraph::from_json(r#"{"nodes": [{"labels": "College"}]}"#).unwrap_err();
        assert!(matches!(err, ExportError::Snapshot(_)));
    }

    #[test]
    fn test_empty_snapshot() {
        let graph = MemoryGraph::from_json("{}").unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.relationship_count(), 0);
    }

    #[tokio::test]
    async fn test_multi_label_nodes_match_each_label() {
        let graph = MemoryGraph::from_json(
            r#"{"nodes": [{"labels": ["Day", "Weekday"], "properties": {"id": "Friday"}}]}"#,
        )
        .unwrap();
        let day = catalog().into_iter().find(|e| e.table == "day").unwrap();

        let rows = graph.fetch(&day).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], serde_json::json!("Friday"));
    }
}

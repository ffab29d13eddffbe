//! End-to-end exports of the scheduling fixture.

use graph_export::export_catalog::catalog;
use graph_export::exporter::schema_emitter::{POSTGRES_SCHEMA, SCHEMA_FILE_NAME};
use graph_export::exporter::Exporter;
use graph_export::graph_source::MemoryGraph;
use serde_json::json;

use super::{fixture_graph, read};

const COURSE_1: &str = "7d3f0c2e-1111-4a6b-9d3e-000000000001";
const COURSE_2: &str = "7d3f0c2e-1111-4a6b-9d3e-000000000002";

#[tokio::test]
async fn test_every_file_has_declared_header() {
    let dir = tempfile::tempdir().unwrap();
    let graph = fixture_graph();
    Exporter::new(&graph, dir.path()).run().await.unwrap();

    for entity in catalog() {
        let contents = read(dir.path(), &entity.file_name());
        let header = contents.lines().next().unwrap();
        assert_eq!(header, entity.header().join(","), "{}", entity.file_name());
    }
    assert_eq!(read(dir.path(), SCHEMA_FILE_NAME), POSTGRES_SCHEMA);
}

#[tokio::test]
async fn test_minimal_round_trip() {
    let mut graph = MemoryGraph::new();
    graph.add_node("College", json!({"id": "A", "name": "Arts"}));
    graph.add_node(
        "Subject",
        json!({"id": "ACCT", "name": "Accounting", "college_id": "A"}),
    );
    let course = graph.add_node(
        "Course",
        json!({"id": "c1", "subject_id": "ACCT", "writing_intensive": "TRUE"}),
    );
    let section = graph.add_node("Section", json!({"crn": 101.0, "course_id": "c1"}));
    graph
        .add_relationship(course, "OFFERS", section, json!({"instruction_method": "Online"}))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let summary = Exporter::new(&graph, dir.path()).run().await.unwrap();

    assert_eq!(read(dir.path(), "college.csv"), "id,name\nA,Arts\n");
    assert_eq!(summary.rows_for("college.csv"), Some(1));

    let course_csv = read(dir.path(), "course.csv");
    let course_row: Vec<&str> = course_csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(course_row[0], "c1");
    assert_eq!(course_row[7], "true");

    let section_csv = read(dir.path(), "section.csv");
    let section_row: Vec<&str> = section_csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(section_row[0], "101");
    assert_eq!(section_row[9], "Online");
    assert_eq!(section_row[10], "");
}

#[tokio::test]
async fn test_fixture_node_tables() {
    let dir = tempfile::tempdir().unwrap();
    let graph = fixture_graph();
    Exporter::new(&graph, dir.path()).run().await.unwrap();

    assert_eq!(read(dir.path(), "term.csv"), "id\n202515\n");
    assert_eq!(read(dir.path(), "day.csv"), "id\nMonday\nWednesday\n");
    assert_eq!(
        read(dir.path(), "subject.csv"),
        "id,name,college_id\nACCT,Accounting,A\n"
    );
    assert_eq!(
        read(dir.path(), "instructor.csv"),
        "id,name,department,rmp_legacy_id,rmp_id,num_ratings,avg_rating,avg_difficulty\n\
         1001,Pat Morgan,Accounting,2233,VGVhY2hlci0yMjMz,12,4.5,3.1\n"
    );
    assert_eq!(
        read(dir.path(), "course.csv"),
        format!(
            "id,subject_id,course_number,title,credits,credit_range,description,writing_intensive,repeat_status,restrictions\n\
             {COURSE_1},ACCT,115,Financial Accounting Foundations,4.0,,\"Introduces the accounting cycle, with journals, ledgers and statements.\",true,Not repeatable for credit,\n\
             {COURSE_2},ACCT,116,Managerial Accounting Foundations,4.0,,,false,,\n"
        )
    );
}

#[tokio::test]
async fn test_sections_require_offers_edge() {
    let dir = tempfile::tempdir().unwrap();
    let graph = fixture_graph();
    let summary = Exporter::new(&graph, dir.path()).run().await.unwrap();

    let sections = read(dir.path(), "section.csv");
    assert_eq!(summary.rows_for("section.csv"), Some(1));
    assert!(!sections.contains("40404"));
    assert_eq!(
        sections.lines().nth(1).unwrap(),
        format!("31337,{COURSE_1},ACCT,115,202515,001,40,09:00:00,10:50:00,Online,Lecture")
    );
}

#[tokio::test]
async fn test_join_tables() {
    let dir = tempfile::tempdir().unwrap();
    let graph = fixture_graph();
    Exporter::new(&graph, dir.path()).run().await.unwrap();

    assert_eq!(
        read(dir.path(), "section_days.csv"),
        "section_crn,day_id\n31337,Monday\n31337,Wednesday\n"
    );
    assert_eq!(
        read(dir.path(), "instructor_sections.csv"),
        "instructor_id,section_crn\n1001,31337\n"
    );
    assert_eq!(
        read(dir.path(), "instructor_courses.csv"),
        format!("instructor_id,course_id\n1001,{COURSE_1}\n")
    );
}

#[tokio::test]
async fn test_prerequisite_direction_is_inverted() {
    let dir = tempfile::tempdir().unwrap();
    let graph = fixture_graph();
    Exporter::new(&graph, dir.path()).run().await.unwrap();

    // Stored edge: (COURSE_1)-[:PREREQUISITE]->(COURSE_2)
    assert_eq!(
        read(dir.path(), "course_prerequisites.csv"),
        format!(
            "course_id,prerequisite_course_id,relationship_type,group_id,can_take_concurrent,minimum_grade\n\
             {COURSE_2},{COURSE_1},REQUIRED,g1,false,D\n"
        )
    );
}

#[tokio::test]
async fn test_corequisite_direction_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let graph = fixture_graph();
    Exporter::new(&graph, dir.path()).run().await.unwrap();

    // Stored edge: (COURSE_2)-[:COREQUISITE]->(COURSE_1)
    assert_eq!(
        read(dir.path(), "course_corequisites.csv"),
        format!("course_id,corequisite_course_id\n{COURSE_2},{COURSE_1}\n")
    );
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let graph = fixture_graph();

    Exporter::new(&graph, dir.path()).run().await.unwrap();
    let first: Vec<Vec<u8>> = catalog()
        .iter()
        .map(|e| std::fs::read(dir.path().join(e.file_name())).unwrap())
        .collect();

    Exporter::new(&graph, dir.path()).run().await.unwrap();
    let second: Vec<Vec<u8>> = catalog()
        .iter()
        .map(|e| std::fs::read(dir.path().join(e.file_name())).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_row_order_independent_of_insertion_order() {
    let mut forward = MemoryGraph::new();
    let mut backward = MemoryGraph::new();
    for id in [202515.0, 202525.0, 202535.0] {
        forward.add_node("Term", json!({ "id": id }));
    }
    for id in [202535.0, 202525.0, 202515.0] {
        backward.add_node("Term", json!({ "id": id }));
    }

    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    Exporter::new(&forward, a.path()).run().await.unwrap();
    Exporter::new(&backward, b.path()).run().await.unwrap();

    assert_eq!(read(a.path(), "term.csv"), read(b.path(), "term.csv"));
    assert_eq!(read(a.path(), "term.csv"), "id\n202515\n202525\n202535\n");
}

#[tokio::test]
async fn test_summary_counts() {
    let dir = tempfile::tempdir().unwrap();
    let graph = fixture_graph();
    let summary = Exporter::new(&graph, dir.path()).run().await.unwrap();

    assert_eq!(summary.files.len(), 12);
    assert_eq!(summary.rows_for("day.csv"), Some(2));
    assert_eq!(summary.rows_for("course.csv"), Some(2));
    assert_eq!(summary.rows_for("course_prerequisites.csv"), Some(1));
    assert_eq!(summary.schema_path, dir.path().join(SCHEMA_FILE_NAME));
}

#[tokio::test]
async fn test_creates_missing_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("exports").join("latest");
    let graph = fixture_graph();

    Exporter::new(&graph, &nested).run().await.unwrap();
    assert!(nested.join("college.csv").exists());
}

//! End-to-end generation runs over in-memory models.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;

use bsg::{
    generate, generate_with_template, Artifact, ArtifactSink, BehaviorModelBuilder,
    CollectingChannel, ComponentTemplate, DirectorySink, GenError, GenerationResult,
    GeneratorConfig, GraphNode, MemoryGraph, MemorySink, Severity, TargetLanguage, ROOT_PATH,
};

async fn run(
    graph: &MemoryGraph,
) -> (Result<GenerationResult, GenError>, MemorySink, CollectingChannel) {
    let sink = MemorySink::new();
    let channel = CollectingChannel::new();
    let result = generate(graph, ROOT_PATH, &sink, &channel, &GeneratorConfig::default()).await;
    (result, sink, channel)
}

fn blinker() -> BehaviorModelBuilder {
    let mut model = BehaviorModelBuilder::new();
    let blinker = model.component("Blinker");
    let idle = model.initial_state(&blinker, "Idle");
    let on = model.state(&blinker, "On");
    model.state(&blinker, "Off");
    model.transition(&blinker, "toOn", Some(&idle), Some(&on), "g1", "m1");
    model
}

#[tokio::test]
async fn blinker_generates_one_file_with_resolved_transition() {
    let graph = blinker().build();
    let (result, sink, channel) = run(&graph).await;

    let result = result.unwrap();
    assert_eq!(result.files, ["Blinker.java"]);
    assert!(channel.is_empty());

    let saved = sink.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].manifest.name, "BehaviorSpecifications");
    assert_eq!(saved[0].manifest.content_hash, result.content_hash);
    assert_eq!(saved[0].manifest.artifact_hash, result.artifact_hash);

    let code = &saved[0].files["Blinker.java"];
    assert!(code.contains("public class Blinker {"));
    assert!(code.contains(
        r#"new Transition("toOn", "Transition", "Idle", "On", "g1", "m1")"#
    ));
    assert!(code.contains("Idle, // InitialState"));
    assert!(code.contains("Off, // State"));
}

#[tokio::test]
async fn duplicate_component_names_block_generation() {
    let mut model = BehaviorModelBuilder::new();
    model.component("Foo");
    let second = model.component("Foo");
    let (result, sink, channel) = run(&model.build()).await;

    assert!(matches!(result, Err(GenError::Validation { count: 1 })));
    assert_eq!(sink.created_count(), 0);

    let messages = channel.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].node, second);
    assert_eq!(messages[0].severity, Severity::Error);
    assert!(messages[0].message.starts_with("Duplicated name [Foo]"));
}

#[tokio::test]
async fn reserved_word_component_blocks_generation() {
    let mut model = BehaviorModelBuilder::new();
    model.component("class");
    model.component("Fine");
    let (result, sink, channel) = run(&model.build()).await;

    assert!(matches!(result, Err(GenError::Validation { count: 1 })));
    assert_eq!(sink.created_count(), 0);
    assert!(sink.saved().is_empty());
    assert!(channel.messages()[0].message.contains("illegal java class name"));
}

#[tokio::test]
async fn unset_destination_still_generates() {
    let mut model = BehaviorModelBuilder::new();
    let c = model.component("Pump");
    let idle = model.initial_state(&c, "Idle");
    model.transition(&c, "leave", Some(&idle), None, "", "stop");
    let (result, sink, channel) = run(&model.build()).await;

    assert_eq!(result.unwrap().files, ["Pump.java"]);
    assert!(channel.is_empty());
    let code = &sink.saved()[0].files["Pump.java"];
    assert!(code.contains(r#"new Transition("leave", "Transition", "Idle", "", "", "stop")"#));
}

#[tokio::test]
async fn dangling_destination_is_not_a_violation() {
    let mut model = BehaviorModelBuilder::new();
    let c = model.component("Pump");
    let idle = model.initial_state(&c, "Idle");
    model.graph_mut().insert(GraphNode::new("/detached").with_name("Gone"));
    model.transition(&c, "leave", Some(&idle), Some("/detached"), "", "");
    let (result, sink, channel) = run(&model.build()).await;

    assert!(result.is_ok());
    assert!(channel.is_empty());
    let code = &sink.saved()[0].files["Pump.java"];
    assert!(code.contains("\"Idle\", \"\""));
    assert!(!code.contains("Gone"));
}

#[tokio::test]
async fn every_violation_is_reported_before_failing() {
    let mut model = BehaviorModelBuilder::new();
    model.component("class");
    model.component("Foo");
    let foo = model.component("Foo");
    model.state(&foo, "S");
    model.state(&foo, "S");
    let (result, sink, channel) = run(&model.build()).await;

    assert!(matches!(result, Err(GenError::Validation { count: 3 })));
    assert_eq!(channel.len(), 3);
    assert_eq!(sink.created_count(), 0);
}

#[tokio::test]
async fn file_count_matches_component_count() {
    let mut model = BehaviorModelBuilder::new();
    for name in ["Alpha", "Beta", "Gamma"] {
        let c = model.component(name);
        model.state(&c, "Idle");
    }
    let (result, sink, _) = run(&model.build()).await;

    let result = result.unwrap();
    assert_eq!(result.files, ["Alpha.java", "Beta.java", "Gamma.java"]);
    assert_eq!(sink.saved()[0].files.len(), 3);
}

#[tokio::test]
async fn empty_model_saves_an_empty_artifact() {
    let graph = BehaviorModelBuilder::new().build();
    let (result, sink, _) = run(&graph).await;

    assert!(result.unwrap().files.is_empty());
    assert_eq!(sink.created_count(), 1);
}

#[tokio::test]
async fn missing_root_aborts_without_messages() {
    let graph = blinker().build();
    let sink = MemorySink::new();
    let channel = CollectingChannel::new();
    let config = GeneratorConfig::default();
    let result = generate(&graph, "/no/such/node", &sink, &channel, &config).await;

    assert!(matches!(result, Err(GenError::NodeNotFound(_))));
    assert!(channel.is_empty());
    assert_eq!(sink.created_count(), 0);
}

#[tokio::test]
async fn template_errors_abort_before_persisting() {
    let graph = blinker().build();
    let sink = MemorySink::new();
    let channel = CollectingChannel::new();
    let template = ComponentTemplate::from_source("{{ nonexistent.field }}").unwrap();
    let result = generate_with_template(
        &graph,
        ROOT_PATH,
        &sink,
        &channel,
        &GeneratorConfig::default(),
        &template,
    )
    .await;

    assert!(matches!(result, Err(GenError::Template(_))));
    assert_eq!(sink.created_count(), 0);
}

#[tokio::test]
async fn runs_are_reproducible() {
    let graph = blinker().build();
    let (first, _, _) = run(&graph).await;
    let (second, _, _) = run(&graph).await;

    assert_eq!(first.unwrap(), second.unwrap());
}

#[tokio::test]
async fn custom_template_and_directory_sink() {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("component.tera");
    std::fs::write(
        &template_path,
        "{{ name }}:{% for s in states %} {{ s.name }}{% endfor %}",
    )
    .unwrap();

    let config = GeneratorConfig {
        artifact_name: "Specs".to_string(),
        language: TargetLanguage::Java,
        template: Some(template_path),
    };
    let out = dir.path().join("out");
    let sink = DirectorySink::new(&out);
    let graph = blinker().build();

    let result = generate(&graph, ROOT_PATH, &sink, &CollectingChannel::new(), &config)
        .await
        .unwrap();

    let written = std::fs::read_to_string(out.join("Specs").join("Blinker.java")).unwrap();
    assert_eq!(written, "Blinker: Idle On Off");
    assert!(out.join("Specs").join("manifest.json").exists());
    assert_eq!(result.files, ["Blinker.java"]);
}

#[tokio::test]
async fn model_documents_drive_the_pipeline() {
    let json = r#"{"nodes": [
        {"path": "/meta/ComponentType", "attributes": {"name": "ComponentType"}},
        {"path": "/meta/StateBase", "attributes": {"name": "StateBase"}},
        {"path": "/meta/State", "attributes": {"name": "State"},
         "pointers": {"base": "/meta/StateBase"}},
        {"path": "/p", "children": ["/p/c"]},
        {"path": "/p/c", "attributes": {"name": "Lamp", "cardinality": 1},
         "metaType": "/meta/ComponentType", "children": ["/p/c/s"]},
        {"path": "/p/c/s", "attributes": {"name": "Lit"}, "metaType": "/meta/State"}
    ]}"#;
    let graph = MemoryGraph::from_json(json).unwrap();
    let sink = MemorySink::new();

    let config = GeneratorConfig::default();
    let result = generate(&graph, "/p", &sink, &CollectingChannel::new(), &config)
        .await
        .unwrap();

    assert_eq!(result.files, ["Lamp.java"]);
    let code = &sink.saved()[0].files["Lamp.java"];
    assert!(code.contains("CARDINALITY = \"1\""));
    assert!(code.contains("Lit, // State"));
}

#[tokio::test]
async fn demo_model_generates() {
    let graph = MemoryGraph::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/blinker.json"))
        .await
        .unwrap();
    let sink = MemorySink::new();

    let config = GeneratorConfig::default();
    let result = generate(&graph, ROOT_PATH, &sink, &CollectingChannel::new(), &config)
        .await
        .unwrap();

    assert_eq!(result.files, ["Blinker.java"]);
    let code = &sink.saved()[0].files["Blinker.java"];
    assert!(code.contains(
        r#"new Transition("toOn", "Transition", "Idle", "On", "g1", "switchOn")"#
    ));
    assert!(code.contains("new Guard(\"g1\", \"Guard\", \"isPowered()\")"));
}

fn single_component(name: &str) -> MemoryGraph {
    let mut model = BehaviorModelBuilder::new();
    let c = model.component(name);
    model.initial_state(&c, "Idle");
    model.build()
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn directory_output_only_holds_the_latest_run() {
    let out = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(out.path());
    let config = GeneratorConfig::default();

    for name in ["Old", "New"] {
        generate(&single_component(name), ROOT_PATH, &sink, &CollectingChannel::new(), &config)
            .await
            .unwrap();
    }

    let artifact = out.path().join("BehaviorSpecifications");
    assert_eq!(listing(&artifact), ["New.java", "manifest.json"]);
    assert_eq!(listing(out.path()), ["BehaviorSpecifications"]);
}

#[tokio::test]
async fn rejected_model_keeps_previous_directory_output() {
    let out = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(out.path());
    let config = GeneratorConfig::default();
    generate(&single_component("Old"), ROOT_PATH, &sink, &CollectingChannel::new(), &config)
        .await
        .unwrap();

    let rejected = single_component("class");
    let result = generate(&rejected, ROOT_PATH, &sink, &CollectingChannel::new(), &config).await;

    assert!(matches!(result, Err(GenError::Validation { count: 1 })));
    let artifact = out.path().join("BehaviorSpecifications");
    assert_eq!(listing(&artifact), ["Old.java", "manifest.json"]);
}

/// Sink whose artifacts fail at a chosen step
struct FailingSink {
    fail_on_save: bool,
}

struct FailingArtifact {
    fail_on_save: bool,
}

#[async_trait]
impl ArtifactSink for FailingSink {
    async fn create_artifact(&self, _name: &str) -> bsg::Result<Box<dyn Artifact>> {
        Ok(Box::new(FailingArtifact {
            fail_on_save: self.fail_on_save,
        }))
    }
}

#[async_trait]
impl Artifact for FailingArtifact {
    async fn add_files(&mut self, files: &BTreeMap<String, String>) -> bsg::Result<String> {
        if self.fail_on_save {
            Ok(bsg::sink::content_hash(files))
        } else {
            Err(GenError::Sink("disk full".to_string()))
        }
    }

    async fn save(&mut self) -> bsg::Result<String> {
        Err(GenError::Sink("disk full".to_string()))
    }
}

#[tokio::test]
async fn sink_failure_on_save_is_returned() {
    let graph = blinker().build();
    let sink = FailingSink { fail_on_save: true };
    let channel = CollectingChannel::new();

    let result = generate(&graph, ROOT_PATH, &sink, &channel, &GeneratorConfig::default()).await;

    assert!(matches!(result, Err(GenError::Sink(msg)) if msg == "disk full"));
    assert!(channel.is_empty());
}

#[tokio::test]
async fn sink_failure_on_add_files_is_returned() {
    let graph = blinker().build();
    let sink = FailingSink { fail_on_save: false };
    let channel = CollectingChannel::new();

    let result = generate(&graph, ROOT_PATH, &sink, &channel, &GeneratorConfig::default()).await;

    assert!(matches!(result, Err(GenError::Sink(msg)) if msg == "disk full"));
    assert!(channel.is_empty());
}

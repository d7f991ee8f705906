// src/lib.rs

pub mod cli;
pub mod cluster;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod snapshot;
pub mod suggest;
pub mod types;

use anyhow::Result;
use serde::Serialize;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::cluster::{Cluster, InterventionRanking, run_clustering};
use crate::config::{ParamsFile, load_and_validate};
use crate::errors::ReadinessError;
use crate::graph::{ConceptGraph, validate_graph};
use crate::pipeline::{ClassAggregate, run_readiness_pipeline};
use crate::snapshot::{ExamSnapshot, load_snapshot};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - snapshot + parameter loading
/// - graph validation
/// - the readiness pipeline
/// - clustering + intervention ranking
/// - report or summary output on stdout
pub fn run(args: CliArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let params_file = load_params(&args)?;
    let k = args.k.unwrap_or(params_file.clustering.k);

    let validation = validate_graph(&snapshot.graph);
    if !validation.ok {
        for issue in &validation.errors {
            error!(
                field = issue.field.as_deref().unwrap_or("-"),
                "graph validation: {}", issue.message
            );
        }
        let err = match validation.cycle {
            Some(cycle) => ReadinessError::CycleError(cycle.join(" -> ")),
            None => ReadinessError::SchemaError(format!(
                "{} structural error(s) in the concept graph",
                validation.errors.len()
            )),
        };
        return Err(err.into());
    }

    if args.dry_run {
        print_dry_run(&snapshot, &params_file, k);
        return Ok(());
    }

    let graph = ConceptGraph::build(&snapshot.graph)?;
    let params = params_file.pipeline_params();

    let output = run_readiness_pipeline(
        &snapshot.scores,
        &snapshot.max_scores,
        &snapshot.question_concept_map,
        &graph,
        &params,
    )?;

    if let Some(student_id) = &args.student {
        let report = report::build_student_report(
            student_id,
            &snapshot.exam_id,
            &output.graph,
            &output.results,
        )?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let clustering = run_clustering(&output.final_matrix, &output.concepts, &output.students, k);
    let interventions = cluster::rank_interventions(
        &output.final_matrix,
        &output.concepts,
        &output.graph,
        params.threshold,
    );

    info!(
        students = output.students.len(),
        concepts = output.concepts.len(),
        clusters = clustering.clusters.len(),
        "compute finished"
    );

    let summary = ComputeSummary {
        exam_id: snapshot.exam_id,
        students_processed: output.students.len(),
        concepts: output.concepts,
        class_aggregates: output.class_aggregates,
        clusters: clustering.clusters,
        assignments: clustering.assignments,
        interventions,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Class-level output of one compute invocation, as printed by the CLI.
#[derive(Debug, Serialize)]
struct ComputeSummary {
    exam_id: String,
    students_processed: usize,
    concepts: Vec<String>,
    class_aggregates: Vec<ClassAggregate>,
    clusters: Vec<Cluster>,
    assignments: std::collections::BTreeMap<String, String>,
    interventions: Vec<InterventionRanking>,
}

fn load_params(args: &CliArgs) -> Result<ParamsFile> {
    match &args.config {
        Some(path) => Ok(load_and_validate(path)?),
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                Ok(load_and_validate(&default_path)?)
            } else {
                Ok(ParamsFile::default())
            }
        }
    }
}

/// Simple dry-run output: print input shape and effective parameters.
fn print_dry_run(snapshot: &ExamSnapshot, params: &ParamsFile, k: usize) {
    println!("readydag dry-run");
    println!(
        "  parameters: alpha={} beta={} gamma={} threshold={}",
        params.parameters.alpha,
        params.parameters.beta,
        params.parameters.gamma,
        params.parameters.threshold
    );
    println!("  clustering.k = {k}");
    println!();

    println!(
        "graph: {} nodes, {} edges",
        snapshot.graph.nodes.len(),
        snapshot.graph.edges.len()
    );
    println!("students with scores: {}", snapshot.scores.len());
    println!("questions with max scores: {}", snapshot.max_scores.len());
    println!("mapped concepts ({}):", snapshot.question_concept_map.len());
    for (concept, tags) in snapshot.question_concept_map.iter() {
        println!("  - {concept}: {} tagged question(s)", tags.len());
    }
}

use readydag::errors::ReadinessError;
use readydag::graph::ConceptGraph;
use readydag::pipeline::{PipelineParams, ReadinessRecord, run_readiness_pipeline};
use readydag::types::Confidence;
use readydag_test_utils::builders::{ExamDataBuilder, GraphDataBuilder};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn record<'a>(results: &'a [ReadinessRecord], student: &str, concept: &str) -> &'a ReadinessRecord {
    results
        .iter()
        .find(|r| r.student_id == student && r.concept_id == concept)
        .unwrap_or_else(|| panic!("no record for ({student}, {concept})"))
}

/// A -> B (weight 0.5); Q1 (max 10) tags A, Q2 (max 10) tags B;
/// S1 scores Q1=8, Q2=3; defaults alpha=1, beta=0.3, gamma=0.2, threshold=0.6.
fn chain_scenario() -> (
    readydag::pipeline::ScoreTable,
    readydag::pipeline::MaxScores,
    readydag::pipeline::QuestionConceptMap,
    ConceptGraph,
) {
    let data = GraphDataBuilder::new()
        .node("A")
        .node("B")
        .edge("A", "B", 0.5)
        .build();
    let graph = ConceptGraph::build(&data).unwrap();
    let (scores, max_scores, map) = ExamDataBuilder::new()
        .max_score("Q1", 10.0)
        .max_score("Q2", 10.0)
        .tag("A", "Q1", 1.0)
        .tag("B", "Q2", 1.0)
        .score("S1", "Q1", 8.0)
        .score("S1", "Q2", 3.0)
        .build();
    (scores, max_scores, map, graph)
}

#[test]
fn worked_chain_scenario_matches_the_formulas() {
    let (scores, max_scores, map, graph) = chain_scenario();
    let params = PipelineParams::default();

    let out = run_readiness_pipeline(&scores, &max_scores, &map, &graph, &params).unwrap();

    assert_eq!(out.students, vec!["S1".to_string()]);
    assert_eq!(out.concepts, vec!["A".to_string(), "B".to_string()]);

    let a = record(&out.results, "S1", "A");
    let b = record(&out.results, "S1", "B");

    assert_close(a.direct_readiness.unwrap(), 0.8);
    assert_close(b.direct_readiness.unwrap(), 0.3);

    // A is above threshold, so B takes no penalty.
    assert_close(b.prerequisite_penalty, 0.0);
    // boost(A) = min(0.2, (0.5 * 0.4) * 0.3) = 0.06
    assert_close(a.downstream_boost, 0.06);
    assert_close(b.downstream_boost, 0.0);

    // final(A) = 1*0.8 - 0.3*0 + 0.2*0.06 = 0.812
    assert_close(a.final_readiness, 0.812);
    assert_close(b.final_readiness, 0.3);

    // Matrix view agrees with the records.
    assert_close(out.final_matrix[0][0], 0.812);
    assert_close(out.final_matrix[0][1], 0.3);
}

#[test]
fn trace_itemizes_only_positive_gaps_upstream_and_all_children_downstream() {
    let (scores, max_scores, map, graph) = chain_scenario();
    let out = run_readiness_pipeline(
        &scores,
        &max_scores,
        &map,
        &graph,
        &PipelineParams::default(),
    )
    .unwrap();

    // A (0.8) is above threshold, so B's trace has no upstream items.
    let b = record(&out.results, "S1", "B");
    assert!(b.explanation_trace.upstream_penalties.is_empty());

    // A's trace itemizes its one child regardless of contribution size.
    let a = record(&out.results, "S1", "A");
    assert_eq!(a.explanation_trace.downstream_boosts.len(), 1);
    let boost = &a.explanation_trace.downstream_boosts[0];
    assert_eq!(boost.concept_id, "B");
    assert_close(boost.validation_weight, 0.2);
    assert_close(boost.boost_contribution, 0.06);

    let formula = &a.explanation_trace.formula;
    assert_close(formula.direct_component, 0.8);
    assert_close(formula.penalty_component, 0.0);
    assert_close(formula.boost_component, 0.2 * 0.06);
    assert_close(formula.final_readiness, 0.812);
}

#[test]
fn untagged_concept_stays_absent_but_still_gets_a_result() {
    let data = GraphDataBuilder::new()
        .node("A")
        .node("B")
        .edge("A", "B", 1.0)
        .build();
    let graph = ConceptGraph::build(&data).unwrap();
    // Only A has a tagged question; B is "inferred only".
    let (scores, max_scores, map) = ExamDataBuilder::new()
        .max_score("Q1", 10.0)
        .tag("A", "Q1", 1.0)
        .score("S1", "Q1", 10.0)
        .build();

    let out = run_readiness_pipeline(
        &scores,
        &max_scores,
        &map,
        &graph,
        &PipelineParams::default(),
    )
    .unwrap();

    let b = record(&out.results, "S1", "B");
    assert!(b.direct_readiness.is_none());
    assert!(b.explanation_trace.direct_readiness.is_none());
    // Absent direct feeds 0.0 into the final formula; A is strong so no
    // penalty applies, leaving final(B) at 0.
    assert_close(b.prerequisite_penalty, 0.0);
    assert_close(b.final_readiness, 0.0);
}

#[test]
fn zero_max_score_normalizes_to_zero() {
    let data = GraphDataBuilder::new().node("A").build();
    let graph = ConceptGraph::build(&data).unwrap();
    let (scores, max_scores, map) = ExamDataBuilder::new()
        .max_score("Q1", 0.0)
        .tag("A", "Q1", 1.0)
        .score("S1", "Q1", 5.0)
        .build();

    let out = run_readiness_pipeline(
        &scores,
        &max_scores,
        &map,
        &graph,
        &PipelineParams::default(),
    )
    .unwrap();

    let a = record(&out.results, "S1", "A");
    assert_close(a.direct_readiness.unwrap(), 0.0);
}

#[test]
fn no_scores_is_an_input_error() {
    let data = GraphDataBuilder::new().node("A").build();
    let graph = ConceptGraph::build(&data).unwrap();
    let (_, max_scores, map) = ExamDataBuilder::new()
        .max_score("Q1", 10.0)
        .tag("A", "Q1", 1.0)
        .build();
    let scores = readydag::pipeline::ScoreTable::new();

    match run_readiness_pipeline(&scores, &max_scores, &map, &graph, &PipelineParams::default()) {
        Err(ReadinessError::InputError(msg)) => assert!(msg.contains("score")),
        other => panic!("expected InputError, got {other:?}"),
    }
}

#[test]
fn no_mapping_is_an_input_error() {
    let data = GraphDataBuilder::new().node("A").build();
    let graph = ConceptGraph::build(&data).unwrap();
    let (scores, max_scores, _) = ExamDataBuilder::new()
        .max_score("Q1", 10.0)
        .score("S1", "Q1", 5.0)
        .build();
    let map = readydag::pipeline::QuestionConceptMap::new();

    match run_readiness_pipeline(&scores, &max_scores, &map, &graph, &PipelineParams::default()) {
        Err(ReadinessError::InputError(msg)) => assert!(msg.contains("mapping")),
        other => panic!("expected InputError, got {other:?}"),
    }
}

#[test]
fn empty_graph_falls_back_to_isolated_mapped_concepts() {
    let graph = ConceptGraph::build(&GraphDataBuilder::new().build()).unwrap();
    let (scores, max_scores, map) = ExamDataBuilder::new()
        .max_score("Q1", 10.0)
        .max_score("Q2", 10.0)
        .tag("beta", "Q2", 1.0)
        .tag("alpha", "Q1", 1.0)
        .score("S1", "Q1", 8.0)
        .score("S1", "Q2", 4.0)
        .build();

    let out = run_readiness_pipeline(
        &scores,
        &max_scores,
        &map,
        &graph,
        &PipelineParams::default(),
    )
    .unwrap();

    assert_eq!(out.concepts, vec!["alpha".to_string(), "beta".to_string()]);
    assert_eq!(out.graph.edge_count(), 0);
    assert_close(record(&out.results, "S1", "alpha").final_readiness, 0.8);
}

#[test]
fn penalty_accumulates_unnormalized_across_many_parents() {
    // Ten weak parents, each with a full-weight edge into X: penalty 6.0
    // before the clamp absorbs it.
    let mut builder = GraphDataBuilder::new().node("X");
    let mut exam = ExamDataBuilder::new();
    for i in 0..10 {
        let parent = format!("P{i}");
        let question = format!("Q{i}");
        builder = builder.node(&parent).edge(&parent, "X", 1.0);
        exam = exam
            .max_score(&question, 10.0)
            .tag(&parent, &question, 1.0)
            .score("S1", &question, 0.0);
    }
    let graph = ConceptGraph::build(&builder.build()).unwrap();
    let (scores, max_scores, map) = exam.build();

    let out = run_readiness_pipeline(
        &scores,
        &max_scores,
        &map,
        &graph,
        &PipelineParams::default(),
    )
    .unwrap();

    let x = record(&out.results, "S1", "X");
    assert_close(x.prerequisite_penalty, 6.0);
    assert_close(x.final_readiness, 0.0);
    assert_eq!(x.explanation_trace.upstream_penalties.len(), 10);
}

#[test]
fn boost_cap_holds_with_many_strong_children() {
    let mut builder = GraphDataBuilder::new().node("P");
    let mut exam = ExamDataBuilder::new();
    for i in 0..8 {
        let child = format!("D{i}");
        let question = format!("Q{i}");
        builder = builder.node(&child).edge("P", &child, 1.0);
        exam = exam
            .max_score(&question, 10.0)
            .tag(&child, &question, 1.0)
            .score("S1", &question, 10.0);
    }
    let graph = ConceptGraph::build(&builder.build()).unwrap();
    let (scores, max_scores, map) = exam.build();

    let out = run_readiness_pipeline(
        &scores,
        &max_scores,
        &map,
        &graph,
        &PipelineParams::default(),
    )
    .unwrap();

    // Uncapped sum would be 8 * 0.4 = 3.2.
    let p = record(&out.results, "S1", "P");
    assert_close(p.downstream_boost, 0.2);
}

#[test]
fn direct_readiness_weights_questions_by_tag_weight() {
    let data = GraphDataBuilder::new().node("A").build();
    let graph = ConceptGraph::build(&data).unwrap();
    let (scores, max_scores, map) = ExamDataBuilder::new()
        .max_score("Q1", 10.0)
        .max_score("Q2", 10.0)
        .tag("A", "Q1", 3.0)
        .tag("A", "Q2", 1.0)
        .score("S1", "Q1", 10.0)
        .score("S1", "Q2", 0.0)
        .build();

    let out = run_readiness_pipeline(
        &scores,
        &max_scores,
        &map,
        &graph,
        &PipelineParams::default(),
    )
    .unwrap();

    // (3*1.0 + 1*0.0) / 4 = 0.75
    assert_close(record(&out.results, "S1", "A").direct_readiness.unwrap(), 0.75);
}

#[test]
fn unattempted_questions_are_left_out_of_the_weighted_average() {
    let data = GraphDataBuilder::new().node("A").build();
    let graph = ConceptGraph::build(&data).unwrap();
    let (scores, max_scores, map) = ExamDataBuilder::new()
        .max_score("Q1", 10.0)
        .max_score("Q2", 10.0)
        .tag("A", "Q1", 1.0)
        .tag("A", "Q2", 1.0)
        .score("S1", "Q1", 6.0)
        .build();

    let out = run_readiness_pipeline(
        &scores,
        &max_scores,
        &map,
        &graph,
        &PipelineParams::default(),
    )
    .unwrap();

    // Only the attempted Q1 counts: 0.6, not 0.3.
    assert_close(record(&out.results, "S1", "A").direct_readiness.unwrap(), 0.6);
}

mod confidence {
    use super::*;

    fn pipeline_confidence(
        exam: ExamDataBuilder,
        graph: &ConceptGraph,
        concept: &str,
    ) -> Confidence {
        let (scores, max_scores, map) = exam.build();
        let out = run_readiness_pipeline(
            &scores,
            &max_scores,
            &map,
            graph,
            &PipelineParams::default(),
        )
        .unwrap();
        record(&out.results, "S1", concept).confidence
    }

    #[test]
    fn all_factors_high_gives_high() {
        let graph = ConceptGraph::build(&GraphDataBuilder::new().node("A").build()).unwrap();
        // 3 tagged questions (F1 high), 12 total points (F2 high), isolated
        // concept (F3 variance 0, high).
        let exam = ExamDataBuilder::new()
            .max_score("Q1", 4.0)
            .max_score("Q2", 4.0)
            .max_score("Q3", 4.0)
            .tag("A", "Q1", 1.0)
            .tag("A", "Q2", 1.0)
            .tag("A", "Q3", 1.0)
            .score("S1", "Q1", 4.0)
            .score("S1", "Q2", 4.0)
            .score("S1", "Q3", 4.0);
        assert_eq!(pipeline_confidence(exam, &graph, "A"), Confidence::High);
    }

    #[test]
    fn two_tagged_questions_cap_at_medium() {
        let graph = ConceptGraph::build(&GraphDataBuilder::new().node("A").build()).unwrap();
        let exam = ExamDataBuilder::new()
            .max_score("Q1", 5.0)
            .max_score("Q2", 5.0)
            .tag("A", "Q1", 1.0)
            .tag("A", "Q2", 1.0)
            .score("S1", "Q1", 5.0)
            .score("S1", "Q2", 5.0);
        assert_eq!(pipeline_confidence(exam, &graph, "A"), Confidence::Medium);
    }

    #[test]
    fn one_tagged_question_caps_at_low() {
        let graph = ConceptGraph::build(&GraphDataBuilder::new().node("A").build()).unwrap();
        let exam = ExamDataBuilder::new()
            .max_score("Q1", 10.0)
            .tag("A", "Q1", 1.0)
            .score("S1", "Q1", 10.0);
        assert_eq!(pipeline_confidence(exam, &graph, "A"), Confidence::Low);
    }

    #[test]
    fn low_total_points_cap_at_low_even_with_many_questions() {
        let graph = ConceptGraph::build(&GraphDataBuilder::new().node("A").build()).unwrap();
        // F1 high (3 questions) but only 3 total points (F2 low).
        let exam = ExamDataBuilder::new()
            .max_score("Q1", 1.0)
            .max_score("Q2", 1.0)
            .max_score("Q3", 1.0)
            .tag("A", "Q1", 1.0)
            .tag("A", "Q2", 1.0)
            .tag("A", "Q3", 1.0)
            .score("S1", "Q1", 1.0)
            .score("S1", "Q2", 1.0)
            .score("S1", "Q3", 1.0);
        assert_eq!(pipeline_confidence(exam, &graph, "A"), Confidence::Low);
    }

    #[test]
    fn neighbor_variance_caps_at_medium() {
        // A's own factors are high; its neighbor B has mean direct 0.0 while
        // A sits at 1.0. Variance of [1.0, 0.0] = 0.25 -> F3 medium.
        let data = GraphDataBuilder::new()
            .node("A")
            .node("B")
            .edge("A", "B", 0.5)
            .build();
        let graph = ConceptGraph::build(&data).unwrap();
        let exam = ExamDataBuilder::new()
            .max_score("Q1", 4.0)
            .max_score("Q2", 4.0)
            .max_score("Q3", 4.0)
            .max_score("Q4", 10.0)
            .tag("A", "Q1", 1.0)
            .tag("A", "Q2", 1.0)
            .tag("A", "Q3", 1.0)
            .tag("B", "Q4", 1.0)
            .score("S1", "Q1", 4.0)
            .score("S1", "Q2", 4.0)
            .score("S1", "Q3", 4.0)
            .score("S1", "Q4", 0.0);
        assert_eq!(pipeline_confidence(exam, &graph, "A"), Confidence::Medium);
    }

    #[test]
    fn extreme_neighbor_variance_caps_at_low() {
        // Bonus points push B's mean direct to 3.0; variance of [1.0, 3.0]
        // is 1.0 -> F3 low.
        let data = GraphDataBuilder::new()
            .node("A")
            .node("B")
            .edge("A", "B", 0.5)
            .build();
        let graph = ConceptGraph::build(&data).unwrap();
        let exam = ExamDataBuilder::new()
            .max_score("Q1", 4.0)
            .max_score("Q2", 4.0)
            .max_score("Q3", 4.0)
            .max_score("Q4", 10.0)
            .tag("A", "Q1", 1.0)
            .tag("A", "Q2", 1.0)
            .tag("A", "Q3", 1.0)
            .tag("B", "Q4", 1.0)
            .score("S1", "Q1", 4.0)
            .score("S1", "Q2", 4.0)
            .score("S1", "Q3", 4.0)
            .score("S1", "Q4", 30.0);
        assert_eq!(pipeline_confidence(exam, &graph, "A"), Confidence::Low);
    }
}

mod aggregates {
    use super::*;

    #[test]
    fn class_aggregates_cover_mean_median_std_and_below_count() {
        let graph = ConceptGraph::build(&GraphDataBuilder::new().node("A").build()).unwrap();
        let (scores, max_scores, map) = ExamDataBuilder::new()
            .max_score("Q1", 10.0)
            .tag("A", "Q1", 1.0)
            .score("S1", "Q1", 2.0)
            .score("S2", "Q1", 8.0)
            .build();

        let out = run_readiness_pipeline(
            &scores,
            &max_scores,
            &map,
            &graph,
            &PipelineParams::default(),
        )
        .unwrap();

        assert_eq!(out.class_aggregates.len(), 1);
        let agg = &out.class_aggregates[0];
        assert_eq!(agg.concept_id, "A");
        // finals are [0.2, 0.8]
        assert_close(agg.mean_readiness, 0.5);
        assert_close(agg.median_readiness, 0.5);
        assert_close(agg.std_readiness, 0.3);
        assert_eq!(agg.below_threshold_count, 1);
    }

    #[test]
    fn median_of_odd_count_is_the_middle_value() {
        let graph = ConceptGraph::build(&GraphDataBuilder::new().node("A").build()).unwrap();
        let (scores, max_scores, map) = ExamDataBuilder::new()
            .max_score("Q1", 10.0)
            .tag("A", "Q1", 1.0)
            .score("S1", "Q1", 1.0)
            .score("S2", "Q1", 7.0)
            .score("S3", "Q1", 10.0)
            .build();

        let out = run_readiness_pipeline(
            &scores,
            &max_scores,
            &map,
            &graph,
            &PipelineParams::default(),
        )
        .unwrap();

        assert_close(out.class_aggregates[0].median_readiness, 0.7);
    }
}

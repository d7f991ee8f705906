// src/report/mod.rs

//! Per-student report building: colored personal graph, top weak concepts,
//! and a topologically ordered study plan.

pub mod builder;

pub use builder::{
    ColoredGraph, ColoredNode, ReadinessSummary, StudentReport, StudyPlanEntry, WeakConcept,
    build_student_report,
};

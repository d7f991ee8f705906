use readydag::graph::{GraphData, GraphEdge, GraphNode};
use readydag::pipeline::{MaxScores, QuestionConceptMap, QuestionTag, ScoreTable};

/// Builder for [`GraphData`] to simplify test setup.
pub struct GraphDataBuilder {
    data: GraphData,
}

impl GraphDataBuilder {
    pub fn new() -> Self {
        Self {
            data: GraphData::default(),
        }
    }

    /// Add a node whose label equals its id.
    pub fn node(mut self, id: &str) -> Self {
        self.data.nodes.push(GraphNode::new(id, id));
        self
    }

    pub fn labeled_node(mut self, id: &str, label: &str) -> Self {
        self.data.nodes.push(GraphNode::new(id, label));
        self
    }

    pub fn edge(mut self, source: &str, target: &str, weight: f64) -> Self {
        self.data.edges.push(GraphEdge::new(source, target, weight));
        self
    }

    pub fn build(self) -> GraphData {
        self.data
    }
}

impl Default for GraphDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the pipeline's score inputs: scores, max scores, and the
/// question-concept map.
pub struct ExamDataBuilder {
    scores: ScoreTable,
    max_scores: MaxScores,
    question_concept_map: QuestionConceptMap,
}

impl ExamDataBuilder {
    pub fn new() -> Self {
        Self {
            scores: ScoreTable::new(),
            max_scores: MaxScores::new(),
            question_concept_map: QuestionConceptMap::new(),
        }
    }

    pub fn score(mut self, student: &str, question: &str, value: f64) -> Self {
        self.scores
            .entry(student.to_string())
            .or_default()
            .insert(question.to_string(), value);
        self
    }

    pub fn max_score(mut self, question: &str, max: f64) -> Self {
        self.max_scores.insert(question.to_string(), max);
        self
    }

    /// Tag `question` to `concept` with the given weight.
    pub fn tag(mut self, concept: &str, question: &str, weight: f64) -> Self {
        self.question_concept_map
            .entry(concept.to_string())
            .or_default()
            .push(QuestionTag::new(question, weight));
        self
    }

    pub fn build(self) -> (ScoreTable, MaxScores, QuestionConceptMap) {
        (self.scores, self.max_scores, self.question_concept_map)
    }
}

impl Default for ExamDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

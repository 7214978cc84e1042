use crate::report::ProjectIdea;

#[derive(Debug, Clone)]
pub enum AppEvent {
    SectionResolved { id: String },
    SectionFailed { id: String },
    IdeaEvaluated(ProjectIdea),
}

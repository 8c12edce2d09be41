// Semantic coupling: call-site counting and edge annotation

pub mod annotator;
pub mod call_sites;

pub use annotator::{AnnotationOutcome, CouplingAnnotator};
pub use call_sites::count_call_sites;

//! Reconciles highlights with lookup history and imports them as notes.

pub mod assembler;
pub mod matcher;
pub mod pipeline;
pub mod report;

pub use assembler::{NoteAssembler, NoteQueue, PendingNote};
pub use matcher::{Reconciled, find_lookup, reconcile};
pub use pipeline::{Collaborators, import, resolve_layout, run};
pub use report::ImportReport;

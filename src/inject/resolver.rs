//! Ordered-fallback resolution of injectable fields.

use tracing::{debug, error, warn};

use super::{Injectable, InjectableField, Lookup, ValueSource};
use crate::error::{AssignError, SourceError};

/// Something that went wrong while resolving one field.
#[derive(Debug)]
pub enum Diagnostic {
    /// No source produced an acceptable value; the field kept its default.
    Unresolved { field: &'static str, lookup: &'static str },
    /// A source produced a value the field rejected.
    Rejected {
        field: &'static str,
        source: &'static str,
        error: AssignError,
    },
    /// A source failed outright.
    SourceFailed { field: &'static str, error: SourceError },
}

impl Diagnostic {
    pub fn field(&self) -> &'static str {
        match self {
            Diagnostic::Unresolved { field, .. }
            | Diagnostic::Rejected { field, .. }
            | Diagnostic::SourceFailed { field, .. } => field,
        }
    }
}

/// Outcome of resolving one instance.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    /// `(field, winning source)` for every assigned field.
    pub resolved: Vec<(&'static str, &'static str)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolutionReport {
    /// Name of the source that filled `field`, if it was filled.
    pub fn source_of(&self, field: &str) -> Option<&'static str> {
        self.resolved
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, s)| *s)
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::Unresolved { field, .. } => Some(*field),
            _ => None,
        })
    }
}

/// Fills injectable fields from an ordered list of sources.
///
/// For each field the sources are tried in order and the first value the
/// field accepts wins. Empty results never overwrite anything.
pub struct FieldResolver<'a> {
    sources: Vec<&'a dyn ValueSource>,
}

impl<'a> FieldResolver<'a> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source with lower priority than every source added so far.
    pub fn source(mut self, source: &'a dyn ValueSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Resolve every injectable field of `target` in place.
    pub fn resolve<C: Injectable>(&self, target: &mut C) -> ResolutionReport {
        let mut report = ResolutionReport::default();
        for field in C::injectable_fields() {
            match self.resolve_field(target, field, &mut report) {
                Some(source) => report.resolved.push((field.name, source)),
                None => {
                    warn!(
                        field = field.name,
                        lookup = field.lookup_name(),
                        ty = field.type_name,
                        "unable to inject field"
                    );
                    report.diagnostics.push(Diagnostic::Unresolved {
                        field: field.name,
                        lookup: field.lookup_name(),
                    });
                }
            }
        }
        report
    }

    fn resolve_field<C: Injectable>(
        &self,
        target: &mut C,
        field: &InjectableField,
        report: &mut ResolutionReport,
    ) -> Option<&'static str> {
        let key = Lookup {
            name: field.lookup_name(),
            type_id: (field.type_id)(),
        };

        for source in &self.sources {
            let value = match source.lookup(&key) {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(e) => {
                    error!(field = field.name, source = source.name(), error = %e, "value source failed");
                    report.diagnostics.push(Diagnostic::SourceFailed {
                        field: field.name,
                        error: e,
                    });
                    continue;
                }
            };

            match target.assign(field.name, value) {
                Ok(()) => {
                    debug!(field = field.name, source = source.name(), "injected field");
                    return Some(source.name());
                }
                Err(e) => {
                    error!(field = field.name, source = source.name(), error = %e, "failed to inject field");
                    report.diagnostics.push(Diagnostic::Rejected {
                        field: field.name,
                        source: source.name(),
                        error: e,
                    });
                }
            }
        }
        None
    }
}

impl Default for FieldResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

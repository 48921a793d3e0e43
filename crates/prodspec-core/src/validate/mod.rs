//! Pluggable layout validation.
//!
//! A [`Validators`] set holds per-kind entity checks and whole-layout checks.
//! One pass visits every kind in schema order and every entity in insertion
//! order, then runs the layout checks. Every failure is collected; the pass
//! fails once, at the end, with all of them.

pub mod rules;

use crate::graph::{EntityKey, EntityView, Layout};
use prodspec_schema::types::EntityKind;
use std::fmt;
use thiserror::Error as ThisError;

///
/// ValidateError
///

#[derive(Debug, ThisError)]
pub enum ValidateError {
    #[error("validation failed with {} issue(s):\n{}", .0.len(), .0)]
    ValidationFailed(Issues),
}

///
/// Subject
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Subject {
    Entity(EntityKey),
    Layout,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(key) => write!(f, "{key}"),
            Self::Layout => f.write_str("layout"),
        }
    }
}

///
/// Issue
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Issue {
    pub subject: Subject,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

///
/// Issues
/// Validation failures in discovery order.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Issues(Vec<Issue>);

impl Issues {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn entity(&mut self, key: EntityKey, message: impl fmt::Display) {
        self.0.push(Issue {
            subject: Subject::Entity(key),
            message: message.to_string(),
        });
    }

    pub fn layout(&mut self, message: impl fmt::Display) {
        self.0.push(Issue {
            subject: Subject::Layout,
            message: message.to_string(),
        });
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Issue> {
        self.0.first()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn result(self) -> Result<(), ValidateError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidateError::ValidationFailed(self))
        }
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

///
/// EntityValidator
///

pub trait EntityValidator {
    fn validate(&self, entity: EntityView<'_>) -> Result<(), String>;
}

impl<F> EntityValidator for F
where
    F: Fn(EntityView<'_>) -> Result<(), String>,
{
    fn validate(&self, entity: EntityView<'_>) -> Result<(), String> {
        self(entity)
    }
}

///
/// LayoutValidator
/// Whole-graph check; records any number of issues.
///

pub trait LayoutValidator {
    fn validate(&self, layout: &Layout, issues: &mut Issues);
}

impl<F> LayoutValidator for F
where
    F: Fn(&Layout, &mut Issues),
{
    fn validate(&self, layout: &Layout, issues: &mut Issues) {
        self(layout, issues);
    }
}

///
/// Validators
///

pub struct Validators {
    entity: [Vec<Box<dyn EntityValidator>>; EntityKind::ALL.len()],
    layout: Vec<Box<dyn LayoutValidator>>,
}

impl Default for Validators {
    fn default() -> Self {
        Self::new()
    }
}

impl Validators {
    /// An empty set; every layout passes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entity: std::array::from_fn(|_| Vec::new()),
            layout: Vec::new(),
        }
    }

    /// Register a check for every entity of `kind`.
    pub fn add_entity(
        &mut self,
        kind: EntityKind,
        validator: impl EntityValidator + 'static,
    ) -> &mut Self {
        self.entity[kind.index()].push(Box::new(validator));
        self
    }

    /// Register a whole-layout check, run after every entity check.
    pub fn add_layout(&mut self, validator: impl LayoutValidator + 'static) -> &mut Self {
        self.layout.push(Box::new(validator));
        self
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entity.iter().map(Vec::len).sum::<usize>() + self.layout.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every check and collect every failure.
    pub fn validate(&self, layout: &Layout) -> Result<(), ValidateError> {
        let mut issues = Issues::new();

        for kind in EntityKind::ALL {
            let checks = &self.entity[kind.index()];
            if checks.is_empty() {
                continue;
            }

            for view in layout.views(kind) {
                for check in checks {
                    if let Err(message) = check.validate(view) {
                        issues.entity(view.key(), message);
                    }
                }
            }
        }

        for check in &self.layout {
            check.validate(layout, &mut issues);
        }

        tracing::debug!(
            checks = self.len(),
            issues = issues.len(),
            "validation pass finished"
        );

        issues.result()
    }
}

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validators")
            .field("checks", &self.len())
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_accepts_any_layout() {
        let mut layout = Layout::new();
        layout.create(EntityKind::As, "110").unwrap();

        assert!(Validators::new().validate(&layout).is_ok());
    }

    #[test]
    fn every_failure_is_collected_in_discovery_order() {
        let mut layout = Layout::new();
        layout.create(EntityKind::Isd, "1").unwrap();
        layout.create(EntityKind::As, "111").unwrap();
        layout.create(EntityKind::As, "110").unwrap();

        let mut validators = Validators::new();
        validators
            .add_layout(|_: &Layout, issues: &mut Issues| issues.layout("graph check"))
            .add_entity(EntityKind::Isd, |v: EntityView<'_>| -> Result<(), String> {
                Err(format!("isd {} rejected", v.id()))
            })
            .add_entity(EntityKind::As, |v: EntityView<'_>| -> Result<(), String> {
                Err(format!("as {} rejected", v.id()))
            });

        let Err(ValidateError::ValidationFailed(issues)) = validators.validate(&layout) else {
            panic!("expected a failure");
        };

        let lines: Vec<_> = issues.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                "AS '111': as 111 rejected",
                "AS '110': as 110 rejected",
                "ISD '1': isd 1 rejected",
                "layout: graph check",
            ]
        );
        assert_eq!(
            issues.first().map(|i| &i.subject),
            Some(&Subject::Entity(EntityKey::new(EntityKind::As, "111")))
        );
    }

    #[test]
    fn error_message_lists_issues() {
        let mut issues = Issues::new();
        issues.layout("one");
        issues.layout("two");

        let err = issues.result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed with 2 issue(s):\nlayout: one\nlayout: two"
        );
    }
}

use std::{collections::BTreeMap, fmt};

///
/// ErrorTree
///
/// Route-aware error accumulator. Messages are attached either to the root
/// or to a named child route (for example a kind name), so one validation pass
/// can report every problem at once.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message at the root of this tree.
    pub fn add(&mut self, message: impl fmt::Display) {
        self.messages.push(message.to_string());
    }

    /// Attach another tree under `route`; empty trees are dropped.
    pub fn merge(&mut self, route: impl Into<String>, other: Self) {
        if other.is_empty() {
            return;
        }

        let child = self.children.entry(route.into()).or_default();
        child.messages.extend(other.messages);
        for (key, tree) in other.children {
            child.merge(key, tree);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    /// Number of messages in the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    /// Flatten to `(route, message)` pairs; routes are dot separated.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);

        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }
        for (key, child) in &self.children {
            let route = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            child.flatten_into(&route, out);
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise the tree itself.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (route, message)) in self.flatten().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if route.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{route}: {message}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

/// Record a formatted message on an [`ErrorTree`].
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {{
        $errs.add(format!($($arg)*));
    }};
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_ok() {
        assert!(ErrorTree::new().result().is_ok());

        let mut tree = ErrorTree::new();
        tree.merge("AS", ErrorTree::new());
        assert!(tree.is_empty(), "merging an empty tree records nothing");
    }

    #[test]
    fn routes_flatten_in_sorted_order() {
        let mut tree = ErrorTree::new();
        tree.add("root problem");

        let mut site = ErrorTree::new();
        site.add("second");
        tree.merge("Site", site);

        let mut nested = ErrorTree::new();
        nested.add("first");
        err!(nested, "slot '{}' missing", "BR");
        tree.merge("AS", nested);

        assert_eq!(tree.len(), 4);
        assert_eq!(
            tree.to_string(),
            "root problem\nAS: first\nAS: slot 'BR' missing\nSite: second"
        );
        assert!(tree.result().is_err());
    }
}

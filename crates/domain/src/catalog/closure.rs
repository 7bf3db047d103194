use std::collections::{BTreeSet, HashMap};

use rolegate_core::{AppError, AppResult};

use super::PermissionCatalog;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

impl PermissionCatalog {
    /// Expands `roots` through declared dependencies until fixpoint.
    ///
    /// Uses an iterative depth-first walk with in-progress/done marking, so the
    /// cost is linear in the reachable graph and deep chains cannot exhaust
    /// the call stack. Names unknown to the catalog are kept and contribute no
    /// dependencies.
    pub fn dependency_closure<I, S>(&self, roots: I) -> AppResult<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut marks: HashMap<String, Mark> = HashMap::new();
        let mut closed = BTreeSet::new();

        for root in roots {
            let root = root.as_ref();
            if marks.contains_key(root) {
                continue;
            }

            marks.insert(root.to_owned(), Mark::InProgress);
            let mut stack: Vec<(String, usize)> = vec![(root.to_owned(), 0)];

            while let Some((node, cursor)) = stack.last().cloned() {
                let Some(dependency) = self.dependencies_of(node.as_str()).get(cursor) else {
                    marks.insert(node.clone(), Mark::Done);
                    closed.insert(node);
                    stack.pop();
                    continue;
                };

                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }

                match marks.get(dependency.as_str()) {
                    Some(Mark::Done) => {}
                    Some(Mark::InProgress) => {
                        let start = stack
                            .iter()
                            .position(|(name, _)| name == dependency)
                            .unwrap_or_default();
                        let mut path: Vec<String> =
                            stack[start..].iter().map(|(name, _)| name.clone()).collect();
                        path.push(dependency.clone());
                        return Err(AppError::DependencyCycle { path });
                    }
                    None => {
                        marks.insert(dependency.clone(), Mark::InProgress);
                        stack.push((dependency.clone(), 0));
                    }
                }
            }
        }

        Ok(closed)
    }

    /// Returns the first dependency cycle in the catalog, if any.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let names = self
            .all_permissions()
            .iter()
            .map(|definition| definition.name());
        match self.dependency_closure(names) {
            Err(AppError::DependencyCycle { path }) => Some(path),
            _ => None,
        }
    }
}

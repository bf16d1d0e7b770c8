//! Internal dependency graph and transitive-closure computation.
//!
//! The graph restricts each package's edges to declared dependencies inside
//! the internal namespace; external names stay on the manifest but never
//! enter the graph. Built once per run from the scan result, immutable
//! thereafter.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::RepoConfig;
use crate::scan::PackageSet;

/// Transitive closures, package name → every reachable internal dependency.
pub type ClosureSet = BTreeMap<String, BTreeSet<String>>;

/// Adjacency map of direct internal dependencies, one node per package.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    direct: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build the graph from scanned manifests. Pure function of the scan.
    #[must_use]
    pub fn build(packages: &PackageSet, config: &RepoConfig) -> Self {
        let mut direct = BTreeMap::new();
        for pkg in packages.iter() {
            let edges: BTreeSet<String> = pkg
                .manifest
                .dependencies()
                .keys()
                .filter(|name| config.is_internal(name))
                .cloned()
                .collect();
            direct.insert(pkg.name().to_string(), edges);
        }
        Self { direct }
    }

    /// Whether the graph has a node for this package.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.direct.contains_key(name)
    }

    /// Direct internal dependencies of one package.
    #[must_use]
    pub fn direct(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.direct.get(name)
    }

    /// Compute the transitive closure of every node.
    ///
    /// Global fixed point: each pass reads an immutable snapshot of the
    /// previous pass's closures and unions, for each node, the closures of
    /// its current members. A pass that grows no set anywhere terminates
    /// the loop. Every set is monotonically non-decreasing and bounded by
    /// the package count, so this converges in at most `|packages|` passes.
    ///
    /// Cycles are not detected: mutually reachable nodes all converge to
    /// the same closure, the union of everything reachable from the cycle.
    #[must_use]
    pub fn closures(&self) -> ClosureSet {
        let mut closure = self.direct.clone();

        loop {
            let snapshot = closure.clone();
            let mut grew = false;

            for members in closure.values_mut() {
                let current: Vec<String> = members.iter().cloned().collect();
                for dep in &current {
                    if let Some(dep_closure) = snapshot.get(dep) {
                        for next in dep_closure {
                            if members.insert(next.clone()) {
                                grew = true;
                            }
                        }
                    }
                }
            }

            if !grew {
                break;
            }
        }

        closure
    }
}

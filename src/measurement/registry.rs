//! A named feature catalog plus dependency resolution for composites (spec
//! §4.10, Design Note "composite measurement features and dependency
//! ordering": treat features as nodes in a DAG, compute topological order
//! at request time, reject cycles).
//!
//! Grounded on the teacher's `VsfType`-style enum-over-boxed-payload
//! dispatch, here wrapping one boxed trait object per [`FeatureKind`]
//! rather than a raw numeric tag.

use std::collections::HashMap;

use crate::error::{PfError, PfResult, ResultExt};
use crate::measurement::feature::{
    ChainCodeFeature, CompositeFeature, ConvexHullFeature, Feature, FeatureKind, ImageBasedFeature, LineBasedFeature, PolygonFeature,
};

/// One registered feature, tagged by which per-kind trait it implements.
pub enum RegisteredFeature {
    Line(Box<dyn LineBasedFeature>),
    Image(Box<dyn ImageBasedFeature>),
    ChainCode(Box<dyn ChainCodeFeature>),
    Polygon(Box<dyn PolygonFeature>),
    ConvexHull(Box<dyn ConvexHullFeature>),
    Composite(Box<dyn CompositeFeature>),
}

impl RegisteredFeature {
    fn base(&self) -> &dyn Feature {
        match self {
            RegisteredFeature::Line(f) => f.as_ref(),
            RegisteredFeature::Image(f) => f.as_ref(),
            RegisteredFeature::ChainCode(f) => f.as_ref(),
            RegisteredFeature::Polygon(f) => f.as_ref(),
            RegisteredFeature::ConvexHull(f) => f.as_ref(),
            RegisteredFeature::Composite(f) => f.as_ref(),
        }
    }

    pub fn name(&self) -> &str {
        self.base().name()
    }

    pub fn kind(&self) -> FeatureKind {
        self.base().kind()
    }

    pub fn needs_grey_value(&self) -> bool {
        self.base().needs_grey_value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Done,
}

/// A named catalog of features, keyed by name, plus the topological
/// dependency resolution composites need.
#[derive(Default)]
pub struct FeatureRegistry {
    features: HashMap<String, RegisteredFeature>,
}

impl FeatureRegistry {
    pub fn new() -> FeatureRegistry {
        FeatureRegistry::default()
    }

    pub fn register(&mut self, feature: RegisteredFeature) -> PfResult<()> {
        let name = feature.name().to_string();
        if self.features.contains_key(&name) {
            return Err(PfError::FeatureAlreadyPresent(format!("feature {name} already registered"))).context("register");
        }
        self.features.insert(name, feature);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredFeature> {
        self.features.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Mutable access to several line-based features at once, in `names`'
    /// order, for the engine's shared scan pass. Names absent or not
    /// line-based are silently skipped.
    pub fn line_features_mut(&mut self, names: &[String]) -> Vec<&mut Box<dyn LineBasedFeature>> {
        let wanted: std::collections::HashSet<&str> = names.iter().map(|s| s.as_str()).collect();
        let mut found: HashMap<String, &mut Box<dyn LineBasedFeature>> = HashMap::new();
        for (name, feature) in self.features.iter_mut() {
            if wanted.contains(name.as_str()) {
                if let RegisteredFeature::Line(f) = feature {
                    found.insert(name.clone(), f);
                }
            }
        }
        names.iter().filter_map(|n| found.remove(n)).collect()
    }

    /// Expands `requested` to include every transitive composite
    /// dependency, returning names in an order where every dependency
    /// precedes every feature that depends on it. Rejects unregistered
    /// names and dependency cycles.
    pub fn resolve_dependencies(&self, requested: &[String]) -> PfResult<Vec<String>> {
        let mut state: HashMap<String, VisitState> = HashMap::new();
        let mut order = Vec::new();
        for name in requested {
            self.visit(name, &mut state, &mut order)?;
        }
        Ok(order)
    }

    fn visit(&self, name: &str, state: &mut HashMap<String, VisitState>, order: &mut Vec<String>) -> PfResult<()> {
        match state.get(name) {
            Some(VisitState::Done) => return Ok(()),
            Some(VisitState::Visiting) => {
                return Err(PfError::InvalidParameter(format!("dependency cycle involving feature {name}"))).context("resolve_dependencies");
            }
            None => {}
        }
        let feature = self
            .get(name)
            .ok_or_else(|| PfError::FeatureNotPresent(format!("feature {name} not registered")))
            .context("resolve_dependencies")?;
        state.insert(name.to_string(), VisitState::Visiting);
        if let RegisteredFeature::Composite(composite) = feature {
            for dep in composite.dependencies() {
                self.visit(&dep, state, order)?;
            }
        }
        state.insert(name.to_string(), VisitState::Done);
        order.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::feature::{DependencyView, ValueInfo};

    struct Size;
    impl Feature for Size {
        fn name(&self) -> &str {
            "Size"
        }
        fn description(&self) -> &str {
            "pixel count"
        }
        fn kind(&self) -> FeatureKind {
            FeatureKind::LineBased
        }
    }
    impl LineBasedFeature for Size {
        fn initialize(&mut self, _dim: usize, _n: usize) -> Vec<ValueInfo> {
            vec![ValueInfo::dimensionless("Size")]
        }
        fn scan_line(&mut self, _l: &[u32], _g: Option<&[f64]>, _p: &[usize], _d: usize, _idx: &dyn Fn(u32) -> Option<usize>) {}
        fn finish(&mut self, _i: usize, _out: &mut [f64]) {}
    }

    struct DependsOnSize;
    impl Feature for DependsOnSize {
        fn name(&self) -> &str {
            "P2A"
        }
        fn description(&self) -> &str {
            "perimeter squared over area"
        }
        fn kind(&self) -> FeatureKind {
            FeatureKind::Composite
        }
    }
    impl CompositeFeature for DependsOnSize {
        fn value_info(&self) -> Vec<ValueInfo> {
            vec![ValueInfo::dimensionless("P2A")]
        }
        fn dependencies(&self) -> Vec<String> {
            vec!["Size".to_string()]
        }
        fn compose(&self, _deps: &DependencyView, _out: &mut [f64]) {}
    }

    #[test]
    fn dependencies_precede_dependents_in_resolution_order() {
        let mut registry = FeatureRegistry::new();
        registry.register(RegisteredFeature::Line(Box::new(Size))).unwrap();
        registry.register(RegisteredFeature::Composite(Box::new(DependsOnSize))).unwrap();
        let order = registry.resolve_dependencies(&["P2A".to_string()]).unwrap();
        assert_eq!(order, vec!["Size".to_string(), "P2A".to_string()]);
    }

    #[test]
    fn unregistered_dependency_is_an_error() {
        let registry = FeatureRegistry::new();
        assert!(registry.resolve_dependencies(&["Nonexistent".to_string()]).is_err());
    }

    #[test]
    fn registering_the_same_name_twice_is_rejected() {
        let mut registry = FeatureRegistry::new();
        registry.register(RegisteredFeature::Line(Box::new(Size))).unwrap();
        assert!(registry.register(RegisteredFeature::Line(Box::new(Size))).is_err());
    }
}

//! The measurement table: a forge-once dense matrix keyed by object id row
//! and feature-value column (spec §3.4).
//!
//! Grounded on `original_source/include/diplib/measurement.h`'s
//! `Measurement` class (object id list, feature-name-to-column map, flat
//! value-info list, row-major `double` matrix) and on the teacher's
//! raw/forged `Image` split (`image/image.rs`): features and objects may be
//! declared only before forging, the matrix is allocated once, and every
//! subsequent cell access goes through the same row/column index maps.

use std::collections::HashMap;

use crate::error::{PfError, PfResult, ResultExt};
use crate::measurement::feature::ValueInfo;

#[derive(Debug, Clone)]
struct FeatureEntry {
    name: String,
    start_column: usize,
    value_count: usize,
}

/// The forged-or-not result table a [`crate::measurement::engine::measure`]
/// call produces.
#[derive(Debug, Clone)]
pub struct Measurement {
    objects: Vec<u32>,
    row_of: HashMap<u32, usize>,
    features: Vec<FeatureEntry>,
    feature_index: HashMap<String, usize>,
    values: Vec<ValueInfo>,
    data: Option<Vec<f64>>,
}

impl Default for Measurement {
    fn default() -> Self {
        Measurement::new()
    }
}

impl Measurement {
    pub fn new() -> Measurement {
        Measurement {
            objects: Vec::new(),
            row_of: HashMap::new(),
            features: Vec::new(),
            feature_index: HashMap::new(),
            values: Vec::new(),
            data: None,
        }
    }

    pub fn is_forged(&self) -> bool {
        self.data.is_some()
    }

    fn require_unforged(&self, op: &'static str) -> PfResult<()> {
        if self.is_forged() {
            Err(PfError::MeasurementForged(format!("{op}: table already forged"))).context(op)
        } else {
            Ok(())
        }
    }

    fn require_forged(&self, op: &'static str) -> PfResult<()> {
        if !self.is_forged() {
            Err(PfError::MeasurementNotForged(format!("{op}: table not forged"))).context(op)
        } else {
            Ok(())
        }
    }

    /// Adds an object row. Errors if already forged or `id` already present.
    pub fn add_object(&mut self, id: u32) -> PfResult<()> {
        self.require_unforged("add_object")?;
        if self.row_of.contains_key(&id) {
            return Err(PfError::ObjectAlreadyPresent(format!("object {id} already present"))).context("add_object");
        }
        self.row_of.insert(id, self.objects.len());
        self.objects.push(id);
        Ok(())
    }

    /// Adds a feature's column group. Errors if already forged, the name is
    /// already present, or `values` is empty.
    pub fn add_feature(&mut self, name: impl Into<String>, values: Vec<ValueInfo>) -> PfResult<()> {
        self.require_unforged("add_feature")?;
        let name = name.into();
        if self.feature_index.contains_key(&name) {
            return Err(PfError::FeatureAlreadyPresent(format!("feature {name} already present"))).context("add_feature");
        }
        if values.is_empty() {
            return Err(PfError::InvalidParameter(format!("feature {name}: value count must be >= 1"))).context("add_feature");
        }
        let start_column = self.values.len();
        let value_count = values.len();
        self.feature_index.insert(name.clone(), self.features.len());
        self.features.push(FeatureEntry { name, start_column, value_count });
        self.values.extend(values);
        Ok(())
    }

    /// Allocates the dense matrix (`rows * columns` cells, NaN-initialized)
    /// and freezes the row/column layout.
    pub fn forge(&mut self) -> PfResult<()> {
        self.require_unforged("forge")?;
        self.data = Some(vec![f64::NAN; self.objects.len() * self.values.len()]);
        Ok(())
    }

    pub fn n_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn n_values(&self) -> usize {
        self.values.len()
    }

    pub fn objects(&self) -> &[u32] {
        &self.objects
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn value_info(&self) -> &[ValueInfo] {
        &self.values
    }

    pub fn row_index(&self, id: u32) -> Option<usize> {
        self.row_of.get(&id).copied()
    }

    /// `(start_column, value_count)` for a feature, or `None` if absent.
    pub fn feature_columns(&self, name: &str) -> Option<(usize, usize)> {
        self.feature_index.get(name).map(|&i| {
            let f = &self.features[i];
            (f.start_column, f.value_count)
        })
    }

    fn cell_index(&self, id: u32, feature: &str, k: usize) -> PfResult<usize> {
        let row = self.row_index(id).ok_or_else(|| PfError::ObjectNotPresent(format!("object {id} not present")))?;
        let (start, count) =
            self.feature_columns(feature).ok_or_else(|| PfError::FeatureNotPresent(format!("feature {feature} not present")))?;
        if k >= count {
            return Err(PfError::IndexOutOfRange(format!("value index {k} out of range for feature {feature}")).into());
        }
        Ok(row * self.values.len() + start + k)
    }

    pub fn get(&self, id: u32, feature: &str, k: usize) -> PfResult<f64> {
        self.require_forged("get")?;
        let idx = self.cell_index(id, feature, k).context("get")?;
        Ok(self.data.as_ref().unwrap()[idx])
    }

    pub fn set(&mut self, id: u32, feature: &str, k: usize, value: f64) -> PfResult<()> {
        self.require_forged("set")?;
        let idx = self.cell_index(id, feature, k).context("set")?;
        self.data.as_mut().unwrap()[idx] = value;
        Ok(())
    }

    /// Writes every value of `feature` for `id` at once, in declaration
    /// order. Used by the engine's image-based and chain-code/polygon/
    /// convex-hull passes, which compute a feature's whole row together.
    pub fn set_row(&mut self, id: u32, feature: &str, values: &[f64]) -> PfResult<()> {
        self.require_forged("set_row")?;
        let row = self.row_index(id).ok_or_else(|| PfError::ObjectNotPresent(format!("object {id} not present"))).context("set_row")?;
        let (start, count) = self
            .feature_columns(feature)
            .ok_or_else(|| PfError::FeatureNotPresent(format!("feature {feature} not present")))
            .context("set_row")?;
        if values.len() != count {
            return Err(PfError::ArrayParameterWrongLength(format!(
                "feature {feature} expects {count} values, got {}",
                values.len()
            )))
            .context("set_row");
        }
        let base = row * self.values.len() + start;
        let data = self.data.as_mut().unwrap();
        data[base..base + count].copy_from_slice(values);
        Ok(())
    }

    /// The union of `self` and `other`: the union of object rows and of
    /// feature columns, missing cells filled with NaN. Features with the
    /// same name present in both tables must declare the same value count.
    pub fn union(&self, other: &Measurement) -> PfResult<Measurement> {
        self.require_forged("union")?;
        other.require_forged("union")?;

        let mut merged = Measurement::new();
        let mut ids: Vec<u32> = self.objects.clone();
        for &id in &other.objects {
            if !self.row_of.contains_key(&id) {
                ids.push(id);
            }
        }
        for &id in &ids {
            merged.add_object(id).context("union")?;
        }

        for f in &self.features {
            merged.add_feature(f.name.clone(), self.values[f.start_column..f.start_column + f.value_count].to_vec()).context("union")?;
        }
        for f in &other.features {
            if let Some((_, left_count)) = self.feature_columns(&f.name) {
                if left_count != f.value_count {
                    return Err(PfError::ArrayParameterWrongLength(format!(
                        "feature {} has {left_count} values on one side, {} on the other",
                        f.name, f.value_count
                    )))
                    .context("union");
                }
                continue;
            }
            merged.add_feature(f.name.clone(), other.values[f.start_column..f.start_column + f.value_count].to_vec()).context("union")?;
        }

        merged.forge().context("union")?;
        // `other`'s values are written first, then `self`'s: when both sides
        // declare the same feature for the same object, `self` (the left
        // operand of `+`) wins, matching the union property in spec §8.
        for &id in &ids {
            if other.row_index(id).is_some() {
                for name in other.feature_names() {
                    let (_, count) = other.feature_columns(name).unwrap();
                    for k in 0..count {
                        let v = other.get(id, name, k).context("union")?;
                        merged.set(id, name, k, v).context("union")?;
                    }
                }
            }
            if self.row_index(id).is_some() {
                for name in self.feature_names() {
                    let (_, count) = self.feature_columns(name).unwrap();
                    for k in 0..count {
                        let v = self.get(id, name, k).context("union")?;
                        merged.set(id, name, k, v).context("union")?;
                    }
                }
            }
        }
        Ok(merged)
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_forged() {
            write!(f, "{}", crate::serialize::print_table(self))
        } else {
            write!(f, "<unforged Measurement: {} objects, {} features declared>", self.objects.len(), self.features.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Units;

    #[test]
    fn forging_freezes_shape_and_rejects_further_additions() {
        let mut m = Measurement::new();
        m.add_object(1).unwrap();
        m.add_feature("Size", vec![ValueInfo::dimensionless("Size")]).unwrap();
        m.forge().unwrap();
        assert_eq!(m.n_objects() * m.n_values(), 1);
        assert!(m.add_object(2).is_err());
        assert!(m.add_feature("Other", vec![ValueInfo::dimensionless("x")]).is_err());
    }

    #[test]
    fn duplicate_feature_name_is_rejected() {
        let mut m = Measurement::new();
        m.add_feature("Size", vec![ValueInfo::dimensionless("Size")]).unwrap();
        assert!(m.add_feature("Size", vec![ValueInfo::dimensionless("Size")]).is_err());
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut m = Measurement::new();
        m.add_object(10).unwrap();
        m.add_feature("Center", vec![ValueInfo::new("x", Units::DIMENSIONLESS), ValueInfo::new("y", Units::DIMENSIONLESS)]).unwrap();
        m.forge().unwrap();
        m.set_row(10, "Center", &[4.5, 5.0]).unwrap();
        assert_eq!(m.get(10, "Center", 0).unwrap(), 4.5);
        assert_eq!(m.get(10, "Center", 1).unwrap(), 5.0);
    }

    #[test]
    fn union_fills_missing_cells_with_nan() {
        let mut a = Measurement::new();
        for id in 10..20 {
            a.add_object(id).unwrap();
        }
        a.add_feature("F1", vec![ValueInfo::dimensionless("F1")]).unwrap();
        a.add_feature("F2", vec![ValueInfo::dimensionless("F2")]).unwrap();
        a.forge().unwrap();
        for id in 10..20 {
            a.set(id, "F1", 0, 1.0).unwrap();
            a.set(id, "F2", 0, 2.0).unwrap();
        }

        let mut b = Measurement::new();
        for id in 15..25 {
            b.add_object(id).unwrap();
        }
        b.add_feature("F1", vec![ValueInfo::dimensionless("F1")]).unwrap();
        b.add_feature("F3", vec![ValueInfo::dimensionless("F3")]).unwrap();
        b.forge().unwrap();
        for id in 15..25 {
            b.set(id, "F1", 0, 10.0).unwrap();
            b.set(id, "F3", 0, 30.0).unwrap();
        }

        let merged = a.union(&b).unwrap();
        assert_eq!(merged.n_objects(), 15);
        assert_eq!(merged.n_features(), 3);
        assert!(merged.get(12, "F3", 0).unwrap().is_nan());
        assert!(merged.get(22, "F2", 0).unwrap().is_nan());
        assert_eq!(merged.get(10, "F1", 0).unwrap(), 1.0);
        assert_eq!(merged.get(24, "F1", 0).unwrap(), 10.0);
    }
}

//! The measurement engine: resolves a requested feature list against a
//! registry and runs the six-phase dispatch (spec §4.11) that produces a
//! forged [`Measurement`] table.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{PfError, PfResult, ResultExt};
use crate::framework::scan::{scan, ScanFilter};
use crate::image::{DynImage, Image};
use crate::measurement::chaincode::ChainCode;
use crate::measurement::convexhull::ConvexHull;
use crate::measurement::feature::{
    ChainCodeFeature, CompositeFeature, ConvexHullFeature, DependencyView, ImageBasedFeature, LineBasedFeature, PolygonFeature,
};
use crate::measurement::polygon::Polygon;
use crate::measurement::registry::{FeatureRegistry, RegisteredFeature};
use crate::measurement::table::Measurement;

/// Collects every distinct nonzero label present in `label`, in ascending
/// order.
fn all_object_ids(label: &Image<u32>) -> PfResult<Vec<u32>> {
    let mut ids: Vec<u32> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut it = crate::iterators::ImageIterator::new(label, None)?;
    loop {
        let id = label.at(it.coords())?;
        if id != 0 && seen.insert(id) {
            ids.push(id);
        }
        if !it.advance() {
            break;
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

/// A [`ScanFilter`] that dispatches each scanned line to every requested
/// line-based feature in turn. A `Mutex` supplies the interior mutability
/// `ScanFilter::filter`'s `&self` signature doesn't otherwise allow (and,
/// unlike a `RefCell`, keeps the type `Sync` for the scan framework's
/// thread pool): the engine serializes the line-based pass onto a single
/// object/feature at a time (spec §5), so contention never actually occurs.
struct LineBasedDispatch<'a> {
    features: Mutex<Vec<&'a mut Box<dyn LineBasedFeature>>>,
    object_index: HashMap<u32, usize>,
    has_grey: bool,
}

impl<'a> ScanFilter for LineBasedDispatch<'a> {
    fn filter(
        &self,
        in_buffers: &[&[f64]],
        _out_buffers: &mut [Vec<f64>],
        length: usize,
        dimension: usize,
        position: &[usize],
        _thread: usize,
    ) {
        let label_line: Vec<u32> = in_buffers[0][..length].iter().map(|&v| v as u32).collect();
        let grey_line: Option<Vec<f64>> = if self.has_grey { Some(in_buffers[1][..length].to_vec()) } else { None };
        let index_of = |id: u32| self.object_index.get(&id).copied();
        let mut features = self.features.lock().expect("line-based dispatch mutex poisoned");
        for feature in features.iter_mut() {
            feature.scan_line(&label_line, grey_line.as_deref(), position, dimension, &index_of);
        }
    }
}

/// Runs the full measurement dispatch for `requested_features` over `label`
/// (and `grey`, when present), producing a forged table with one row per
/// entry of `object_ids` (or every distinct nonzero label, when `None`).
/// `registry` is borrowed mutably: line-based features hold per-object
/// accumulator state across `initialize`/`scan_line`/`finish`/`cleanup`, so
/// the engine needs write access to the boxed feature instances it loans
/// from the catalog.
pub fn measure(
    label: &Image<u32>,
    grey: Option<&DynImage>,
    requested_features: &[String],
    object_ids: Option<&[u32]>,
    registry: &mut FeatureRegistry,
) -> PfResult<Measurement> {
    if !label.is_scalar() {
        return Err(PfError::NotScalar("measure: label image must be scalar".into())).context("measure");
    }
    if let Some(grey) = grey {
        if grey.sizes() != label.sizes() {
            return Err(PfError::SizesDontMatch("measure: grey image sizes don't match label".into())).context("measure");
        }
        if !grey.sample_type().is_real() {
            return Err(PfError::DataTypeNotSupported("measure: grey image must be real-valued".into())).context("measure");
        }
    }

    let object_ids: Vec<u32> = match object_ids {
        Some(ids) => ids.to_vec(),
        None => all_object_ids(label)?,
    };
    let object_index: HashMap<u32, usize> = object_ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let order = registry.resolve_dependencies(requested_features)?;
    for name in &order {
        let feature = registry.get(name).ok_or_else(|| PfError::FeatureNotPresent(name.clone())).context("measure")?;
        if feature.needs_grey_value() && grey.is_none() {
            return Err(PfError::InvalidParameter(format!("feature {name} needs a grey-value image"))).context("measure");
        }
    }

    let dimensionality = label.dimensionality();
    let n_objects = object_ids.len();

    let line_names: Vec<String> =
        order.iter().filter(|name| matches!(registry.get(name), Some(RegisteredFeature::Line(_)))).cloned().collect();
    let image_names: Vec<String> =
        order.iter().filter(|name| matches!(registry.get(name), Some(RegisteredFeature::Image(_)))).cloned().collect();
    let chain_names: Vec<String> =
        order.iter().filter(|name| matches!(registry.get(name), Some(RegisteredFeature::ChainCode(_)))).cloned().collect();
    let polygon_names: Vec<String> =
        order.iter().filter(|name| matches!(registry.get(name), Some(RegisteredFeature::Polygon(_)))).cloned().collect();
    let hull_names: Vec<String> =
        order.iter().filter(|name| matches!(registry.get(name), Some(RegisteredFeature::ConvexHull(_)))).cloned().collect();
    let composite_names: Vec<String> =
        order.iter().filter(|name| matches!(registry.get(name), Some(RegisteredFeature::Composite(_)))).cloned().collect();

    if dimensionality != 2 && (!chain_names.is_empty() || !polygon_names.is_empty() || !hull_names.is_empty()) {
        return Err(PfError::DimensionalityNotSupported(
            "measure: chain-code/polygon/convex-hull features require a 2-D label image".into(),
        ))
        .context("measure");
    }

    let mut table = Measurement::new();
    for &id in &object_ids {
        table.add_object(id)?;
    }

    // Step 3: declare every requested feature's columns before forging the
    // table once. Immutable catalog lookups run first; the mutable
    // line-feature borrow is taken last since it stays alive through the
    // scan pass below.
    for name in &image_names {
        if let Some(RegisteredFeature::Image(feature)) = registry.get(name) {
            table.add_feature(name.clone(), feature.value_info(dimensionality))?;
        }
    }
    for name in &chain_names {
        if let Some(RegisteredFeature::ChainCode(feature)) = registry.get(name) {
            table.add_feature(name.clone(), feature.value_info())?;
        }
    }
    for name in &polygon_names {
        if let Some(RegisteredFeature::Polygon(feature)) = registry.get(name) {
            table.add_feature(name.clone(), feature.value_info())?;
        }
    }
    for name in &hull_names {
        if let Some(RegisteredFeature::ConvexHull(feature)) = registry.get(name) {
            table.add_feature(name.clone(), feature.value_info())?;
        }
    }
    for name in &composite_names {
        if let Some(RegisteredFeature::Composite(feature)) = registry.get(name) {
            table.add_feature(name.clone(), feature.value_info())?;
        }
    }

    let mut line_features = registry.line_features_mut(&line_names);
    let mut line_infos = Vec::with_capacity(line_features.len());
    for feature in line_features.iter_mut() {
        line_infos.push(feature.initialize(dimensionality, n_objects));
    }
    for (name, infos) in line_names.iter().zip(line_infos.iter()) {
        table.add_feature(name.clone(), infos.clone())?;
    }

    table.forge()?;

    // Phase 4: line-based pass, every requested line-based feature sharing
    // one scan of `label` (and `grey`, when present).
    if !line_names.is_empty() {
        let label_dyn = DynImage::U32(label.clone());
        let mut inputs: Vec<&DynImage> = vec![&label_dyn];
        if let Some(g) = grey {
            inputs.push(g);
        }
        let dispatch = LineBasedDispatch { features: Mutex::new(line_features), object_index: object_index.clone(), has_grey: grey.is_some() };
        scan(&inputs, &mut [], &[], &dispatch)?;
        let mut line_features = dispatch.features.into_inner().expect("line-based dispatch mutex poisoned");

        for (feature, (name, infos)) in line_features.iter_mut().zip(line_names.iter().zip(line_infos.iter())) {
            for (row, &id) in object_ids.iter().enumerate() {
                let mut values = vec![0.0; infos.len()];
                feature.finish(row, &mut values);
                table.set_row(id, name, &values)?;
            }
            feature.cleanup();
        }
    }

    // Phase 5: image-based pass.
    for name in &image_names {
        if let Some(RegisteredFeature::Image(feature)) = registry.get(name) {
            let results = feature.measure(label, grey, &object_ids)?;
            for (&id, values) in object_ids.iter().zip(results.iter()) {
                table.set_row(id, name, values)?;
            }
        }
    }

    // Phase 6: chain-code / polygon / convex-hull pass. Chain codes and the
    // polygon/hull derived from them are traced once per object and shared
    // across every feature of the relevant kind.
    if !chain_names.is_empty() || !polygon_names.is_empty() || !hull_names.is_empty() {
        let mut chains: HashMap<u32, ChainCode> = HashMap::new();
        let mut polygons: HashMap<u32, Polygon> = HashMap::new();
        let mut hulls: HashMap<u32, ConvexHull> = HashMap::new();
        let needs_polygon = !polygon_names.is_empty() || !hull_names.is_empty();
        let needs_hull = !hull_names.is_empty();

        for &id in &object_ids {
            let chain = ChainCode::trace(label, id)
                .ok_or_else(|| PfError::ObjectNotPresent(format!("object {id} has no pixels")))
                .context("measure")?;
            if needs_polygon {
                let polygon = Polygon::from_chain_code(&chain);
                if needs_hull {
                    hulls.insert(id, ConvexHull::from_points(polygon.vertices()));
                }
                polygons.insert(id, polygon);
            }
            chains.insert(id, chain);
        }

        for name in &chain_names {
            if let Some(RegisteredFeature::ChainCode(feature)) = registry.get(name) {
                let infos = feature.value_info();
                for &id in &object_ids {
                    let mut values = vec![0.0; infos.len()];
                    feature.measure(&chains[&id], &mut values);
                    table.set_row(id, name, &values)?;
                }
            }
        }
        for name in &polygon_names {
            if let Some(RegisteredFeature::Polygon(feature)) = registry.get(name) {
                let infos = feature.value_info();
                for &id in &object_ids {
                    let mut values = vec![0.0; infos.len()];
                    feature.measure(&polygons[&id], &mut values);
                    table.set_row(id, name, &values)?;
                }
            }
        }
        for name in &hull_names {
            if let Some(RegisteredFeature::ConvexHull(feature)) = registry.get(name) {
                let infos = feature.value_info();
                for &id in &object_ids {
                    let mut values = vec![0.0; infos.len()];
                    feature.measure(&hulls[&id], &mut values);
                    table.set_row(id, name, &values)?;
                }
            }
        }
    }

    // Phase 7: composite pass.
    for name in &composite_names {
        if let Some(RegisteredFeature::Composite(feature)) = registry.get(name) {
            let dep_names = feature.dependencies();
            let infos = feature.value_info();
            for &id in &object_ids {
                let dep_values: Vec<Vec<f64>> = dep_names
                    .iter()
                    .map(|dep| {
                        let (_, count) = table.feature_columns(dep).unwrap_or((0, 0));
                        (0..count).map(|k| table.get(id, dep, k).unwrap_or(f64::NAN)).collect::<Vec<f64>>()
                    })
                    .collect();
                let dep_refs: Vec<&[f64]> = dep_values.iter().map(|v| v.as_slice()).collect();
                let view = DependencyView::new(&dep_names, &dep_refs);
                let mut values = vec![0.0; infos.len()];
                feature.compose(&view, &mut values);
                table.set_row(id, name, &values)?;
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::features::register_all;
    use crate::types::TensorShape;

    fn row_label(width: usize) -> Image<u32> {
        let mut img = Image::<u32>::raw(vec![width, 1]);
        img.reforge(vec![width, 1], TensorShape::Scalar, 1);
        for x in 0..width {
            img.set(&[x, 0], 0, 1).unwrap();
        }
        img
    }

    #[test]
    fn size_of_a_ten_pixel_row_is_ten() {
        let label = row_label(10);
        let mut registry = FeatureRegistry::new();
        register_all(&mut registry).unwrap();
        let table = measure(&label, None, &["Size".to_string()], None, &mut registry).unwrap();
        assert_eq!(table.get(1, "Size", 0).unwrap(), 10.0);
    }

    #[test]
    fn p2a_resolves_its_dependency_chain_through_the_engine() {
        let label = row_label(10);
        let mut registry = FeatureRegistry::new();
        register_all(&mut registry).unwrap();
        let table = measure(&label, None, &["P2A".to_string()], None, &mut registry).unwrap();
        assert!(table.get(1, "P2A", 0).unwrap() > 1.0);
    }

    #[test]
    fn missing_grey_image_for_a_grey_dependent_feature_is_rejected() {
        let label = row_label(4);
        let mut registry = FeatureRegistry::new();
        register_all(&mut registry).unwrap();
        assert!(measure(&label, None, &["Statistics".to_string()], None, &mut registry).is_err());
    }
}

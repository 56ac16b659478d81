//! CSV rendering of a [`Measurement`] table (spec §6): three header lines
//! (feature names repeated across their value columns, per-value names, and
//! per-value units) unless `simple` collapses them into a single
//! `Feature.value` combined header line, followed by one row per object.

use std::fmt::Write as _;

use crate::measurement::Measurement;

fn join_row(fields: impl Iterator<Item = String>, out: &mut String) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        if field.contains(',') || field.contains('"') {
            let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
        } else {
            out.push_str(&field);
        }
    }
    out.push('\n');
}

/// Writes `table` as CSV. In simple mode the header is a single
/// `Feature.ValueName` line; otherwise three header lines (feature name,
/// value name, units) precede the data rows, mirroring `print_table`.
pub fn write_csv(table: &Measurement, simple: bool) -> String {
    let mut out = String::new();

    if simple {
        join_row(
            std::iter::once("object".to_string()).chain(table.feature_names().into_iter().flat_map(|name| {
                let (start, count) = table.feature_columns(name).unwrap();
                (0..count).map(move |k| format!("{name}.{}", table.value_info()[start + k].name))
            })),
            &mut out,
        );
    } else {
        join_row(
            std::iter::once(String::new()).chain(table.feature_names().into_iter().flat_map(|name| {
                let (_, count) = table.feature_columns(name).unwrap();
                std::iter::repeat(name.to_string()).take(count)
            })),
            &mut out,
        );
        join_row(std::iter::once(String::new()).chain(table.value_info().iter().map(|v| v.name.clone())), &mut out);
        join_row(std::iter::once(String::new()).chain(table.value_info().iter().map(|v| v.units.to_string())), &mut out);
    }

    for &id in table.objects() {
        join_row(
            std::iter::once(id.to_string()).chain(table.feature_names().into_iter().flat_map(|name| {
                let (_, count) = table.feature_columns(name).unwrap();
                (0..count).map(move |k| format!("{}", table.get(id, name, k).unwrap_or(f64::NAN)))
            })),
            &mut out,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::feature::ValueInfo;

    fn sample_table() -> Measurement {
        let mut m = Measurement::new();
        m.add_object(1).unwrap();
        m.add_feature("Size", vec![ValueInfo::dimensionless("Size")]).unwrap();
        m.forge().unwrap();
        m.set(1, "Size", 0, 7.0).unwrap();
        m
    }

    #[test]
    fn simple_header_combines_feature_and_value_name() {
        let csv = write_csv(&sample_table(), true);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "object,Size.Size");
        assert_eq!(lines.next().unwrap(), "1,7");
    }

    #[test]
    fn full_header_has_three_lines_before_the_data() {
        let csv = write_csv(&sample_table(), false);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], ",Size");
        assert_eq!(lines[1], ",Size");
        assert_eq!(lines[4], "1,7");
    }
}

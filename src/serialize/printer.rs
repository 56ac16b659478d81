//! Plain-text rendering of a [`Measurement`] table (spec §6): a header row
//! giving each feature's name spanning its value columns, a second row of
//! per-value names, a third of units, then one row per object.

use std::fmt::Write as _;

use crate::measurement::Measurement;

const COLUMN_WIDTH: usize = 12;

fn pad(s: &str) -> String {
    format!("{s:>COLUMN_WIDTH$}", COLUMN_WIDTH = COLUMN_WIDTH)
}

/// Renders `table` as an aligned plain-text grid. Missing cells (still NaN
/// after `measure` because a feature never wrote them) print as `NaN`.
pub fn print_table(table: &Measurement) -> String {
    let mut out = String::new();

    let mut feature_header = pad("");
    let mut value_header = pad("");
    let mut units_header = pad("");
    for name in table.feature_names() {
        let (_, count) = table.feature_columns(name).expect("feature_names() names are always present");
        let span = COLUMN_WIDTH * count + count.saturating_sub(1);
        let _ = write!(feature_header, " {:>span$}", name, span = span);
        for info in &table.value_info()[table.feature_columns(name).unwrap().0..][..count] {
            let _ = write!(value_header, " {}", pad(&info.name));
            let _ = write!(units_header, " {}", pad(&info.units.to_string()));
        }
    }
    out.push_str(&feature_header);
    out.push('\n');
    out.push_str(&value_header);
    out.push('\n');
    out.push_str(&units_header);
    out.push('\n');

    for &id in table.objects() {
        let mut row = pad(&id.to_string());
        for name in table.feature_names() {
            let (_, count) = table.feature_columns(name).unwrap();
            for k in 0..count {
                let value = table.get(id, name, k).unwrap_or(f64::NAN);
                let _ = write!(row, " {}", pad(&format!("{value}")));
            }
        }
        out.push_str(&row);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::feature::ValueInfo;

    #[test]
    fn printed_table_has_one_line_per_object_plus_three_header_lines() {
        let mut m = Measurement::new();
        m.add_object(1).unwrap();
        m.add_object(2).unwrap();
        m.add_feature("Size", vec![ValueInfo::dimensionless("Size")]).unwrap();
        m.forge().unwrap();
        m.set(1, "Size", 0, 4.0).unwrap();
        m.set(2, "Size", 0, 9.0).unwrap();

        let rendered = print_table(&m);
        assert_eq!(rendered.lines().count(), 5);
        assert!(rendered.contains("Size"));
        assert!(rendered.contains('4'));
        assert!(rendered.contains('9'));
    }
}

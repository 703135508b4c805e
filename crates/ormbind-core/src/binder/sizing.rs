//! Column sizing from validation constraints.
//!
//! Only fills attributes the column does not already carry, so explicit
//! overrides always win.

use crate::config::{DEFAULT_PRECISION, DEFAULT_SCALE};
use crate::constraint::ConstraintSet;
use crate::descriptor::ValueType;
use crate::schema::Column;

/// Fill length, precision and scale of `column` from constraints.
pub fn size_column(column: &mut Column, value_type: &ValueType, constraints: &ConstraintSet) {
    if value_type.is_string_like() && column.length.is_none() {
        column.length = string_length(constraints);
    }
    if value_type.is_fractional() {
        let scale = column.scale.unwrap_or_else(|| decimal_scale(constraints));
        column.scale = Some(scale);
        if column.precision.is_none() {
            column.precision = Some(decimal_precision(constraints, scale));
        }
    }
}

/// Length implied by size bounds or, failing that, the longest allowed value.
pub fn string_length(constraints: &ConstraintSet) -> Option<u32> {
    constraints.effective_max_size().or_else(|| {
        constraints
            .in_list
            .as_ref()
            .and_then(|values| values.iter().map(|v| v.chars().count() as u32).max())
    })
}

/// Scale from constraints, defaulting to two digits.
pub fn decimal_scale(constraints: &ConstraintSet) -> u32 {
    constraints.scale.unwrap_or(DEFAULT_SCALE)
}

/// Precision wide enough for the constrained bounds.
pub fn decimal_precision(constraints: &ConstraintSet, scale: u32) -> u32 {
    let listed: Vec<f64> = constraints
        .in_list
        .iter()
        .flatten()
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();
    let list_min = listed.iter().copied().reduce(f64::min);
    let list_max = listed.iter().copied().reduce(f64::max);

    let min = constraints.effective_min().filter(|v| v.is_finite()).or(list_min);
    let max = constraints.effective_max().filter(|v| v.is_finite()).or(list_max);

    match (min, max) {
        (Some(min), Some(max)) => digit_count(min, scale).max(digit_count(max, scale)),
        (Some(bound), None) | (None, Some(bound)) => DEFAULT_PRECISION.max(digit_count(bound, scale)),
        (None, None) => DEFAULT_PRECISION,
    }
}

/// Integer digits of `value` plus `scale`.
fn digit_count(value: f64, scale: u32) -> u32 {
    let integer = value.abs().trunc();
    let digits = if integer < 1.0 {
        1
    } else {
        (integer.log10().floor() as u32).saturating_add(1)
    };
    digits.saturating_add(scale)
}

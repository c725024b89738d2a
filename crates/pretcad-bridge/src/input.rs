//! Form field marshaling: raw field text to request values.

use pretcad_common::models::field;
use pretcad_common::{DeviceParameters, OperatingConditions};
use tracing::debug;

use crate::surface::FormSurface;

/// Convert raw field text to a request value.
///
/// Blank (after trimming) means absent, never zero. Anything else goes through
/// plain numeric conversion with no range or type checks; text that is not a
/// number becomes NaN and is passed along as-is.
pub fn parse_field_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.parse::<f64>().unwrap_or(f64::NAN))
}

/// Read one numeric field; a field the surface does not have is absent.
pub fn read_number(form: &dyn FormSurface, name: &str) -> Option<f64> {
    form.field(name).as_deref().and_then(parse_field_value)
}

/// Device parameters from the form.
///
/// The energy gap comes from `Eg_eV`. Older layouts spell the input `Eg_e_V`;
/// that id is read only when the surface has no `Eg_eV` field at all, so a
/// blank `Eg_eV` still means absent.
pub fn read_parameters(form: &dyn FormSurface) -> DeviceParameters {
    DeviceParameters::from_lookup(|name| {
        if name == field::EG_EV && !form.has_field(field::EG_EV) {
            debug!(field = field::EG_EV_LEGACY, "Reading energy gap from legacy field id");
            return read_number(form, field::EG_EV_LEGACY);
        }
        read_number(form, name)
    })
}

pub fn read_conditions(form: &dyn FormSurface) -> OperatingConditions {
    OperatingConditions {
        temp: read_number(form, field::TEMPERATURE),
        vdd: read_number(form, field::SUPPLY_VOLTAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemoryForm;

    #[test]
    fn test_blank_is_absent_not_zero() {
        assert_eq!(parse_field_value(""), None);
        assert_eq!(parse_field_value("   "), None);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(parse_field_value("1.12"), Some(1.12));
        assert_eq!(parse_field_value(" 45 "), Some(45.0));
        assert_eq!(parse_field_value("1e17"), Some(1e17));
        assert_eq!(parse_field_value("-1"), Some(-1.0));
        assert_eq!(parse_field_value(".5"), Some(0.5));
        // No range validation.
        assert_eq!(parse_field_value("-273000"), Some(-273000.0));
    }

    #[test]
    fn test_non_numeric_text_becomes_nan() {
        assert!(parse_field_value("abc").unwrap().is_nan());
        assert!(parse_field_value("12nm").unwrap().is_nan());
    }

    #[test]
    fn test_canonical_energy_gap_wins_over_legacy() {
        let form = MemoryForm::with_fields([("Eg_eV", "1.12"), ("Eg_e_V", "3.4")]);
        assert_eq!(read_parameters(&form).eg_ev, Some(1.12));
    }

    #[test]
    fn test_blank_canonical_energy_gap_stays_absent() {
        let form = MemoryForm::with_fields([("Eg_eV", ""), ("Eg_e_V", "3.4")]);
        assert_eq!(read_parameters(&form).eg_ev, None);
    }

    #[test]
    fn test_legacy_energy_gap_used_when_canonical_missing() {
        let form = MemoryForm::with_fields([("Eg_e_V", "3.4")]);
        assert_eq!(read_parameters(&form).eg_ev, Some(3.4));
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let form = MemoryForm::with_fields([("L_nm", "20"), ("T", "")]);
        let params = read_parameters(&form);
        assert_eq!(params.l_nm, Some(20.0));
        assert_eq!(params.w_um, None);
        let cond = read_conditions(&form);
        assert_eq!(cond, OperatingConditions { temp: None, vdd: None });
    }
}

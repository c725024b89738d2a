//! Built-in parameter presets for quick form population.
//!
//! A preset is a full device parameter set plus operating conditions, keyed by
//! the same names as the form fields (`T` and `VDD` for the conditions).

use crate::models::field;

/// Named, immutable template of form values.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Identifier carried by the preset trigger (e.g. "si_long")
    pub id: String,
    /// Human-readable description
    pub description: String,
    /// (form field, value) pairs in form order
    pub values: Vec<(String, f64)>,
}

impl Preset {
    fn mosfet(
        id: &str,
        description: &str,
        mu_cm2_vs: f64,
        tox_nm: f64,
        na_cm3: f64,
        l_nm: f64,
        vdd: f64,
    ) -> Self {
        // Silicon channel on SiO2; only mobility, oxide, doping, length and
        // supply differ between the shipped presets.
        let values = [
            (field::EG_EV, 1.12),
            (field::EPS_R, 11.7),
            (field::EF_EV_ATOM, -1.0),
            (field::MU_CM2_VS, mu_cm2_vs),
            (field::TOX_NM, tox_nm),
            (field::EPS_OX, 3.9),
            (field::NA_CM3, na_cm3),
            (field::L_NM, l_nm),
            (field::W_UM, 1.0),
            (field::TEMPERATURE, 300.0),
            (field::SUPPLY_VOLTAGE, vdd),
        ];
        Self {
            id: id.to_string(),
            description: description.to_string(),
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    /// Stored value for a form field, if the preset defines it.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }
}

/// Text written into a form field for a preset value. Matches how a browser
/// renders a number into an input (`1.0` → "1", `1e17` → "100000000000000000").
pub fn format_field_value(value: f64) -> String {
    format!("{}", value)
}

/// Lookup table of presets by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    /// The three presets shipped with the screener.
    pub fn builtin() -> Self {
        Self { presets: vec![
            Preset::mosfet("si", "Short-channel silicon nMOS (45 nm)", 450.0, 1.2, 1e17, 45.0, 1.0),
            Preset::mosfet("si_long", "Long-channel silicon nMOS (180 nm)", 1350.0, 2.0, 1e16, 180.0, 1.8),
            Preset::mosfet("short", "Highly doped short device (20 nm)", 300.0, 1.0, 5e17, 20.0, 0.7),
        ] }
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.id.as_str()).collect()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self { Self::builtin() }
}

//! Request models sent to the screening service.
//!
//! Wire keys follow the service contract exactly (`Eg_eV`, `NA_cm3`, ...), so
//! every field carries an explicit serde rename. Absent values serialize as
//! JSON `null`; so do non-finite numbers, which is what the service receives
//! when a form field held non-numeric text.

use serde::{Deserialize, Serialize};

/// Form field / wire key names.
pub mod field {
    pub const EG_EV: &str = "Eg_eV";
    /// Misspelled energy-gap field id still present on older form layouts.
    pub const EG_EV_LEGACY: &str = "Eg_e_V";
    pub const EPS_R: &str = "eps_r";
    pub const EF_EV_ATOM: &str = "Ef_eV_atom";
    pub const MU_CM2_VS: &str = "mu_cm2_Vs";
    pub const TOX_NM: &str = "tox_nm";
    pub const EPS_OX: &str = "eps_ox";
    pub const NA_CM3: &str = "NA_cm3";
    pub const L_NM: &str = "L_nm";
    pub const W_UM: &str = "W_um";
    pub const TEMPERATURE: &str = "T";
    pub const SUPPLY_VOLTAGE: &str = "VDD";
    pub const CIF_FILE: &str = "cif";
    pub const STATUS: &str = "status";
    pub const CIF_STATUS: &str = "cif_status";
}

/// Device parameter fields in wire order.
pub const PARAMETER_FIELDS: [&str; 9] = [
    field::EG_EV,
    field::EPS_R,
    field::EF_EV_ATOM,
    field::MU_CM2_VS,
    field::TOX_NM,
    field::EPS_OX,
    field::NA_CM3,
    field::L_NM,
    field::W_UM,
];

/// Material and geometry properties of the simulated transistor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceParameters {
    /// Band gap (eV)
    #[serde(rename = "Eg_eV")]
    pub eg_ev: Option<f64>,
    /// Relative permittivity of the channel material
    #[serde(rename = "eps_r")]
    pub eps_r: Option<f64>,
    /// Fermi-level offset (eV/atom)
    #[serde(rename = "Ef_eV_atom")]
    pub ef_ev_atom: Option<f64>,
    /// Carrier mobility (cm²/V·s)
    #[serde(rename = "mu_cm2_Vs")]
    pub mu_cm2_vs: Option<f64>,
    /// Oxide thickness (nm)
    #[serde(rename = "tox_nm")]
    pub tox_nm: Option<f64>,
    /// Oxide relative permittivity
    #[serde(rename = "eps_ox")]
    pub eps_ox: Option<f64>,
    /// Acceptor doping concentration (cm⁻³)
    #[serde(rename = "NA_cm3")]
    pub na_cm3: Option<f64>,
    /// Channel length (nm)
    #[serde(rename = "L_nm")]
    pub l_nm: Option<f64>,
    /// Channel width (µm)
    #[serde(rename = "W_um")]
    pub w_um: Option<f64>,
}

impl DeviceParameters {
    /// Build a parameter set by asking `lookup` for every field in wire order.
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<f64>) -> Self {
        Self {
            eg_ev:      lookup(field::EG_EV),
            eps_r:      lookup(field::EPS_R),
            ef_ev_atom: lookup(field::EF_EV_ATOM),
            mu_cm2_vs:  lookup(field::MU_CM2_VS),
            tox_nm:     lookup(field::TOX_NM),
            eps_ox:     lookup(field::EPS_OX),
            na_cm3:     lookup(field::NA_CM3),
            l_nm:       lookup(field::L_NM),
            w_um:       lookup(field::W_UM),
        }
    }

    /// Value stored under a wire key, `None` for unknown keys or absent values.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            field::EG_EV      => self.eg_ev,
            field::EPS_R      => self.eps_r,
            field::EF_EV_ATOM => self.ef_ev_atom,
            field::MU_CM2_VS  => self.mu_cm2_vs,
            field::TOX_NM     => self.tox_nm,
            field::EPS_OX     => self.eps_ox,
            field::NA_CM3     => self.na_cm3,
            field::L_NM       => self.l_nm,
            field::W_UM       => self.w_um,
            _ => None,
        }
    }
}

/// Bias and thermal conditions for a screening run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingConditions {
    /// Temperature (K)
    pub temp: Option<f64>,
    /// Supply voltage (V)
    pub vdd: Option<f64>,
}

impl OperatingConditions {
    /// Conditions used for every CIF-derived run, whatever the form holds.
    pub const FILE_SCREENING: OperatingConditions = OperatingConditions {
        temp: Some(300.0),
        vdd: Some(0.9),
    };
}

/// Transistor polarity understood by the service. Only n-channel is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Nmos,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Nmos => "nmos",
        }
    }
}

/// Body of `POST /screen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualScreeningRequest {
    pub props: DeviceParameters,
    pub device: DeviceKind,
    pub conditions: OperatingConditions,
}

/// Body of `POST /screen_alignn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CifScreeningRequest {
    /// Raw CIF text, forwarded verbatim.
    pub cif: String,
    pub device: DeviceKind,
    pub conditions: OperatingConditions,
}

impl CifScreeningRequest {
    pub fn new(cif: impl Into<String>) -> Self {
        Self {
            cif: cif.into(),
            device: DeviceKind::Nmos,
            conditions: OperatingConditions::FILE_SCREENING,
        }
    }
}

/// One screening submission. Serializes to the bare body of its variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScreeningRequest {
    Manual(ManualScreeningRequest),
    Cif(CifScreeningRequest),
}

impl ScreeningRequest {
    /// Endpoint path relative to the service base address.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ScreeningRequest::Manual(_) => "screen",
            ScreeningRequest::Cif(_)    => "screen_alignn",
        }
    }

    pub fn device(&self) -> DeviceKind {
        match self {
            ScreeningRequest::Manual(r) => r.device,
            ScreeningRequest::Cif(r)    => r.device,
        }
    }
}

/// What gets saved as `screener_input` after a CIF run: the file name rather
/// than its (potentially large) contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CifProvenance {
    pub via: String,
    pub cif_filename: String,
}

impl CifProvenance {
    pub fn new(cif_filename: impl Into<String>) -> Self {
        Self { via: "cif".to_string(), cif_filename: cif_filename.into() }
    }
}

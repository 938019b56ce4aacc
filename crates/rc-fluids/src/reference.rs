//! Analytic reference property backend.
//!
//! A deliberately simple, fully deterministic equation of state for common
//! HFC/HCFC refrigerants:
//!
//! - saturation line `ln p = A - B/T` (Clausius-Clapeyron), closed-form in
//!   both directions;
//! - Watson latent heat `hfg = hfg0 ((Tc - T)/(Tc - T0))^0.38`;
//! - incompressible liquid and constant-cp vapor branches, so that
//!   `dh = T ds` holds along isobars;
//! - IIR reference state: h = 200 kJ/kg, s = 1 kJ/(kg·K) for saturated liquid
//!   at 0 °C.
//!
//! Accuracy is a few percent against tabulated data, enough for solver tests
//! and quick estimates. Valid for `T_triple <= T <= T_max` and
//! `p_triple <= p < p_crit`.

use rc_core::units::constants::R_UNIVERSAL;

use crate::backend::{CriticalPoint, PropertyBackend, SATURATION_BAND, check_pair};
use crate::error::{PropertyError, PropertyResult};
use crate::refrigerant::{RefrigerantId, refrigerant_key};
use crate::state::{FluidState, Phase, SpecEnthalpy, SpecEntropy, StateVar};

const T_REF: f64 = 273.15;
const H_REF: f64 = 200.0e3;
const S_REF: f64 = 1.0e3;
const WATSON_EXPONENT: f64 = 0.38;
const VAPOR_COMPRESSIBILITY: f64 = 0.9;

/// Correlation coefficients for one refrigerant.
#[derive(Debug, Clone, PartialEq)]
pub struct RefrigerantParams {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Saturation line `ln p[Pa] = a - b / T[K]`.
    pub a: f64,
    pub b: f64,
    pub t_crit: f64,
    pub t_triple: f64,
    pub t_max: f64,
    /// Latent heat at 0 °C [J/kg].
    pub hfg0: f64,
    pub cp_liquid: f64,
    pub cp_vapor: f64,
    /// [kg/kmol]
    pub molar_mass: f64,
    /// Liquid density at 0 °C [kg/m³] and its temperature slope.
    pub rho_liquid0: f64,
    pub drho_dt: f64,
}

impl RefrigerantParams {
    pub fn p_crit(&self) -> f64 {
        self.p_sat(self.t_crit)
    }

    pub fn p_triple(&self) -> f64 {
        self.p_sat(self.t_triple)
    }

    fn p_sat(&self, t: f64) -> f64 {
        (self.a - self.b / t).exp()
    }

    fn t_sat(&self, p: f64) -> f64 {
        self.b / (self.a - p.ln())
    }

    fn hfg(&self, t: f64) -> f64 {
        let reduced = ((self.t_crit - t) / (self.t_crit - T_REF)).max(0.0);
        self.hfg0 * reduced.powf(WATSON_EXPONENT)
    }

    fn h_liquid(&self, t: f64) -> SpecEnthalpy {
        H_REF + self.cp_liquid * (t - T_REF)
    }

    fn s_liquid(&self, t: f64) -> SpecEntropy {
        S_REF + self.cp_liquid * (t / T_REF).ln()
    }

    fn rho_liquid(&self, t: f64) -> f64 {
        self.rho_liquid0 + self.drho_dt * (t - T_REF)
    }

    fn rho_vapor(&self, p: f64, t: f64) -> f64 {
        let r_specific = 1e3 * R_UNIVERSAL / self.molar_mass;
        p / (VAPOR_COMPRESSIBILITY * r_specific * t)
    }

    fn matches(&self, key: &str) -> bool {
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .any(|n| refrigerant_key(n) == key)
    }
}

/// Builtin parameter sets.
pub fn builtin_refrigerants() -> Vec<RefrigerantParams> {
    vec![
        RefrigerantParams {
            name: "R-134a",
            aliases: &["HFC-134a", "Norflurane"],
            a: 22.3319,
            b: 2661.76,
            t_crit: 374.21,
            t_triple: 169.85,
            t_max: 500.0,
            hfg0: 198.6e3,
            cp_liquid: 1340.0,
            cp_vapor: 1000.0,
            molar_mass: 102.03,
            rho_liquid0: 1294.8,
            drho_dt: -3.5,
        },
        RefrigerantParams {
            name: "R-22",
            aliases: &["HCFC-22"],
            a: 21.9294,
            b: 2406.96,
            t_crit: 369.295,
            t_triple: 115.73,
            t_max: 500.0,
            hfg0: 205.0e3,
            cp_liquid: 1170.0,
            cp_vapor: 750.0,
            molar_mass: 86.47,
            rho_liquid0: 1281.8,
            drho_dt: -3.3,
        },
        RefrigerantParams {
            name: "R-410A",
            aliases: &["HFC-410A"],
            a: 22.2692,
            b: 2370.52,
            t_crit: 344.49,
            t_triple: 200.0,
            t_max: 500.0,
            hfg0: 221.0e3,
            cp_liquid: 1450.0,
            cp_vapor: 1100.0,
            molar_mass: 72.58,
            rho_liquid0: 1170.0,
            drho_dt: -4.5,
        },
        RefrigerantParams {
            name: "R-32",
            aliases: &["HFC-32", "Difluoromethane"],
            a: 22.3342,
            b: 2383.39,
            t_crit: 351.26,
            t_triple: 136.34,
            t_max: 500.0,
            hfg0: 315.6e3,
            cp_liquid: 1780.0,
            cp_vapor: 1260.0,
            molar_mass: 52.02,
            rho_liquid0: 1055.0,
            drho_dt: -4.0,
        },
    ]
}

/// Backend over a table of [`RefrigerantParams`].
#[derive(Debug, Clone)]
pub struct ReferenceBackend {
    table: Vec<RefrigerantParams>,
}

impl ReferenceBackend {
    pub fn new() -> Self {
        Self::with_params(builtin_refrigerants())
    }

    pub fn with_params(table: Vec<RefrigerantParams>) -> Self {
        Self { table }
    }

    pub fn params(&self, refrigerant: &RefrigerantId) -> PropertyResult<&RefrigerantParams> {
        self.lookup(refrigerant.name())
            .ok_or_else(|| PropertyError::UnsupportedRefrigerant {
                name: refrigerant.name().to_owned(),
            })
    }

    fn lookup(&self, name: &str) -> Option<&RefrigerantParams> {
        let key = refrigerant_key(name);
        self.table.iter().find(|p| p.matches(&key))
    }
}

impl Default for ReferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyBackend for ReferenceBackend {
    fn name(&self) -> &str {
        "Reference"
    }

    fn refrigerants(&self) -> Vec<String> {
        self.table.iter().map(|p| p.name.to_owned()).collect()
    }

    fn canonical_name(&self, query: &str) -> Option<String> {
        self.lookup(query).map(|p| p.name.to_owned())
    }

    fn state_from_two(
        &self,
        refrigerant: &RefrigerantId,
        a: StateVar,
        b: StateVar,
    ) -> PropertyResult<FluidState> {
        check_pair(&a, &b)?;
        let params = self.params(refrigerant)?;
        let eos = Eos(params);

        let (a, b) = if a.property() <= b.property() {
            (a, b)
        } else {
            (b, a)
        };
        match (a, b) {
            (StateVar::Pressure(p), StateVar::Temperature(t)) => eos.from_pt(p, t),
            (StateVar::Pressure(p), StateVar::Enthalpy(h)) => eos.from_ph(p, h),
            (StateVar::Pressure(p), StateVar::Entropy(s)) => eos.from_ps(p, s),
            (StateVar::Pressure(p), StateVar::Quality(x)) => eos.from_pq(p, x),
            (StateVar::Temperature(t), StateVar::Quality(x)) => eos.from_tq(t, x),
            (a, b) => Err(PropertyError::UnsupportedInputPair {
                first: a.property().as_str(),
                second: b.property().as_str(),
            }),
        }
    }

    fn critical_point(&self, refrigerant: &RefrigerantId) -> PropertyResult<CriticalPoint> {
        let params = self.params(refrigerant)?;
        Ok(CriticalPoint {
            temperature: params.t_crit,
            pressure: params.p_crit(),
        })
    }
}

struct Eos<'a>(&'a RefrigerantParams);

impl Eos<'_> {
    fn check_pressure(&self, p: f64) -> PropertyResult<()> {
        let r = self.0;
        if p < r.p_triple() {
            return Err(PropertyError::out_of_domain(format!(
                "pressure {p} Pa below triple point of {}",
                r.name
            )));
        }
        if p >= r.p_crit() {
            return Err(PropertyError::out_of_domain(format!(
                "pressure {p} Pa at or above critical pressure of {}",
                r.name
            )));
        }
        Ok(())
    }

    fn check_temperature(&self, t: f64) -> PropertyResult<()> {
        let r = self.0;
        if t < r.t_triple || t > r.t_max {
            return Err(PropertyError::out_of_domain(format!(
                "temperature {t} K outside [{}, {}] K for {}",
                r.t_triple, r.t_max, r.name
            )));
        }
        Ok(())
    }

    fn check_quality(&self, x: f64) -> PropertyResult<()> {
        if !(0.0..=1.0).contains(&x) {
            return Err(PropertyError::out_of_domain(format!(
                "quality {x} outside [0, 1]"
            )));
        }
        Ok(())
    }

    fn liquid(&self, p: f64, t: f64) -> PropertyResult<FluidState> {
        self.check_temperature(t)?;
        let r = self.0;
        FluidState::new(
            p,
            t,
            r.h_liquid(t),
            r.s_liquid(t),
            r.rho_liquid(t),
            None,
            Phase::SubcooledLiquid,
        )
    }

    fn vapor(&self, p: f64, t: f64, t_sat: f64) -> PropertyResult<FluidState> {
        self.check_temperature(t)?;
        let r = self.0;
        let (h_g, s_g) = self.saturated_vapor(t_sat);
        FluidState::new(
            p,
            t,
            h_g + r.cp_vapor * (t - t_sat),
            s_g + r.cp_vapor * (t / t_sat).ln(),
            r.rho_vapor(p, t),
            None,
            Phase::SuperheatedVapor,
        )
    }

    fn two_phase(&self, p: f64, t_sat: f64, x: f64) -> PropertyResult<FluidState> {
        let r = self.0;
        let hfg = r.hfg(t_sat);
        let specific_volume = (1.0 - x) / r.rho_liquid(t_sat) + x / r.rho_vapor(p, t_sat);
        FluidState::new(
            p,
            t_sat,
            r.h_liquid(t_sat) + x * hfg,
            r.s_liquid(t_sat) + x * hfg / t_sat,
            1.0 / specific_volume,
            Some(x),
            Phase::TwoPhase,
        )
    }

    fn saturated_vapor(&self, t_sat: f64) -> (SpecEnthalpy, SpecEntropy) {
        let r = self.0;
        let hfg = r.hfg(t_sat);
        (r.h_liquid(t_sat) + hfg, r.s_liquid(t_sat) + hfg / t_sat)
    }

    fn saturation(&self, p: f64) -> PropertyResult<f64> {
        self.check_pressure(p)?;
        let t_sat = self.0.t_sat(p);
        self.check_temperature(t_sat)?;
        Ok(t_sat)
    }

    fn from_pt(&self, p: f64, t: f64) -> PropertyResult<FluidState> {
        let t_sat = self.saturation(p)?;
        if (t - t_sat).abs() <= SATURATION_BAND * t_sat {
            return Err(PropertyError::UnderdeterminedState {
                first: "pressure",
                second: "temperature",
            });
        }
        if t < t_sat {
            self.liquid(p, t)
        } else {
            self.vapor(p, t, t_sat)
        }
    }

    fn from_ph(&self, p: f64, h: SpecEnthalpy) -> PropertyResult<FluidState> {
        let r = self.0;
        let t_sat = self.saturation(p)?;
        let h_l = r.h_liquid(t_sat);
        let (h_g, _) = self.saturated_vapor(t_sat);
        if h < h_l {
            self.liquid(p, T_REF + (h - H_REF) / r.cp_liquid)
        } else if h > h_g {
            self.vapor(p, t_sat + (h - h_g) / r.cp_vapor, t_sat)
        } else {
            self.two_phase(p, t_sat, (h - h_l) / (h_g - h_l))
        }
    }

    fn from_ps(&self, p: f64, s: SpecEntropy) -> PropertyResult<FluidState> {
        let r = self.0;
        let t_sat = self.saturation(p)?;
        let s_l = r.s_liquid(t_sat);
        let (_, s_g) = self.saturated_vapor(t_sat);
        if s < s_l {
            self.liquid(p, T_REF * ((s - S_REF) / r.cp_liquid).exp())
        } else if s > s_g {
            self.vapor(p, t_sat * ((s - s_g) / r.cp_vapor).exp(), t_sat)
        } else {
            self.two_phase(p, t_sat, (s - s_l) / (s_g - s_l))
        }
    }

    fn from_pq(&self, p: f64, x: f64) -> PropertyResult<FluidState> {
        self.check_quality(x)?;
        let t_sat = self.saturation(p)?;
        self.two_phase(p, t_sat, x)
    }

    fn from_tq(&self, t: f64, x: f64) -> PropertyResult<FluidState> {
        self.check_quality(x)?;
        self.check_temperature(t)?;
        let r = self.0;
        if t >= r.t_crit {
            return Err(PropertyError::out_of_domain(format!(
                "temperature {t} K at or above critical temperature of {}",
                r.name
            )));
        }
        self.two_phase(r.p_sat(t), t, x)
    }
}

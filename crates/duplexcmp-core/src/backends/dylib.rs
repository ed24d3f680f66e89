use super::BackendError;
use super::library::{CalcError, DuplexCalculator, RawDuplex};
use crate::core::models::ReactionConditions;
use libloading::{Library, Symbol};
use std::ffi::{CString, OsStr, c_char, c_int};
use tracing::info;

/// Result struct filled by the loaded calculator. `dg`/`dh` are in cal/mol,
/// `ds` in cal/mol/K, `tm` in °C, matching the milli-unit convention of
/// [`RawDuplex`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThalResultRaw {
    pub dg: f64,
    pub dh: f64,
    pub ds: f64,
    pub tm: f64,
}

type ThalHeterodimerFn = unsafe extern "C" fn(
    primer: *const c_char,
    target: *const c_char,
    monovalent_mm: f64,
    divalent_mm: f64,
    dntp_mm: f64,
    dna_nm: f64,
    temperature_c: f64,
    out: *mut ThalResultRaw,
) -> c_int;

const SYMBOL_NAME: &[u8] = b"thal_heterodimer\0";

/// An in-process duplex calculator resolved at runtime from a C-ABI shared
/// library exposing `thal_heterodimer`.
///
/// Resolution failure is not fatal to a run: the caller reports the backend
/// as missing and continues with whatever oracles remain.
#[derive(Debug)]
pub struct DylibCalculator {
    library: Library,
    origin: String,
}

impl DylibCalculator {
    /// Loads the shared library at `path` and probes for the expected
    /// symbol.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::DependencyMissing`] when the library cannot
    /// be loaded or does not export `thal_heterodimer`.
    pub fn load(path: impl AsRef<OsStr>) -> Result<Self, BackendError> {
        let origin = path.as_ref().to_string_lossy().into_owned();
        let library = unsafe { Library::new(path.as_ref()) }.map_err(|e| {
            BackendError::DependencyMissing {
                name: origin.clone(),
                detail: e.to_string(),
            }
        })?;

        // Probe once so a missing symbol is reported at roster-build time,
        // not in the middle of the first scenario.
        unsafe {
            library
                .get::<ThalHeterodimerFn>(SYMBOL_NAME)
                .map_err(|e| BackendError::DependencyMissing {
                    name: origin.clone(),
                    detail: e.to_string(),
                })?;
        }

        info!(library = %origin, "loaded in-process duplex calculator");
        Ok(Self { library, origin })
    }

    /// Loads the calculator from the platform-conventional library name
    /// (`libthal.so` / `libthal.dylib` / `thal.dll`) via the system search
    /// path.
    pub fn load_default() -> Result<Self, BackendError> {
        Self::load(libloading::library_filename("thal"))
    }
}

impl DuplexCalculator for DylibCalculator {
    fn calc_heterodimer(
        &self,
        primer: &str,
        target: &str,
        conditions: &ReactionConditions,
    ) -> Result<RawDuplex, CalcError> {
        let c_primer = CString::new(primer)
            .map_err(|_| CalcError::new("primer contains an interior NUL byte"))?;
        let c_target = CString::new(target)
            .map_err(|_| CalcError::new("target contains an interior NUL byte"))?;

        let mut out = ThalResultRaw::default();
        let code = unsafe {
            let func: Symbol<ThalHeterodimerFn> = self
                .library
                .get(SYMBOL_NAME)
                .map_err(|e| CalcError::new(e.to_string()))?;
            func(
                c_primer.as_ptr(),
                c_target.as_ptr(),
                conditions.monovalent_mm,
                conditions.divalent_mm,
                conditions.dntp_mm,
                conditions.dna_nm,
                conditions.temperature_c,
                &mut out,
            )
        };

        if code != 0 {
            return Err(CalcError::new(format!(
                "{} returned error code {code}",
                self.origin
            )));
        }

        Ok(RawDuplex {
            dg_cal: out.dg,
            dh_cal: out.dh,
            ds: out.ds,
            tm: out.tm,
        })
    }
}

#[cfg(test)]
mod dylib_tests {
    use super::*;

    #[test]
    fn missing_library_reports_dependency_missing() {
        let err = DylibCalculator::load("/nonexistent/libthal-missing.so")
            .expect_err("loading a nonexistent library should fail");
        assert!(matches!(err, BackendError::DependencyMissing { .. }));
    }

    #[test]
    fn load_default_without_installed_library_is_non_fatal() {
        // On a machine without libthal installed this resolves to a plain
        // DependencyMissing value, which the roster reports and skips.
        if let Err(err) = DylibCalculator::load_default() {
            assert!(matches!(err, BackendError::DependencyMissing { .. }));
        }
    }
}

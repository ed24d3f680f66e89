//! # duplexcmp Core Library
//!
//! A harness for validating numerical agreement between independent
//! implementations of a nucleic-acid duplex thermodynamics calculation
//! (free energy ΔG, melting temperature Tm, and optionally ΔH/ΔS).
//!
//! The thermodynamic model itself is deliberately out of scope: every
//! calculation backend is treated as an opaque oracle behind a narrow
//! interface. The library's job is to normalize the oracles' differently
//! shaped outputs into one canonical record and to compute pairwise signed
//! differences across a matrix of test inputs.
//!
//! ## Architectural Philosophy
//!
//! The crate is layered to keep the comparison logic independent of how any
//! particular oracle is reached:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SequencePair`,
//!   `ReactionConditions`, `DuplexResult`) and I/O utilities for the
//!   transient sequence artifacts handed to external binaries.
//!
//! - **[`backends`]: The Adapter Seam.** One adapter per oracle kind: an
//!   in-process library adapter (with runtime resolution of a C-ABI
//!   calculator) and a subprocess adapter that serializes inputs to disk
//!   and parses textual output. Each adapter either returns a fully
//!   populated result or a typed failure, never a partial record.
//!
//! - **[`engine`]: The Comparison Core.** Invokes a roster of backends for
//!   one scenario, collects whichever results succeeded, and derives all
//!   pairwise ΔG/Tm differences. A failing backend never fails the pass.
//!
//! - **[`workflows`]: The Public API.** The batch procedure: the fixed
//!   scenario matrix, the fail-fast build precondition for compiled
//!   oracles, and the sequential run that drives the engine over every
//!   scenario.

pub mod backends;
pub mod core;
pub mod engine;
pub mod workflows;

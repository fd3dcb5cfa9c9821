//! Output contract of a verification run

pub mod assembler;

pub use assembler::{ReportAssembler, ValidationEntry, VerificationReport, SUMMARY_INVALID, SUMMARY_VALID};

//! Pipeline stages for photo validation and correction.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets the validator
//! and the corrector share the normalizer without sharing anything else.
//!
//! ## Data Flow
//!
//! ```text
//! filename ──▶ identifier ─────────────────────────┐
//! bytes ─────▶ normalize ──▶ validate ──▶ correct ──▶ package
//!              (decode,      (report:    (resize,    (ZIP)
//!               EXIF,         errors +    white
//!               alpha)        warnings)   canvas,
//!                                         quality
//!                                         loop)
//! ```
//!
//! 1. [`identifier`] — filename → canonical DNI/CE/passport token
//! 2. [`normalize`]  — bytes → upright, opaque RGB pixel grid
//! 3. [`background`] — border/corner whiteness sampling
//! 4. [`resolution`] — JFIF/`pHYs` DPI metadata reader
//! 5. [`validate`]   — ordered rule checks → two-tier report
//! 6. [`correct`]    — geometry fix + bounded re-encode loop
//! 7. [`package`]    — ordered entries → one ZIP buffer

pub mod background;
pub mod correct;
pub mod identifier;
pub mod normalize;
pub mod package;
pub mod resolution;
pub mod validate;

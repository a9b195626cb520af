//! The institutional photo specification and its builder.
//!
//! Every threshold the pipeline compares against lives in one struct,
//! [`PhotoSpec`]. Keeping the knobs together makes it trivial to share a
//! spec across calls, serialise it for logging, and diff two runs to
//! understand why their reports differ. [`PhotoSpec::default`] is the
//! SUNEDU surface: 240×288 px, 300 DPI, 50 KB, JPEG output.
//!
//! # Design choice: builder over constructor
//! Callers almost always want the institutional defaults and override one
//! or two fields (a different size ceiling for a test, say). The builder
//! lets them set only what they care about, and `build()` rejects
//! combinations the re-encode loop could not terminate on.

use crate::error::FotocheckError;
use serde::{Deserialize, Serialize};

/// Download filename for the assembled archive.
pub const ARCHIVE_FILENAME: &str = "fotos_corregidas.zip";

/// Target photo specification.
///
/// Built via [`PhotoSpec::builder()`] or using [`PhotoSpec::default()`]
/// for the institutional values.
///
/// # Example
/// ```rust
/// use fotocheck::PhotoSpec;
///
/// let spec = PhotoSpec::builder()
///     .max_kilobytes(30)
///     .start_quality(80)
///     .build()
///     .unwrap();
/// assert_eq!(spec.width, 240);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSpec {
    /// Exact output width in pixels. Default: 240.
    pub width: u32,

    /// Exact output height in pixels. Default: 288.
    pub height: u32,

    /// Required resolution metadata as a DPI pair. Default: (300, 300).
    ///
    /// Tagged into every corrected JPEG (JFIF density, unit = inch) and
    /// compared against the upload's JFIF/`pHYs` metadata during validation.
    pub dpi: (u32, u32),

    /// File-size ceiling in bytes. Default: 51 200 (50 KB).
    pub max_bytes: usize,

    /// First JPEG quality the corrector tries. Default: 85.
    pub start_quality: u8,

    /// Quality below which the re-encode loop gives up on the size budget.
    /// Default: 25. The result is returned (and its size reported) even
    /// when it still exceeds `max_bytes` at this floor.
    pub quality_floor: u8,

    /// Quality decrement per re-encode iteration. Default: 10.
    ///
    /// With the default start/floor this bounds the loop at 7 encodes
    /// (85 → 75 → 65 → 55 → 45 → 35 → 25).
    pub quality_step: u8,

    /// Minimum gray value (0–255) a border pixel must reach to count as
    /// white in the background check. Default: 245.
    pub white_threshold: u8,

    /// Minimum fraction of bright pixels every sampled border region must
    /// reach for the background to pass. Default: 0.98.
    pub white_frac_min: f32,

    /// Extensions accepted for upload (lower-case, no dot).
    /// Default: jpg, jpeg, png.
    pub allowed_extensions: Vec<String>,
}

impl Default for PhotoSpec {
    fn default() -> Self {
        Self {
            width: 240,
            height: 288,
            dpi: (300, 300),
            max_bytes: 50 * 1024,
            start_quality: 85,
            quality_floor: 25,
            quality_step: 10,
            white_threshold: 245,
            white_frac_min: 0.98,
            allowed_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
        }
    }
}

impl PhotoSpec {
    /// Create a new builder seeded with the institutional defaults.
    pub fn builder() -> PhotoSpecBuilder {
        PhotoSpecBuilder {
            spec: Self::default(),
        }
    }

    /// Upper bound on re-encode iterations implied by start/floor/step.
    pub fn max_encode_passes(&self) -> u32 {
        let span = self.start_quality.saturating_sub(self.quality_floor) as u32;
        1 + span.div_ceil(self.quality_step.max(1) as u32)
    }
}

/// Builder for [`PhotoSpec`].
#[derive(Debug)]
pub struct PhotoSpecBuilder {
    spec: PhotoSpec,
}

impl PhotoSpecBuilder {
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.spec.width = width;
        self.spec.height = height;
        self
    }

    pub fn dpi(mut self, x: u32, y: u32) -> Self {
        self.spec.dpi = (x, y);
        self
    }

    pub fn max_bytes(mut self, n: usize) -> Self {
        self.spec.max_bytes = n;
        self
    }

    /// Convenience for the common "N KB" phrasing of the ceiling.
    pub fn max_kilobytes(self, kb: usize) -> Self {
        self.max_bytes(kb * 1024)
    }

    pub fn start_quality(mut self, q: u8) -> Self {
        self.spec.start_quality = q.clamp(1, 100);
        self
    }

    pub fn quality_floor(mut self, q: u8) -> Self {
        self.spec.quality_floor = q.clamp(1, 100);
        self
    }

    pub fn quality_step(mut self, step: u8) -> Self {
        self.spec.quality_step = step.max(1);
        self
    }

    pub fn white_threshold(mut self, t: u8) -> Self {
        self.spec.white_threshold = t;
        self
    }

    pub fn white_frac_min(mut self, f: f32) -> Self {
        self.spec.white_frac_min = f;
        self
    }

    /// Build the spec, validating constraints the pipeline relies on.
    pub fn build(self) -> Result<PhotoSpec, FotocheckError> {
        let s = &self.spec;
        if s.width == 0 || s.height == 0 {
            return Err(FotocheckError::InvalidConfig(format!(
                "target dimensions must be non-zero, got {}x{}",
                s.width, s.height
            )));
        }
        if s.width > u16::MAX as u32 || s.height > u16::MAX as u32 {
            return Err(FotocheckError::InvalidConfig(format!(
                "target dimensions exceed the JPEG limit of {}, got {}x{}",
                u16::MAX,
                s.width,
                s.height
            )));
        }
        if s.max_bytes == 0 {
            return Err(FotocheckError::InvalidConfig(
                "size ceiling must be at least 1 byte".into(),
            ));
        }
        if s.quality_floor > s.start_quality {
            return Err(FotocheckError::InvalidConfig(format!(
                "quality floor {} exceeds start quality {}",
                s.quality_floor, s.start_quality
            )));
        }
        if !(0.0..=1.0).contains(&s.white_frac_min) {
            return Err(FotocheckError::InvalidConfig(format!(
                "white_frac_min must be within 0.0–1.0, got {}",
                s.white_frac_min
            )));
        }
        Ok(self.spec)
    }
}

// Surface -> feature vector.
// The classifier only needs ink density, and ink is a fixed colour, so each
// pixel reduces to its alpha byte.

use std::fmt;

use crate::types::{CHANNELS, Surface};

/// Message shown when a blank surface is submitted.
pub const NO_CONTENT_MESSAGE: &str = "Please sketch a number!";

/// True iff any channel byte of the surface is non-zero.
/// Background is fully transparent black, so one lit byte is enough,
/// including the very last one.
pub fn has_content(surface: &Surface) -> bool {
    surface.as_bytes().iter().any(|&b| b > 0)
}

/// One alpha byte per pixel, in scan order.
pub fn extract_vector(surface: &Surface) -> FeatureVector {
    let mut values = Vec::with_capacity(surface.pixel_count());
    values.extend(surface.as_bytes().chunks_exact(CHANNELS).map(|px| px[3]));
    FeatureVector { values }
}

/// Flattened single-channel encoding, `width * height` values in 0..=255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureVector {
    values: Vec<u8>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    /// Comma-separated decimal values; the text that goes into the transfer slot.
    pub fn to_csv(&self) -> String {
        self.to_string()
    }

    /// Block-mean downsample of a `width` x `height` vector by `factor` in
    /// both directions (e.g. 280x280 -> 28x28 with factor 10).
    /// `None` if the sizes don't fit or `factor` doesn't divide them.
    pub fn pooled(&self, width: usize, height: usize, factor: usize) -> Option<FeatureVector> {
        if factor == 0 || width * height != self.values.len() {
            return None;
        }
        if width % factor != 0 || height % factor != 0 {
            return None;
        }
        let (ow, oh) = (width / factor, height / factor);
        let cell = (factor as u64) * (factor as u64);
        let mut values = Vec::with_capacity(ow * oh);
        for by in 0..oh {
            for bx in 0..ow {
                let mut sum = 0u64;
                for y in by * factor..(by + 1) * factor {
                    let row = &self.values[y * width + bx * factor..y * width + (bx + 1) * factor];
                    sum += row.iter().map(|&v| v as u64).sum::<u64>();
                }
                // round half up
                values.push(((sum + cell / 2) / cell) as u8);
            }
        }
        Some(FeatureVector { values })
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Host-side messaging the encoder is allowed to trigger.
pub trait Notifier {
    /// Blank surface at encode time.
    fn report_no_content(&mut self);
    /// Free-form status line.
    fn report_status(&mut self, text: &str);
    /// Drop any prediction/result currently on display.
    fn clear_result(&mut self);
}

/// Output of one encode pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoding {
    pub vector: FeatureVector,
    pub has_content: bool,
}

/// Validation + extraction, with the notifier injected.
pub struct Encoder<N: Notifier> {
    notifier: N,
}

impl<N: Notifier> Encoder<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// A blank surface is only a warning: the vector is produced either way.
    pub fn encode(&mut self, surface: &Surface) -> Encoding {
        let has_content = has_content(surface);
        if has_content {
            self.notifier.report_status("Drawn on");
        } else {
            self.notifier.report_no_content();
        }
        Encoding { vector: extract_vector(surface), has_content }
    }
}

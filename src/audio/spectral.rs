//! Band energies and spectral/temporal descriptors.
//!
//! All functions take normalized magnitudes (0-1) or time-domain samples
//! (-1..1) and return values in [0, 1]. Empty input yields 0.

use std::ops::Range;

/// Map a half-open frequency range to bin indices.
///
/// `index = freq / nyquist * bin_count`, clamped to the available bins.
pub fn band_bins(range_hz: (f32, f32), nyquist_hz: f32, bin_count: usize) -> Range<usize> {
    if nyquist_hz <= 0.0 || bin_count == 0 {
        return 0..0;
    }
    let to_bin = |hz: f32| ((hz / nyquist_hz * bin_count as f32).max(0.0) as usize).min(bin_count);
    let start = to_bin(range_hz.0);
    let end = to_bin(range_hz.1).max(start);
    start..end
}

/// Mean normalized magnitude over a frequency band
pub fn band_energy(spectrum: &[f32], range_hz: (f32, f32), nyquist_hz: f32) -> f32 {
    let bins = band_bins(range_hz, nyquist_hz, spectrum.len());
    if bins.is_empty() {
        return 0.0;
    }
    let len = bins.len();
    let sum: f32 = spectrum[bins].iter().sum();
    (sum / len as f32).clamp(0.0, 1.0)
}

/// Mean of all magnitudes
pub fn mean(spectrum: &[f32]) -> f32 {
    if spectrum.is_empty() {
        return 0.0;
    }
    (spectrum.iter().sum::<f32>() / spectrum.len() as f32).clamp(0.0, 1.0)
}

/// Root mean square of the values
pub fn rms(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = values.iter().map(|v| v * v).sum();
    (sum_sq / values.len() as f32).sqrt().clamp(0.0, 1.0)
}

/// Magnitude-weighted mean bin index divided by bin count
pub fn spectral_centroid(spectrum: &[f32]) -> f32 {
    let total: f32 = spectrum.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f32 = spectrum
        .iter()
        .enumerate()
        .map(|(i, m)| m * i as f32)
        .sum();
    (weighted / total / spectrum.len() as f32).clamp(0.0, 1.0)
}

/// RMS of the per-bin change between two spectra of equal length.
///
/// Returns 0 when the bin counts differ.
pub fn spectral_flux(current: &[f32], previous: &[f32]) -> f32 {
    if current.is_empty() || current.len() != previous.len() {
        return 0.0;
    }
    let sum_sq: f32 = current
        .iter()
        .zip(previous)
        .map(|(c, p)| (c - p) * (c - p))
        .sum();
    (sum_sq / current.len() as f32).sqrt().clamp(0.0, 1.0)
}

/// Fraction of adjacent sample pairs whose sign differs
pub fn zero_crossing_rate(samples: &[f32]) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }
    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f32 / (samples.len() - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_bins_mapping() {
        // 1024 bins over 22050 Hz ≈ 21.5 Hz per bin
        let bins = band_bins((0.0, 250.0), 22050.0, 1024);
        assert_eq!(bins, 0..11);

        let bins = band_bins((4000.0, 20000.0), 22050.0, 1024);
        assert_eq!(bins.start, 185);
        assert_eq!(bins.end, 928);

        // Range past Nyquist clamps to the last bin
        let bins = band_bins((20000.0, 40000.0), 22050.0, 1024);
        assert_eq!(bins.end, 1024);
    }

    #[test]
    fn test_band_energy_average() {
        let mut spectrum = vec![0.0; 1024];
        for m in spectrum.iter_mut().take(11) {
            *m = 0.5;
        }
        assert!((band_energy(&spectrum, (0.0, 250.0), 22050.0) - 0.5).abs() < 1e-6);
        assert_eq!(band_energy(&spectrum, (250.0, 4000.0), 22050.0), 0.0);
        assert_eq!(band_energy(&[], (0.0, 250.0), 22050.0), 0.0);
    }

    #[test]
    fn test_centroid_brightness() {
        let mut dark = vec![0.0; 100];
        dark[10] = 1.0;
        let mut bright = vec![0.0; 100];
        bright[90] = 1.0;

        assert!((spectral_centroid(&dark) - 0.1).abs() < 1e-6);
        assert!((spectral_centroid(&bright) - 0.9).abs() < 1e-6);
        assert_eq!(spectral_centroid(&[0.0; 8]), 0.0);
    }

    #[test]
    fn test_flux() {
        let a = [0.0, 0.0, 0.0, 0.0];
        let b = [1.0, 1.0, 0.0, 0.0];
        assert!((spectral_flux(&b, &a) - (0.5f32).sqrt()).abs() < 1e-6);
        assert_eq!(spectral_flux(&a, &a), 0.0);
        // Bin count changed
        assert_eq!(spectral_flux(&b, &[0.0; 3]), 0.0);
    }

    #[test]
    fn test_zero_crossings_and_rms() {
        let alternating = [0.5, -0.5, 0.5, -0.5, 0.5];
        assert_eq!(zero_crossing_rate(&alternating), 1.0);
        assert!((rms(&alternating) - 0.5).abs() < 1e-6);

        let dc = [0.25; 16];
        assert_eq!(zero_crossing_rate(&dc), 0.0);
        assert_eq!(zero_crossing_rate(&[1.0]), 0.0);
    }
}

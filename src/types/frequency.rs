//! MIDI note to frequency lookup using equal temperament
//! A440 tuning: MIDI note 69 = 440 Hz

use std::sync::LazyLock;

/// Number of entries in the table (MIDI notes 0-127)
pub const TABLE_SIZE: usize = 128;

/// Lowest frequency the controller motors render faithfully
pub const SAFE_BAND_MIN: f32 = 320.0;
/// Highest frequency the controller motors render faithfully
pub const SAFE_BAND_MAX: f32 = 4000.0;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Process-wide frequency table, indexed by MIDI note number
pub static FREQUENCY_TABLE: LazyLock<[f32; TABLE_SIZE]> = LazyLock::new(|| {
    let mut table = [0.0; TABLE_SIZE];
    for (note, freq) in table.iter_mut().enumerate() {
        *freq = equal_tempered(note as i32);
    }
    table
});

/// f = 440 * 2^((n-69)/12), computed in f64 to keep the table exact to f32 precision
fn equal_tempered(note: i32) -> f32 {
    const A4: f64 = 440.0;
    const A4_MIDI: i32 = 69;

    let semitones = note - A4_MIDI;
    (A4 * 2.0_f64.powf(semitones as f64 / 12.0)) as f32
}

/// Frequency for a note number, or None if it is past the end of the table
pub fn frequency_for(note: u8) -> Option<f32> {
    FREQUENCY_TABLE.get(note as usize).copied()
}

/// Whether a vibration motor can be expected to render this frequency cleanly
pub fn in_safe_band(frequency: f32) -> bool {
    (SAFE_BAND_MIN..=SAFE_BAND_MAX).contains(&frequency)
}

/// Scientific pitch name for log lines: 60 -> "C4", 70 -> "A#4"
pub fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_conversion() {
        let freq = frequency_for(69).unwrap();
        assert!((freq - 440.0).abs() < 0.001);
    }

    #[test]
    fn test_c4_middle_c() {
        let freq = frequency_for(60).unwrap();
        assert!((freq - 261.6256).abs() < 0.001);
    }

    #[test]
    fn test_table_endpoints() {
        assert!((FREQUENCY_TABLE[0] - 8.175_799).abs() < 0.0001);
        assert!((FREQUENCY_TABLE[127] - 12_543.854).abs() < 0.01);
    }

    #[test]
    fn test_table_is_increasing() {
        for pair in FREQUENCY_TABLE.windows(2) {
            assert!(pair[1] > pair[0], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_octave_doubling() {
        let a3 = frequency_for(57).unwrap();
        let a4 = frequency_for(69).unwrap();
        let a5 = frequency_for(81).unwrap();

        assert!((a4 / a3 - 2.0).abs() < 0.0001);
        assert!((a5 / a4 - 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_out_of_table() {
        assert!(frequency_for(127).is_some());
        assert!(frequency_for(128).is_none());
        assert!(frequency_for(255).is_none());
    }

    #[test]
    fn test_safe_band() {
        // E4 (329.6 Hz) is the lowest note inside the band, B7 (3951 Hz) the highest
        assert!(!in_safe_band(frequency_for(63).unwrap()));
        assert!(in_safe_band(frequency_for(64).unwrap()));
        assert!(in_safe_band(frequency_for(107).unwrap()));
        assert!(!in_safe_band(frequency_for(108).unwrap()));
    }

    #[test]
    fn test_note_names() {
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(70), "A#4");
        assert_eq!(note_name(127), "G9");
    }
}

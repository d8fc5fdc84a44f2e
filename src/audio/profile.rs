/// PCM layout for a call recording.
///
/// The service records everything with one fixed profile (mono, 16-bit
/// little-endian, 16 kHz); format negotiation is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioProfile {
    pub sample_rate: u32,
    /// Bytes per sample
    pub sample_width: u16,
    pub channels: u16,
}

impl AudioProfile {
    /// The profile every call recording uses.
    pub const CALL_AUDIO: AudioProfile = AudioProfile {
        sample_rate: 16_000,
        sample_width: 2,
        channels: 1,
    };

    /// Bytes occupied by one frame (one sample per channel).
    pub fn frame_bytes(&self) -> usize {
        self.sample_width as usize * self.channels as usize
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width * 8
    }

    /// Largest prefix of `len` that is a whole number of frames.
    pub fn whole_frame_bytes(&self, len: usize) -> usize {
        len - len % self.frame_bytes()
    }

    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample(),
            sample_format: hound::SampleFormat::Int,
        }
    }
}

impl Default for AudioProfile {
    fn default() -> Self {
        Self::CALL_AUDIO
    }
}

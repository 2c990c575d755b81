//! Audio Decoding Utilities
//!
//! **Purpose:** Decode stored audio to mono f32 PCM at its native sample rate
//!
//! Uses symphonia for format-agnostic decoding (WAV, MP3, FLAC, OGG, AAC, etc.)

use std::io::Cursor;
use std::sync::Arc;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::error::DecodeError;
use crate::models::Waveform;
use crate::storage::{AudioResource, AudioStore};

/// Decoder reading through an [`AudioStore`]
#[derive(Clone)]
pub struct AudioDecoder {
    store: Arc<dyn AudioStore>,
}

impl AudioDecoder {
    pub fn new(store: Arc<dyn AudioStore>) -> Self {
        Self { store }
    }

    /// Read and decode the resource stored under `identifier`
    ///
    /// # Errors
    /// * `DecodeError::Storage` - resource missing or unreadable
    /// * `DecodeError::Unsupported` / `NoAudioTrack` / `MissingSampleRate`
    /// * `DecodeError::Corrupt` - packet read or decode failure
    pub fn decode(&self, identifier: &str) -> Result<Waveform, DecodeError> {
        let result = self
            .store
            .read_audio(identifier)
            .map_err(DecodeError::from)
            .and_then(|resource| decode_resource(identifier, resource));

        if let Err(e) = &result {
            tracing::warn!(identifier = e.identifier(), error = %e, "Audio decoding failed");
        }
        result
    }
}

/// Decode in-memory audio to a mono waveform
///
/// **Algorithm:**
/// 1. Probe format using symphonia (extension as hint)
/// 2. Find first non-null audio track
/// 3. Decode all packets of that track
/// 4. Mix channels down to mono (average)
///
/// No resampling: the waveform carries the track's native sample rate.
pub fn decode_resource(identifier: &str, resource: AudioResource) -> Result<Waveform, DecodeError> {
    tracing::debug!(
        identifier,
        bytes = resource.bytes.len(),
        "Decoding audio resource"
    );

    let mss = MediaSourceStream::new(Box::new(Cursor::new(resource.bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = resource.extension.as_deref() {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::Unsupported {
            identifier: identifier.to_string(),
            reason: e.to_string(),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::NoAudioTrack(identifier.to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|rate| *rate > 0)
        .ok_or_else(|| DecodeError::MissingSampleRate(identifier.to_string()))?;
    // Some containers only reveal the layout once packets are decoded
    let mut channel_count = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Unsupported {
            identifier: identifier.to_string(),
            reason: e.to_string(),
        })?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(e) => {
                end_of_stream(identifier, e)?;
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| DecodeError::Corrupt {
            identifier: identifier.to_string(),
            reason: format!("error decoding packet: {}", e),
        })?;

        channel_count = decoded.spec().channels.count();
        mix_to_mono(&decoded, &mut samples);
    }

    tracing::debug!(
        identifier,
        sample_rate,
        channels = channel_count,
        total_samples = samples.len(),
        duration_seconds = format!("{:.2}", samples.len() as f64 / sample_rate as f64),
        "Audio decoding complete"
    );

    Ok(Waveform::new(samples, sample_rate).with_source_channels(channel_count))
}

/// Classify a packet read error
///
/// Returns `Ok(())` for a clean end of stream. A stream that needs a decoder
/// reset (chained or changed track parameters) would only decode partially,
/// so it is reported as corrupt along with any other read failure.
fn end_of_stream(identifier: &str, error: SymphoniaError) -> Result<(), DecodeError> {
    match error {
        SymphoniaError::IoError(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(()),
        SymphoniaError::ResetRequired => Err(DecodeError::Corrupt {
            identifier: identifier.to_string(),
            reason: "stream parameters changed mid-stream (decoder reset required)".to_string(),
        }),
        e => Err(DecodeError::Corrupt {
            identifier: identifier.to_string(),
            reason: format!("error reading packet: {}", e),
        }),
    }
}

/// Append a decoded buffer to `out` as mono f32 samples
fn mix_to_mono(decoded: &AudioBufferRef<'_>, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::U8(buf) => mix_planes(&**buf, out),
        AudioBufferRef::U16(buf) => mix_planes(&**buf, out),
        AudioBufferRef::U24(buf) => mix_planes(&**buf, out),
        AudioBufferRef::U32(buf) => mix_planes(&**buf, out),
        AudioBufferRef::S8(buf) => mix_planes(&**buf, out),
        AudioBufferRef::S16(buf) => mix_planes(&**buf, out),
        AudioBufferRef::S24(buf) => mix_planes(&**buf, out),
        AudioBufferRef::S32(buf) => mix_planes(&**buf, out),
        AudioBufferRef::F32(buf) => mix_planes(&**buf, out),
        AudioBufferRef::F64(buf) => mix_planes(&**buf, out),
    }
}

/// Average all channel planes frame by frame
fn mix_planes<S>(buf: &AudioBuffer<S>, out: &mut Vec<f32>)
where
    S: Sample,
    f32: FromSample<S>,
{
    let num_channels = buf.spec().channels.count();
    if num_channels == 0 {
        return;
    }
    let num_frames = buf.frames();
    out.reserve(num_frames);

    for frame_idx in 0..num_frames {
        let sum: f32 = (0..num_channels)
            .map(|ch| f32::from_sample(buf.chan(ch)[frame_idx]))
            .sum();
        out.push(sum / num_channels as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryAudioStore;
    use crate::test_support::wav_bytes;

    #[test]
    fn test_decode_missing_resource() {
        let decoder = AudioDecoder::new(Arc::new(MemoryAudioStore::new()));
        let result = decoder.decode("nonexistent.mp3");
        assert!(matches!(
            result,
            Err(DecodeError::Storage(StorageError::NotFound(_)))
        ));
    }

    #[test]
    fn test_end_of_stream_classification() {
        let eof = SymphoniaError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "end of stream",
        ));
        assert!(end_of_stream("take.ogg", eof).is_ok());

        let reset = end_of_stream("take.ogg", SymphoniaError::ResetRequired).unwrap_err();
        assert!(matches!(reset, DecodeError::Corrupt { .. }));
        assert_eq!(reset.identifier(), "take.ogg");

        let broken = end_of_stream(
            "take.ogg",
            SymphoniaError::DecodeError("invalid page header"),
        );
        assert!(matches!(broken, Err(DecodeError::Corrupt { .. })));
    }

    #[test]
    fn test_decode_garbage_is_unsupported() {
        let store = MemoryAudioStore::new().with_resource("noise.bin", vec![0x42; 4096]);
        let decoder = AudioDecoder::new(Arc::new(store));

        let result = decoder.decode("noise.bin");
        assert!(
            matches!(result, Err(DecodeError::Unsupported { .. })),
            "got {:?}",
            result
        );
    }

    #[test]
    fn test_decode_preserves_native_sample_rate() {
        let samples: Vec<i16> = (0..2205).map(|i| ((i % 100) * 100) as i16).collect();
        let store = MemoryAudioStore::new()
            .with_resource("low.wav", wav_bytes(&samples, 22050, 1))
            .with_resource("high.wav", wav_bytes(&samples, 48000, 1));
        let decoder = AudioDecoder::new(Arc::new(store));

        let low = decoder.decode("low.wav").unwrap();
        let high = decoder.decode("high.wav").unwrap();

        assert_eq!(low.sample_rate(), 22050);
        assert_eq!(high.sample_rate(), 48000);
        assert_eq!(low.len(), 2205);
        assert_eq!(low.samples(), high.samples());
        assert!((low.samples()[1] - 100.0 / 32768.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_stereo_mixes_to_mono() {
        // Interleaved L/R: left = 16384, right = 0
        let interleaved: Vec<i16> = (0..1000).flat_map(|_| [16384i16, 0]).collect();
        let store = MemoryAudioStore::new().with_resource("stereo.wav", wav_bytes(&interleaved, 44100, 2));
        let decoder = AudioDecoder::new(Arc::new(store));

        let waveform = decoder.decode("stereo.wav").unwrap();

        assert_eq!(waveform.source_channels(), 2);
        assert_eq!(waveform.len(), 1000);
        assert!(waveform.samples().iter().all(|s| (*s - 0.25).abs() < 1e-6));
    }
}

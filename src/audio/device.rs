use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::Receiver;

use super::engine::PulseEngine;
use crate::types::pulse::HapticPulse;

/// List available audio output devices
pub fn list_audio_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();

    let mut devices: Vec<String> = host
        .output_devices()?
        .filter_map(|device| {
            device.description()
                .ok()
                .map(|desc| desc.name().to_string())
        })
        .collect();

    // Some hosts leave the default device out of the iterator
    if let Some(default_device) = host.default_output_device() {
        if let Ok(default_desc) = default_device.description() {
            let default_name = default_desc.name().to_string();
            if !devices.contains(&default_name) {
                devices.push(default_name);
            }
        }
    }

    if devices.is_empty() {
        return Err(anyhow!("No audio output devices found"));
    }

    Ok(devices)
}

/// Find audio device index by name or index string
pub fn find_audio_device(devices: &[String], search: &str) -> Result<usize> {
    if let Ok(index) = search.parse::<usize>() {
        if index < devices.len() {
            return Ok(index);
        } else {
            return Err(anyhow!("Audio device index {} out of range (0-{})", index, devices.len().saturating_sub(1)));
        }
    }

    // Search by name (case-insensitive substring match)
    let search_lower = search.to_lowercase();
    for (i, device) in devices.iter().enumerate() {
        if device.to_lowercase().contains(&search_lower) {
            return Ok(i);
        }
    }

    Err(anyhow!("Audio device '{}' not found", search))
}

/// Open an output device and start rendering pulses from `pulse_rx`
/// `search` of None or "default" picks the host's default output
pub fn start_pulse_stream(search: Option<&str>, pulse_rx: Receiver<HapticPulse>) -> Result<cpal::Stream> {
    let host = cpal::default_host();

    let device = match search {
        None | Some("default") => host
            .default_output_device()
            .ok_or_else(|| anyhow!("No default audio output device"))?,
        Some(search) => {
            let devices = list_audio_devices()?;
            let index = find_audio_device(&devices, search)?;
            host.output_devices()?
                .nth(index)
                .ok_or_else(|| anyhow!("Selected audio device not available"))?
        }
    };

    let audio_config = device.default_output_config()?;
    let num_channels = audio_config.channels() as usize;

    match audio_config.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &audio_config.into(), pulse_rx, num_channels),
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &audio_config.into(), pulse_rx, num_channels),
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &audio_config.into(), pulse_rx, num_channels),
        other => Err(anyhow!("Unsupported sample format: {:?}", other)),
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    pulse_rx: Receiver<HapticPulse>,
    num_channels: usize,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let sample_rate = config.sample_rate as f32;
    let mut engine = PulseEngine::new(sample_rate, pulse_rx);

    // Pre-allocate buffer for processing
    let mut temp_buffer = vec![0.0f32; 512 * num_channels];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if temp_buffer.len() < data.len() {
                temp_buffer.resize(data.len(), 0.0);
            }

            engine.process(&mut temp_buffer[..data.len()], num_channels);

            for (out, sample) in data.iter_mut().zip(&temp_buffer) {
                *out = T::from_sample(*sample);
            }
        },
        |err| tracing::error!(%err, "audio stream error"),
        None,
    )?;

    stream.play()?;

    Ok(stream)
}

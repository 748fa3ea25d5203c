// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::ResourceLoader;
use crate::Sound;
use anyhow::anyhow;
use std::{error::Error, io::Cursor};

/// Decodes `.wav` files with `hound`, normalising integer samples to `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundLoader;

impl ResourceLoader for SoundLoader {
    type Output = Sound;

    fn load(&self, bytes: &[u8]) -> Result<Sound, Box<dyn Error + Send + Sync>> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let samples: Result<Vec<f32>, _> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect(),
            hound::SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / max_value))
                    .collect()
            }
        };
        let samples = samples.map_err(|e| anyhow!("Failed to parse WAV samples: {}", e))?;

        Ok(Sound {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }
}

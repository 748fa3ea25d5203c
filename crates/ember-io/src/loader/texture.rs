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
use crate::Texture;
use anyhow::Context;
use std::error::Error;
use std::path::Path;

/// Decodes PNG, JPEG, BMP and TGA images to RGBA8.
#[derive(Debug, Clone, Default)]
pub struct TextureLoader {
    format: Option<image::ImageFormat>,
}

impl TextureLoader {
    /// A loader that uses the extension of `path` as a format hint.
    ///
    /// TGA has no magic number, so the hint is required for it.
    pub fn for_path(path: &Path) -> Self {
        Self {
            format: image::ImageFormat::from_path(path).ok(),
        }
    }
}

impl ResourceLoader for TextureLoader {
    type Output = Texture;

    fn load(&self, bytes: &[u8]) -> Result<Texture, Box<dyn Error + Send + Sync>> {
        let img = match self.format {
            Some(format) => image::load_from_memory_with_format(bytes, format),
            None => image::load_from_memory(bytes),
        }
        .context("Failed to decode image from memory")?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Texture {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_loader_invalid_bytes() {
        let loader = TextureLoader::for_path(Path::new("broken.png"));
        assert!(loader.load(&[0, 1, 2, 3]).is_err());
    }

    #[test]
    fn test_texture_loader_decodes_png() {
        let mut bytes = Vec::new();
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 255]));
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let texture = TextureLoader::for_path(Path::new("red.png"))
            .load(&bytes)
            .unwrap();
        assert_eq!((texture.width, texture.height), (2, 3));
        assert_eq!(texture.pixels.len(), 2 * 3 * 4);
        assert_eq!(&texture.pixels[..4], &[255, 0, 0, 255]);
    }
}

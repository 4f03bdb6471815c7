//! Sprite loading.
//!
//! The terminal cannot blit pixels, so a sprite is reduced to its size and
//! the average colour of its opaque pixels.  A sprite that fails to load is
//! simply absent and draws nothing.

use std::path::{Path, PathBuf};

/// File names looked up inside the assets directory.
pub const PLAYER_IMAGE: &str = "Player.png";
pub const ENEMY_IMAGE: &str = "Enemy.png";

/// Asset errors
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// Decoding or reading the file failed
    #[error("Failed to load {path:?}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    /// Every pixel is fully transparent
    #[error("Image {0:?} has no opaque pixels")]
    Empty(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    /// Average colour of the opaque pixels.
    pub color: [u8; 3],
}

impl Sprite {
    /// Load and summarise an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref).map_err(|e| AssetError::LoadFailed {
            path: path_ref.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut sum = [0u64; 3];
        let mut opaque = 0u64;
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue;
            }
            sum[0] += u64::from(r);
            sum[1] += u64::from(g);
            sum[2] += u64::from(b);
            opaque += 1;
        }
        if opaque == 0 {
            return Err(AssetError::Empty(path_ref.to_path_buf()));
        }

        let color = sum.map(|channel| (channel / opaque) as u8);
        log::info!(
            "Loaded sprite {}x{} from {:?} (colour {:?})",
            width,
            height,
            path_ref,
            color
        );
        Ok(Sprite {
            width,
            height,
            color,
        })
    }

    /// A solid-colour sprite (useful for testing and defaults)
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> Self {
        Sprite {
            width,
            height,
            color,
        }
    }
}

/// The two sprites the game draws.  Either may be missing.
#[derive(Clone, Debug, Default)]
pub struct Sprites {
    pub player: Option<Sprite>,
    pub enemy: Option<Sprite>,
}

impl Sprites {
    /// Load `Player.png` and `Enemy.png` from `dir`.  Failures are logged and
    /// leave the corresponding sprite empty.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Sprites {
            player: load_or_warn(&dir.join(PLAYER_IMAGE)),
            enemy: load_or_warn(&dir.join(ENEMY_IMAGE)),
        }
    }
}

fn load_or_warn(path: &Path) -> Option<Sprite> {
    match Sprite::from_file(path) {
        Ok(sprite) => Some(sprite),
        Err(e) => {
            log::warn!("{} - sprite will not be drawn", e);
            None
        }
    }
}

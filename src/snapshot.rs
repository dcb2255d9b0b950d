//! PNG snapshots of rendered frames

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use resvg::tiny_skia::PremultipliedColorU8;

/// Timestamped snapshot path inside `dir`
pub fn snapshot_path(dir: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("segdisp_{}.png", timestamp))
}

/// Convert premultiplied RGBA to straight RGBA for image files
pub fn demultiply_rgba(premultiplied: &[u8]) -> Vec<u8> {
    let mut out = premultiplied.to_vec();
    for px in out.chunks_exact_mut(4) {
        // Bytes that are not valid premultiplied color pass through as is
        if let Some(c) = PremultipliedColorU8::from_rgba(px[0], px[1], px[2], px[3]) {
            let c = c.demultiply();
            px.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
    }
    out
}

/// Save a premultiplied RGBA buffer as PNG
pub fn save_png(path: &Path, premultiplied: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = width as usize * height as usize * 4;
    if premultiplied.len() != expected {
        bail!(
            "buffer is {} bytes, {}x{} RGBA needs {}",
            premultiplied.len(),
            width,
            height,
            expected
        );
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create snapshot: {}", path.display()))?;
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&demultiply_rgba(premultiplied))?;

    info!("Snapshot saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demultiply_rgba() {
        let px = demultiply_rgba(&[0x1d, 0x1d, 0x1d, 0x1d, 0, 0, 0, 0, 10, 20, 30, 255]);
        assert_eq!(px, vec![255, 255, 255, 0x1d, 0, 0, 0, 0, 10, 20, 30, 255]);
    }

    #[test]
    fn test_save_png_writes_file() {
        let path = std::env::temp_dir().join(format!("segdisp-snap-{}.png", std::process::id()));
        save_png(&path, &[255, 0, 0, 255, 0, 0, 0, 0], 2, 1).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_png_rejects_short_buffer() {
        let path = std::env::temp_dir().join("segdisp-never-written.png");
        assert!(save_png(&path, &[0; 4], 2, 2).is_err());
    }

    #[test]
    fn test_snapshot_path_in_dir() {
        let p = snapshot_path(Path::new("/tmp"));
        assert!(p.starts_with("/tmp"));
        assert_eq!(p.extension().and_then(|e| e.to_str()), Some("png"));
    }
}

//! Image-to-grid conversion.

use std::path::Path;

use image::GrayImage;
use tracing::info;

use crate::error::Result;
use crate::simulation::grid::OccupancyGrid;

/// Binarizes a grayscale image: a pixel brighter than `threshold` is traversable.
///
/// # Errors
///
/// Returns `SimError::EmptyGrid` for a zero-sized image.
pub fn grid_from_luma(img: &GrayImage, threshold: u8) -> Result<OccupancyGrid> {
    let rows = (0..img.height())
        .map(|y| {
            (0..img.width())
                .map(|x| img.get_pixel(x, y).0[0] > threshold)
                .collect()
        })
        .collect();
    OccupancyGrid::new(rows)
}

/// Loads a maze image from disk and binarizes it.
///
/// # Errors
///
/// Fails if the image cannot be opened or decoded, or is empty.
pub fn load_grid(path: &Path, threshold: u8) -> Result<OccupancyGrid> {
    let img = image::open(path)?.into_luma8();
    let grid = grid_from_luma(&img, threshold)?;
    info!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        traversable = grid.traversable_count(),
        "loaded maze"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_threshold_is_strict() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[127u8, 128, 129][x as usize]]));
        let grid = grid_from_luma(&img, 128).unwrap();
        assert!(!grid.is_traversable(0, 0));
        assert!(!grid.is_traversable(1, 0));
        assert!(grid.is_traversable(2, 0));
    }

    #[test]
    fn test_dimensions_follow_image() {
        let img = GrayImage::from_fn(4, 2, |_, _| Luma([255u8]));
        let grid = grid_from_luma(&img, 128).unwrap();
        assert_eq!((grid.width(), grid.height()), (4, 2));
        assert_eq!(grid.traversable_count(), 8);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_grid(Path::new("does/not/exist.png"), 128).is_err());
    }
}

//! Rendering the game state into an RGB frame.
use crate::{CollectibleSet, Grid, Position};
use image::{Rgb, RgbImage};

const WALL: Rgb<u8> = Rgb([0, 0, 255]);
const PLAYER: Rgb<u8> = Rgb([255, 255, 0]);
const PURSUER: Rgb<u8> = Rgb([255, 0, 0]);
const COLLECTIBLE: Rgb<u8> = Rgb([255, 255, 255]);

/// Draws frames of `rows * tile_size` by `cols * tile_size` pixels.
///
/// The frame is a pure function of its inputs: black background, blue walls,
/// then the player, the pursuer and the collectibles as filled discs.
#[derive(Clone, Debug)]
pub struct Renderer {
    player_radius: i32,
    pursuer_radius: i32,
    collectible_radius: i32,
}

impl Renderer {
    /// Constructs a renderer with radii of discs in pixels.
    pub fn new(player_radius: i32, pursuer_radius: i32, collectible_radius: i32) -> Self {
        Self {
            player_radius,
            pursuer_radius,
            collectible_radius,
        }
    }

    /// Renders a frame.
    pub fn render(
        &self,
        grid: &Grid,
        player: &Position,
        pursuer: &Position,
        collectibles: &CollectibleSet,
    ) -> RgbImage {
        let tile = grid.tile_size().max(0) as u32;
        let mut img = RgbImage::new(grid.cols() as u32 * tile, grid.rows() as u32 * tile);

        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                if grid.is_blocked(grid.cell_origin(row, col)) {
                    fill_rect(&mut img, col as u32 * tile, row as u32 * tile, tile, WALL);
                }
            }
        }
        fill_disc(&mut img, player, self.player_radius, PLAYER);
        fill_disc(&mut img, pursuer, self.pursuer_radius, PURSUER);
        for item in collectibles.iter() {
            fill_disc(&mut img, item, self.collectible_radius, COLLECTIBLE);
        }

        img
    }
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, size: u32, color: Rgb<u8>) {
    for y in y0..(y0 + size).min(img.height()) {
        for x in x0..(x0 + size).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Pixels outside the image are clipped.
fn fill_disc(img: &mut RgbImage, center: &Position, radius: i32, color: Rgb<u8>) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    for y in (center.y - radius).max(0)..=(center.y + radius).min(h - 1) {
        for x in (center.x - radius).max(0)..=(center.x + radius).min(w - 1) {
            let (dx, dy) = (x - center.x, y - center.y);
            if dx * dx + dy * dy <= radius * radius {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

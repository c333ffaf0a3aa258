//! Outward monotonicity for per-peak templates.
//!
//! Source profiles fall off away from their peak; a bump at larger radius is
//! flux borrowed from a neighbour. The enforcer walks square (L∞) rings
//! around the peak and lets every ring pixel cast a shadow outward: each pixel
//! inside the shadow cone is clamped to the caster's value.
//!
//! Rings are processed in batches of `batch_size`. Casters read from a
//! snapshot taken at the start of the batch while clamps go to the live
//! buffer, so the result inside a batch does not depend on visiting order.
//!
//! Ring `L` is walked starting at its north-east corner `(L, −L)` through
//! four legs of `2L` pixels: the east edge downward, the south edge leftward,
//! the west edge upward and the north edge rightward. East/west pixels cast
//! shadows along x, north/south pixels along y.

use crate::footprint::Footprint;
use crate::image::{MaskedImage, PixelValue};
use crate::types::Peak;
use log::debug;
use serde::{Deserialize, Serialize};

/// Tuning of the shadow cast.
///
/// The defaults are empirical; change them only to calibrate against
/// reference outputs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonotonicOptions {
    /// Rings per snapshot batch; also the shadow length in pixels.
    pub batch_size: usize,
    /// Half-width of the shadow cone, in slope units around the caster's ray.
    pub cone_half_width: f64,
}

impl Default for MonotonicOptions {
    fn default() -> Self {
        Self {
            batch_size: 5,
            cone_half_width: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonotonicStats {
    pub rings: usize,
    /// Number of clamps that lowered a pixel.
    pub clamped: usize,
}

/// Unit step along ring leg `leg` (0..4).
const LEG_STEPS: [(i32, i32); 4] = [(0, 1), (-1, 0), (0, -1), (1, 0)];

struct Grid {
    x0: i32,
    y0: i32,
    w: i32,
    h: i32,
}

impl Grid {
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let lx = x - self.x0;
        let ly = y - self.y0;
        if lx < 0 || ly < 0 || lx >= self.w || ly >= self.h {
            return None;
        }
        Some((ly * self.w + lx) as usize)
    }
}

/// Clamp `template` in place so flux does not rise moving away from `peak`.
///
/// An empty footprint leaves the template untouched. Shadow targets and ring
/// pixels outside the template are skipped.
pub fn enforce_monotonic<T: PixelValue>(
    template: &mut MaskedImage<T>,
    footprint: &Footprint,
    peak: Peak,
    options: &MonotonicOptions,
) -> MonotonicStats {
    let mut stats = MonotonicStats::default();
    if footprint.is_empty() {
        return stats;
    }

    let grid = Grid {
        x0: template.x0(),
        y0: template.y0(),
        w: template.width() as i32,
        h: template.height() as i32,
    };
    let (cx, cy) = (peak.ix, peak.iy);
    let dw = (cx - grid.x0).max(grid.x0 + grid.w - cx);
    let dh = (cy - grid.y0).max(grid.y0 + grid.h - cy);
    let extent = dw.max(dh);
    let batch = options.batch_size.max(1) as i32;
    let a = options.cone_half_width;

    let live = &mut template.image_mut().data;
    let mut snapshot = live.clone();

    let mut s = 0;
    while s < extent {
        snapshot.copy_from_slice(live);
        for l in s..s + batch {
            stats.rings += 1;
            let (mut x, mut y) = (l, -l);
            for i in 0..8 * l {
                let leg = (i / (2 * l)) as usize;
                let (px, py) = (x, y);
                let (dx, dy) = LEG_STEPS[leg];
                x += dx;
                y += dy;

                let Some(src_idx) = grid.index(cx + px, cy + py) else {
                    continue;
                };
                let src = snapshot[src_idx];
                // East/west legs are the vertical edges: shadow along x.
                let along_x = leg % 2 == 0;
                let (major, minor) = if along_x { (px, py) } else { (py, px) };
                let sign = major.signum();
                let slope = minor as f64 / major as f64;
                for dist in 1..=batch {
                    let smajor = major + sign * dist;
                    let e0 = ((slope - a) * smajor as f64).round() as i32;
                    let e1 = ((slope + a) * smajor as f64).round() as i32;
                    for sminor in e0.min(e1)..=e0.max(e1) {
                        let (tx, ty) = if along_x {
                            (smajor, sminor)
                        } else {
                            (sminor, smajor)
                        };
                        let Some(t) = grid.index(cx + tx, cy + ty) else {
                            continue;
                        };
                        if live[t] > src {
                            live[t] = src;
                            stats.clamped += 1;
                        }
                    }
                }
            }
        }
        s += batch;
    }

    debug!(
        "monotonic: peak=({cx}, {cy}) rings={} clamped={}",
        stats.rings, stats.clamped
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BBox;

    /// Pyramid profile `100 − max(|dx|, |dy|)` around `(cx, cy)`.
    fn linf_profile(bbox: BBox, cx: i32, cy: i32) -> MaskedImage<f32> {
        let mut img = MaskedImage::new(bbox);
        for y in bbox.y0..=bbox.y1 {
            for x in bbox.x0..=bbox.x1 {
                let r = (x - cx).abs().max((y - cy).abs());
                img.set(x, y, 100.0 - r as f32);
            }
        }
        img
    }

    #[test]
    fn monotone_profile_is_untouched() {
        let bbox = BBox::new(100, 200, 120, 220);
        let mut img = linf_profile(bbox, 110, 210);
        let before = img.clone();
        let fp = Footprint::from_bbox(&bbox);
        let stats = enforce_monotonic(&mut img, &fp, Peak::new(110, 210), &MonotonicOptions::default());
        assert_eq!(img, before);
        assert_eq!(stats.clamped, 0);
        assert!(stats.rings >= 11);
    }

    #[test]
    fn outer_bump_is_clamped_to_inner_ring() {
        let bbox = BBox::new(100, 200, 120, 220);
        let mut img = linf_profile(bbox, 110, 210);
        img.set(117, 210, 200.0);
        let fp = Footprint::from_bbox(&bbox);
        enforce_monotonic(&mut img, &fp, Peak::new(110, 210), &MonotonicOptions::default());

        assert_eq!(img.get(117, 210), Some(94.0));
        let reference = linf_profile(bbox, 110, 210);
        for y in bbox.y0..=bbox.y1 {
            for x in bbox.x0..=bbox.x1 {
                if (x, y) != (117, 210) {
                    assert_eq!(img.get(x, y), reference.get(x, y), "pixel ({x}, {y}) changed");
                }
            }
        }
    }

    #[test]
    fn peak_pixel_never_changes() {
        let bbox = BBox::new(0, 0, 8, 8);
        let mut img = MaskedImage::new(bbox);
        for (x, y) in Footprint::from_bbox(&bbox).pixels() {
            img.set(x, y, ((x * 7 + y * 13) % 11) as f32);
        }
        let peak_value = img.get(2, 3);
        enforce_monotonic(
            &mut img,
            &Footprint::from_bbox(&bbox),
            Peak::new(2, 3),
            &MonotonicOptions::default(),
        );
        assert_eq!(img.get(2, 3), peak_value);
        // Direct east/west neighbours at ring 2 sit in the ring-1 cone.
        assert!(img.get(4, 3) <= img.get(3, 3));
        assert!(img.get(0, 3) <= img.get(1, 3));
    }

    #[test]
    fn empty_footprint_is_a_no_op() {
        let bbox = BBox::new(0, 0, 4, 4);
        let mut img = linf_profile(bbox, 2, 2);
        img.set(4, 2, 500.0);
        let before = img.clone();
        let stats = enforce_monotonic(
            &mut img,
            &Footprint::default(),
            Peak::new(2, 2),
            &MonotonicOptions::default(),
        );
        assert_eq!(img, before);
        assert_eq!(stats, MonotonicStats::default());
    }

    #[test]
    fn peak_near_border_skips_outside_pixels() {
        let bbox = BBox::new(0, 0, 5, 5);
        let mut img = linf_profile(bbox, 0, 0);
        img.set(5, 0, 150.0);
        enforce_monotonic(
            &mut img,
            &Footprint::from_bbox(&bbox),
            Peak::new(0, 0),
            &MonotonicOptions::default(),
        );
        assert_eq!(img.get(5, 0), Some(96.0));
    }
}

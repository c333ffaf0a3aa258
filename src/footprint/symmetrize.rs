//! Point-symmetric subset of a footprint.
//!
//! A pixel `(x, y)` survives iff both it and its reflection
//! `(2·cx − x, 2·cy − y)` belong to the footprint. The scan is linear in the
//! number of spans: a forward cursor walks rows `cy + dy` left to right while
//! a backward cursor walks rows `cy − dy` right to left. Measured as offsets
//! from `cx`, both cursors then see intervals in increasing order, so each row
//! pair reduces to intersecting two sorted interval lists.

use super::{Footprint, Span};
use crate::error::DeblendError;
use log::debug;

/// Interval of a span as offsets from the centre column.
///
/// For the forward row the offsets are `x − cx`; for the backward row they
/// are `cx − x`, which turns reflection into identity.
#[derive(Clone, Copy, Debug)]
struct Gap {
    lo: i32,
    hi: i32,
}

impl Gap {
    fn forward(span: &Span, cx: i32) -> Self {
        Self {
            lo: span.x0 - cx,
            hi: span.x1 - cx,
        }
    }

    fn backward(span: &Span, cx: i32) -> Self {
        Self {
            lo: cx - span.x1,
            hi: cx - span.x0,
        }
    }
}

/// Return the subset of `footprint` that is point-symmetric about `(cx, cy)`.
///
/// Fails with [`DeblendError::PeakNotInFootprint`] when no span contains the
/// centre. The footprint type guarantees normalized input.
pub fn symmetrize(footprint: &Footprint, cx: i32, cy: i32) -> Result<Footprint, DeblendError> {
    let spans = footprint.spans();
    let peak = footprint
        .span_index(cx, cy)
        .ok_or(DeblendError::PeakNotInFootprint { x: cx, y: cy })?;

    let n = spans.len();
    let mut out = Vec::new();
    // Row dy = 0 starts from the peak span in both directions: spans right
    // of the peak reflect onto spans left of it.
    let mut fwd = peak;
    let mut back = peak as isize;
    let mut dy = 0;
    loop {
        let fy = cy + dy;
        let by = cy - dy;
        while fwd < n && spans[fwd].y < fy {
            fwd += 1;
        }
        while back >= 0 && spans[back as usize].y > by {
            back -= 1;
        }
        if fwd >= n || back < 0 {
            break;
        }

        while fwd < n && back >= 0 && spans[fwd].y == fy && spans[back as usize].y == by {
            let f = Gap::forward(&spans[fwd], cx);
            let b = Gap::backward(&spans[back as usize], cx);
            let lo = f.lo.max(b.lo);
            let hi = f.hi.min(b.hi);
            if lo <= hi {
                out.push(Span::new(fy, cx + lo, cx + hi));
                out.push(Span::new(by, cx - hi, cx - lo));
            }
            // The interval that ends first cannot meet anything further along
            // the other row; on a tie neither can.
            if f.hi <= b.hi {
                fwd += 1;
            }
            if b.hi <= f.hi {
                back -= 1;
            }
        }
        dy += 1;
    }

    let sym = Footprint::from_spans(out);
    debug!(
        "symmetrize: centre=({cx}, {cy}) spans {} -> {} area {} -> {}",
        n,
        sym.spans().len(),
        footprint.area(),
        sym.area()
    );
    Ok(sym)
}

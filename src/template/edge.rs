use crate::footprint::{Footprint, Span};
use crate::image::{MaskedImage, PixelValue};

/// Footprint pixels with a 4-neighbour outside the footprint.
fn is_edge(footprint: &Footprint, x: i32, y: i32) -> bool {
    !(footprint.contains(x - 1, y)
        && footprint.contains(x + 1, y)
        && footprint.contains(x, y - 1)
        && footprint.contains(x, y + 1))
}

/// Boundary pixels of `footprint` whose template value reaches `threshold`.
///
/// Pixels the template does not cover are ignored.
pub fn significant_edge_pixels<T: PixelValue>(
    template: &MaskedImage<T>,
    footprint: &Footprint,
    threshold: T,
) -> Footprint {
    let spans = footprint
        .pixels()
        .filter(|&(x, y)| is_edge(footprint, x, y))
        .filter(|&(x, y)| template.get(x, y).is_some_and(|v| v >= threshold))
        .map(|(x, y)| Span::new(y, x, x));
    Footprint::from_spans(spans)
}

pub fn has_significant_flux_at_edge<T: PixelValue>(
    template: &MaskedImage<T>,
    footprint: &Footprint,
    threshold: T,
) -> bool {
    footprint.pixels().any(|(x, y)| {
        is_edge(footprint, x, y) && template.get(x, y).is_some_and(|v| v >= threshold)
    })
}

/// Grey levels for shades 0..=3, lightest first.
pub(crate) const GRAYSCALE: [u8; 4] = [0xFF, 0xAA, 0x55, 0x00];

/// Expand a shade framebuffer into packed RGB24.
///
/// Writes as many whole pixels as fit in `buffer`.
pub(crate) fn render_rgb24(framebuffer: &[u8], buffer: &mut [u8]) {
    for (rgb, &shade) in buffer.chunks_exact_mut(3).zip(framebuffer) {
        rgb.fill(GRAYSCALE[(shade & 0x03) as usize]);
    }
}

use crate::style::Position;

/// Top-left anchor for a caption image inside the frame.
///
/// Horizontally centered for every position; vertically placed by `position`
/// with `margin` pixels of clearance from the top or bottom edge. An image
/// larger than the frame yields a negative coordinate and is clipped by the
/// overlay rather than rescaled.
pub fn anchor_for(
    position: Position,
    margin: u32,
    frame_w: u32,
    frame_h: u32,
    image_w: u32,
    image_h: u32,
) -> (i64, i64) {
    let x = (i64::from(frame_w) - i64::from(image_w)) / 2;
    let y = match position {
        Position::Top => i64::from(margin),
        Position::Middle => (i64::from(frame_h) - i64::from(image_h)) / 2,
        Position::Bottom => i64::from(frame_h) - i64::from(image_h) - i64::from(margin),
    };
    (x, y)
}

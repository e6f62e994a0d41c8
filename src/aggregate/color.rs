use crate::store::operations::votes::{Rgb, Vote};

/// Mean color, each channel rounded half up on its own. `None` when empty.
pub fn average_rgb(colors: &[Rgb]) -> Option<Rgb> {
    if colors.is_empty() {
        return None;
    }
    let n = colors.len() as u64;
    let (r, g, b) = colors.iter().fold((0u64, 0u64, 0u64), |(r, g, b), c| {
        (r + u64::from(c.r), g + u64::from(c.g), b + u64::from(c.b))
    });
    Some(Rgb::new(
        round_half_up(r, n),
        round_half_up(g, n),
        round_half_up(b, n),
    ))
}

pub fn average_color(votes: &[Vote]) -> Option<Rgb> {
    let colors: Vec<Rgb> = votes.iter().map(Vote::rgb).collect();
    average_rgb(&colors)
}

// floor(sum / n + 1/2)，整数运算避免浮点误差；sum <= 255 * n 保证结果不超过 255
fn round_half_up(sum: u64, n: u64) -> u8 {
    let rounded = (2 * sum + n) / (2 * n);
    u8::try_from(rounded).unwrap_or(u8::MAX)
}

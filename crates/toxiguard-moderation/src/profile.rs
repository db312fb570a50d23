//! Random author profiles for anonymous submissions

use rand::Rng;
use toxiguard_core::Author;

const DISPLAY_NAMES: &[&str] = &[
    "Tech Enthusiast",
    "Code Ninja",
    "Digital Explorer",
    "Cyber Wizard",
    "Data Detective",
    "Innovation Guru",
    "Tech Maverick",
    "Pixel Pioneer",
    "Coding Champion",
];

/// Pick a display name and an `rgb(r,g,b)` avatar colour
pub fn random_author() -> Author {
    random_author_with(&mut rand::thread_rng())
}

/// Same as [`random_author`] with a caller-supplied generator
pub fn random_author_with<R: Rng + ?Sized>(rng: &mut R) -> Author {
    let name = DISPLAY_NAMES[rng.gen_range(0..DISPLAY_NAMES.len())];
    let r: u8 = rng.gen_range(100..=200);
    let g: u8 = rng.gen_range(100..=200);
    let b: u8 = rng.gen_range(100..=200);
    Author::new(name).with_color(format!("rgb({r},{g},{b})"))
}

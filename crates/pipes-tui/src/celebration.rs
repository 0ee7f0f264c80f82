use crossterm::style::Color;
use rand::Rng;

/// Confetti characters
const CONFETTI_CHARS: &[char] = &['*', '✦', '✧', '◆', '◇', '○', '●', '■', '▲'];

/// A single particle of the win celebration
#[derive(Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub char: char,
    pub color: Color,
    pub lifetime: f32,
}

impl Particle {
    pub fn is_visible(&self, width: u16, height: u16) -> bool {
        self.x >= 0.0
            && self.x < width as f32
            && self.y >= 0.0
            && self.y < height as f32
            && self.lifetime > 0.0
    }
}

/// Convert hue (0.0-1.0) to RGB color
pub fn hue_to_rgb(hue: f32) -> Color {
    let h = hue * 6.0;
    let x = (1.0 - (h % 2.0 - 1.0).abs()) * 255.0;

    let (r, g, b) = match h as i32 % 6 {
        0 => (255, x as u8, 0),
        1 => (x as u8, 255, 0),
        2 => (0, 255, x as u8),
        3 => (0, x as u8, 255),
        4 => (x as u8, 0, 255),
        _ => (255, 0, x as u8),
    };

    Color::Rgb { r, g, b }
}

/// Confetti bursting out of the solved grid
#[derive(Default)]
pub struct Celebration {
    particles: Vec<Particle>,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Burst from the center of the given area
    pub fn start(&mut self, center_x: u16, center_y: u16) {
        let mut rng = rand::thread_rng();
        self.particles = (0..80)
            .map(|_| {
                let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
                let speed: f32 = rng.gen_range(0.4..1.6);
                Particle {
                    x: center_x as f32,
                    y: center_y as f32,
                    vx: angle.cos() * speed * 2.0,
                    vy: angle.sin() * speed - 0.5,
                    char: CONFETTI_CHARS[rng.gen_range(0..CONFETTI_CHARS.len())],
                    color: hue_to_rgb(rng.gen_range(0.0..1.0)),
                    lifetime: rng.gen_range(15.0..40.0),
                }
            })
            .collect();
    }

    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += 0.08;
            p.lifetime -= 1.0;
        }
        self.particles.retain(|p| p.lifetime > 0.0);
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn stop(&mut self) {
        self.particles.clear();
    }
}

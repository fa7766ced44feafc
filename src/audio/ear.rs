//! Outer and middle ear transmission: eight fixed second-order sections in cascade.

/// One second-order section with `a0 == 1`.
#[derive(Clone, Copy, Debug)]
pub struct Section {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

const fn section(b0: f64, b1: f64, b2: f64, a1: f64, a2: f64) -> Section {
    Section { b0, b1, b2, a1, a2 }
}

/// Coefficients for 48 kHz.
pub const EAR_SECTIONS: [Section; 8] = [
    section(1.015896, -1.925299, 0.922118, -1.925299, 0.938014),
    section(0.958943, -1.806088, 0.876352, -1.806088, 0.835295),
    section(0.961551, -1.763632, 0.821820, -1.763632, 0.783371),
    section(2.225165, -1.434650, -0.498983, -1.434650, 0.726182),
    section(0.471586, -0.366092, 0.244984, -0.366092, -0.283430),
    section(0.115310, 0.000000, -0.115310, -1.796072, 0.805945),
    section(0.988451, -1.912434, 0.926823, -1.912434, 0.915149),
    section(1.952025, 0.162319, -0.667963, 0.162319, 0.284062),
];

/// Running state of a section, transposed direct form II.
#[derive(Clone, Copy, Debug, Default)]
struct State {
    z1: f64,
    z2: f64,
}

impl Section {
    #[inline]
    fn tick(&self, state: &mut State, x: f64) -> f64 {
        let y = self.b0 * x + state.z1;
        state.z1 = self.b1 * x - self.a1 * y + state.z2;
        state.z2 = self.b2 * x - self.a2 * y;
        y
    }

    /// Filter `samples` in place, starting from rest.
    pub fn process(&self, samples: &mut [f64]) {
        let mut state = State::default();
        for s in samples.iter_mut() {
            *s = self.tick(&mut state, *s);
        }
    }
}

/// Apply the whole cascade in place, forward only.
pub fn apply(samples: &mut [f64]) {
    for section in EAR_SECTIONS.iter() {
        section.process(samples);
    }
}
